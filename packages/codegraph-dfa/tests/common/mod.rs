//! Common test utilities for codegraph-dfa
//!
//! Shared fixtures, builders, scripted oracles and assertions for the
//! integration suites.

#![allow(dead_code)]

mod assertions;
mod builders;
mod fixtures;
mod oracles;

pub use assertions::*;
pub use builders::*;
pub use fixtures::*;
pub use oracles::*;
