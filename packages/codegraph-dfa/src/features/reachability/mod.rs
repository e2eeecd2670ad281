//! Inter-procedural CFL-reachability
//!
//! - context: tagged call/return frames and the realizability check
//! - engine: depth-first search composing summaries into bug traces

pub mod context;
pub mod engine;

pub use context::{check_context_realizability, CallSiteRef, ContextFrame, ContextStack};
pub use engine::{CflReachabilityEngine, SearchLimits, SearchStats};
