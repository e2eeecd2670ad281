//! Configuration System
//!
//! Two levels:
//! - Preset: one-liner defaults (`fast`, `balanced`, `thorough`)
//! - YAML v1 file: preset plus per-field overrides
//!
//! # Examples
//!
//! ```rust,ignore
//! use codegraph_dfa::config::{DfaConfig, Preset, BugKind};
//!
//! let config = DfaConfig::from_preset(Preset::Fast).bug_kind(BugKind::Xss);
//! let config = DfaConfig::from_yaml("team-security.yaml")?;
//! ```

pub mod dfa_config;
pub mod error;
pub mod io;
pub mod preset;
pub mod validation;

// Re-exports
pub use dfa_config::{BugKind, DfaConfig};
pub use error::{ConfigError, ConfigResult};
pub use io::{ConfigFileV1, DfaConfigOverrides};
pub use preset::Preset;
pub use validation::Validatable;
