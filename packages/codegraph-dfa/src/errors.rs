//! Error types for codegraph-dfa
//!
//! Provides unified error handling across the crate.

use thiserror::Error;

use crate::config::ConfigError;
use crate::shared::models::FunctionId;

/// Main error type for data-flow analysis operations
#[derive(Debug, Error)]
pub enum DfaError {
    /// Search asked to enter a function that is not in the Environment
    #[error("Function {function_id} has not been analyzed")]
    FunctionNotAnalyzed { function_id: FunctionId },

    /// Search started from an empty trace
    #[error("Search started from an empty trace")]
    EmptyTrace,

    /// Trace tail belongs to a different function than the one searched
    #[error("Trace tail is in function {found}, search is in function {expected}")]
    TraceFunctionMismatch {
        expected: FunctionId,
        found: FunctionId,
    },

    /// Program model has no record for the id
    #[error("Program model has no function {function_id}")]
    UnknownFunction { function_id: FunctionId },

    /// Program declaration is malformed (duplicate ids, bad references)
    #[error("Invalid program model: {0}")]
    InvalidProgram(String),

    /// Classifier, propagator or validator failed to answer
    #[error("{oracle} oracle failed: {message}")]
    Oracle {
        oracle: &'static str,
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DfaError {
    /// Create an oracle error
    pub fn oracle(oracle: &'static str, message: impl Into<String>) -> Self {
        DfaError::Oracle {
            oracle,
            message: message.into(),
        }
    }

    /// Broken Environment/Driver invariant rather than a data-dependent outcome
    pub fn is_precondition_violation(&self) -> bool {
        matches!(
            self,
            DfaError::FunctionNotAnalyzed { .. }
                | DfaError::EmptyTrace
                | DfaError::TraceFunctionMismatch { .. }
        )
    }
}

/// Result type alias for data-flow analysis operations
pub type DfaResult<T> = std::result::Result<T, DfaError>;
