//! Trace Validator
//!
//! Port judging whether a candidate trace is feasible along its program
//! path. Solver or model backed validators implement the same trait; the crate
//! ships the solver-free branch check and an accept-all validator.

pub mod branch_condition;

pub use branch_condition::{path_branch_facts, BranchConditionValidator, BranchFact};

use crate::errors::DfaResult;
use crate::features::environment::Environment;
use crate::shared::models::Trace;

/// Feasibility oracle for complete traces
pub trait TraceValidator: Send + Sync {
    fn name(&self) -> &'static str;

    /// `Ok(false)` rejects the trace
    fn validate(&self, trace: &Trace, environment: &Environment) -> DfaResult<bool>;
}

/// Confirms every candidate
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAllValidator;

impl TraceValidator for AcceptAllValidator {
    fn name(&self) -> &'static str {
        "accept-all"
    }

    fn validate(&self, _trace: &Trace, _environment: &Environment) -> DfaResult<bool> {
        Ok(true)
    }
}
