//! Solver-free branch feasibility check
//!
//! A trace is rejected when one of its points lies in
//! - the true branch of a literally false condition (`(false)`, `(0)`)
//! - the else branch of a literally true condition (`(true)`, `(1)`)
//! - a different branch of the same if-statement than an earlier point of the
//!   same function activation (consecutive points in one function)
//!
//! Everything else is accepted; conditions over variables need a solver.

use serde::Serialize;
use tracing::debug;

use super::TraceValidator;
use crate::errors::DfaResult;
use crate::features::environment::Environment;
use crate::shared::models::{BranchKind, FunctionId, LineNumber, Trace};

/// Branch membership of one trace point, the path facts handed to a
/// solver or model backed validator
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BranchFact {
    pub function_id: FunctionId,
    pub function_name: String,
    pub line: LineNumber,
    pub condition: String,
    pub condition_line: LineNumber,
    pub branch: BranchKind,
    /// Key of the if-statement in its function
    pub statement: (LineNumber, LineNumber),
}

/// Branch facts for every point of `trace`, in trace order
pub fn path_branch_facts(trace: &Trace, environment: &Environment) -> DfaResult<Vec<BranchFact>> {
    let mut facts = Vec::new();
    for point in trace.iter() {
        let function = environment.require(point.function_id)?;
        let line = point.value.line_number;
        for membership in function.branch_membership(line) {
            facts.push(BranchFact {
                function_id: point.function_id,
                function_name: function.name.clone(),
                line,
                condition: membership.if_statement.condition.clone(),
                condition_line: membership.if_statement.condition_line,
                branch: membership.branch,
                statement: membership.statement,
            });
        }
    }
    Ok(facts)
}

/// Literal truth value of a condition, when it has one
fn literal_condition(condition: &str) -> Option<bool> {
    let compact: String = condition.chars().filter(|c| !c.is_whitespace()).collect();
    match compact.as_str() {
        "(true)" | "(1)" => Some(true),
        "(false)" | "(0)" => Some(false),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BranchConditionValidator;

impl BranchConditionValidator {
    pub fn new() -> Self {
        Self
    }
}

impl TraceValidator for BranchConditionValidator {
    fn name(&self) -> &'static str {
        "branch-condition"
    }

    fn validate(&self, trace: &Trace, environment: &Environment) -> DfaResult<bool> {
        let facts = path_branch_facts(trace, environment)?;

        for fact in &facts {
            let dead = matches!(
                (literal_condition(&fact.condition), fact.branch),
                (Some(false), BranchKind::True) | (Some(true), BranchKind::Else)
            );
            if dead {
                debug!(
                    function = %fact.function_name,
                    line = fact.line,
                    condition = %fact.condition,
                    "trace point in dead branch"
                );
                return Ok(false);
            }
        }

        // Conflicting branches within one activation
        let mut activation_start = 0;
        let points = trace.points();
        for i in 1..=points.len() {
            let boundary = i == points.len() || points[i].function_id != points[i - 1].function_id;
            if !boundary {
                continue;
            }
            let function_id = points[activation_start].function_id;
            let lines: Vec<LineNumber> = points[activation_start..i]
                .iter()
                .map(|p| p.value.line_number)
                .collect();
            let activation: Vec<&BranchFact> = facts
                .iter()
                .filter(|f| f.function_id == function_id && lines.contains(&f.line))
                .collect();
            for (a, fact) in activation.iter().enumerate() {
                if activation[..a]
                    .iter()
                    .any(|other| other.statement == fact.statement && other.branch != fact.branch)
                {
                    debug!(
                        function = %fact.function_name,
                        statement = ?fact.statement,
                        "trace crosses both branches of one if-statement"
                    );
                    return Ok(false);
                }
            }
            activation_start = i;
        }
        Ok(true)
    }
}
