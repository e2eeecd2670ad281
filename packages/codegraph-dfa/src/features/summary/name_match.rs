//! Name-matching propagator
//!
//! Rule-based stand-in for a model-backed propagator: a pair flows when the
//! end point is not before the start point and the end point's text mentions
//! the start point's identifier.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{Propagation, SummaryPropagator};
use crate::errors::DfaResult;
use crate::shared::models::{Function, SummaryPair, Value};

static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z_]\w*").expect("valid regex"));

#[derive(Debug, Clone, Copy, Default)]
pub struct NameMatchPropagator;

impl NameMatchPropagator {
    pub fn new() -> Self {
        Self
    }

    fn flows(start: &Value, end: &Value) -> bool {
        end.line_number >= start.line_number
            && IDENTIFIER
                .find_iter(&end.name)
                .any(|ident| ident.as_str() == start.name)
    }
}

impl SummaryPropagator for NameMatchPropagator {
    fn name(&self) -> &'static str {
        "name-match"
    }

    fn propagate(&self, _function: &Function, pairs: &[SummaryPair]) -> DfaResult<Propagation> {
        Ok(Propagation::partition(pairs, |(start, end)| {
            Self::flows(start, end)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::models::FunctionId;

    #[test]
    fn test_identifier_mention_flows_forward() {
        let f = Function::new(FunctionId(1), "f", "");
        let pairs = vec![
            (Value::src("data", 2), Value::sink("data", 5)),
            (Value::src("data", 2), Value::arg("data + 1", 4, 0)),
            (Value::src("data", 2), Value::arg("metadata", 4, 1)),
            (Value::src("data", 6), Value::sink("data", 5)),
        ];
        let result = NameMatchPropagator::new().propagate(&f, &pairs).unwrap();

        assert_eq!(result.reachable, pairs[..2].to_vec());
        assert_eq!(result.unreachable, pairs[2..].to_vec());
    }
}
