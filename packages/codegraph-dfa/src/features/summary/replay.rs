//! Replay propagator
//!
//! Answers from a recording of earlier oracle verdicts, so an analysis can be
//! rerun offline with identical summaries. Only recorded pairs are reachable.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::debug;

use super::{Propagation, SummaryPropagator};
use crate::errors::DfaResult;
use crate::shared::models::{Function, LineNumber, SummaryPair};

/// One recorded reachable pair
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordedAnswer {
    /// Function name
    pub function: String,
    pub src_name: String,
    pub src_line: LineNumber,
    pub sink_name: String,
    pub sink_line: LineNumber,
}

impl RecordedAnswer {
    fn for_pair(function: &Function, (src, sink): &SummaryPair) -> RecordedAnswer {
        RecordedAnswer {
            function: function.name.clone(),
            src_name: src.name.clone(),
            src_line: src.line_number,
            sink_name: sink.name.clone(),
            sink_line: sink.line_number,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReplayPropagator {
    answers: BTreeSet<RecordedAnswer>,
}

impl ReplayPropagator {
    pub fn new(answers: impl IntoIterator<Item = RecordedAnswer>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
        }
    }

    pub fn from_json_str(json: &str) -> DfaResult<Self> {
        let answers: Vec<RecordedAnswer> = serde_json::from_str(json)?;
        Ok(Self::new(answers))
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> DfaResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let propagator = Self::from_json_str(&content)?;
        debug!(
            path = %path.as_ref().display(),
            answers = propagator.len(),
            "replay answers loaded"
        );
        Ok(propagator)
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }
}

impl SummaryPropagator for ReplayPropagator {
    fn name(&self) -> &'static str {
        "replay"
    }

    fn propagate(&self, function: &Function, pairs: &[SummaryPair]) -> DfaResult<Propagation> {
        Ok(Propagation::partition(pairs, |pair| {
            self.answers.contains(&RecordedAnswer::for_pair(function, pair))
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::models::{FunctionId, Value};
    use std::io::Write;
    use tempfile::NamedTempFile;

    const ANSWERS: &str = r#"[
        {"function": "f", "src_name": "x", "src_line": 2, "sink_name": "x", "sink_line": 6}
    ]"#;

    #[test]
    fn test_only_recorded_pairs_are_reachable() {
        let propagator = ReplayPropagator::from_json_str(ANSWERS).unwrap();
        let f = Function::new(FunctionId(1), "f", "");
        let g = Function::new(FunctionId(2), "g", "");
        let pair = (Value::src("x", 2), Value::sink("x", 6));

        let result = propagator.propagate(&f, &[pair.clone()]).unwrap();
        assert_eq!(result.reachable, vec![pair.clone()]);

        let result = propagator.propagate(&g, &[pair.clone()]).unwrap();
        assert_eq!(result.unreachable, vec![pair]);
    }

    #[test]
    fn test_from_json_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(ANSWERS.as_bytes()).unwrap();
        let propagator = ReplayPropagator::from_json_file(file.path()).unwrap();
        assert_eq!(propagator.len(), 1);
    }
}
