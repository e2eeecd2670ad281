//! Value Classifier
//!
//! Port that picks the source and sink values of a function body. The rule
//! based implementation matches line patterns per bug kind; model backed
//! classifiers plug in through the same trait.

pub mod rule_based;

pub use rule_based::RuleBasedClassifier;

use serde::{Deserialize, Serialize};

use crate::errors::DfaResult;
use crate::shared::models::{Function, Value};

/// Sources and sinks found in one function
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub sources: Vec<Value>,
    pub sinks: Vec<Value>,
}

impl Classification {
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty() && self.sinks.is_empty()
    }
}

/// Source/sink oracle
pub trait ValueClassifier: Send + Sync {
    /// Short identifier used in logs and oracle errors
    fn name(&self) -> &'static str;

    fn classify(&self, function: &Function) -> DfaResult<Classification>;
}
