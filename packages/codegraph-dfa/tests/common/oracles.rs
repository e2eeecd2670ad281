//! Scripted oracles

use std::sync::atomic::{AtomicUsize, Ordering};

use codegraph_dfa::features::summary::{NameMatchPropagator, Propagation};
use codegraph_dfa::features::value_classification::{Classification, RuleBasedClassifier};
use codegraph_dfa::shared::models::SummaryPair;
use codegraph_dfa::{
    BugKind, DfaError, DfaResult, Environment, Function, SummaryPropagator, Trace, TraceValidator,
    ValueClassifier,
};

/// Name-match propagator that counts invocations and pairs asked
#[derive(Debug, Default)]
pub struct CountingPropagator {
    inner: NameMatchPropagator,
    calls: AtomicUsize,
    pairs: AtomicUsize,
}

impl CountingPropagator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn pairs(&self) -> usize {
        self.pairs.load(Ordering::SeqCst)
    }
}

impl SummaryPropagator for CountingPropagator {
    fn name(&self) -> &'static str {
        "counting"
    }

    fn propagate(&self, function: &Function, pairs: &[SummaryPair]) -> DfaResult<Propagation> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.pairs.fetch_add(pairs.len(), Ordering::SeqCst);
        self.inner.propagate(function, pairs)
    }
}

/// Rule-based classifier that fails on one function, for its first
/// `failures` classifications
pub struct FailingClassifier {
    inner: RuleBasedClassifier,
    failing_function: String,
    failures_left: AtomicUsize,
}

impl FailingClassifier {
    pub fn new(bug_kind: BugKind, failing_function: &str) -> Self {
        Self::transient(bug_kind, failing_function, usize::MAX)
    }

    pub fn transient(bug_kind: BugKind, failing_function: &str, failures: usize) -> Self {
        Self {
            inner: RuleBasedClassifier::new(bug_kind),
            failing_function: failing_function.to_string(),
            failures_left: AtomicUsize::new(failures),
        }
    }
}

impl ValueClassifier for FailingClassifier {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn classify(&self, function: &Function) -> DfaResult<Classification> {
        if function.name == self.failing_function {
            let failed = self
                .failures_left
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
                .is_ok();
            if failed {
                return Err(DfaError::oracle("classifier", "scripted failure"));
            }
        }
        self.inner.classify(function)
    }
}

/// Validator that errors on every trace
#[derive(Debug, Default)]
pub struct ErroringValidator;

impl TraceValidator for ErroringValidator {
    fn name(&self) -> &'static str {
        "erroring"
    }

    fn validate(&self, _trace: &Trace, _environment: &Environment) -> DfaResult<bool> {
        Err(DfaError::oracle("validator", "solver unavailable"))
    }
}
