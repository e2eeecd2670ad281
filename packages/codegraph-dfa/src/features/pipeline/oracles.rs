//! Oracle bundle injected into the driver

use std::sync::Arc;

use crate::config::DfaConfig;
use crate::features::summary::{NameMatchPropagator, SummaryPropagator};
use crate::features::trace_validation::{AcceptAllValidator, BranchConditionValidator, TraceValidator};
use crate::features::value_classification::{RuleBasedClassifier, ValueClassifier};

/// The three external judgments the analysis consults
#[derive(Clone)]
pub struct Oracles {
    pub classifier: Arc<dyn ValueClassifier>,
    pub propagator: Arc<dyn SummaryPropagator>,
    pub validator: Arc<dyn TraceValidator>,
}

impl Oracles {
    pub fn new(
        classifier: Arc<dyn ValueClassifier>,
        propagator: Arc<dyn SummaryPropagator>,
        validator: Arc<dyn TraceValidator>,
    ) -> Self {
        Self {
            classifier,
            propagator,
            validator,
        }
    }

    /// Rule-based classifier, name-match propagator and branch-condition
    /// validator (accept-all when the config is not path sensitive)
    pub fn rule_based(config: &DfaConfig) -> Self {
        let validator: Arc<dyn TraceValidator> = if config.path_sensitive {
            Arc::new(BranchConditionValidator::new())
        } else {
            Arc::new(AcceptAllValidator)
        };
        Self {
            classifier: Arc::new(RuleBasedClassifier::new(config.bug_kind)),
            propagator: Arc::new(NameMatchPropagator::new()),
            validator,
        }
    }

    pub fn with_classifier(mut self, classifier: Arc<dyn ValueClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_propagator(mut self, propagator: Arc<dyn SummaryPropagator>) -> Self {
        self.propagator = propagator;
        self
    }

    pub fn with_validator(mut self, validator: Arc<dyn TraceValidator>) -> Self {
        self.validator = validator;
        self
    }
}

impl std::fmt::Debug for Oracles {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Oracles")
            .field("classifier", &self.classifier.name())
            .field("propagator", &self.propagator.name())
            .field("validator", &self.validator.name())
            .finish()
    }
}
