//! Per-function summary construction
//!
//! Summary start points: classified sources, call-site outputs, parameters the
//! caller is interested in, field accesses.
//! Summary end points: classified sinks, call-site arguments, return
//! expressions, field accesses.
//!
//! Pairs are resolved in this order:
//! 1. already in `reachable_summaries` / `unreachable_summaries` (memo hit,
//!    never re-queried)
//! 2. start and end on the same line (reachable without the oracle)
//! 3. everything left goes to the propagator in a single batch
//!
//! A call's output and its own arguments share a line, so `r = f(r)` links
//! the output back into the call; the search depth cap bounds that loop.

use serde::Serialize;
use std::collections::BTreeSet;
use tracing::debug;

use super::SummaryPropagator;
use crate::errors::DfaResult;
use crate::features::value_classification::{Classification, ValueClassifier};
use crate::shared::models::{Function, SummaryPair, Value};

/// Oracle usage for one or more summary computations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct QueryStats {
    pub candidate_pairs: usize,
    pub memo_hits: usize,
    pub same_line: usize,
    /// Pairs sent to the propagator
    pub oracle_pairs: usize,
    pub oracle_reachable: usize,
    /// Propagator invocations
    pub oracle_calls: usize,
}

impl QueryStats {
    pub fn merge(&mut self, other: &QueryStats) {
        self.candidate_pairs += other.candidate_pairs;
        self.memo_hits += other.memo_hits;
        self.same_line += other.same_line;
        self.oracle_pairs += other.oracle_pairs;
        self.oracle_reachable += other.oracle_reachable;
        self.oracle_calls += other.oracle_calls;
    }
}

/// New summaries for one function, ready for `extend_function_summaries`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummaryDelta {
    pub reachable: Vec<SummaryPair>,
    pub unreachable: Vec<SummaryPair>,
    pub stats: QueryStats,
}

/// Computes summaries with a classifier and a propagator
pub struct SummaryBuilder<'a> {
    classifier: &'a dyn ValueClassifier,
    propagator: &'a dyn SummaryPropagator,
}

impl<'a> SummaryBuilder<'a> {
    pub fn new(classifier: &'a dyn ValueClassifier, propagator: &'a dyn SummaryPropagator) -> Self {
        Self {
            classifier,
            propagator,
        }
    }

    /// Deduplicated summary start and end points
    pub fn construct_summary_start_end_points(
        function: &Function,
        classification: &Classification,
        interesting_params: &BTreeSet<usize>,
    ) -> (Vec<Value>, Vec<Value>) {
        let mut starts: Vec<Value> = classification.sources.clone();
        let mut ends: Vec<Value> = classification.sinks.clone();

        starts.extend(
            function
                .paras
                .iter()
                .filter(|para| para.index.map_or(false, |i| interesting_params.contains(&i)))
                .cloned(),
        );
        ends.extend(function.rets.iter().cloned());

        for info in function.call_site_info.values() {
            starts.extend(info.outputs.iter().cloned());
            ends.extend(info.args.iter().cloned());
        }

        starts.extend(function.fields.iter().cloned());
        ends.extend(function.fields.iter().cloned());

        (dedup(starts), dedup(ends))
    }

    /// Summaries not yet recorded on `function`
    pub fn compute(
        &self,
        function: &Function,
        interesting_params: &BTreeSet<usize>,
    ) -> DfaResult<SummaryDelta> {
        let classification = self.classifier.classify(function)?;
        let (starts, ends) =
            Self::construct_summary_start_end_points(function, &classification, interesting_params);

        let mut delta = SummaryDelta::default();
        let mut pending: Vec<SummaryPair> = Vec::new();

        for start in &starts {
            for end in &ends {
                if start == end {
                    continue;
                }
                delta.stats.candidate_pairs += 1;
                if function.has_reachable_summary(start, end)
                    || function.has_unreachable_summary(start, end)
                {
                    delta.stats.memo_hits += 1;
                } else if start.line_number == end.line_number {
                    delta.stats.same_line += 1;
                    delta.reachable.push((start.clone(), end.clone()));
                } else {
                    pending.push((start.clone(), end.clone()));
                }
            }
        }

        if !pending.is_empty() {
            let propagation = self.propagator.propagate(function, &pending)?;
            let confirmed: BTreeSet<&SummaryPair> = propagation.reachable.iter().collect();

            delta.stats.oracle_calls += 1;
            delta.stats.oracle_pairs += pending.len();
            for pair in pending {
                if confirmed.contains(&pair) {
                    delta.stats.oracle_reachable += 1;
                    delta.reachable.push(pair);
                } else {
                    delta.unreachable.push(pair);
                }
            }
        }

        debug!(
            function = %function.name,
            propagator = self.propagator.name(),
            starts = starts.len(),
            ends = ends.len(),
            reachable = delta.reachable.len(),
            memo_hits = delta.stats.memo_hits,
            oracle_pairs = delta.stats.oracle_pairs,
            "summaries computed"
        );
        Ok(delta)
    }
}

fn dedup(values: Vec<Value>) -> Vec<Value> {
    let mut seen = BTreeSet::new();
    values
        .into_iter()
        .filter(|value| seen.insert(value.clone()))
        .collect()
}
