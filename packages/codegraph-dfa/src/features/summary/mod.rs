//! Intra-procedural summaries
//!
//! - `SummaryPropagator`: oracle answering which (src, sink) pairs flow within
//!   one function body
//! - `SummaryBuilder`: picks summary start/end points, filters memoized and
//!   same-line pairs, and asks the propagator about the rest
//!
//! Propagators shipped here: name matching (rule-based fallback) and replay of
//! recorded answers.

pub mod builder;
pub mod name_match;
pub mod replay;

pub use builder::{QueryStats, SummaryBuilder, SummaryDelta};
pub use name_match::NameMatchPropagator;
pub use replay::{RecordedAnswer, ReplayPropagator};

use crate::errors::DfaResult;
use crate::shared::models::{Function, SummaryPair};

/// Propagator answer for a batch of pairs
///
/// Only `reachable` is authoritative: a pair missing from it is unreachable,
/// including the ones the oracle was unsure about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Propagation {
    pub reachable: Vec<SummaryPair>,
    pub unreachable: Vec<SummaryPair>,
}

impl Propagation {
    /// Split `pairs` by a per-pair verdict
    pub fn partition(
        pairs: &[SummaryPair],
        mut is_reachable: impl FnMut(&SummaryPair) -> bool,
    ) -> Self {
        let (reachable, unreachable): (Vec<SummaryPair>, Vec<SummaryPair>) =
            pairs.iter().cloned().partition(|pair| is_reachable(pair));
        Self {
            reachable,
            unreachable,
        }
    }
}

/// Intra-procedural reachability oracle
pub trait SummaryPropagator: Send + Sync {
    fn name(&self) -> &'static str;

    /// Judge every pair in `pairs`; called once per function per pass
    fn propagate(&self, function: &Function, pairs: &[SummaryPair]) -> DfaResult<Propagation>;
}
