//! Parallel analysis of independent programs
//!
//! Each program gets its own `DataflowAnalyzer` and therefore its own
//! `Environment`; only the oracles are shared.

use rayon::prelude::*;
use std::sync::Arc;
use tracing::info;

use super::analyzer::DataflowAnalyzer;
use super::oracles::Oracles;
use crate::config::DfaConfig;
use crate::features::program_model::ProgramModel;
use crate::features::report::AnalysisReport;

/// Analyze every program in parallel; reports keep the input order
pub fn run_batch(
    programs: &[Arc<dyn ProgramModel>],
    oracles: &Oracles,
    config: &DfaConfig,
) -> Vec<AnalysisReport> {
    info!(programs = programs.len(), "batch started");
    programs
        .par_iter()
        .map(|model| DataflowAnalyzer::new(Arc::clone(model), oracles.clone(), config.clone()).run())
        .collect()
}
