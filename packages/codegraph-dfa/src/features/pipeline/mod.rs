//! Driver
//!
//! - analyzer: on-demand analysis, search, validation and report of one program
//! - oracles: the injected classifier, propagator and validator
//! - batch: independent programs in parallel

pub mod analyzer;
pub mod batch;
pub mod oracles;

pub use analyzer::DataflowAnalyzer;
pub use batch::run_batch;
pub use oracles::Oracles;
