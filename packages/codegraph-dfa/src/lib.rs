/*
 * Codegraph DFA - Oracle-Driven Inter-procedural Data-Flow Analysis
 *
 * Feature-First Hexagonal Architecture:
 * - shared/      : Data model (Value, Function, Trace)
 * - config/      : Presets, YAML config, validation
 * - features/    : Vertical slices (program model → classification → summaries
 *                  → environment → CFL reachability → validation → report)
 * - pipeline     : Driver (features/pipeline)
 *
 * Oracles (classifier, summary propagator, trace validator) are ports: the
 * rule-based implementations ship here, model or solver backed ones plug in
 * through the same traits.
 *
 * Performance:
 * - Single-threaded, depth-first search per program
 * - Rayon across independent programs
 */

// Crate-level lint configuration
#![allow(clippy::too_many_arguments)] // Search helpers thread context, trace and depth
#![allow(clippy::should_implement_trait)] // from_str naming intentional
#![allow(clippy::unnecessary_map_or)] // map_or style for compatibility
#![allow(clippy::new_without_default)] // Default impl not always needed

// ═══════════════════════════════════════════════════════════════════════════
// Module Exports - Feature-First Architecture
// ═══════════════════════════════════════════════════════════════════════════

/// Shared data model
pub mod shared;

/// Configuration (presets, YAML, validation)
pub mod config;

/// Error types
pub mod errors;

/// Feature slices
pub mod features;

// Re-exports
pub use config::{BugKind, ConfigError, DfaConfig, Preset, Validatable};
pub use errors::{DfaError, DfaResult};
pub use features::environment::Environment;
pub use features::pipeline::{run_batch, DataflowAnalyzer, Oracles};
pub use features::program_model::{InMemoryProgramModel, ProgramDecl, ProgramModel};
pub use features::reachability::{
    check_context_realizability, CflReachabilityEngine, ContextFrame, ContextStack, SearchLimits,
    SearchStats,
};
pub use features::report::AnalysisReport;
pub use features::summary::{SummaryBuilder, SummaryPropagator};
pub use features::trace_validation::TraceValidator;
pub use features::value_classification::ValueClassifier;
pub use shared::models::{Function, FunctionId, Trace, TracePoint, Value, ValueKind};
