//! Feature slices, leaves first

pub mod environment;
pub mod program_model;
pub mod reachability;
pub mod report;
pub mod summary;
pub mod trace_validation;
pub mod value_classification;

pub mod pipeline;
