//! Core data model shared by every feature slice

pub mod function;
pub mod trace;
pub mod value;

pub use function::{BranchKind, BranchMembership, CallSiteInfo, Function, IfStatement, LineRange};
pub use trace::{Trace, TracePoint};
pub use value::{FunctionId, LineNumber, SummaryPair, Value, ValueKind};
