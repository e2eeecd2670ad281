//! Program Model
//!
//! Port through which the analysis obtains `Function` records. Parsing source
//! into facts is a front-end concern; the crate ships an in-memory model that
//! is loaded from a JSON declaration.

pub mod decl;
pub mod in_memory;

pub use decl::{
    ArgumentDecl, CallSiteDecl, FunctionDecl, IfStatementDecl, NamedLine, ParameterDecl,
    ProgramDecl,
};
pub use in_memory::InMemoryProgramModel;

use crate::errors::DfaResult;
use crate::shared::models::{Function, FunctionId};

/// Source of function records for one program
pub trait ProgramModel: Send + Sync {
    /// Program name used in reports
    fn name(&self) -> &str;

    /// All function ids, ascending
    fn function_ids(&self) -> Vec<FunctionId>;

    /// Functions the analysis starts from
    fn entry_ids(&self) -> Vec<FunctionId>;

    /// Fresh record with syntactic facts filled in and no summaries
    fn build_function(&self, function_id: FunctionId) -> DfaResult<Function>;

    /// Functions whose name textually matches `callee_name`
    fn resolve_callees(&self, callee_name: &str) -> Vec<FunctionId>;
}
