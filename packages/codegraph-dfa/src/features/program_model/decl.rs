//! Serializable program declaration
//!
//! The facts a front end extracts from source: per function its parameters,
//! return expressions, call sites, if-statements and shared-state accesses.

use serde::{Deserialize, Serialize};

use crate::shared::models::{FunctionId, LineNumber, LineRange};

/// Whole program as a list of function declarations
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgramDecl {
    #[serde(default)]
    pub name: Option<String>,
    pub functions: Vec<FunctionDecl>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionDecl {
    pub id: FunctionId,
    pub name: String,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transformed: Option<String>,
    #[serde(default)]
    pub is_entry: bool,
    #[serde(default)]
    pub parameters: Vec<ParameterDecl>,
    #[serde(default)]
    pub returns: Vec<NamedLine>,
    #[serde(default)]
    pub call_sites: Vec<CallSiteDecl>,
    #[serde(default)]
    pub if_statements: Vec<IfStatementDecl>,
    #[serde(default)]
    pub fields: Vec<NamedLine>,
}

impl FunctionDecl {
    pub fn new(id: u32, name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            id: FunctionId(id),
            name: name.into(),
            source: source.into(),
            transformed: None,
            is_entry: false,
            parameters: Vec::new(),
            returns: Vec::new(),
            call_sites: Vec::new(),
            if_statements: Vec::new(),
            fields: Vec::new(),
        }
    }
}

/// Identifier occurring at a line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedLine {
    pub name: String,
    pub line: LineNumber,
}

impl NamedLine {
    pub fn new(name: impl Into<String>, line: LineNumber) -> Self {
        Self {
            name: name.into(),
            line,
        }
    }
}

/// Formal parameter with its positional slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterDecl {
    pub name: String,
    pub line: LineNumber,
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgumentDecl {
    pub name: String,
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallSiteDecl {
    pub line: LineNumber,
    pub callee: String,
    #[serde(default)]
    pub args: Vec<ArgumentDecl>,
    /// Names receiving the call result
    #[serde(default)]
    pub outputs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IfStatementDecl {
    pub start_line: LineNumber,
    pub end_line: LineNumber,
    pub condition: String,
    pub condition_line: LineNumber,
    pub true_branch: LineRange,
    #[serde(default)]
    pub else_branch: Option<LineRange>,
}
