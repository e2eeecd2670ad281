//! Program values tracked by the data-flow analysis
//!
//! A `Value` is a named quantity at a specific line of a function body,
//! tagged with the role it plays in the analysis (source, sink, argument, ...).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique function identifier, stable for the lifetime of one analysis run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FunctionId(pub u32);

impl FunctionId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for FunctionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for FunctionId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// 1-based source line, relative to the function text
pub type LineNumber = usize;

/// Role of a value in the analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ValueKind {
    /// Tainted/interesting origin
    Src,
    /// Sensitive use site
    Sink,
    /// Actual argument at a call site
    Arg,
    /// Returned expression
    Ret,
    /// Value receiving a call's result
    Out,
    /// Formal parameter
    Para,
    /// Global/shared state
    Field,
}

impl ValueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Src => "SRC",
            Self::Sink => "SINK",
            Self::Arg => "ARG",
            Self::Ret => "RET",
            Self::Out => "OUT",
            Self::Para => "PARA",
            Self::Field => "FIELD",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A program value at a specific point
///
/// Equality is structural over (name, line, kind, index), so two values
/// extracted independently from the same program point compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Value {
    pub name: String,
    pub line_number: LineNumber,
    pub kind: ValueKind,
    /// Positional slot, meaningful for ARG/PARA
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
}

impl Value {
    pub fn new(name: impl Into<String>, line_number: LineNumber, kind: ValueKind) -> Self {
        Self {
            name: name.into(),
            line_number,
            kind,
            index: None,
        }
    }

    pub fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    pub fn src(name: impl Into<String>, line_number: LineNumber) -> Self {
        Self::new(name, line_number, ValueKind::Src)
    }

    pub fn sink(name: impl Into<String>, line_number: LineNumber) -> Self {
        Self::new(name, line_number, ValueKind::Sink)
    }

    pub fn arg(name: impl Into<String>, line_number: LineNumber, index: usize) -> Self {
        Self::new(name, line_number, ValueKind::Arg).with_index(index)
    }

    pub fn para(name: impl Into<String>, line_number: LineNumber, index: usize) -> Self {
        Self::new(name, line_number, ValueKind::Para).with_index(index)
    }

    pub fn ret(name: impl Into<String>, line_number: LineNumber) -> Self {
        Self::new(name, line_number, ValueKind::Ret)
    }

    pub fn out(name: impl Into<String>, line_number: LineNumber) -> Self {
        Self::new(name, line_number, ValueKind::Out)
    }

    pub fn field(name: impl Into<String>, line_number: LineNumber) -> Self {
        Self::new(name, line_number, ValueKind::Field)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(index) => write!(
                f,
                "({}, {}, {}, {})",
                self.name, self.line_number, self.kind, index
            ),
            None => write!(f, "({}, {}, {})", self.name, self.line_number, self.kind),
        }
    }
}

/// Intra-procedural summary edge: `exit` is reachable from `entry`
/// without leaving the function
pub type SummaryPair = (Value, Value);
