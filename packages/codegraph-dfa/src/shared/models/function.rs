//! Analyzed function record
//!
//! Holds the syntactic facts extracted once at creation (parameters, returns,
//! call sites, if-statements) and the intra-procedural summaries that are
//! appended across analysis passes.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::value::{FunctionId, LineNumber, SummaryPair, Value, ValueKind};

/// Inclusive line range delimiting a branch body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineRange {
    pub start: LineNumber,
    pub end: LineNumber,
}

impl LineRange {
    pub fn new(start: LineNumber, end: LineNumber) -> Self {
        Self { start, end }
    }

    /// Strictly inside the range; the delimiting lines hold the braces
    pub fn strictly_contains(&self, line: LineNumber) -> bool {
        self.start < line && line < self.end
    }
}

/// If-statement descriptor used for path-feasibility checks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IfStatement {
    /// Condition text as written, e.g. `(x != 0)`
    pub condition: String,
    pub condition_line: LineNumber,
    pub true_branch: LineRange,
    #[serde(default)]
    pub else_branch: Option<LineRange>,
}

/// Which branch of a conditional a line lies in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BranchKind {
    True,
    Else,
}

/// Membership of a line in one enclosing conditional
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchMembership<'a> {
    /// Key of the if-statement in `Function::if_statements`
    pub statement: (LineNumber, LineNumber),
    pub if_statement: &'a IfStatement,
    pub branch: BranchKind,
}

/// Call site facts for one line
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CallSiteInfo {
    /// Callee name as written at the call site
    pub callee_name: String,
    /// Actual arguments (kind ARG, indexed)
    pub args: Vec<Value>,
    /// Values receiving the call result (kind OUT)
    pub outputs: Vec<Value>,
    /// Callees resolved by name; empty when resolution failed
    pub callee_ids: Vec<FunctionId>,
}

/// One analyzed procedure
#[derive(Debug, Clone)]
pub struct Function {
    pub function_id: FunctionId,
    pub name: String,
    pub original: String,
    /// Transformed text (comment stripping, renaming), when available
    pub transformed: Option<String>,
    pub paras: Vec<Value>,
    pub rets: Vec<Value>,
    pub if_statements: BTreeMap<(LineNumber, LineNumber), IfStatement>,
    pub call_site_info: BTreeMap<LineNumber, CallSiteInfo>,
    /// Global/shared state accesses (kind FIELD)
    pub fields: Vec<Value>,
    pub reachable_summaries: Vec<SummaryPair>,
    pub unreachable_summaries: Vec<SummaryPair>,
}

impl Function {
    pub fn new(function_id: FunctionId, name: impl Into<String>, original: impl Into<String>) -> Self {
        Self {
            function_id,
            name: name.into(),
            original: original.into(),
            transformed: None,
            paras: Vec::new(),
            rets: Vec::new(),
            if_statements: BTreeMap::new(),
            call_site_info: BTreeMap::new(),
            fields: Vec::new(),
            reachable_summaries: Vec::new(),
            unreachable_summaries: Vec::new(),
        }
    }

    /// Text the analysis works on: transformed when present, else original
    pub fn text(&self) -> &str {
        self.transformed.as_deref().unwrap_or(&self.original)
    }

    pub fn find_para_value_by_index(&self, index: usize) -> Option<&Value> {
        self.paras.iter().find(|para| para.index == Some(index))
    }

    pub fn find_output_value_by_line_number(&self, line_number: LineNumber) -> &[Value] {
        self.call_site_info
            .get(&line_number)
            .map(|info| info.outputs.as_slice())
            .unwrap_or(&[])
    }

    pub fn has_reachable_summary(&self, src: &Value, sink: &Value) -> bool {
        self.reachable_summaries
            .iter()
            .any(|(start, end)| start == src && end == sink)
    }

    pub fn has_unreachable_summary(&self, src: &Value, sink: &Value) -> bool {
        self.unreachable_summaries
            .iter()
            .any(|(start, end)| start == src && end == sink)
    }

    /// Append newly discovered summaries, skipping pairs already recorded.
    ///
    /// Returns the number of reachable pairs that were new.
    pub fn extend_function_summaries(
        &mut self,
        reachable: impl IntoIterator<Item = SummaryPair>,
        unreachable: impl IntoIterator<Item = SummaryPair>,
    ) -> usize {
        let mut added = 0;
        for (src, sink) in reachable {
            if !self.has_reachable_summary(&src, &sink) {
                self.reachable_summaries.push((src, sink));
                added += 1;
            }
        }
        for (src, sink) in unreachable {
            if !self.has_unreachable_summary(&src, &sink)
                && !self.has_reachable_summary(&src, &sink)
            {
                self.unreachable_summaries.push((src, sink));
            }
        }
        added
    }

    /// Reachable summaries whose entry is `start`
    pub fn summaries_from<'a>(&'a self, start: &'a Value) -> impl Iterator<Item = &'a Value> + 'a {
        self.reachable_summaries
            .iter()
            .filter(move |(entry, _)| entry == start)
            .map(|(_, exit)| exit)
    }

    /// Distinct SRC values appearing as summary entries, in summary order
    pub fn source_values(&self) -> Vec<&Value> {
        let mut seen = BTreeSet::new();
        self.reachable_summaries
            .iter()
            .map(|(start, _)| start)
            .filter(|start| start.kind == ValueKind::Src)
            .filter(|start| seen.insert(*start))
            .collect()
    }

    /// Distinct FIELD summary entries named `name`
    pub fn field_entries(&self, name: &str) -> Vec<&Value> {
        let mut seen = BTreeSet::new();
        self.reachable_summaries
            .iter()
            .map(|(start, _)| start)
            .filter(|start| start.kind == ValueKind::Field && start.name == name)
            .filter(|start| seen.insert(*start))
            .collect()
    }

    /// Parameter indices reached by ARG summaries at `line_number`
    pub fn interesting_arg_indexes(&self, line_number: LineNumber) -> BTreeSet<usize> {
        self.reachable_summaries
            .iter()
            .map(|(_, end)| end)
            .filter(|end| end.kind == ValueKind::Arg && end.line_number == line_number)
            .filter_map(|end| end.index)
            .collect()
    }

    /// Every enclosing conditional of `line` and the branch it lies in
    pub fn branch_membership(&self, line: LineNumber) -> Vec<BranchMembership<'_>> {
        self.if_statements
            .iter()
            .filter_map(|(key, stmt)| {
                let branch = if stmt.true_branch.strictly_contains(line) {
                    BranchKind::True
                } else if stmt
                    .else_branch
                    .map_or(false, |range| range.strictly_contains(line))
                {
                    BranchKind::Else
                } else {
                    return None;
                };
                Some(BranchMembership {
                    statement: *key,
                    if_statement: stmt,
                    branch,
                })
            })
            .collect()
    }
}
