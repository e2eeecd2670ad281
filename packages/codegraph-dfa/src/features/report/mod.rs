//! Analysis report
//!
//! The persisted artifact of a run: per source function, the confirmed bug
//! traces and the candidates before validation, each step rendered as
//! `(function_id, function_name, value_name, line_number)`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::config::BugKind;
use crate::errors::DfaResult;
use crate::features::environment::Environment;
use crate::features::reachability::SearchStats;
use crate::features::summary::QueryStats;
use crate::shared::models::{FunctionId, LineNumber, Trace, ValueKind};

/// One rendered trace point
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceStep {
    pub function_id: FunctionId,
    pub function_name: String,
    pub value_name: String,
    pub line_number: LineNumber,
    pub kind: ValueKind,
}

/// Traces whose source lies in one function
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionTraces {
    pub function_id: FunctionId,
    pub function_name: String,
    pub traces: Vec<Vec<TraceStep>>,
}

/// Outcome of one entry function
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryReport {
    pub entry_id: FunctionId,
    pub entry_name: String,
    /// Functions analyzed or re-analyzed on behalf of this entry
    pub analyzed_functions: usize,
    pub candidates: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl EntryReport {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Counters summed over the whole run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub queries: QueryStats,
    pub search: SearchStats,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub program: String,
    pub bug_kind: BugKind,
    pub bug_item_number: usize,
    pub bug_candidate_number: usize,
    pub bug_items: Vec<FunctionTraces>,
    pub bug_candidates: Vec<FunctionTraces>,
    pub entries: Vec<EntryReport>,
    pub recursive_cycles: Vec<Vec<FunctionId>>,
    pub stats: RunStats,
}

impl AnalysisReport {
    pub fn failed_entries(&self) -> impl Iterator<Item = &EntryReport> {
        self.entries.iter().filter(|entry| !entry.is_ok())
    }

    pub fn to_json_string(&self) -> DfaResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write pretty JSON, creating parent directories
    pub fn write_json(&self, path: impl AsRef<Path>) -> DfaResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_json_string()?)?;
        Ok(())
    }
}

/// Render a trace with function names from the Environment
pub fn render_trace(trace: &Trace, environment: &Environment) -> Vec<TraceStep> {
    trace
        .iter()
        .map(|point| TraceStep {
            function_id: point.function_id,
            function_name: function_name(point.function_id, environment),
            value_name: point.value.name.clone(),
            line_number: point.value.line_number,
            kind: point.value.kind,
        })
        .collect()
}

/// Render a per-function trace map, skipping functions without traces
pub fn render_trace_map(
    traces: &BTreeMap<FunctionId, Vec<Trace>>,
    environment: &Environment,
) -> Vec<FunctionTraces> {
    traces
        .iter()
        .filter(|(_, traces)| !traces.is_empty())
        .map(|(&function_id, traces)| FunctionTraces {
            function_id,
            function_name: function_name(function_id, environment),
            traces: traces
                .iter()
                .map(|trace| render_trace(trace, environment))
                .collect(),
        })
        .collect()
}

fn function_name(function_id: FunctionId, environment: &Environment) -> String {
    environment
        .function(function_id)
        .map(|f| f.name.clone())
        .unwrap_or_default()
}
