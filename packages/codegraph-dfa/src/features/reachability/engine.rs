/*
 * Inter-procedural CFL-Reachability Engine
 *
 * Depth-first, context-sensitive search that stitches per-function summaries
 * into source-to-sink traces. Nodes are (function, value) pairs; a summary
 * exit continues the flow by its kind:
 * - SINK:  terminal, the trace is emitted
 * - ARG:   call step into each resolved callee's matching formal parameter
 * - RET:   return step into each caller's output value at the call line
 * - FIELD: shared-state step into callees and callers reading the same field
 *
 * Cycles are pruned by context realizability alone; there is no visited set,
 * since a function may legitimately be revisited with a different value.
 * `SearchLimits::max_depth` bounds the remaining unmatched-recursion cases.
 */

use serde::Serialize;
use tracing::{debug, trace};

use super::context::{ContextFrame, ContextStack};
use crate::config::DfaConfig;
use crate::errors::{DfaError, DfaResult};
use crate::features::environment::Environment;
use crate::shared::models::{Function, FunctionId, Trace, Value, ValueKind};

/// Bounds imposed on one search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchLimits {
    /// Interprocedural hops allowed on one branch (None = unbounded)
    pub max_depth: Option<usize>,

    /// Traces kept per `search_from_srcs_in_single_function` (None = all)
    pub max_traces: Option<usize>,
}

impl SearchLimits {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn from_config(config: &DfaConfig) -> Self {
        Self {
            max_depth: Some(config.max_search_depth),
            max_traces: Some(config.max_traces_per_entry),
        }
    }
}

/// Search counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SearchStats {
    /// Recursive search invocations
    pub calls: usize,
    pub pruned_by_context: usize,
    pub pruned_by_depth: usize,
    /// Traces dropped by `max_traces`
    pub truncated: usize,
    pub traces: usize,
}

/// Context-sensitive reachability search over an Environment
pub struct CflReachabilityEngine<'env> {
    environment: &'env Environment,
    limits: SearchLimits,
    stats: SearchStats,
}

impl SearchStats {
    pub fn merge(&mut self, other: &SearchStats) {
        self.calls += other.calls;
        self.pruned_by_context += other.pruned_by_context;
        self.pruned_by_depth += other.pruned_by_depth;
        self.truncated += other.truncated;
        self.traces += other.traces;
    }
}

impl<'env> CflReachabilityEngine<'env> {
    pub fn new(environment: &'env Environment, limits: SearchLimits) -> Self {
        Self {
            environment,
            limits,
            stats: SearchStats::default(),
        }
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    fn env(&self) -> &'env Environment {
        self.environment
    }

    /// All SINK-terminated traces that extend `trace` from `function_id`
    ///
    /// Preconditions (violations are errors, not empty results):
    /// `function_id` is analyzed, `trace` is non-empty and ends in `function_id`.
    pub fn search(
        &mut self,
        function_id: FunctionId,
        context: &ContextStack,
        trace: &Trace,
    ) -> DfaResult<Vec<Trace>> {
        self.search_at_depth(function_id, context, trace, 0)
    }

    /// Seed one search per distinct SRC value of the function's summaries
    pub fn search_from_srcs_in_single_function(
        &mut self,
        function_id: FunctionId,
    ) -> DfaResult<Vec<Trace>> {
        let function = self.env().require(function_id)?;
        let mut bug_traces = Vec::new();

        for src in function.source_values() {
            let seed = Trace::seed(function_id, src.clone());
            bug_traces.extend(self.search(function_id, &ContextStack::new(), &seed)?);
        }

        if let Some(max) = self.limits.max_traces {
            if bug_traces.len() > max {
                self.stats.truncated += bug_traces.len() - max;
                bug_traces.truncate(max);
            }
        }

        debug!(
            function = %function.name,
            traces = bug_traces.len(),
            "search from sources finished"
        );
        Ok(bug_traces)
    }

    fn search_at_depth(
        &mut self,
        function_id: FunctionId,
        context: &ContextStack,
        trace: &Trace,
        depth: usize,
    ) -> DfaResult<Vec<Trace>> {
        let function = self.env().require(function_id)?;
        let current = trace.last().ok_or(DfaError::EmptyTrace)?;
        if current.function_id != function_id {
            return Err(DfaError::TraceFunctionMismatch {
                expected: function_id,
                found: current.function_id,
            });
        }
        self.stats.calls += 1;

        let mut bug_traces = Vec::new();
        for end in function.summaries_from(&current.value) {
            match end.kind {
                ValueKind::Sink => {
                    bug_traces.push(trace.extended([(function_id, end.clone())]));
                    self.stats.traces += 1;
                }
                ValueKind::Arg => {
                    bug_traces.extend(self.follow_arg(function, end, context, trace, depth)?);
                }
                ValueKind::Ret => {
                    bug_traces.extend(self.follow_ret(function, end, context, trace, depth)?);
                }
                ValueKind::Field => {
                    bug_traces.extend(self.follow_field(function, end, context, trace, depth)?);
                }
                // Exits of other kinds do not continue the flow
                ValueKind::Src | ValueKind::Out | ValueKind::Para => {}
            }
        }
        Ok(bug_traces)
    }

    /// Admit a frame: realizable context and remaining depth budget
    fn admit(&mut self, context: &ContextStack, frame: ContextFrame, depth: usize) -> Option<ContextStack> {
        let (is_realizable, next) = context.check(frame);
        if !is_realizable {
            self.stats.pruned_by_context += 1;
            trace!(%frame, "context infeasible");
            return None;
        }
        if self.limits.max_depth.map_or(false, |max| depth >= max) {
            self.stats.pruned_by_depth += 1;
            trace!(%frame, depth, "depth budget exhausted");
            return None;
        }
        Some(next)
    }

    /// ARG exit: continue into each resolved callee's formal parameter
    ///
    /// Callees without a call-graph edge from this site were never analyzed
    /// on behalf of it and are skipped.
    fn follow_arg(
        &mut self,
        function: &Function,
        end: &Value,
        context: &ContextStack,
        trace: &Trace,
        depth: usize,
    ) -> DfaResult<Vec<Trace>> {
        let mut bug_traces = Vec::new();
        let (Some(call_site), Some(index)) =
            (function.call_site_info.get(&end.line_number), end.index)
        else {
            return Ok(bug_traces);
        };

        for &callee_id in &call_site.callee_ids {
            if !self
                .env()
                .has_call_edge(function.function_id, end.line_number, callee_id)
            {
                continue;
            }
            let frame = ContextFrame::call(function.function_id, end.line_number, callee_id);
            let Some(next_context) = self.admit(context, frame, depth) else {
                continue;
            };
            let callee = self.env().require(callee_id)?;
            let Some(para) = callee.find_para_value_by_index(index) else {
                continue;
            };
            let next_trace = trace.extended([
                (function.function_id, end.clone()),
                (callee_id, para.clone()),
            ]);
            bug_traces.extend(self.search_at_depth(callee_id, &next_context, &next_trace, depth + 1)?);
        }
        Ok(bug_traces)
    }

    /// RET exit: continue at each caller's output value for the call line
    fn follow_ret(
        &mut self,
        function: &Function,
        end: &Value,
        context: &ContextStack,
        trace: &Trace,
        depth: usize,
    ) -> DfaResult<Vec<Trace>> {
        let mut bug_traces = Vec::new();
        let callers: Vec<_> = self.env().callers_of(function.function_id).collect();

        for (caller_id, line_number) in callers {
            let frame = ContextFrame::ret(caller_id, line_number, function.function_id);
            let Some(next_context) = self.admit(context, frame, depth) else {
                continue;
            };
            let caller = self.env().require(caller_id)?;
            for output in caller.find_output_value_by_line_number(line_number) {
                let next_trace = trace.extended([
                    (function.function_id, end.clone()),
                    (caller_id, output.clone()),
                ]);
                bug_traces.extend(self.search_at_depth(caller_id, &next_context, &next_trace, depth + 1)?);
            }
        }
        Ok(bug_traces)
    }

    /// FIELD exit: continue into callees (call step) and callers (return
    /// step) whose summaries start at a field of the same name
    fn follow_field(
        &mut self,
        function: &Function,
        end: &Value,
        context: &ContextStack,
        trace: &Trace,
        depth: usize,
    ) -> DfaResult<Vec<Trace>> {
        let mut bug_traces = Vec::new();
        let function_id = function.function_id;

        let callees: Vec<_> = self.env().callees_of(function_id).collect();
        for callee_id in callees {
            let Some(line) = self
                .environment
                .call_site_lines(function_id, callee_id)
                .into_iter()
                .min()
            else {
                continue;
            };
            let frame = ContextFrame::call(function_id, line, callee_id);
            bug_traces.extend(self.enter_field(function_id, end, callee_id, frame, context, trace, depth)?);
        }

        let mut seen_callers = Vec::new();
        let callers: Vec<_> = self.env().callers_of(function_id).collect();
        for (caller_id, line) in callers {
            if seen_callers.contains(&caller_id) {
                continue;
            }
            seen_callers.push(caller_id);
            let frame = ContextFrame::ret(caller_id, line, function_id);
            bug_traces.extend(self.enter_field(function_id, end, caller_id, frame, context, trace, depth)?);
        }
        Ok(bug_traces)
    }

    fn enter_field(
        &mut self,
        function_id: FunctionId,
        end: &Value,
        target_id: FunctionId,
        frame: ContextFrame,
        context: &ContextStack,
        trace: &Trace,
        depth: usize,
    ) -> DfaResult<Vec<Trace>> {
        let mut bug_traces = Vec::new();
        let Some(next_context) = self.admit(context, frame, depth) else {
            return Ok(bug_traces);
        };
        let target = self.env().require(target_id)?;
        for entry in target.field_entries(&end.name) {
            let next_trace = trace.extended([(function_id, end.clone()), (target_id, entry.clone())]);
            bug_traces.extend(self.search_at_depth(target_id, &next_context, &next_trace, depth + 1)?);
        }
        Ok(bug_traces)
    }
}
