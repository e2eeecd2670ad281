/*
 * Data-Flow Analysis Driver
 *
 * On-demand, entry-driven analysis:
 * 1. analyze_function: build (or reuse) a function, compute its summaries,
 *    register it with its call edges, then analyze its callees with the
 *    parameter indices its ARG summaries reach
 * 2. once an entry's analysis is complete, search from the sources of every
 *    function touched on its behalf
 * 3. validate candidates, render the report
 *
 * Re-analysis terminates on recursive programs: a function analyzed earlier
 * with a superset of the requested interesting parameters is skipped, and a
 * request for a function still on the analysis stack is deferred until the
 * entry's first pass unwinds.
 *
 * A failing entry is logged and recorded in the report; the remaining
 * entries still run. A call edge is recorded only once its callee analyzed
 * successfully, and every function whose callee failed stays incomplete, so a
 * later entry reaching it analyzes it again.
 */

use rustc_hash::FxHashMap;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::oracles::Oracles;
use crate::config::DfaConfig;
use crate::errors::DfaResult;
use crate::features::environment::Environment;
use crate::features::program_model::ProgramModel;
use crate::features::reachability::{CflReachabilityEngine, SearchLimits, SearchStats};
use crate::features::report::{render_trace_map, AnalysisReport, EntryReport, RunStats};
use crate::features::summary::{QueryStats, SummaryBuilder};
use crate::shared::models::{FunctionId, LineNumber, Trace};

pub struct DataflowAnalyzer {
    model: Arc<dyn ProgramModel>,
    oracles: Oracles,
    config: DfaConfig,
    environment: Environment,

    /// Union of interesting parameter indices each function was analyzed with
    interest: FxHashMap<FunctionId, BTreeSet<usize>>,
    /// Registered functions whose callees did not all analyze successfully
    incomplete: BTreeSet<FunctionId>,
    analysis_stack: Vec<FunctionId>,
    /// Requests that arrived while the function was on the analysis stack
    deferred: Vec<(FunctionId, BTreeSet<usize>)>,
    /// Functions (re-)analyzed since the current entry started
    touched: BTreeSet<FunctionId>,

    bug_candidates: BTreeMap<FunctionId, Vec<Trace>>,
    bugs: BTreeMap<FunctionId, Vec<Trace>>,
    entries: Vec<EntryReport>,
    recursive_cycles: Vec<Vec<FunctionId>>,
    query_stats: QueryStats,
    search_stats: SearchStats,
}

impl DataflowAnalyzer {
    pub fn new(model: Arc<dyn ProgramModel>, oracles: Oracles, config: DfaConfig) -> Self {
        Self {
            model,
            oracles,
            config,
            environment: Environment::new(),
            interest: FxHashMap::default(),
            incomplete: BTreeSet::new(),
            analysis_stack: Vec::new(),
            deferred: Vec::new(),
            touched: BTreeSet::new(),
            bug_candidates: BTreeMap::new(),
            bugs: BTreeMap::new(),
            entries: Vec::new(),
            recursive_cycles: Vec::new(),
            query_stats: QueryStats::default(),
            search_stats: SearchStats::default(),
        }
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn config(&self) -> &DfaConfig {
        &self.config
    }

    /// Candidate traces keyed by the function holding their source
    pub fn bug_candidates(&self) -> &BTreeMap<FunctionId, Vec<Trace>> {
        &self.bug_candidates
    }

    /// Validated traces keyed by the function holding their source
    pub fn bugs(&self) -> &BTreeMap<FunctionId, Vec<Trace>> {
        &self.bugs
    }

    pub fn entries(&self) -> &[EntryReport] {
        &self.entries
    }

    pub fn query_stats(&self) -> QueryStats {
        self.query_stats
    }

    pub fn search_stats(&self) -> SearchStats {
        self.search_stats
    }

    /// Analyze, validate and report
    pub fn run(mut self) -> AnalysisReport {
        self.analyze();
        self.validate();
        self.report()
    }

    /// Analyze every entry function, isolating failures per entry
    pub fn analyze(&mut self) {
        let entry_ids = self.model.entry_ids();
        info!(
            program = self.model.name(),
            entries = entry_ids.len(),
            bug_kind = %self.config.bug_kind,
            "analysis started"
        );

        for entry_id in entry_ids {
            self.touched.clear();
            self.analysis_stack.clear();
            self.deferred.clear();
            let result = self.analyze_entry(entry_id);

            let entry_name = self
                .environment
                .function(entry_id)
                .map(|f| f.name.clone())
                .unwrap_or_default();
            let mut entry = EntryReport {
                entry_id,
                entry_name,
                analyzed_functions: self.touched.len(),
                candidates: 0,
                error: None,
            };
            match result {
                Ok(candidates) => entry.candidates = candidates,
                Err(err) => {
                    warn!(entry = %entry_id, error = %err, "entry analysis failed");
                    entry.error = Some(err.to_string());
                }
            }
            self.entries.push(entry);
            self.record_recursive_cycles();
        }

        info!(
            program = self.model.name(),
            analyzed = self.environment.len(),
            candidates = self.bug_candidates.values().map(Vec::len).sum::<usize>(),
            "analysis finished"
        );
    }

    fn analyze_entry(&mut self, entry_id: FunctionId) -> DfaResult<usize> {
        debug!(entry = %entry_id, "analyzing entry");
        self.analyze_function(entry_id, &BTreeSet::new())?;
        // Interest sets only grow, so this drains
        while let Some((function_id, indexes)) = self.deferred.pop() {
            self.analyze_function(function_id, &indexes)?;
        }

        let limits = SearchLimits::from_config(&self.config);
        let mut engine = CflReachabilityEngine::new(&self.environment, limits);
        let mut found = BTreeMap::new();
        for &function_id in &self.touched {
            let traces = engine.search_from_srcs_in_single_function(function_id)?;
            found.insert(function_id, traces);
        }
        self.search_stats.merge(&engine.stats());

        let candidates = found.values().map(Vec::len).sum();
        self.bug_candidates.extend(found);
        Ok(candidates)
    }

    /// Analyze `function_id` with the given interesting parameter indices
    pub fn analyze_function(
        &mut self,
        function_id: FunctionId,
        interesting_params: &BTreeSet<usize>,
    ) -> DfaResult<()> {
        let covered = self.environment.is_analyzed(function_id)
            && !self.incomplete.contains(&function_id)
            && self
                .interest
                .get(&function_id)
                .map_or(false, |known| known.is_superset(interesting_params));
        if covered {
            return Ok(());
        }
        if self.analysis_stack.contains(&function_id) {
            debug!(function = %function_id, "on the analysis stack, deferred");
            self.deferred
                .push((function_id, interesting_params.clone()));
            return Ok(());
        }

        self.analysis_stack.push(function_id);
        let result = self.analyze_function_body(function_id, interesting_params);
        self.analysis_stack.pop();
        result
    }

    fn analyze_function_body(
        &mut self,
        function_id: FunctionId,
        interesting_params: &BTreeSet<usize>,
    ) -> DfaResult<()> {
        let mut interest = self.interest.get(&function_id).cloned().unwrap_or_default();
        interest.extend(interesting_params.iter().copied());

        let mut function = match self.environment.take_function(function_id) {
            Some(function) => function,
            None => self.model.build_function(function_id)?,
        };

        let builder = SummaryBuilder::new(&*self.oracles.classifier, &*self.oracles.propagator);
        let delta = match builder.compute(&function, &interest) {
            Ok(delta) => delta,
            Err(err) => {
                if self.interest.contains_key(&function_id) {
                    self.environment.set_analyzed_function(function_id, function);
                }
                return Err(err);
            }
        };
        self.query_stats.merge(&delta.stats);
        let added = function.extend_function_summaries(delta.reachable, delta.unreachable);

        let mut pending: Vec<(LineNumber, FunctionId, BTreeSet<usize>)> = Vec::new();
        for (&line, info) in &function.call_site_info {
            let callees: &[FunctionId] = if self.config.analyze_all_callees {
                &info.callee_ids
            } else {
                &info.callee_ids[..info.callee_ids.len().min(1)]
            };
            let indexes = function.interesting_arg_indexes(line);
            for &callee_id in callees {
                pending.push((line, callee_id, indexes.clone()));
            }
        }

        debug!(
            function = %function.name,
            interest = ?interest,
            new_summaries = added,
            callees = pending.len(),
            "function analyzed"
        );
        self.environment.set_analyzed_function(function_id, function);
        self.interest.insert(function_id, interest);
        self.touched.insert(function_id);
        self.incomplete.insert(function_id);

        for (line, callee_id, indexes) in pending {
            self.analyze_function(callee_id, &indexes)?;
            self.link(function_id, line, callee_id);
        }
        self.incomplete.remove(&function_id);
        Ok(())
    }

    fn link(&mut self, caller_id: FunctionId, line: LineNumber, callee_id: FunctionId) {
        self.environment
            .insert_caller_callee_pair(caller_id, line, callee_id);
    }

    fn record_recursive_cycles(&mut self) {
        for cycle in self.environment.recursive_components() {
            if !self.recursive_cycles.contains(&cycle) {
                info!(
                    cycle = ?cycle,
                    max_search_depth = self.config.max_search_depth,
                    "recursive call cycle, search is bounded by depth"
                );
                self.recursive_cycles.push(cycle);
            }
        }
    }

    /// Confirm candidates with the trace validator
    ///
    /// Without path sensitivity every candidate is confirmed. A validator
    /// error rejects the trace.
    pub fn validate(&mut self) {
        let mut bugs = BTreeMap::new();
        for (&function_id, candidates) in &self.bug_candidates {
            let mut confirmed = Vec::new();
            for trace in candidates {
                if !self.config.path_sensitive {
                    confirmed.push(trace.clone());
                    continue;
                }
                match self.oracles.validator.validate(trace, &self.environment) {
                    Ok(true) => confirmed.push(trace.clone()),
                    Ok(false) => debug!(%trace, "trace rejected"),
                    Err(err) => warn!(
                        %trace,
                        validator = self.oracles.validator.name(),
                        error = %err,
                        "validation failed, trace rejected"
                    ),
                }
            }
            bugs.insert(function_id, confirmed);
        }

        info!(
            program = self.model.name(),
            bugs = bugs.values().map(Vec::len).sum::<usize>(),
            "validation finished"
        );
        self.bugs = bugs;
    }

    pub fn report(&self) -> AnalysisReport {
        AnalysisReport {
            program: self.model.name().to_string(),
            bug_kind: self.config.bug_kind,
            bug_item_number: self.bugs.values().map(Vec::len).sum(),
            bug_candidate_number: self.bug_candidates.values().map(Vec::len).sum(),
            bug_items: render_trace_map(&self.bugs, &self.environment),
            bug_candidates: render_trace_map(&self.bug_candidates, &self.environment),
            entries: self.entries.clone(),
            recursive_cycles: self.recursive_cycles.clone(),
            stats: RunStats {
                queries: self.query_stats,
                search: self.search_stats,
            },
        }
    }
}
