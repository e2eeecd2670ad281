//! Environment / Call Graph Store
//!
//! Single source of truth for "which functions have been analyzed" and
//! "which call edges exist". One Environment lives for one analysis run and is
//! owned by the driver; the reachability engine only borrows it.
//!
//! Call edges are inserted as each function's call sites are resolved by
//! textual name match, so the graph grows incrementally with the analysis.

use petgraph::algo::tarjan_scc;
use petgraph::graphmap::DiGraphMap;
use rustc_hash::FxHashMap;
use std::collections::{BTreeMap, BTreeSet};

use crate::errors::{DfaError, DfaResult};
use crate::shared::models::{Function, FunctionId, LineNumber};

/// Process-wide store of analyzed functions and call graph edges
#[derive(Debug, Default)]
pub struct Environment {
    analyzed_functions: FxHashMap<FunctionId, Function>,

    /// caller -> callees
    caller_callee_map: BTreeMap<FunctionId, BTreeSet<FunctionId>>,

    /// callee -> (caller, call line)
    callee_caller_map: BTreeMap<FunctionId, BTreeSet<(FunctionId, LineNumber)>>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_analyzed(&self, function_id: FunctionId) -> bool {
        self.analyzed_functions.contains_key(&function_id)
    }

    /// Register or overwrite a function record (last write wins)
    pub fn set_analyzed_function(&mut self, function_id: FunctionId, function: Function) {
        self.analyzed_functions.insert(function_id, function);
    }

    pub fn function(&self, function_id: FunctionId) -> Option<&Function> {
        self.analyzed_functions.get(&function_id)
    }

    /// Analyzed function, or a precondition violation when absent
    pub fn require(&self, function_id: FunctionId) -> DfaResult<&Function> {
        self.analyzed_functions
            .get(&function_id)
            .ok_or(DfaError::FunctionNotAnalyzed { function_id })
    }

    /// Remove a function for re-extension; callers put it back with
    /// `set_analyzed_function`
    pub fn take_function(&mut self, function_id: FunctionId) -> Option<Function> {
        self.analyzed_functions.remove(&function_id)
    }

    /// Insert a bidirectional call edge (idempotent)
    pub fn insert_caller_callee_pair(
        &mut self,
        caller_id: FunctionId,
        line_number: LineNumber,
        callee_id: FunctionId,
    ) {
        self.caller_callee_map
            .entry(caller_id)
            .or_default()
            .insert(callee_id);
        self.callee_caller_map
            .entry(callee_id)
            .or_default()
            .insert((caller_id, line_number));
    }

    pub fn callees_of(&self, caller_id: FunctionId) -> impl Iterator<Item = FunctionId> + '_ {
        self.caller_callee_map
            .get(&caller_id)
            .into_iter()
            .flat_map(|callees| callees.iter().copied())
    }

    pub fn callers_of(
        &self,
        callee_id: FunctionId,
    ) -> impl Iterator<Item = (FunctionId, LineNumber)> + '_ {
        self.callee_caller_map
            .get(&callee_id)
            .into_iter()
            .flat_map(|callers| callers.iter().copied())
    }

    pub fn has_call_edge(
        &self,
        caller_id: FunctionId,
        line_number: LineNumber,
        callee_id: FunctionId,
    ) -> bool {
        self.callee_caller_map
            .get(&callee_id)
            .map_or(false, |callers| callers.contains(&(caller_id, line_number)))
    }

    /// Lines in `caller_id` that call `callee_id`
    pub fn call_site_lines(&self, caller_id: FunctionId, callee_id: FunctionId) -> Vec<LineNumber> {
        self.callers_of(callee_id)
            .filter(|(caller, _)| *caller == caller_id)
            .map(|(_, line)| line)
            .collect()
    }

    /// Analyzed function ids in ascending order
    pub fn analyzed_ids(&self) -> Vec<FunctionId> {
        let mut ids: Vec<FunctionId> = self.analyzed_functions.keys().copied().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.analyzed_functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.analyzed_functions.is_empty()
    }

    /// Recursive call cycles: SCCs with more than one function, or a
    /// function that calls itself
    pub fn recursive_components(&self) -> Vec<Vec<FunctionId>> {
        let mut graph: DiGraphMap<FunctionId, ()> = DiGraphMap::new();
        for (caller, callees) in &self.caller_callee_map {
            graph.add_node(*caller);
            for callee in callees {
                graph.add_edge(*caller, *callee, ());
            }
        }

        let mut cycles: Vec<Vec<FunctionId>> = tarjan_scc(&graph)
            .into_iter()
            .filter(|scc| scc.len() > 1 || graph.contains_edge(scc[0], scc[0]))
            .map(|mut scc| {
                scc.sort();
                scc
            })
            .collect();
        cycles.sort();
        cycles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_analyzed_tracks_registry() {
        let mut env = Environment::new();
        assert!(!env.is_analyzed(FunctionId(1)));
        env.set_analyzed_function(FunctionId(1), Function::new(FunctionId(1), "main", ""));
        assert!(env.is_analyzed(FunctionId(1)));
        assert!(env.require(FunctionId(2)).is_err());
    }

    #[test]
    fn test_last_write_wins() {
        let mut env = Environment::new();
        env.set_analyzed_function(FunctionId(1), Function::new(FunctionId(1), "old", ""));
        env.set_analyzed_function(FunctionId(1), Function::new(FunctionId(1), "new", ""));
        assert_eq!(env.function(FunctionId(1)).unwrap().name, "new");
        assert_eq!(env.len(), 1);
    }

    #[test]
    fn test_insert_caller_callee_pair_is_idempotent() {
        let mut env = Environment::new();
        env.insert_caller_callee_pair(FunctionId(1), 5, FunctionId(2));
        env.insert_caller_callee_pair(FunctionId(1), 5, FunctionId(2));
        env.insert_caller_callee_pair(FunctionId(1), 9, FunctionId(2));

        assert_eq!(env.callees_of(FunctionId(1)).collect::<Vec<_>>(), vec![FunctionId(2)]);
        assert_eq!(
            env.callers_of(FunctionId(2)).collect::<Vec<_>>(),
            vec![(FunctionId(1), 5), (FunctionId(1), 9)]
        );
        assert_eq!(env.call_site_lines(FunctionId(1), FunctionId(2)), vec![5, 9]);
        assert!(env.has_call_edge(FunctionId(1), 9, FunctionId(2)));
        assert!(!env.has_call_edge(FunctionId(2), 9, FunctionId(1)));
        assert!(env.callers_of(FunctionId(1)).next().is_none());
    }

    #[test]
    fn test_recursive_components() {
        let mut env = Environment::new();
        env.insert_caller_callee_pair(FunctionId(1), 2, FunctionId(2));
        env.insert_caller_callee_pair(FunctionId(2), 3, FunctionId(1));
        env.insert_caller_callee_pair(FunctionId(2), 4, FunctionId(3));
        env.insert_caller_callee_pair(FunctionId(4), 1, FunctionId(4));

        assert_eq!(
            env.recursive_components(),
            vec![vec![FunctionId(1), FunctionId(2)], vec![FunctionId(4)]]
        );
    }
}
