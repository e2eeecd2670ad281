//! Test data builders

use codegraph_dfa::shared::models::{CallSiteInfo, Function, FunctionId, Value};
use codegraph_dfa::Environment;

/// Builder for `Function` records with hand-written summaries
#[derive(Debug)]
pub struct FunctionBuilder {
    function: Function,
}

impl FunctionBuilder {
    pub fn new(id: u32, name: &str) -> Self {
        Self {
            function: Function::new(FunctionId(id), name, ""),
        }
    }

    pub fn para(mut self, name: &str, line: usize, index: usize) -> Self {
        self.function.paras.push(Value::para(name, line, index));
        self
    }

    /// Call site at `line`; `args` are (name, index) pairs
    pub fn call(
        mut self,
        line: usize,
        callee: &str,
        args: &[(&str, usize)],
        outputs: &[&str],
        callee_ids: &[u32],
    ) -> Self {
        self.function.call_site_info.insert(
            line,
            CallSiteInfo {
                callee_name: callee.to_string(),
                args: args
                    .iter()
                    .map(|(name, index)| Value::arg(*name, line, *index))
                    .collect(),
                outputs: outputs.iter().map(|name| Value::out(*name, line)).collect(),
                callee_ids: callee_ids.iter().copied().map(FunctionId).collect(),
            },
        );
        self
    }

    pub fn summary(mut self, start: Value, end: Value) -> Self {
        self.function.reachable_summaries.push((start, end));
        self
    }

    pub fn build(self) -> Function {
        self.function
    }
}

/// Builder registering functions and the call edges their call sites name
#[derive(Debug, Default)]
pub struct EnvironmentBuilder {
    functions: Vec<Function>,
    /// Functions whose call edges are recorded but which stay unregistered
    missing: Vec<u32>,
}

impl EnvironmentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, function: Function) -> Self {
        self.functions.push(function);
        self
    }

    /// Keep `function`'s call edges but leave it out of the registry
    pub fn with_unregistered(mut self, function: Function) -> Self {
        self.missing.push(function.function_id.as_u32());
        self.functions.push(function);
        self
    }

    pub fn build(self) -> Environment {
        let mut env = Environment::new();
        for function in self.functions {
            for (&line, info) in &function.call_site_info {
                for &callee in &info.callee_ids {
                    env.insert_caller_callee_pair(function.function_id, line, callee);
                }
            }
            if !self.missing.contains(&function.function_id.as_u32()) {
                env.set_analyzed_function(function.function_id, function);
            }
        }
        env
    }
}
