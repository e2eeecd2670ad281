//! Shared environments and program models

use super::builders::{EnvironmentBuilder, FunctionBuilder};
use codegraph_dfa::shared::models::Value;
use codegraph_dfa::{Environment, InMemoryProgramModel};

/// A(1): src x@3 -> arg x@5 (calls B); B(2): para y@1 -> sink y@4
///
/// With `resolved = false` the call at line 5 names no callee.
pub fn caller_callee_environment(resolved: bool) -> Environment {
    let callee_ids: &[u32] = if resolved { &[2] } else { &[] };
    let a = FunctionBuilder::new(1, "a")
        .call(5, "b", &[("x", 0)], &[], callee_ids)
        .summary(Value::src("x", 3), Value::arg("x", 5, 0))
        .build();
    let b = FunctionBuilder::new(2, "b")
        .para("y", 1, 0)
        .summary(Value::para("y", 1, 0), Value::sink("y", 4))
        .build();
    EnvironmentBuilder::new().with(a).with(b).build()
}

/// A(1) and B(2) call each other through their first parameter forever:
/// A: src x@2 -> arg x@3 (calls B), para p@1 -> arg p@3
/// B: para q@1 -> arg q@2 (calls A), para q@1 -> sink q@5
pub fn mutual_recursion_environment() -> Environment {
    let a = FunctionBuilder::new(1, "a")
        .para("p", 1, 0)
        .call(3, "b", &[("x", 0)], &[], &[2])
        .summary(Value::src("x", 2), Value::arg("x", 3, 0))
        .summary(Value::para("p", 1, 0), Value::arg("x", 3, 0))
        .build();
    let b = FunctionBuilder::new(2, "b")
        .para("q", 1, 0)
        .call(2, "a", &[("q", 0)], &[], &[1])
        .summary(Value::para("q", 1, 0), Value::arg("q", 2, 0))
        .summary(Value::para("q", 1, 0), Value::sink("q", 5))
        .build();
    EnvironmentBuilder::new().with(a).with(b).build()
}

/// B(2): src z@2 -> ret z@3, called by A(1) at line 5 and C(3) at line 7;
/// both callers flow the call output into a sink
pub fn two_callers_environment() -> Environment {
    let a = FunctionBuilder::new(1, "a")
        .call(5, "b", &[], &["r"], &[2])
        .summary(Value::out("r", 5), Value::sink("r", 6))
        .build();
    let b = FunctionBuilder::new(2, "b")
        .summary(Value::src("z", 2), Value::ret("z", 3))
        .build();
    let c = FunctionBuilder::new(3, "c")
        .call(7, "b", &[], &["s"], &[2])
        .summary(Value::out("s", 7), Value::sink("s", 9))
        .build();
    EnvironmentBuilder::new().with(a).with(b).with(c).build()
}

/// Dbz program: main reads zero into `x`, passes it to `divide`, which divides
/// by its parameter inside an `if (1)` block
pub const DBZ_PROGRAM_JSON: &str = r#"{
    "name": "dbz_cross_function",
    "functions": [
        {
            "id": 1,
            "name": "main",
            "source": "int main() {\n  int x = 0;\n  divide(x);\n  return 0;\n}",
            "parameters": [],
            "call_sites": [
                {"line": 3, "callee": "divide", "args": [{"name": "x", "index": 0}]}
            ]
        },
        {
            "id": 2,
            "name": "divide",
            "source": "int divide(int d) {\n  if (1) {\n    return 100 / d;\n  }\n  return 0;\n}",
            "parameters": [{"name": "d", "line": 1, "index": 0}],
            "returns": [{"name": "100 / d", "line": 3}],
            "if_statements": [
                {
                    "start_line": 2,
                    "end_line": 4,
                    "condition": "(1)",
                    "condition_line": 2,
                    "true_branch": {"start": 2, "end": 4}
                }
            ]
        }
    ]
}"#;

pub fn dbz_program() -> InMemoryProgramModel {
    InMemoryProgramModel::from_json_str(DBZ_PROGRAM_JSON).expect("fixture parses")
}
