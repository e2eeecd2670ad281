//! Custom assertions for trace verification

use codegraph_dfa::{FunctionId, Trace, ValueKind};

/// Assert that every trace ends in a SINK value
pub fn assert_all_sink_terminated(traces: &[Trace]) {
    for trace in traces {
        assert!(
            trace.is_sink_terminated(),
            "Expected trace to end in a sink: {trace}"
        );
    }
}

/// Assert a trace's (function, name, line, kind) steps
pub fn assert_trace_steps(trace: &Trace, expected: &[(u32, &str, usize, ValueKind)]) {
    let actual: Vec<(FunctionId, &str, usize, ValueKind)> = trace
        .iter()
        .map(|p| (p.function_id, p.value.name.as_str(), p.value.line_number, p.value.kind))
        .collect();
    let expected: Vec<(FunctionId, &str, usize, ValueKind)> = expected
        .iter()
        .map(|&(id, name, line, kind)| (FunctionId(id), name, line, kind))
        .collect();
    pretty_assertions::assert_eq!(actual, expected);
}
