//! Trace - an inter-procedural path from a source to a sink
//!
//! Example: main:src@3 -> main:arg@5 -> div:para@1 -> div:sink@4
//!          [Source]   -> [Call]     -> [Entry]    -> [Sink]

use serde::{Deserialize, Serialize};
use std::fmt;

use super::value::{FunctionId, Value, ValueKind};

/// One (function, program point) step of a trace
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TracePoint {
    pub function_id: FunctionId,
    pub value: Value,
}

impl TracePoint {
    pub fn new(function_id: FunctionId, value: Value) -> Self {
        Self { function_id, value }
    }
}

/// Ordered path of (function, value) pairs
///
/// Extension is copy-on-extend: sibling search branches never share a trace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Trace(Vec<TracePoint>);

impl Trace {
    /// Singleton trace seeded at a source value
    pub fn seed(function_id: FunctionId, value: Value) -> Self {
        Self(vec![TracePoint::new(function_id, value)])
    }

    pub fn from_points(points: Vec<TracePoint>) -> Self {
        Self(points)
    }

    pub fn points(&self) -> &[TracePoint] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn last(&self) -> Option<&TracePoint> {
        self.0.last()
    }

    pub fn first(&self) -> Option<&TracePoint> {
        self.0.first()
    }

    /// New trace with the given points appended
    pub fn extended<I>(&self, points: I) -> Self
    where
        I: IntoIterator<Item = (FunctionId, Value)>,
    {
        let mut next = self.0.clone();
        next.extend(
            points
                .into_iter()
                .map(|(function_id, value)| TracePoint::new(function_id, value)),
        );
        Self(next)
    }

    pub fn is_sink_terminated(&self) -> bool {
        self.last()
            .map_or(false, |point| point.value.kind == ValueKind::Sink)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TracePoint> {
        self.0.iter()
    }
}

impl fmt::Display for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let steps: Vec<String> = self
            .0
            .iter()
            .map(|p| format!("{}:{}", p.function_id, p.value))
            .collect();
        f.write_str(&steps.join(" -> "))
    }
}
