//! Call Context for Context-Sensitive Search
//!
//! A simplified call stack of tagged frames. A `Call` frame is pushed when the
//! flow enters a callee through an argument, a `Return` frame when the flow
//! leaves a function back into a caller. A return annihilates the most recent
//! call when both name the same callee and call site.
//!
//! Only the most recent pair is matched: frames below the top are never
//! re-checked, so the stack approximates full call/return matching rather than
//! implementing a pushdown product construction.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::shared::models::{FunctionId, LineNumber};

/// Call site identity: the calling function and the line of the call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CallSiteRef {
    pub caller: FunctionId,
    pub line: LineNumber,
}

impl CallSiteRef {
    pub fn new(caller: FunctionId, line: LineNumber) -> Self {
        Self { caller, line }
    }
}

/// One context frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContextFrame {
    /// Flow entered `callee` through the call at `site`
    Call { site: CallSiteRef, callee: FunctionId },
    /// Flow left `callee` back into the caller at `site`
    Return { site: CallSiteRef, callee: FunctionId },
}

impl ContextFrame {
    pub fn call(caller: FunctionId, line: LineNumber, callee: FunctionId) -> Self {
        Self::Call {
            site: CallSiteRef::new(caller, line),
            callee,
        }
    }

    pub fn ret(caller: FunctionId, line: LineNumber, callee: FunctionId) -> Self {
        Self::Return {
            site: CallSiteRef::new(caller, line),
            callee,
        }
    }

    /// Whether `self` (a return) closes `call`
    fn closes(&self, call: &ContextFrame) -> bool {
        match (call, self) {
            (
                ContextFrame::Call { site, callee },
                ContextFrame::Return {
                    site: ret_site,
                    callee: ret_callee,
                },
            ) => site == ret_site && callee == ret_callee,
            _ => false,
        }
    }
}

impl fmt::Display for ContextFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Call { site, callee } => write!(f, "call {}@{}:{}", callee, site.caller, site.line),
            Self::Return { site, callee } => {
                write!(f, "ret {}@{}:{}", callee, site.caller, site.line)
            }
        }
    }
}

/// Context stack for one search branch (never shared between siblings)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ContextStack {
    frames: Vec<ContextFrame>,
}

impl ContextStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_frames(frames: Vec<ContextFrame>) -> Self {
        Self { frames }
    }

    pub fn frames(&self) -> &[ContextFrame] {
        &self.frames
    }

    pub fn top(&self) -> Option<&ContextFrame> {
        self.frames.last()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// See [`check_context_realizability`]
    pub fn check(&self, frame: ContextFrame) -> (bool, ContextStack) {
        check_context_realizability(self, frame)
    }
}

/// Whether `stack ++ frame` is realizable, and the resulting stack
///
/// - empty stack: realizable, `frame` pushed
/// - top is a call and `frame` is a return: realizable iff the return closes
///   that call, in which case the call is popped; otherwise infeasible and the
///   stack is returned unchanged
/// - anything else: realizable, `frame` pushed
///
/// Pure: the input stack is never modified.
pub fn check_context_realizability(
    stack: &ContextStack,
    frame: ContextFrame,
) -> (bool, ContextStack) {
    let Some(top) = stack.top() else {
        return (true, ContextStack::from_frames(vec![frame]));
    };

    let mut next = stack.clone();
    if matches!(top, ContextFrame::Call { .. }) && matches!(frame, ContextFrame::Return { .. }) {
        if frame.closes(top) {
            next.frames.pop();
            return (true, next);
        }
        return (false, next);
    }

    next.frames.push(frame);
    (true, next)
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: FunctionId = FunctionId(1);
    const B: FunctionId = FunctionId(2);
    const C: FunctionId = FunctionId(3);

    #[test]
    fn test_empty_stack_accepts_anything() {
        let (ok, stack) = ContextStack::new().check(ContextFrame::ret(A, 4, B));
        assert!(ok);
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn test_matching_return_annihilates_call() {
        let (ok, stack) = ContextStack::new().check(ContextFrame::call(A, 5, B));
        assert!(ok);
        let (ok, stack) = stack.check(ContextFrame::ret(A, 5, B));
        assert!(ok);
        assert!(stack.is_empty());
    }

    #[test]
    fn test_mismatched_return_is_infeasible() {
        let stack = ContextStack::from_frames(vec![ContextFrame::call(A, 5, B)]);

        let (ok, unchanged) = stack.check(ContextFrame::ret(A, 5, C));
        assert!(!ok);
        assert_eq!(unchanged, stack);

        // Same callee, different call site
        let (ok, _) = stack.check(ContextFrame::ret(A, 9, B));
        assert!(!ok);
    }

    #[test]
    fn test_other_combinations_push() {
        let stack = ContextStack::from_frames(vec![ContextFrame::ret(A, 5, B)]);
        let (ok, next) = stack.check(ContextFrame::ret(C, 2, A));
        assert!(ok);
        assert_eq!(next.len(), 2);

        let (ok, next) = next.check(ContextFrame::call(A, 7, C));
        assert!(ok);
        assert_eq!(next.len(), 3);
    }

    #[test]
    fn test_only_top_frame_is_matched() {
        // call B, call C, return from C, return from B: both annihilate in turn
        let stack = ContextStack::new();
        let (_, stack) = stack.check(ContextFrame::call(A, 1, B));
        let (_, stack) = stack.check(ContextFrame::call(B, 2, C));
        let (ok, stack) = stack.check(ContextFrame::ret(B, 2, C));
        assert!(ok);
        let (ok, stack) = stack.check(ContextFrame::ret(A, 1, B));
        assert!(ok);
        assert!(stack.is_empty());
    }
}
