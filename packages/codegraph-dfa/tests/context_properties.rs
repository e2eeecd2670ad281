//! Property tests for context realizability

use codegraph_dfa::{check_context_realizability, ContextFrame, ContextStack, FunctionId};
use proptest::prelude::*;
use quickcheck_macros::quickcheck;

fn frame_strategy() -> impl Strategy<Value = ContextFrame> {
    (any::<bool>(), 0u32..4, 1usize..6, 0u32..4).prop_map(|(is_call, caller, line, callee)| {
        if is_call {
            ContextFrame::call(FunctionId(caller), line, FunctionId(callee))
        } else {
            ContextFrame::ret(FunctionId(caller), line, FunctionId(callee))
        }
    })
}

fn stack_strategy() -> impl Strategy<Value = ContextStack> {
    prop::collection::vec(frame_strategy(), 0..8).prop_map(ContextStack::from_frames)
}

proptest! {
    #[test]
    fn check_is_deterministic_and_pure(stack in stack_strategy(), frame in frame_strategy()) {
        let before = stack.clone();
        let first = check_context_realizability(&stack, frame);
        let second = check_context_realizability(&stack, frame);

        prop_assert_eq!(&first, &second);
        prop_assert_eq!(stack, before);
    }

    #[test]
    fn realizable_steps_change_length_by_one(stack in stack_strategy(), frame in frame_strategy()) {
        let (ok, next) = stack.check(frame);
        if ok {
            let grew = next.len() == stack.len() + 1 && next.top() == Some(&frame);
            let popped = next.len() + 1 == stack.len();
            prop_assert!(grew || popped);
        } else {
            prop_assert_eq!(next, stack);
        }
    }

    #[test]
    fn matching_return_restores_the_stack(
        stack in stack_strategy(),
        caller in 0u32..4,
        line in 1usize..6,
        callee in 0u32..4,
    ) {
        let call = ContextFrame::call(FunctionId(caller), line, FunctionId(callee));
        let ret = ContextFrame::ret(FunctionId(caller), line, FunctionId(callee));

        let (pushed, entered) = stack.check(call);
        prop_assert!(pushed);
        let (closed, left) = entered.check(ret);
        prop_assert!(closed);
        prop_assert_eq!(left, stack);
    }

    #[test]
    fn mismatched_return_is_rejected(
        stack in stack_strategy(),
        caller in 0u32..4,
        line in 1usize..6,
        callee in 0u32..4,
    ) {
        let call = ContextFrame::call(FunctionId(caller), line, FunctionId(callee));
        let (_, entered) = stack.check(call);

        let wrong_line = ContextFrame::ret(FunctionId(caller), line + 1, FunctionId(callee));
        let (ok, next) = entered.check(wrong_line);
        prop_assert!(!ok);
        prop_assert_eq!(&next, &entered);

        let wrong_callee = ContextFrame::ret(FunctionId(caller), line, FunctionId(callee + 1));
        prop_assert!(!entered.check(wrong_callee).0);
    }
}

#[quickcheck]
fn empty_stack_accepts_any_frame(is_call: bool, caller: u32, line: usize, callee: u32) -> bool {
    let frame = if is_call {
        ContextFrame::call(FunctionId(caller), line, FunctionId(callee))
    } else {
        ContextFrame::ret(FunctionId(caller), line, FunctionId(callee))
    };
    let (ok, next) = ContextStack::new().check(frame);
    ok && next.frames() == [frame]
}

#[quickcheck]
fn returns_stack_on_returns(lines: Vec<u8>) -> bool {
    // Unmatched returns (flow leaving the start function) always push
    let mut stack = ContextStack::new();
    for (i, line) in lines.iter().enumerate() {
        let frame = ContextFrame::ret(FunctionId(i as u32), *line as usize, FunctionId(99));
        let (ok, next) = stack.check(frame);
        if !ok {
            return false;
        }
        stack = next;
    }
    stack.len() == lines.len()
}
