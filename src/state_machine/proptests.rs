//! Property-based tests for the state machine
//!
//! These tests verify key invariants hold across all possible inputs.

use super::*;
use crate::checklist::{Checklist, ChecklistStore, DuplicatePolicy};
use crate::protocol::{FunctionCall, ToolCall};
use proptest::prelude::*;
use serde_json::json;
use std::collections::HashSet;

// ============================================================================
// Test Helpers
// ============================================================================

fn test_context() -> SessionContext {
    SessionContext::new("test-session", DuplicatePolicy::Replace)
}

fn batch(calls: Vec<FunctionCall>) -> Event {
    Event::ToolCall(ToolCall {
        function_calls: calls,
    })
}

fn response_count(effects: &[Effect]) -> Option<usize> {
    effects.iter().find_map(|e| match e {
        Effect::RespondToToolCall(batch) => Some(batch.function_responses.len()),
        _ => None,
    })
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_step() -> impl Strategy<Value = String> {
    (
        prop_oneof![Just("- [ ] "), Just("- [x] "), Just("")],
        "[a-z ]{0,12}",
    )
        .prop_map(|(prefix, text)| format!("{prefix}{text}"))
}

fn arb_checklist() -> impl Strategy<Value = Checklist> {
    ("[a-d]{1,2}", "[A-Za-z ]{0,10}", proptest::collection::vec(arb_step(), 0..5))
        .prop_map(|(id, heading, steps)| Checklist::new(id, heading, steps))
}

fn arb_store() -> impl Strategy<Value = ChecklistStore> {
    proptest::collection::vec(arb_checklist(), 0..5).prop_map(|lists| {
        let mut store = ChecklistStore::new();
        for list in lists {
            store.create_or_append(list, DuplicatePolicy::Replace);
        }
        store
    })
}

fn arb_call() -> impl Strategy<Value = FunctionCall> {
    let id = "[a-z0-9]{4}";
    prop_oneof![
        id.prop_map(|id| FunctionCall::new(id, "start_camera", json!({}))),
        (id, "[a-z]{1,8}").prop_map(|(id, area)| FunctionCall::new(
            id,
            "analyze_visual",
            json!({ "focus_area": area })
        )),
        (id, "[a-d]{1,2}", proptest::collection::vec(arb_step(), 0..3)).prop_map(
            |(id, issue, steps)| FunctionCall::new(
                id,
                "create_checklist",
                json!({ "issue_type": issue, "steps": steps })
            )
        ),
        (id, "[a-d]{1,2}").prop_map(|(id, list)| FunctionCall::new(
            id,
            "remove_list",
            json!({ "id": list })
        )),
        id.prop_map(|id| FunctionCall::new(id, "look_at_lists", json!({}))),
        (id, "[a-z_]{1,12}").prop_map(|(id, name)| FunctionCall::new(id, name, json!({}))),
        // Wrong argument shapes for known names
        id.prop_map(|id| FunctionCall::new(id, "edit_list", json!({ "id": 3 }))),
    ]
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_response_count_matches_requests(calls in proptest::collection::vec(arb_call(), 1..12)) {
        let ids: Vec<String> = calls.iter().map(|c| c.id.clone()).collect();
        let result = transition(&SessionState::new(), &test_context(), batch(calls));

        let responses = result.effects.iter().find_map(|e| match e {
            Effect::RespondToToolCall(batch) => Some(&batch.function_responses),
            _ => None,
        });
        let responses = responses.expect("non-empty batch must be answered");
        let response_ids: Vec<String> = responses.iter().map(|r| r.id.clone()).collect();
        prop_assert_eq!(response_ids, ids);
    }

    #[test]
    fn prop_distinct_creates_count(
        issues in proptest::collection::hash_set("[a-z]{1,6}", 0..8),
        areas in proptest::collection::vec("[a-z]{1,6}", 0..8),
    ) {
        let mut calls = Vec::new();
        let mut areas = areas.into_iter();
        for (i, issue) in issues.iter().enumerate() {
            calls.push(FunctionCall::new(
                format!("c{i}"),
                "create_checklist",
                json!({ "issue_type": issue, "steps": [] }),
            ));
            if let Some(area) = areas.next() {
                calls.push(FunctionCall::new(
                    format!("v{i}"),
                    "analyze_visual",
                    json!({ "focus_area": area }),
                ));
            }
        }

        let result = transition(&SessionState::new(), &test_context(), batch(calls));
        let ids: HashSet<&str> = result.new_state.store.iter().map(|l| l.id.as_str()).collect();
        prop_assert_eq!(result.new_state.store.len(), issues.len());
        prop_assert_eq!(ids.len(), issues.len());
    }

    #[test]
    fn prop_toggle_twice_is_identity(store in arb_store(), pick in any::<prop::sample::Index>()) {
        prop_assume!(!store.is_empty());
        let list = store.iter().nth(pick.index(store.len())).unwrap().clone();
        prop_assume!(!list.steps.is_empty());
        let index = pick.index(list.steps.len());

        let state = SessionState::with_store(store);
        let toggle = || Event::ToggleStep { list_id: list.id.clone(), index };
        let once = transition(&state, &test_context(), toggle()).new_state;
        let twice = transition(&once, &test_context(), toggle()).new_state;
        prop_assert_eq!(twice, state);
    }

    #[test]
    fn prop_toggle_out_of_range_is_noop(store in arb_store(), extra in 0usize..4) {
        let state = SessionState::with_store(store);
        for list in state.store.iter() {
            let event = Event::ToggleStep {
                list_id: list.id.clone(),
                index: list.steps.len() + extra,
            };
            let next = transition(&state, &test_context(), event).new_state;
            prop_assert_eq!(&next, &state);
        }
    }

    #[test]
    fn prop_edit_absent_is_noop(store in arb_store(), steps in proptest::collection::vec(arb_step(), 0..3)) {
        let state = SessionState::with_store(store);
        let event = Event::EditList { list_id: "absent-id".to_string(), steps };
        let next = transition(&state, &test_context(), event).new_state;
        prop_assert_eq!(next, state);
    }

    #[test]
    fn prop_remove_twice_is_idempotent(store in arb_store(), id in "[a-d]{1,2}") {
        let remove = || batch(vec![FunctionCall::new("r", "remove_list", json!({ "id": id }))]);
        let once = transition(&SessionState::with_store(store), &test_context(), remove());
        let twice = transition(&once.new_state, &test_context(), remove());
        prop_assert_eq!(&twice.new_state, &once.new_state);
        prop_assert_eq!(response_count(&twice.effects), Some(1));
    }

    #[test]
    fn prop_ids_stay_unique_under_replace(calls in proptest::collection::vec(arb_call(), 0..16)) {
        let result = transition(&SessionState::new(), &test_context(), batch(calls));
        let store = &result.new_state.store;
        let ids: HashSet<&str> = store.iter().map(|l| l.id.as_str()).collect();
        prop_assert_eq!(ids.len(), store.len());
    }
}
