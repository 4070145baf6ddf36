//! Tool-call dispatcher
//!
//! Applies one batch of function calls to a working copy of the store and
//! builds exactly one response per call, in request order.

use super::action::Action;
use super::Effect;
use crate::checklist::{Checklist, ChecklistStore, DuplicatePolicy};
use crate::protocol::{FunctionCall, FunctionResponse, ResponseResult};

/// Output of dispatching one batch
#[derive(Debug, Default)]
pub struct Dispatched {
    pub responses: Vec<FunctionResponse>,
    /// Side effects in request order
    pub effects: Vec<Effect>,
}

/// Apply `calls` to `store`. Never fails; unknown or malformed calls are
/// acknowledged without touching the store.
pub fn dispatch(
    store: &mut ChecklistStore,
    calls: &[FunctionCall],
    policy: DuplicatePolicy,
) -> Dispatched {
    let mut out = Dispatched::default();

    for call in calls {
        let mut response = FunctionResponse::ok(call);

        match Action::from_call(call) {
            Action::StartCamera => out.effects.push(Effect::StartCamera),
            Action::StopCamera => out.effects.push(Effect::StopCamera),
            Action::AnalyzeVisual(args) => {
                response.response.result =
                    ResponseResult::text(format!("Analyzing {}...", args.focus_area));
            }
            Action::CreateChecklist(args) => {
                store.create_or_append(Checklist::for_issue(&args.issue_type, args.steps), policy);
            }
            Action::UpdateChecklist(args) => {
                store.replace_steps(&args.issue_type, &args.completed_steps);
            }
            Action::CreateList(args) => {
                out.effects.push(Effect::scroll_into_view(args.id.clone()));
                store.create_or_append(Checklist::new(args.id, args.heading, args.list_array), policy);
            }
            Action::EditList(args) => {
                store.replace_steps(&args.id, &args.list_array);
            }
            Action::RemoveList(args) => {
                store.remove(&args.id);
            }
            // Filled in by the emitter once the batch is committed
            Action::LookAtLists => {}
            Action::Malformed { name, reason } => {
                tracing::warn!(call_id = %call.id, name = name.as_str(), %reason, "Malformed tool call arguments");
            }
            Action::Unknown { name } => {
                tracing::debug!(call_id = %call.id, %name, "Unhandled tool call");
            }
        }

        out.responses.push(response);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn call(id: &str, name: &str, args: serde_json::Value) -> FunctionCall {
        FunctionCall::new(id, name, args)
    }

    #[test]
    fn test_analyze_visual_response_text() {
        let mut store = ChecklistStore::new();
        let out = dispatch(
            &mut store,
            &[call("1", "analyze_visual", json!({ "focus_area": "drum" }))],
            DuplicatePolicy::Replace,
        );
        assert!(store.is_empty());
        assert_eq!(out.responses[0].result().as_text(), Some("Analyzing drum..."));
    }

    #[test]
    fn test_create_list_scrolls_into_view() {
        let mut store = ChecklistStore::new();
        let out = dispatch(
            &mut store,
            &[call(
                "1",
                "create_list",
                json!({ "id": "safety", "heading": "## Safety Checks", "list_array": ["- [ ] unplug"] }),
            )],
            DuplicatePolicy::Replace,
        );
        assert_eq!(store.get("safety").unwrap().heading, "## Safety Checks");
        assert_eq!(out.effects, vec![Effect::scroll_into_view("safety")]);
    }

    #[test]
    fn test_edit_list_replaces_steps_only() {
        let mut store = ChecklistStore::new();
        store.create_or_append(
            Checklist::new("safety", "Safety", vec!["- [ ] unplug".to_string()]),
            DuplicatePolicy::Replace,
        );
        dispatch(
            &mut store,
            &[call(
                "1",
                "edit_list",
                json!({ "id": "safety", "heading": "ignored", "list_array": ["- [x] unplug"] }),
            )],
            DuplicatePolicy::Replace,
        );
        let list = store.get("safety").unwrap();
        assert_eq!(list.heading, "Safety");
        assert_eq!(list.steps, vec!["- [x] unplug".to_string()]);
    }

    #[test]
    fn test_camera_calls_produce_effects_in_order() {
        let mut store = ChecklistStore::new();
        let out = dispatch(
            &mut store,
            &[call("1", "start_camera", json!({})), call("2", "stop_camera", json!({}))],
            DuplicatePolicy::Replace,
        );
        assert_eq!(out.effects, vec![Effect::StartCamera, Effect::StopCamera]);
        assert_eq!(out.responses[0].result().as_text(), Some("start_camera OK."));
    }

    #[test]
    fn test_unknown_and_malformed_are_acknowledged() {
        let mut store = ChecklistStore::new();
        let out = dispatch(
            &mut store,
            &[
                call("1", "teleport", json!({})),
                call("2", "create_checklist", json!({ "issue_type": 7 })),
                call("3", "look_at_lists", json!({})),
            ],
            DuplicatePolicy::Replace,
        );
        assert!(store.is_empty());
        assert!(out.effects.is_empty());
        let texts: Vec<_> = out.responses.iter().map(|r| r.result().as_text()).collect();
        assert_eq!(
            texts,
            vec![
                Some("teleport OK."),
                Some("create_checklist OK."),
                Some("look_at_lists OK.")
            ]
        );
    }
}
