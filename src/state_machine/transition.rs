//! Pure state transition function

use super::dispatch::dispatch;
use super::{Effect, Event, SessionContext, SessionState};
use crate::checklist::Checklist;
use crate::protocol::ToolResponse;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: SessionState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: SessionState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_effects(mut self, effects: impl IntoIterator<Item = Effect>) -> Self {
        self.effects.extend(effects);
        self
    }
}

/// Pure transition function.
///
/// The prior state is never modified: every branch works on a clone, which
/// shares untouched checklists with `state`.
pub fn transition(state: &SessionState, context: &SessionContext, event: Event) -> TransitionResult {
    let mut next = state.clone();

    match event {
        Event::ToolCall(call) => {
            next.awaiting_first_response = false;
            if call.function_calls.is_empty() {
                return TransitionResult::new(next);
            }

            let out = dispatch(&mut next.store, &call.function_calls, context.duplicate_policy);
            if out.effects.iter().any(|e| matches!(e, Effect::StopCamera)) {
                next.camera_active = false;
            }

            TransitionResult::new(next)
                .with_effects(out.effects)
                .with_effect(Effect::RespondToToolCall(ToolResponse {
                    function_responses: out.responses,
                }))
        }

        // Responses were already sent when the calls arrived
        Event::ToolCallCancellation { ids } => {
            tracing::debug!(session_id = %context.session_id, ?ids, "Cancellation after response, nothing to undo");
            TransitionResult::new(next)
        }

        Event::CameraStarted => {
            next.camera_active = true;
            TransitionResult::new(next)
        }

        Event::CameraUnavailable { reason } => {
            tracing::info!(session_id = %context.session_id, %reason, "Showing camera access instructions");
            next.camera_active = false;
            next.store
                .create_or_append(Checklist::camera_access_required(), context.duplicate_policy);
            TransitionResult::new(next)
        }

        Event::ToggleStep { list_id, index } => {
            next.store.toggle_step(&list_id, index);
            TransitionResult::new(next)
        }

        Event::EditList { list_id, steps } => {
            next.store.replace_steps(&list_id, &steps);
            TransitionResult::new(next)
        }

        Event::StartOver => {
            next.store.reset();
            TransitionResult::new(next)
        }

        Event::UtteranceSent => {
            next.awaiting_first_response = true;
            TransitionResult::new(next)
        }

        Event::ConnectionFailed => {
            next.awaiting_first_response = false;
            TransitionResult::new(next)
        }
    }
}
