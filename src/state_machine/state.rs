//! Session state types

use crate::checklist::{ChecklistStore, DuplicatePolicy};

/// Everything the session task owns between events
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub store: ChecklistStore,
    /// Camera reported as streaming
    pub camera_active: bool,
    /// A user utterance was sent and no tool call has answered it yet
    pub awaiting_first_response: bool,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn with_store(store: ChecklistStore) -> Self {
        Self {
            store,
            ..Self::default()
        }
    }
}

/// Fixed per-session settings passed into every transition
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub session_id: String,
    pub duplicate_policy: DuplicatePolicy,
}

impl SessionContext {
    pub fn new(session_id: impl Into<String>, duplicate_policy: DuplicatePolicy) -> Self {
        Self {
            session_id: session_id.into(),
            duplicate_policy,
        }
    }
}
