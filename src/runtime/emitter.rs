//! Response emitter
//!
//! Holds at most one staged response batch. Taking it rewrites list-lookup
//! entries with a snapshot of the store and clears the slot, so a batch is
//! delivered exactly once.

use crate::checklist::ChecklistStore;
use crate::protocol::{ResponseResult, ToolResponse};
use crate::state_machine::action::ActionName;

#[derive(Debug, Default)]
pub struct PendingResponse {
    slot: Option<ToolResponse>,
}

impl PendingResponse {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage a batch, returning one that was still waiting
    pub fn stage(&mut self, batch: ToolResponse) -> Option<ToolResponse> {
        self.slot.replace(batch)
    }

    #[cfg(test)]
    pub fn is_pending(&self) -> bool {
        self.slot.is_some()
    }

    /// Take the staged batch, finalized against the committed `store`
    pub fn take_finalized(&mut self, store: &ChecklistStore) -> Option<ToolResponse> {
        self.slot.take().map(|batch| attach_snapshots(batch, store))
    }
}

/// Replace the result of every `look_at_lists` entry with the current lists
pub fn attach_snapshots(mut batch: ToolResponse, store: &ChecklistStore) -> ToolResponse {
    for response in &mut batch.function_responses {
        if response.name == ActionName::LookAtLists.as_str() {
            response.response.result = ResponseResult::lists(store.snapshot());
        }
    }
    batch
}
