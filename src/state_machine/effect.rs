//! Effects produced by state transitions

use crate::protocol::ToolResponse;

/// Effects to be executed after the new state is committed
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Open the camera in a detached task; the outcome comes back as an event
    StartCamera,

    /// Release the camera
    StopCamera,

    /// Bring a freshly created checklist into view
    ScrollIntoView { list_id: String },

    /// Stage a response batch for the emitter
    RespondToToolCall(ToolResponse),
}

impl Effect {
    pub fn scroll_into_view(list_id: impl Into<String>) -> Self {
        Effect::ScrollIntoView {
            list_id: list_id.into(),
        }
    }
}
