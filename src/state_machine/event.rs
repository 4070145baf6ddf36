//! Events that drive the session state machine

use crate::protocol::ToolCall;

/// Events that trigger state transitions
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    // Agent events
    ToolCall(ToolCall),
    ToolCallCancellation {
        ids: Vec<String>,
    },

    // Camera outcomes, delivered after the call that requested them
    CameraStarted,
    CameraUnavailable {
        reason: String,
    },

    // User events
    ToggleStep {
        list_id: String,
        index: usize,
    },
    EditList {
        list_id: String,
        steps: Vec<String>,
    },
    StartOver,
    UtteranceSent,
    ConnectionFailed,
}
