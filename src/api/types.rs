//! API request and response types

use crate::config::SessionSetup;
use serde::{Deserialize, Serialize};

/// Request to say something to the agent
#[derive(Debug, Deserialize)]
pub struct SendRequest {
    pub text: String,
    /// Sent from the initial screen; the text names a list topic
    #[serde(default)]
    pub start_list: bool,
}

/// Request to replace all steps of a list
#[derive(Debug, Deserialize)]
pub struct EditRequest {
    pub steps: Vec<String>,
}

/// What the bridge needs to open the live session
#[derive(Debug, Serialize)]
pub struct SetupResponse {
    pub endpoint: String,
    pub setup: SessionSetup,
}

/// Generic success response
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
