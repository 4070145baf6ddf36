//! Trait abstractions for runtime I/O
//!
//! These traits enable testing the executor with mock implementations.

use super::error::{CameraError, SessionError};
use crate::protocol::ToolResponse;
use async_trait::async_trait;
use std::sync::Arc;

/// Live connection to the remote agent
#[async_trait]
pub trait SessionClient: Send + Sync {
    /// Open the connection and wait for the setup handshake
    async fn connect(&self) -> Result<(), SessionError>;

    fn is_connected(&self) -> bool;

    /// Deliver a tool response batch. No acknowledgment is modeled.
    async fn send_tool_response(&self, response: ToolResponse) -> Result<(), SessionError>;

    /// Inject a user utterance
    async fn send_text(&self, text: &str) -> Result<(), SessionError>;
}

/// Camera capture device
#[async_trait]
pub trait CameraControl: Send + Sync {
    /// Request the camera. Resolves once permission is granted or refused.
    async fn start(&self) -> Result<(), CameraError>;

    fn stop(&self);
}

// ============================================================================
// Arc implementations for trait objects
// ============================================================================

#[async_trait]
impl<T: SessionClient + ?Sized> SessionClient for Arc<T> {
    async fn connect(&self) -> Result<(), SessionError> {
        (**self).connect().await
    }

    fn is_connected(&self) -> bool {
        (**self).is_connected()
    }

    async fn send_tool_response(&self, response: ToolResponse) -> Result<(), SessionError> {
        (**self).send_tool_response(response).await
    }

    async fn send_text(&self, text: &str) -> Result<(), SessionError> {
        (**self).send_text(text).await
    }
}

#[async_trait]
impl<T: CameraControl + ?Sized> CameraControl for Arc<T> {
    async fn start(&self) -> Result<(), CameraError> {
        (**self).start().await
    }

    fn stop(&self) {
        (**self).stop();
    }
}
