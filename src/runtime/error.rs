//! Runtime error types

use thiserror::Error;

/// Failure talking to the remote agent session
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Could not connect to Websocket: {0}")]
    ConnectFailed(String),
    #[error("Session not connected")]
    NotConnected,
    #[error("Session runtime stopped")]
    RuntimeStopped,
}

/// Failure opening the camera
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CameraError {
    #[error("Camera permission denied: {0}")]
    Denied(String),
    #[error("Camera unavailable: {0}")]
    Unavailable(String),
    #[error("Timed out waiting for camera")]
    Timeout,
}

/// Failure talking to the browser bridge
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeError {
    #[error("No bridge attached")]
    NotAttached,
}
