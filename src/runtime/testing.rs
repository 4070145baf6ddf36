//! Mock implementations for testing
//!
//! These mocks enable runtime tests without a browser or a live session.

use super::error::{CameraError, SessionError};
use super::traits::{CameraControl, SessionClient};
use crate::protocol::ToolResponse;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::Notify;

// ============================================================================
// Mock Session Client
// ============================================================================

/// Session client that records everything sent through it
pub struct MockSessionClient {
    connected: AtomicBool,
    reachable: bool,
    connects: AtomicUsize,
    responses: Mutex<Vec<ToolResponse>>,
    texts: Mutex<Vec<String>>,
    response_sent: Notify,
}

impl MockSessionClient {
    fn with(connected: bool, reachable: bool) -> Self {
        Self {
            connected: AtomicBool::new(connected),
            reachable,
            connects: AtomicUsize::new(0),
            responses: Mutex::new(Vec::new()),
            texts: Mutex::new(Vec::new()),
            response_sent: Notify::new(),
        }
    }

    pub fn connected() -> Self {
        Self::with(true, true)
    }

    pub fn disconnected() -> Self {
        Self::with(false, true)
    }

    /// Every connect attempt fails
    pub fn unreachable() -> Self {
        Self::with(false, false)
    }

    pub fn responses(&self) -> Vec<ToolResponse> {
        self.responses.lock().unwrap().clone()
    }

    pub fn sent_texts(&self) -> Vec<String> {
        self.texts.lock().unwrap().clone()
    }

    pub fn connect_count(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    /// Wait until at least `count` response batches were sent
    pub async fn wait_for_responses(&self, count: usize) -> Vec<ToolResponse> {
        tokio::time::timeout(Duration::from_secs(2), async {
            loop {
                let notified = self.response_sent.notified();
                let responses = self.responses();
                if responses.len() >= count {
                    return responses;
                }
                notified.await;
            }
        })
        .await
        .expect("timed out waiting for tool responses")
    }
}

#[async_trait]
impl SessionClient for MockSessionClient {
    async fn connect(&self) -> Result<(), SessionError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        if self.reachable {
            self.connected.store(true, Ordering::SeqCst);
            Ok(())
        } else {
            Err(SessionError::ConnectFailed("connection refused".to_string()))
        }
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn send_tool_response(&self, response: ToolResponse) -> Result<(), SessionError> {
        self.responses.lock().unwrap().push(response);
        self.response_sent.notify_waiters();
        Ok(())
    }

    async fn send_text(&self, text: &str) -> Result<(), SessionError> {
        if !self.is_connected() {
            return Err(SessionError::NotConnected);
        }
        self.texts.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

// ============================================================================
// Mock Camera
// ============================================================================

/// Camera that grants or refuses access immediately
pub struct MockCamera {
    outcome: Result<(), CameraError>,
    starts: AtomicUsize,
    stops: AtomicUsize,
}

impl MockCamera {
    pub fn granting() -> Self {
        Self {
            outcome: Ok(()),
            starts: AtomicUsize::new(0),
            stops: AtomicUsize::new(0),
        }
    }

    pub fn denying(reason: impl Into<String>) -> Self {
        Self {
            outcome: Err(CameraError::Denied(reason.into())),
            starts: AtomicUsize::new(0),
            stops: AtomicUsize::new(0),
        }
    }

    pub fn start_count(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }

    pub fn stop_count(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CameraControl for MockCamera {
    async fn start(&self) -> Result<(), CameraError> {
        self.starts.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone()
    }

    fn stop(&self) {
        self.stops.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_session_client() {
        let client = MockSessionClient::disconnected();
        assert!(client.send_text("hi").await.is_err());

        client.connect().await.unwrap();
        client.send_text("hi").await.unwrap();
        client
            .send_tool_response(ToolResponse::default())
            .await
            .unwrap();

        assert_eq!(client.sent_texts(), vec!["hi".to_string()]);
        assert_eq!(client.wait_for_responses(1).await.len(), 1);
    }

    #[tokio::test]
    async fn test_mock_camera() {
        let camera = MockCamera::denying("nope");
        assert_eq!(
            camera.start().await,
            Err(CameraError::Denied("nope".to_string()))
        );
        camera.stop();
        assert_eq!(camera.start_count(), 1);
        assert_eq!(camera.stop_count(), 1);
    }
}
