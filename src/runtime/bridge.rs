//! Browser bridge adapters
//!
//! The browser holds the realtime connection to the agent and the camera.
//! It attaches over a WebSocket and relays frames both ways. `BridgeHub`
//! tracks that attachment; `BridgeSession` and `BridgeCamera` implement the
//! runtime traits on top of it.

use super::error::{BridgeError, CameraError, SessionError};
use super::traits::{CameraControl, SessionClient};
use crate::config::SessionSetup;
use crate::protocol::{ClientMessage, ServerMessage, ToolResponse};
use crate::state_machine::Event;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::{broadcast, oneshot, watch};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
/// Long enough for a user to answer a permission prompt
const CAMERA_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraAction {
    Start,
    Stop,
}

/// Frames sent to the browser
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BridgeOutbound {
    /// Open the live session with this setup
    Connect { url: String, setup: SessionSetup },
    /// Forward to the agent verbatim
    ClientMessage { message: ClientMessage },
    Camera { action: CameraAction },
}

/// Frames received from the browser
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BridgeInbound {
    /// A message the agent sent, relayed verbatim
    ServerMessage { message: Value },
    CameraStatus {
        ok: bool,
        #[serde(default)]
        denied: bool,
        #[serde(default)]
        reason: Option<String>,
    },
    Connection { connected: bool },
}

type CameraWaiter = oneshot::Sender<Result<(), CameraError>>;

/// Shared state of the browser attachment
pub struct BridgeHub {
    outbound: broadcast::Sender<BridgeOutbound>,
    connected: watch::Sender<bool>,
    /// Every start still waiting; one camera status resolves them all
    camera_waiters: Mutex<Vec<CameraWaiter>>,
    url: String,
    setup: SessionSetup,
    connect_timeout: Duration,
    camera_timeout: Duration,
}

impl BridgeHub {
    pub fn new(url: String, setup: SessionSetup) -> Self {
        let (outbound, _) = broadcast::channel(64);
        let (connected, _) = watch::channel(false);
        Self {
            outbound,
            connected,
            camera_waiters: Mutex::new(Vec::new()),
            url,
            setup,
            connect_timeout: CONNECT_TIMEOUT,
            camera_timeout: CAMERA_TIMEOUT,
        }
    }

    #[cfg(test)]
    pub fn with_timeouts(mut self, connect: Duration, camera: Duration) -> Self {
        self.connect_timeout = connect;
        self.camera_timeout = camera;
        self
    }

    pub fn setup(&self) -> &SessionSetup {
        &self.setup
    }

    /// Live API URL the browser opens
    pub fn endpoint(&self) -> &str {
        &self.url
    }

    /// Receive outbound frames; one receiver per attached socket
    pub fn attach(&self) -> broadcast::Receiver<BridgeOutbound> {
        self.outbound.subscribe()
    }

    pub fn is_attached(&self) -> bool {
        self.outbound.receiver_count() > 0
    }

    /// Called after a socket's receiver is dropped
    pub fn detach(&self) {
        if self.is_attached() {
            return;
        }
        self.connected.send_replace(false);
        self.resolve_camera_waiters(&Err(CameraError::Unavailable(
            "bridge detached".to_string(),
        )));
    }

    pub fn is_connected(&self) -> bool {
        *self.connected.borrow()
    }

    fn send(&self, frame: BridgeOutbound) -> Result<(), BridgeError> {
        self.outbound
            .send(frame)
            .map(|_| ())
            .map_err(|_| BridgeError::NotAttached)
    }

    fn add_camera_waiter(&self, waiter: CameraWaiter) {
        self.camera_waiters
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(waiter);
    }

    /// Hand `outcome` to every pending start. Returns how many were waiting.
    fn resolve_camera_waiters(&self, outcome: &Result<(), CameraError>) -> usize {
        let waiters = std::mem::take(
            &mut *self
                .camera_waiters
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        );
        let count = waiters.len();
        for waiter in waiters {
            let _ = waiter.send(outcome.clone());
        }
        count
    }

    /// Apply a frame from the browser. Returns the event to forward into the
    /// session, if any.
    pub fn handle_inbound(&self, frame: BridgeInbound) -> Option<Event> {
        match frame {
            BridgeInbound::ServerMessage { message } => self.handle_server_message(message),
            BridgeInbound::CameraStatus { ok, denied, reason } => {
                let outcome = if ok {
                    Ok(())
                } else {
                    let reason = reason.unwrap_or_else(|| "no reason given".to_string());
                    if denied {
                        Err(CameraError::Denied(reason))
                    } else {
                        Err(CameraError::Unavailable(reason))
                    }
                };
                if self.resolve_camera_waiters(&outcome) == 0 {
                    tracing::debug!("Camera status with no pending request");
                }
                None
            }
            BridgeInbound::Connection { connected } => {
                tracing::info!(connected, "Bridge connection state");
                self.connected.send_replace(connected);
                None
            }
        }
    }

    fn handle_server_message(&self, message: Value) -> Option<Event> {
        let message = match serde_json::from_value::<ServerMessage>(message) {
            Ok(m) => m,
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring unrecognized server message");
                return None;
            }
        };

        match message {
            ServerMessage::SetupComplete(_) => {
                tracing::info!("Live session setup complete");
                self.connected.send_replace(true);
                None
            }
            ServerMessage::ToolCall(call) => {
                tracing::info!(calls = call.function_calls.len(), "Tool call received");
                Some(Event::ToolCall(call))
            }
            ServerMessage::ToolCallCancellation(cancel) => {
                tracing::info!(ids = ?cancel.ids, "Tool call cancellation received");
                Some(Event::ToolCallCancellation { ids: cancel.ids })
            }
            ServerMessage::ServerContent(_) => None,
        }
    }
}

/// Session client that relays through the bridge
#[derive(Clone)]
pub struct BridgeSession {
    hub: Arc<BridgeHub>,
}

impl BridgeSession {
    pub fn new(hub: Arc<BridgeHub>) -> Self {
        Self { hub }
    }

    fn send_message(&self, message: ClientMessage) -> Result<(), SessionError> {
        self.hub
            .send(BridgeOutbound::ClientMessage { message })
            .map_err(|_| SessionError::NotConnected)
    }
}

#[async_trait]
impl SessionClient for BridgeSession {
    async fn connect(&self) -> Result<(), SessionError> {
        let mut connected = self.hub.connected.subscribe();

        self.hub
            .send(BridgeOutbound::Connect {
                url: self.hub.url.clone(),
                setup: self.hub.setup.clone(),
            })
            .map_err(|e| SessionError::ConnectFailed(e.to_string()))?;

        let setup_complete = async {
            loop {
                if *connected.borrow_and_update() {
                    return Ok::<(), watch::error::RecvError>(());
                }
                connected.changed().await?;
            }
        };

        match tokio::time::timeout(self.hub.connect_timeout, setup_complete).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(_)) => Err(SessionError::ConnectFailed("bridge closed".to_string())),
            Err(_) => Err(SessionError::ConnectFailed(
                "timed out waiting for setup".to_string(),
            )),
        }
    }

    fn is_connected(&self) -> bool {
        self.hub.is_connected()
    }

    async fn send_tool_response(&self, response: ToolResponse) -> Result<(), SessionError> {
        self.send_message(ClientMessage::ToolResponse(response))
    }

    async fn send_text(&self, text: &str) -> Result<(), SessionError> {
        self.send_message(ClientMessage::user_text(text))
    }
}

/// Camera owned by the browser
#[derive(Clone)]
pub struct BridgeCamera {
    hub: Arc<BridgeHub>,
}

impl BridgeCamera {
    pub fn new(hub: Arc<BridgeHub>) -> Self {
        Self { hub }
    }
}

#[async_trait]
impl CameraControl for BridgeCamera {
    async fn start(&self) -> Result<(), CameraError> {
        let (tx, rx) = oneshot::channel();
        self.hub.add_camera_waiter(tx);

        self.hub
            .send(BridgeOutbound::Camera {
                action: CameraAction::Start,
            })
            .map_err(|e| CameraError::Unavailable(e.to_string()))?;

        match tokio::time::timeout(self.hub.camera_timeout, rx).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(_)) => Err(CameraError::Unavailable("bridge dropped the request".to_string())),
            Err(_) => Err(CameraError::Timeout),
        }
    }

    fn stop(&self) {
        if self
            .hub
            .send(BridgeOutbound::Camera {
                action: CameraAction::Stop,
            })
            .is_err()
        {
            tracing::debug!("Camera stop with no bridge attached");
        }
    }
}
