//! Runtime for a live checklist session
//!
//! One task owns the session state. Everything else talks to it through a
//! `SessionHandle`: events go in over an mpsc channel, views come out over a
//! `watch` (latest state) and a broadcast (UI notifications).

pub mod bridge;
mod emitter;
pub mod error;
mod executor;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use bridge::{BridgeCamera, BridgeHub, BridgeSession};
pub use error::{BridgeError, CameraError, SessionError};
pub use executor::SessionRuntime;
pub use traits::*;

use crate::screen::SessionView;
use crate::state_machine::{Event, SessionContext, SessionState};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, watch};
use tokio_util::sync::CancellationToken;

/// Notifications for connected front-ends
#[derive(Debug, Clone)]
pub enum UiEvent {
    /// The session state changed
    View { view: SessionView },
    /// A freshly created checklist should be scrolled into view
    ScrollTo { list_id: String },
    Error { message: String },
}

/// Handle to interact with a running session
pub struct SessionHandle {
    event_tx: mpsc::Sender<Event>,
    ui_tx: broadcast::Sender<UiEvent>,
    view_rx: watch::Receiver<SessionView>,
    client: Arc<dyn SessionClient>,
    shutdown: CancellationToken,
}

impl SessionHandle {
    /// Start a session runtime in the background
    pub fn spawn<C, K>(context: SessionContext, client: C, camera: K) -> Self
    where
        C: SessionClient + 'static,
        K: CameraControl + 'static,
    {
        let (event_tx, event_rx) = mpsc::channel(32);
        let (ui_tx, _) = broadcast::channel(128);
        let (view_tx, view_rx) = watch::channel(SessionView::default());
        let shutdown = CancellationToken::new();
        let client = Arc::new(client);

        let runtime = SessionRuntime::new(
            context,
            SessionState::new(),
            Arc::clone(&client),
            Arc::new(camera),
            event_rx,
            event_tx.clone(),
            ui_tx.clone(),
            view_tx,
        )
        .with_shutdown(shutdown.clone());

        tokio::spawn(runtime.run());

        Self {
            event_tx,
            ui_tx,
            view_rx,
            client,
            shutdown,
        }
    }

    /// Send an event to the session
    pub async fn send_event(&self, event: Event) -> Result<(), SessionError> {
        self.event_tx
            .send(event)
            .await
            .map_err(|_| SessionError::RuntimeStopped)
    }

    /// Subscribe to UI notifications
    pub fn subscribe(&self) -> broadcast::Receiver<UiEvent> {
        self.ui_tx.subscribe()
    }

    /// Latest committed view
    pub fn view(&self) -> SessionView {
        self.view_rx.borrow().clone()
    }

    /// Send a user utterance, connecting first if needed.
    ///
    /// A failed connect clears the awaiting flag and is returned to the
    /// caller so it can offer a retry.
    pub async fn connect_and_send(&self, text: &str) -> Result<(), SessionError> {
        self.send_event(Event::UtteranceSent).await?;

        let sent = self.connect_then_send(text).await;
        if let Err(e) = &sent {
            tracing::warn!(error = %e, "Could not deliver utterance");
            self.send_event(Event::ConnectionFailed).await?;
        }
        sent
    }

    async fn connect_then_send(&self, text: &str) -> Result<(), SessionError> {
        if !self.client.is_connected() {
            self.client.connect().await.map_err(|e| match e {
                SessionError::ConnectFailed(_) => e,
                other => SessionError::ConnectFailed(other.to_string()),
            })?;
        }
        self.client.send_text(text).await
    }

    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}
