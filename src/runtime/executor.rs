//! Session runtime executor

use super::emitter::PendingResponse;
use super::traits::{CameraControl, SessionClient};
use super::UiEvent;
use crate::screen::SessionView;
use crate::state_machine::{transition, Effect, Event, SessionContext, SessionState};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, watch};
use tokio_util::sync::CancellationToken;

/// Owns the session state and applies events one at a time
pub struct SessionRuntime<C, K>
where
    C: SessionClient + 'static,
    K: CameraControl + 'static,
{
    context: SessionContext,
    state: SessionState,
    client: Arc<C>,
    camera: Arc<K>,
    event_rx: mpsc::Receiver<Event>,
    /// Handed to detached camera tasks so their outcome re-enters the loop
    event_tx: mpsc::Sender<Event>,
    ui_tx: broadcast::Sender<UiEvent>,
    view_tx: watch::Sender<SessionView>,
    pending: PendingResponse,
    shutdown: CancellationToken,
}

impl<C, K> SessionRuntime<C, K>
where
    C: SessionClient + 'static,
    K: CameraControl + 'static,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        context: SessionContext,
        state: SessionState,
        client: Arc<C>,
        camera: Arc<K>,
        event_rx: mpsc::Receiver<Event>,
        event_tx: mpsc::Sender<Event>,
        ui_tx: broadcast::Sender<UiEvent>,
        view_tx: watch::Sender<SessionView>,
    ) -> Self {
        Self {
            context,
            state,
            client,
            camera,
            event_rx,
            event_tx,
            ui_tx,
            view_tx,
            pending: PendingResponse::new(),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_shutdown(mut self, shutdown: CancellationToken) -> Self {
        self.shutdown = shutdown;
        self
    }

    pub async fn run(mut self) {
        tracing::info!(session_id = %self.context.session_id, "Starting session runtime");

        loop {
            tokio::select! {
                () = self.shutdown.cancelled() => break,
                Some(event) = self.event_rx.recv() => self.process_event(event).await,
                else => break,
            }
        }

        tracing::info!(session_id = %self.context.session_id, "Session runtime stopped");
    }

    async fn process_event(&mut self, event: Event) {
        tracing::debug!(session_id = %self.context.session_id, event = ?event, "Processing event");

        let result = transition(&self.state, &self.context, event);
        let changed = result.new_state != self.state;
        self.state = result.new_state;

        // Commit before any effect runs so the emitter sees every mutation
        if changed {
            self.publish_view();
        }

        for effect in result.effects {
            self.execute_effect(effect);
        }

        self.flush_response().await;
    }

    fn execute_effect(&mut self, effect: Effect) {
        match effect {
            Effect::StartCamera => self.spawn_camera_start(),
            Effect::StopCamera => self.camera.stop(),
            Effect::ScrollIntoView { list_id } => {
                let _ = self.ui_tx.send(UiEvent::ScrollTo { list_id });
            }
            Effect::RespondToToolCall(batch) => {
                if self.pending.stage(batch).is_some() {
                    tracing::warn!(session_id = %self.context.session_id, "Replaced an undelivered tool response");
                }
            }
        }
    }

    /// Start the camera without holding up the response cycle
    fn spawn_camera_start(&self) {
        let camera = Arc::clone(&self.camera);
        let event_tx = self.event_tx.clone();
        let session_id = self.context.session_id.clone();

        tokio::spawn(async move {
            let event = match camera.start().await {
                Ok(()) => {
                    tracing::info!(session_id = %session_id, "Camera started");
                    Event::CameraStarted
                }
                Err(e) => {
                    tracing::warn!(session_id = %session_id, error = %e, "Camera unavailable");
                    Event::CameraUnavailable {
                        reason: e.to_string(),
                    }
                }
            };
            let _ = event_tx.send(event).await;
        });
    }

    async fn flush_response(&mut self) {
        let Some(response) = self.pending.take_finalized(&self.state.store) else {
            return;
        };

        let count = response.function_responses.len();
        match self.client.send_tool_response(response).await {
            Ok(()) => {
                tracing::debug!(session_id = %self.context.session_id, count, "Tool response sent");
            }
            Err(e) => {
                tracing::error!(session_id = %self.context.session_id, error = %e, "Failed to send tool response");
                let _ = self.ui_tx.send(UiEvent::Error {
                    message: e.to_string(),
                });
            }
        }
    }

    fn publish_view(&self) {
        let view = SessionView::from_state(&self.state);
        self.view_tx.send_replace(view.clone());
        let _ = self.ui_tx.send(UiEvent::View { view });
    }
}
