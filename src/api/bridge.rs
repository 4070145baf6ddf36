//! WebSocket endpoint for the browser bridge
//!
//! Outbound frames from the hub are written to the socket as JSON text.
//! Inbound text frames are parsed, applied to the hub, and any resulting
//! event is forwarded into the session.

use super::handlers::{check_origin, AppError};
use super::AppState;
use crate::runtime::bridge::BridgeInbound;
use axum::{
    extract::{
        ws::{rejection::WebSocketUpgradeRejection, Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use futures::{SinkExt, StreamExt};
use tokio::sync::broadcast::error::RecvError;
use uuid::Uuid;

/// Upgrade to the bridge socket. The origin is checked before the upgrade
/// so untrusted pages are refused even when the handshake is well-formed.
pub async fn bridge_socket(
    State(state): State<AppState>,
    headers: HeaderMap,
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Result<Response, AppError> {
    check_origin(&state, &headers)?;
    let ws = match ws {
        Ok(ws) => ws,
        Err(rejection) => return Ok(rejection.into_response()),
    };
    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state)))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let connection_id = Uuid::new_v4();
    tracing::info!(%connection_id, "Bridge attached");

    let (mut sink, mut stream) = socket.split();
    let mut outbound = state.bridge.attach();

    let forward_outbound = async {
        loop {
            let frame = match outbound.recv().await {
                Ok(frame) => frame,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(%connection_id, skipped, "Bridge fell behind");
                    continue;
                }
                Err(RecvError::Closed) => break,
            };
            let text = match serde_json::to_string(&frame) {
                Ok(text) => text,
                Err(e) => {
                    tracing::error!(%connection_id, error = %e, "Failed to encode bridge frame");
                    continue;
                }
            };
            if sink.send(Message::Text(text)).await.is_err() {
                break;
            }
        }
    };

    let read_inbound = async {
        while let Some(Ok(message)) = stream.next().await {
            match message {
                Message::Text(text) => handle_frame(&state, &text).await,
                Message::Close(_) => break,
                _ => {}
            }
        }
    };

    tokio::select! {
        () = forward_outbound => {}
        () = read_inbound => {}
    }

    drop(outbound);
    state.bridge.detach();
    tracing::info!(%connection_id, "Bridge detached");
}

async fn handle_frame(state: &AppState, text: &str) {
    let frame: BridgeInbound = match serde_json::from_str(text) {
        Ok(frame) => frame,
        Err(e) => {
            tracing::warn!(error = %e, "Malformed bridge frame");
            return;
        }
    };

    if let Some(event) = state.bridge.handle_inbound(frame) {
        if let Err(e) = state.session.send_event(event).await {
            tracing::error!(error = %e, "Failed to forward bridge event");
        }
    }
}
