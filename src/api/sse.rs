//! Server-Sent Events support

use crate::runtime::UiEvent;
use crate::screen::SessionView;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::Stream;
use serde_json::json;
use std::convert::Infallible;
use std::time::Duration;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

/// Current view first, then every UI notification
pub fn sse_stream(
    init_view: SessionView,
    broadcast_rx: tokio::sync::broadcast::Receiver<UiEvent>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let init = futures::stream::once(async move {
        Ok(Event::default()
            .event("init")
            .data(json!({ "type": "init", "view": init_view }).to_string()))
    });

    let broadcasts = BroadcastStream::new(broadcast_rx).filter_map(|result| match result {
        Ok(event) => Some(Ok(ui_event_to_axum(event))),
        Err(_) => None, // Lagged; the next view supersedes what was missed
    });

    Sse::new(init.chain(broadcasts)).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}

fn ui_event_to_axum(event: UiEvent) -> Event {
    let (event_type, data) = match event {
        UiEvent::View { view } => ("view", json!({ "type": "view", "view": view })),
        UiEvent::ScrollTo { list_id } => (
            "scroll_to",
            json!({ "type": "scroll_to", "list_id": list_id }),
        ),
        UiEvent::Error { message } => ("error", json!({ "type": "error", "message": message })),
    };

    Event::default().event(event_type).data(data.to_string())
}
