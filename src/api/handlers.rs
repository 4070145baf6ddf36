//! HTTP request handlers

use super::bridge::bridge_socket;
use super::sse::sse_stream;
use super::types::{EditRequest, ErrorResponse, SendRequest, SetupResponse, SuccessResponse};
use super::AppState;
use crate::runtime::SessionError;
use crate::screen::{ChecklistView, SessionView, START_LIST_PREFIX};
use crate::state_machine::Event;
use axum::{
    extract::{Path, State},
    http::{header::ORIGIN, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Session view
        .route("/api/session", get(get_session))
        .route("/api/session/stream", get(stream_session))
        // Bridge bootstrap
        .route("/api/session/setup", get(get_setup))
        // Utterances
        .route("/api/session/send", post(send_text))
        // List interactions
        .route("/api/lists/reset", post(start_over))
        .route("/api/lists/:id", put(edit_list))
        .route("/api/lists/:id/steps/:index/toggle", post(toggle_step))
        // Browser bridge
        .route("/api/bridge", get(bridge_socket))
        // Version
        .route("/version", get(get_version))
        .with_state(state)
}

// ============================================================
// Session
// ============================================================

async fn get_session(State(state): State<AppState>) -> Json<SessionView> {
    Json(state.session.view())
}

async fn stream_session(State(state): State<AppState>) -> impl IntoResponse {
    // Subscribe before reading the view so nothing falls between them
    let broadcast_rx = state.session.subscribe();
    sse_stream(state.session.view(), broadcast_rx)
}

async fn get_setup(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<SetupResponse>, AppError> {
    // The endpoint embeds the API key
    check_origin(&state, &headers)?;
    Ok(Json(SetupResponse {
        endpoint: state.bridge.endpoint().to_string(),
        setup: state.bridge.setup().clone(),
    }))
}

pub(super) fn check_origin(state: &AppState, headers: &HeaderMap) -> Result<(), AppError> {
    let origin = headers.get(ORIGIN);
    if state.origins.permits(origin) {
        Ok(())
    } else {
        tracing::warn!(origin = ?origin, "Rejected request from untrusted origin");
        Err(AppError::Forbidden("Origin not allowed".to_string()))
    }
}

async fn send_text(
    State(state): State<AppState>,
    Json(req): Json<SendRequest>,
) -> Result<Json<SuccessResponse>, AppError> {
    let text = req.text.trim();
    if text.is_empty() {
        return Err(AppError::BadRequest("Message text is empty".to_string()));
    }

    let text = if req.start_list {
        format!("{START_LIST_PREFIX}{text}")
    } else {
        text.to_string()
    };

    state.session.connect_and_send(&text).await?;
    Ok(Json(SuccessResponse { success: true }))
}

// ============================================================
// Lists
// ============================================================

async fn start_over(State(state): State<AppState>) -> Result<Json<SuccessResponse>, AppError> {
    state.session.send_event(Event::StartOver).await?;
    Ok(Json(SuccessResponse { success: true }))
}

async fn edit_list(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<EditRequest>,
) -> Result<Json<SuccessResponse>, AppError> {
    let list = find_list(&state, &id)?;
    state.session.send_event(list.edit(req.steps)).await?;
    Ok(Json(SuccessResponse { success: true }))
}

async fn toggle_step(
    State(state): State<AppState>,
    Path((id, index)): Path<(String, usize)>,
) -> Result<Json<SuccessResponse>, AppError> {
    let list = find_list(&state, &id)?;
    if index >= list.steps.len() {
        return Err(AppError::NotFound(format!("Step {index} not found in {id}")));
    }
    state.session.send_event(list.toggle(index)).await?;
    Ok(Json(SuccessResponse { success: true }))
}

fn find_list(state: &AppState, id: &str) -> Result<ChecklistView, AppError> {
    state
        .session
        .view()
        .lists
        .into_iter()
        .find(|list| list.id == id)
        .ok_or_else(|| AppError::NotFound(format!("List not found: {id}")))
}

async fn get_version() -> &'static str {
    concat!("live-checklist ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
pub(super) enum AppError {
    BadRequest(String),
    Forbidden(String),
    NotFound(String),
    BadGateway(String),
    Internal(String),
}

impl From<SessionError> for AppError {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::ConnectFailed(_) | SessionError::NotConnected => {
                AppError::BadGateway(e.to_string())
            }
            SessionError::RuntimeStopped => AppError::Internal(e.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
