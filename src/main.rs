//! Live Checklist - voice-driven troubleshooting checklists
//!
//! A Rust backend that turns tool calls from a realtime agent into an
//! ordered set of checklists, and serves them to a thin browser front-end.

mod api;
mod checklist;
mod config;
mod protocol;
mod runtime;
mod screen;
mod state_machine;
mod system_prompt;
mod tools;

use api::{create_router, AppState, OriginPolicy};
use config::AppConfig;
use runtime::{BridgeCamera, BridgeHub, BridgeSession, SessionHandle};
use state_machine::SessionContext;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "live_checklist=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Configuration
    let config = AppConfig::from_env()?;
    tracing::info!(
        model = %config.model,
        voice = %config.voice,
        duplicate_policy = ?config.duplicate_policy,
        "Configuration loaded"
    );

    // The browser bridge carries the live connection and the camera
    let bridge = Arc::new(BridgeHub::new(config.live_endpoint(), config.session_setup()));

    let session_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(%session_id, "Starting session runtime");
    let session = SessionHandle::spawn(
        SessionContext::new(session_id, config.duplicate_policy),
        BridgeSession::new(Arc::clone(&bridge)),
        BridgeCamera::new(Arc::clone(&bridge)),
    );

    let origins = OriginPolicy::new(config.allowed_origins.clone());
    tracing::info!(allowed_origins = ?config.allowed_origins, "Origin allow-list");
    let cors_origins = origins.header_values();

    let state = AppState::new(session, bridge, origins);
    let session = Arc::clone(&state.session);

    // Create router
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(cors_origins))
        .allow_methods(Any)
        .allow_headers(Any);

    let compression = CompressionLayer::new()
        .gzip(true)
        .br(true)
        .deflate(true)
        .zstd(true);

    let app = create_router(state)
        .layer(cors)
        .layer(compression)
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Live checklist server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    session.shutdown();
    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
