use super::handlers;
use super::state::AppState;
use crate::config::CorsConfig;
use crate::transport;
use anyhow::{Context, Result};
use axum::http::HeaderValue;
use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState, cors: &CorsConfig) -> Result<Router> {
    Ok(Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Client audio/transcript channel
        .route("/ws", get(transport::ws_handler))
        // Session queries
        .route("/sessions/:client_id/status", get(handlers::session_status))
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .layer(build_cors(cors)?)
        .with_state(state))
}

fn build_cors(cors: &CorsConfig) -> Result<CorsLayer> {
    let origins = cors
        .allowed_origins
        .iter()
        .map(|origin| origin.parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()
        .context("invalid CORS origin")?;

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any))
}
