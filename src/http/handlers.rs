use super::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// GET /sessions/:client_id/status
/// Snapshot of one recognition session
pub async fn session_status(
    State(state): State<AppState>,
    Path(client_id): Path<String>,
) -> impl IntoResponse {
    match state.registry.lookup(&client_id).await {
        Some(session) => (StatusCode::OK, Json(session.stats().await)).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("session {} not found", client_id),
            }),
        )
            .into_response(),
    }
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
