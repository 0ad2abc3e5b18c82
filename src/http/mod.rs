//! HTTP surface: the WebSocket upgrade route plus a small query API
//!
//! - GET /ws - client audio/transcript channel
//! - GET /sessions/:id/status - query session state
//! - GET /health - health check

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
