use crate::session::SessionRegistry;
use crate::transport::ConnectionMap;
use std::sync::Arc;

/// Shared application state for HTTP and WebSocket handlers
#[derive(Clone)]
pub struct AppState {
    /// Active recognition sessions (client_id → session)
    pub registry: Arc<SessionRegistry>,

    /// Connected clients, for outbound transcript delivery
    pub connections: Arc<ConnectionMap>,
}
