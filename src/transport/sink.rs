use super::messages::ServerMessage;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::{mpsc, RwLock};
use tracing::debug;

/// A recognized segment on its way back to the client that produced the
/// audio.
#[derive(Debug, Clone, PartialEq)]
pub struct Transcript {
    pub text: String,
    pub is_final: bool,
}

/// Outbound edge of the transport. Delivery is best-effort: a transcript for
/// a client that is gone is dropped, never an error.
#[async_trait]
pub trait TranscriptSink: Send + Sync {
    async fn deliver(&self, client_id: &str, transcript: Transcript);
}

/// Connected clients keyed by id; each entry is the sender half feeding that
/// client's WebSocket write loop.
pub struct ConnectionMap {
    connections: RwLock<HashMap<String, mpsc::UnboundedSender<ServerMessage>>>,
}

impl ConnectionMap {
    pub fn new() -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
        }
    }

    pub async fn register(&self, client_id: String, sender: mpsc::UnboundedSender<ServerMessage>) {
        self.connections.write().await.insert(client_id, sender);
    }

    pub async fn unregister(&self, client_id: &str) {
        self.connections.write().await.remove(client_id);
    }

    pub async fn active_connections(&self) -> usize {
        self.connections.read().await.len()
    }
}

impl Default for ConnectionMap {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TranscriptSink for ConnectionMap {
    async fn deliver(&self, client_id: &str, transcript: Transcript) {
        let connections = self.connections.read().await;
        match connections.get(client_id) {
            Some(sender) => {
                let message = ServerMessage::Transcript {
                    text: transcript.text,
                    is_final: transcript.is_final,
                };
                if sender.send(message).is_err() {
                    debug!(client_id, "client write loop gone, dropping transcript");
                }
            }
            None => {
                debug!(client_id, "no connection for transcript, dropping");
            }
        }
    }
}
