use super::session::RecognitionSession;
use crate::config::RecognizerConfig;
use crate::gateway::TranscriptionGateway;
use crate::transport::TranscriptSink;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// Concurrency-safe map from client id to its recognition session.
///
/// Sessions are created lazily on the first `start` for an id and removed on
/// disconnect. Events for ids with no session are the caller's problem to
/// ignore; `lookup` just says "absent".
pub struct SessionRegistry {
    sessions: RwLock<HashMap<String, Arc<RecognitionSession>>>,
    gateway: Arc<dyn TranscriptionGateway>,
    sink: Arc<dyn TranscriptSink>,
    recognizer: RecognizerConfig,
}

impl SessionRegistry {
    pub fn new(
        gateway: Arc<dyn TranscriptionGateway>,
        sink: Arc<dyn TranscriptSink>,
        recognizer: RecognizerConfig,
    ) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            gateway,
            sink,
            recognizer,
        }
    }

    /// Returns the session for `client_id`, creating one if none exists.
    pub async fn get_or_create(&self, client_id: &str) -> Arc<RecognitionSession> {
        {
            let sessions = self.sessions.read().await;
            if let Some(session) = sessions.get(client_id) {
                return Arc::clone(session);
            }
        }

        let mut sessions = self.sessions.write().await;
        let session = sessions.entry(client_id.to_string()).or_insert_with(|| {
            info!(client_id, "creating recognition session");
            Arc::new(RecognitionSession::new(
                client_id.to_string(),
                self.recognizer.clone(),
                Arc::clone(&self.gateway),
                Arc::clone(&self.sink),
            ))
        });

        Arc::clone(session)
    }

    pub async fn lookup(&self, client_id: &str) -> Option<Arc<RecognitionSession>> {
        self.sessions.read().await.get(client_id).map(Arc::clone)
    }

    /// Detaches the session for `client_id`. The caller must already have
    /// stopped it; nothing may reference a session after removal.
    pub async fn remove(&self, client_id: &str) -> Option<Arc<RecognitionSession>> {
        let removed = self.sessions.write().await.remove(client_id);
        if removed.is_some() {
            info!(client_id, "recognition session removed");
        }
        removed
    }

    pub async fn active_sessions(&self) -> usize {
        self.sessions.read().await.len()
    }
}
