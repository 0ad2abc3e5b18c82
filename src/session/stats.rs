use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Point-in-time snapshot of a recognition session, served by the status
/// endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStats {
    /// Whether the session currently intends a recognition stream to be
    /// active (distinct from whether one is running at this instant).
    pub streaming: bool,

    /// Current stream generation; counts up once per restart.
    pub generation: u64,

    /// When the session was created.
    pub started_at: DateTime<Utc>,

    /// Session age in seconds.
    pub duration_secs: f64,

    /// Audio chunks buffered and not yet sent to the recognizer.
    pub queued_chunks: usize,
}
