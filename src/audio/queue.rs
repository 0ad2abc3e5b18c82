use std::collections::VecDeque;
use tokio::sync::{Mutex, Notify};

/// Ordered buffer of raw PCM chunks awaiting transmission to the recognizer.
///
/// `push` never blocks and never drops; `pop` suspends until a chunk is
/// available; `drain` discards everything currently queued. There is no
/// upper bound on queued audio: a stalled recognizer lets the queue grow
/// until the session is stopped. That gap is deliberate and documented, not
/// something callers should paper over.
pub struct AudioQueue {
    chunks: Mutex<VecDeque<Vec<u8>>>,
    available: Notify,
}

impl AudioQueue {
    pub fn new() -> Self {
        Self {
            chunks: Mutex::new(VecDeque::new()),
            available: Notify::new(),
        }
    }

    /// Appends a chunk at the tail and wakes a waiting consumer.
    pub async fn push(&self, chunk: Vec<u8>) {
        self.chunks.lock().await.push_back(chunk);
        self.available.notify_one();
    }

    /// Removes and returns the chunk at the head, suspending until one is
    /// available. Chunks come out in the exact order they were pushed.
    pub async fn pop(&self) -> Vec<u8> {
        loop {
            if let Some(chunk) = self.chunks.lock().await.pop_front() {
                return chunk;
            }
            self.available.notified().await;
        }
    }

    /// Returns a chunk to the head of the queue. Used by a superseded
    /// consumer to hand back a chunk it popped but may no longer forward,
    /// so the successor sees it in its original position.
    pub async fn push_front(&self, chunk: Vec<u8>) {
        self.chunks.lock().await.push_front(chunk);
        self.available.notify_one();
    }

    /// Discards everything currently queued, returning how many chunks were
    /// dropped.
    pub async fn drain(&self) -> usize {
        let mut chunks = self.chunks.lock().await;
        let discarded = chunks.len();
        chunks.clear();
        discarded
    }

    pub async fn len(&self) -> usize {
        self.chunks.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.chunks.lock().await.is_empty()
    }
}

impl Default for AudioQueue {
    fn default() -> Self {
        Self::new()
    }
}
