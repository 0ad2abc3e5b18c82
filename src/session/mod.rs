//! Streaming-session lifecycle management
//!
//! This module provides the per-client `RecognitionSession` state machine:
//! - Audio buffering between the transport and the recognizer
//! - The config-then-chunks request sequence for each stream generation
//! - Restart-on-final and cleanup-on-stop/fault choreography
//! - The `SessionRegistry` mapping client ids to live sessions

mod registry;
mod session;
mod stats;

pub use registry::SessionRegistry;
pub use session::RecognitionSession;
pub use stats::SessionStats;
