//! Per-session audio buffering between the transport and the recognizer.

pub mod queue;

pub use queue::AudioQueue;
