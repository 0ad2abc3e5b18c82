//! WebSocket transport between browsers and the session core
//!
//! Inbound: client events (`start`, `stop`, audio chunks) drive the
//! registry. Outbound: transcripts reach the originating client through the
//! `TranscriptSink`, backed by the connection map.

mod messages;
mod sink;
mod ws;

pub use messages::{ClientMessage, ServerMessage};
pub use sink::{ConnectionMap, Transcript, TranscriptSink};
pub use ws::ws_handler;
