use serde::{Deserialize, Serialize};

/// Messages a client sends over its WebSocket. Audio may arrive either as a
/// raw binary frame or as a base64 payload inside an `audio` message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    Start,
    Stop,
    Audio {
        /// Base64-encoded PCM bytes
        audio: String,
    },
}

/// Messages the server sends back, addressed to one client only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    Transcript {
        text: String,
        #[serde(rename = "isFinal")]
        is_final: bool,
    },
}
