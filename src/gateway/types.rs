use serde::{Deserialize, Serialize};

/// Audio encodings the recognizer accepts. Only linear 16-bit PCM today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AudioEncoding {
    Linear16,
}

/// Stream configuration carried by the first request of every recognition
/// stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamingConfig {
    pub encoding: AudioEncoding,
    pub sample_rate_hertz: u32,
    pub audio_channel_count: u16,
    pub language_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub enable_automatic_punctuation: bool,
    pub interim_results: bool,
}

/// One element of the outbound request sequence. A stream opens with exactly
/// one `Config` request; every later element carries raw PCM. A zero-length
/// `Audio` payload marks the end of the utterance stream.
#[derive(Debug, Clone)]
pub enum StreamingRequest {
    Config(StreamingConfig),
    Audio(Vec<u8>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptAlternative {
    pub transcript: String,
    #[serde(default)]
    pub confidence: Option<f32>,
}

/// A single recognition result: zero or more alternatives plus the flag
/// marking the end of the current utterance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognitionResult {
    #[serde(default)]
    pub alternatives: Vec<TranscriptAlternative>,
    #[serde(default)]
    pub is_final: bool,
}
