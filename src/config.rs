use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub recognizer: RecognizerConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

/// Settings for the cloud recognition service. The checked-in defaults
/// target linear 16-bit PCM at 16kHz mono.
#[derive(Debug, Clone, Deserialize)]
pub struct RecognizerConfig {
    /// WebSocket endpoint of the streaming recognizer.
    pub endpoint: String,

    /// Name of the environment variable holding the API key, if the
    /// endpoint requires one.
    #[serde(default)]
    pub api_key_env: Option<String>,

    /// BCP-47 language tag, e.g. "ja-JP".
    pub language_code: String,

    pub sample_rate_hertz: u32,

    pub audio_channel_count: u16,

    /// Recognizer model selection, service-specific.
    #[serde(default)]
    pub model: Option<String>,

    #[serde(default = "default_true")]
    pub enable_automatic_punctuation: bool,

    /// Whether to request interim (non-final) results.
    #[serde(default = "default_true")]
    pub interim_results: bool,
}

#[derive(Debug, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

fn default_true() -> bool {
    true
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(config::Environment::with_prefix("STREAMSCRIBE").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
