pub mod audio;
pub mod config;
pub mod error;
pub mod gateway;
pub mod http;
pub mod session;
pub mod transport;

pub use audio::AudioQueue;
pub use config::{Config, RecognizerConfig};
pub use error::{GatewayError, SessionError};
pub use gateway::{
    AudioEncoding, RecognitionClient, RecognitionResult, RemoteGateway, RequestStream,
    ResultStream, StreamingConfig, StreamingRequest, TranscriptAlternative, TranscriptionGateway,
};
pub use http::{create_router, AppState};
pub use session::{RecognitionSession, SessionRegistry, SessionStats};
pub use transport::{ClientMessage, ConnectionMap, ServerMessage, Transcript, TranscriptSink};
