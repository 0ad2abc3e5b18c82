//! Boundary to the cloud speech-recognition service.
//!
//! The core never sees the service's wire protocol. It drives a
//! [`RecognitionClient`] with a lazy request sequence (one config request,
//! then audio chunks) and consumes the lazy result sequence the call
//! returns. `RemoteGateway` is the production implementation; tests swap in
//! scripted ones.

mod remote;
mod types;

pub use remote::RemoteGateway;
pub use types::{
    AudioEncoding, RecognitionResult, StreamingConfig, StreamingRequest, TranscriptAlternative,
};

use crate::error::GatewayError;
use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;
use std::sync::Arc;

pub type RequestStream = Pin<Box<dyn Stream<Item = StreamingRequest> + Send>>;
pub type ResultStream = Pin<Box<dyn Stream<Item = Result<RecognitionResult, GatewayError>> + Send>>;

/// Factory for recognition-service client handles. A session holds one
/// handle at a time and releases it during cleanup, so every generation
/// after a cleanup reinitializes its own.
#[async_trait]
pub trait TranscriptionGateway: Send + Sync {
    async fn open_client(&self) -> Result<Arc<dyn RecognitionClient>, GatewayError>;
}

/// One recognition-service client handle.
#[async_trait]
pub trait RecognitionClient: Send + Sync {
    /// Runs one streaming-recognition call: consumes `requests` (config
    /// first, then audio) and yields interim and final results as the
    /// service produces them. The call may fail at any point; failures are
    /// scoped to the stream that raised them.
    async fn streaming_recognize(&self, requests: RequestStream)
        -> Result<ResultStream, GatewayError>;
}
