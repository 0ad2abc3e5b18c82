use super::{
    RecognitionClient, RecognitionResult, RequestStream, ResultStream, StreamingRequest,
    TranscriptionGateway,
};
use crate::config::RecognizerConfig;
use crate::error::GatewayError;
use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, warn};

/// Gateway that dials the recognition service over WebSocket.
///
/// Each streaming call opens its own connection: the stream configuration
/// goes out as the first JSON text message, audio chunks follow as binary
/// frames, and every inbound text message is parsed as a recognition result.
pub struct RemoteGateway {
    endpoint: String,
    api_key: Option<String>,
}

impl RemoteGateway {
    pub fn from_config(recognizer: &RecognizerConfig) -> Self {
        let api_key = recognizer.api_key_env.as_deref().and_then(|variable| {
            match std::env::var(variable) {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(variable, "recognizer API key variable not set, connecting anonymously");
                    None
                }
            }
        });

        Self {
            endpoint: recognizer.endpoint.clone(),
            api_key,
        }
    }
}

#[async_trait]
impl TranscriptionGateway for RemoteGateway {
    async fn open_client(&self) -> Result<Arc<dyn RecognitionClient>, GatewayError> {
        Ok(Arc::new(RemoteClient {
            endpoint: self.endpoint.clone(),
            api_key: self.api_key.clone(),
        }))
    }
}

struct RemoteClient {
    endpoint: String,
    api_key: Option<String>,
}

#[async_trait]
impl RecognitionClient for RemoteClient {
    async fn streaming_recognize(
        &self,
        mut requests: RequestStream,
    ) -> Result<ResultStream, GatewayError> {
        let handshake = build_handshake(&self.endpoint, self.api_key.as_deref())?;

        let (socket, _) = connect_async(handshake)
            .await
            .map_err(|error| GatewayError::Connect(error.to_string()))?;
        let (mut service_tx, service_rx) = socket.split();

        // Forward the request sequence until the producer ends it (stop,
        // sentinel, or a superseded generation) or the service hangs up.
        tokio::spawn(async move {
            while let Some(request) = requests.next().await {
                let message = match request {
                    StreamingRequest::Config(config) => match serde_json::to_string(&config) {
                        Ok(body) => Message::Text(body),
                        Err(error) => {
                            warn!(%error, "failed to encode stream configuration");
                            break;
                        }
                    },
                    StreamingRequest::Audio(chunk) => Message::Binary(chunk),
                };

                if let Err(error) = service_tx.send(message).await {
                    debug!(%error, "send to recognition service failed");
                    break;
                }
            }

            let _ = service_tx.close().await;
        });

        let results = service_rx.filter_map(|message| async move {
            match message {
                Ok(Message::Text(body)) => match serde_json::from_str::<RecognitionResult>(&body)
                {
                    Ok(result) => Some(Ok(result)),
                    Err(error) => Some(Err(GatewayError::Protocol(error.to_string()))),
                },
                // Pings, pongs and the close frame carry no results; the
                // stream ends once the connection does.
                Ok(_) => None,
                Err(error) => Some(Err(GatewayError::Stream(error.to_string()))),
            }
        });

        Ok(Box::pin(results))
    }
}

fn build_handshake(
    endpoint: &str,
    api_key: Option<&str>,
) -> Result<tokio_tungstenite::tungstenite::handshake::client::Request, GatewayError> {
    let mut request = endpoint
        .into_client_request()
        .map_err(|error| GatewayError::Connect(error.to_string()))?;

    if let Some(key) = api_key {
        let value = HeaderValue::from_str(&format!("Bearer {key}"))
            .map_err(|_| GatewayError::Connect("API key is not a valid header value".into()))?;
        request.headers_mut().insert("Authorization", value);
    }

    Ok(request)
}
