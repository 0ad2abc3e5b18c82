use super::messages::ClientMessage;
use crate::http::AppState;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use base64::Engine;
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// GET /ws
/// Upgrades the connection and runs the per-client event loop.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_connection(socket, state))
}

async fn handle_connection(socket: WebSocket, state: AppState) {
    let client_id = format!("client-{}", uuid::Uuid::new_v4());
    info!(client_id = %client_id, "client connected");

    let (sender, mut outbound) = mpsc::unbounded_channel();
    state.connections.register(client_id.clone(), sender).await;

    let (mut socket_tx, mut socket_rx) = socket.split();

    // Write loop: transcripts queued by the sink go out as JSON text frames.
    let write_task = tokio::spawn(async move {
        while let Some(message) = outbound.recv().await {
            let body = match serde_json::to_string(&message) {
                Ok(body) => body,
                Err(error) => {
                    warn!(%error, "failed to encode server message");
                    continue;
                }
            };
            if socket_tx.send(Message::Text(body)).await.is_err() {
                break;
            }
        }
    });

    while let Some(message) = socket_rx.next().await {
        let message = match message {
            Ok(message) => message,
            Err(error) => {
                debug!(client_id = %client_id, %error, "websocket receive failed");
                break;
            }
        };

        match message {
            Message::Text(body) => handle_client_message(&state, &client_id, &body).await,
            Message::Binary(chunk) => push_audio(&state, &client_id, chunk).await,
            Message::Close(_) => break,
            Message::Ping(_) | Message::Pong(_) => {}
        }
    }

    // Implicit stop-and-remove. After this, no background task may reference
    // the session.
    if let Some(session) = state.registry.lookup(&client_id).await {
        session.stop().await;
    }
    state.registry.remove(&client_id).await;
    state.connections.unregister(&client_id).await;
    write_task.abort();

    info!(client_id = %client_id, "client disconnected");
}

async fn handle_client_message(state: &AppState, client_id: &str, body: &str) {
    let message = match serde_json::from_str::<ClientMessage>(body) {
        Ok(message) => message,
        Err(error) => {
            debug!(client_id, %error, "ignoring malformed client message");
            return;
        }
    };

    match message {
        ClientMessage::Start => {
            let session = state.registry.get_or_create(client_id).await;
            if let Err(error) = session.start().await {
                warn!(client_id, %error, "failed to start recognition stream");
            }
        }
        ClientMessage::Stop => match state.registry.lookup(client_id).await {
            Some(session) => session.stop().await,
            None => debug!(client_id, "stop for unknown session ignored"),
        },
        ClientMessage::Audio { audio } => {
            match base64::engine::general_purpose::STANDARD.decode(audio.as_bytes()) {
                Ok(chunk) => push_audio(state, client_id, chunk).await,
                Err(error) => debug!(client_id, %error, "ignoring undecodable audio payload"),
            }
        }
    }
}

async fn push_audio(state: &AppState, client_id: &str, chunk: Vec<u8>) {
    // Zero-length chunks are reserved as the internal stop sentinel.
    if chunk.is_empty() {
        return;
    }

    match state.registry.lookup(client_id).await {
        Some(session) => session.push_audio(chunk).await,
        None => debug!(client_id, "audio for unknown session dropped"),
    }
}
