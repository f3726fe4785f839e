use super::core::messages::{ClientMessage, ServerMessage};
use super::host::GameHost;
use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Serve one WebSocket connection: every client message gets exactly one reply
pub async fn run_connection(socket: WebSocket, host: Arc<GameHost>) {
    info!("New game WebSocket connection");
    let (mut sender, receiver) = socket.split();
    let (tx, mut rx) = mpsc::channel::<ServerMessage>(16);

    // Task to forward replies to the WebSocket
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            debug!(?msg, "Sending message to client");
            let json = match serde_json::to_string(&msg) {
                Ok(json) => json,
                Err(err) => {
                    warn!(error = %err, "Failed to serialize server message");
                    continue;
                }
            };
            if sender.send(Message::Text(json)).await.is_err() {
                break;
            }
        }
    });

    let recv_task = tokio::spawn(receive_loop(receiver, tx, host));

    tokio::select! {
        _ = send_task => {},
        _ = recv_task => {},
    }

    info!("Game WebSocket connection closed");
}

async fn receive_loop(
    mut receiver: futures_util::stream::SplitStream<WebSocket>,
    tx: mpsc::Sender<ServerMessage>,
    host: Arc<GameHost>,
) {
    while let Some(Ok(msg)) = receiver.next().await {
        let Message::Text(text) = msg else {
            debug!("Received non-text message, ignoring");
            continue;
        };

        debug!(raw = %text, "Received message");

        let reply = match serde_json::from_str::<ClientMessage>(&text) {
            Ok(client_msg) => host.handle_message(client_msg).await,
            Err(err) => {
                warn!(raw = %text, error = %err, "Failed to parse client message");
                ServerMessage::Error {
                    message: format!("Unrecognized message: {err}"),
                }
            }
        };

        if tx.send(reply).await.is_err() {
            break;
        }
    }
}
