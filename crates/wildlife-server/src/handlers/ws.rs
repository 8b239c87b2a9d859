//! WebSocket push channel
//!
//! Every connected client is registered with the [`ConnectionManager`] and
//! receives new-sighting broadcasts. Delivery is best-effort: a client that
//! is gone or slow to disconnect simply misses the event.

use crate::AppState;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures::{sink::SinkExt, stream::StreamExt};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tracing::{debug, error, info, warn};
use uuid::Uuid;
use wildlife_core::{ClientMessage, ServerMessage};

/// Registry of connected push clients, keyed by connection id
#[derive(Clone, Default)]
pub struct ConnectionManager {
    connections: Arc<RwLock<HashMap<String, mpsc::UnboundedSender<ServerMessage>>>>,
}

impl ConnectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn register(&self, connection_id: &str, tx: mpsc::UnboundedSender<ServerMessage>) {
        let mut conns = self.connections.write().await;
        conns.insert(connection_id.to_string(), tx);
        info!(
            "Client {} connected ({} total)",
            connection_id,
            conns.len()
        );
    }

    pub async fn unregister(&self, connection_id: &str) {
        let mut conns = self.connections.write().await;
        conns.remove(connection_id);
        info!(
            "Client {} disconnected ({} remaining)",
            connection_id,
            conns.len()
        );
    }

    /// Send `msg` to every registered client, returning how many accepted it
    pub async fn broadcast(&self, msg: ServerMessage) -> usize {
        let conns = self.connections.read().await;
        let mut delivered = 0;
        for (connection_id, tx) in conns.iter() {
            if tx.send(msg.clone()).is_err() {
                debug!("Failed to send to client {}", connection_id);
            } else {
                delivered += 1;
            }
        }
        delivered
    }

    pub async fn client_count(&self) -> usize {
        self.connections.read().await.len()
    }
}

pub async fn handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state.conn_manager))
}

async fn handle_socket(socket: WebSocket, conn_manager: Arc<ConnectionManager>) {
    let connection_id = Uuid::new_v4().to_string();
    info!("New WebSocket connection {}", connection_id);

    let (mut sender, mut receiver) = socket.split();

    // Channel for messages to this client
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();

    // Forward messages from the channel to the socket
    let forward_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if let Ok(json) = serde_json::to_string(&msg) {
                if sender.send(Message::Text(json)).await.is_err() {
                    break;
                }
            }
        }
    });

    conn_manager.register(&connection_id, tx.clone()).await;
    let _ = tx.send(ServerMessage::Connected {
        connection_id: connection_id.clone(),
    });

    while let Some(msg) = receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                debug!("Received from {}: {}", connection_id, text);
                match serde_json::from_str::<ClientMessage>(&text) {
                    Ok(ClientMessage::Ping) => {
                        let _ = tx.send(ServerMessage::Pong);
                    }
                    Err(e) => {
                        warn!("Failed to parse message: {}", e);
                        let _ = tx.send(ServerMessage::Error {
                            code: "invalid_message".to_string(),
                            message: format!("Failed to parse message: {}", e),
                        });
                    }
                }
            }
            Ok(Message::Binary(bin)) => {
                debug!("Ignoring binary message: {} bytes", bin.len());
            }
            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {
                // Axum answers protocol pings itself
            }
            Ok(Message::Close(_)) => {
                info!("WebSocket connection {} closed", connection_id);
                break;
            }
            Err(e) => {
                error!("WebSocket error on {}: {}", connection_id, e);
                break;
            }
        }
    }

    conn_manager.unregister(&connection_id).await;
    forward_task.abort();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_broadcast_reaches_registered_clients() {
        let manager = ConnectionManager::new();
        let (tx_a, mut rx_a) = mpsc::unbounded_channel();
        let (tx_b, mut rx_b) = mpsc::unbounded_channel();
        manager.register("a", tx_a).await;
        manager.register("b", tx_b).await;

        assert_eq!(manager.broadcast(ServerMessage::Pong).await, 2);
        assert_eq!(rx_a.recv().await, Some(ServerMessage::Pong));
        assert_eq!(rx_b.recv().await, Some(ServerMessage::Pong));
    }

    #[tokio::test]
    async fn test_closed_client_is_skipped() {
        let manager = ConnectionManager::new();
        let (tx_open, mut rx_open) = mpsc::unbounded_channel();
        let (tx_gone, rx_gone) = mpsc::unbounded_channel();
        manager.register("open", tx_open).await;
        manager.register("gone", tx_gone).await;
        drop(rx_gone);

        assert_eq!(manager.broadcast(ServerMessage::Pong).await, 1);
        assert_eq!(rx_open.recv().await, Some(ServerMessage::Pong));
    }

    #[tokio::test]
    async fn test_unregister() {
        let manager = ConnectionManager::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        manager.register("a", tx).await;
        assert_eq!(manager.client_count().await, 1);

        manager.unregister("a").await;
        assert_eq!(manager.client_count().await, 0);
        assert_eq!(manager.broadcast(ServerMessage::Pong).await, 0);
    }
}
