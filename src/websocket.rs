//! WebSocket handlers for real-time updates
//!
//! Streams [`UiEvent`]s (toasts, navigation, ticket updates, selection) to
//! connected UI clients. Supports ping/pong for connection keepalive.

use crate::notify::UiEvent;
use crate::state::SharedState;
use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use chrono::Local;
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast::error::RecvError;
use tracing::{error, info, warn};

/// Messages a client may send
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(tag = "type")]
pub enum ClientMessage {
    /// Ping message for connection keepalive
    #[serde(rename = "ping")]
    Ping,
    /// Pong message responding to ping
    #[serde(rename = "pong")]
    Pong,
}

/// WebSocket upgrade handler
///
/// Sends the current ticket list on connect, then forwards every published
/// UI event until the client disconnects.
pub async fn websocket_handler(ws: WebSocketUpgrade, State(state): State<SharedState>) -> Response {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

// Handle WebSocket connection
async fn handle_socket(socket: WebSocket, state: SharedState) {
    let (mut sender, mut receiver) = socket.split();
    // Subscribe before the snapshot so no event is missed in between
    let mut events = state.notifier.subscribe();

    info!("WebSocket client connected");

    let initial_state = {
        let now = Local::now();
        let tickets: Vec<_> = state
            .board()
            .list()
            .iter()
            .map(|ticket| crate::tickets::TicketListItem::build(ticket, &now))
            .collect();

        serde_json::json!({
            "type": "initial_state",
            "tickets": tickets,
            "current_ticket": state.current_ticket().await,
        })
    };

    if let Err(e) = sender.send(Message::Text(initial_state.to_string())).await {
        error!("Failed to send initial state: {}", e);
        return;
    }

    // Use a channel to send messages from receiver to sender
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<Message>();

    // Task to forward messages from channel to sender
    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if let Err(e) = sender.send(msg).await {
                error!("Failed to send message: {}", e);
                break;
            }
        }
    });

    // Task to forward published UI events
    let event_tx = tx.clone();
    let mut event_task = tokio::spawn(async move {
        loop {
            let event: UiEvent = match events.recv().await {
                Ok(event) => event,
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "WebSocket client lagging, events dropped");
                    continue;
                }
                Err(RecvError::Closed) => break,
            };
            let text = match serde_json::to_string(&event) {
                Ok(text) => text,
                Err(e) => {
                    error!("Failed to serialize UI event: {}", e);
                    continue;
                }
            };
            if event_tx.send(Message::Text(text)).is_err() {
                break;
            }
        }
    });

    // Task to send periodic pings
    let ping_tx = tx.clone();
    let mut ping_task = tokio::spawn(async move {
        loop {
            tokio::time::sleep(tokio::time::Duration::from_secs(30)).await;
            if ping_tx.send(Message::Ping(vec![])).is_err() {
                break;
            }
        }
    });

    // Receive messages
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            match msg {
                Ok(Message::Text(text)) => match serde_json::from_str::<ClientMessage>(&text) {
                    Ok(ClientMessage::Ping) => {
                        if let Ok(pong_msg) = serde_json::to_string(&ClientMessage::Pong) {
                            if tx.send(Message::Text(pong_msg)).is_err() {
                                break;
                            }
                        }
                    }
                    Ok(other) => warn!("Received unhandled WebSocket message: {:?}", other),
                    Err(_) => warn!("Received unknown WebSocket message: {}", text),
                },
                Ok(Message::Close(_)) => {
                    info!("WebSocket client disconnected");
                    break;
                }
                Ok(Message::Pong(_)) => {
                    // Client responded to ping
                }
                Err(e) => {
                    error!("WebSocket error: {}", e);
                    break;
                }
                _ => {}
            }
        }
    });

    // Wait for any task to complete
    tokio::select! {
        _ = &mut send_task => {}
        _ = &mut event_task => {}
        _ = &mut ping_task => {}
        _ = &mut recv_task => {}
    }
    send_task.abort();
    event_task.abort();
    ping_task.abort();
    recv_task.abort();

    info!("WebSocket connection closed");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_ping_parses() {
        let msg: ClientMessage = serde_json::from_str(r#"{"type": "ping"}"#).unwrap();
        assert!(matches!(msg, ClientMessage::Ping));
        assert_eq!(
            serde_json::to_string(&ClientMessage::Pong).unwrap(),
            r#"{"type":"pong"}"#
        );
    }
}
