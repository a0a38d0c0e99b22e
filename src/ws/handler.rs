use axum::{
    extract::ws::{Message, WebSocket, WebSocketUpgrade},
    extract::State,
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{error, info};
use uuid::Uuid;

use crate::models::{ClientEvent, ServerEvent};
use crate::ws::hub::{HubEvent, HubHandle};

/// WebSocket handler
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(hub): State<HubHandle>,
) -> Response {
    info!("New WebSocket connection attempt");
    ws.on_upgrade(move |socket| handle_socket(socket, hub))
}

/// Handle WebSocket connection
///
/// One task drains the hub's outbound channel into the socket, a second
/// forwards parsed inbound frames into the hub queue. Inbound frames are
/// forwarded in arrival order, so per-connection FIFO holds end to end.
async fn handle_socket(socket: WebSocket, hub: HubHandle) {
    // Unique connection ID to identify this client
    let connection_id = Uuid::new_v4();
    info!("WebSocket connection established with connection_id: {}", connection_id);

    let (mut sender, mut receiver) = socket.split();

    // Hand the hub the outbound half of this connection
    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<ServerEvent>();
    hub.send(HubEvent::Connect {
        connection_id,
        outbound: outbound_tx,
    });

    // Drain broadcasts from the hub into the socket
    let mut send_task = tokio::spawn(async move {
        while let Some(event) = outbound_rx.recv().await {
            let text = match serde_json::to_string(&event) {
                Ok(text) => text,
                Err(e) => {
                    error!("Failed to serialize event for {}: {}", connection_id, e);
                    continue;
                }
            };
            if sender.send(Message::Text(text)).await.is_err() {
                break;
            }
        }
    });

    // Forward inbound frames to the hub; a malformed frame is dropped,
    // never fatal for the connection
    let recv_hub = hub.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            let text = match msg {
                Message::Text(text) => text,
                Message::Close(_) => break,
                // Ping/pong and binary frames are not protocol events
                _ => continue,
            };
            let event: ClientEvent = match serde_json::from_str(&text) {
                Ok(event) => event,
                Err(e) => {
                    error!("Failed to parse message from {}: {}", connection_id, e);
                    continue;
                }
            };
            recv_hub.send(HubEvent::Client {
                connection_id,
                event,
            });
        }
    });

    // Wait for either task to finish (and finish the other)
    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };

    hub.send(HubEvent::Disconnect { connection_id });
    info!("WebSocket connection terminated for {}", connection_id);
}
