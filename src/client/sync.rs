use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::{connect_async, tungstenite, MaybeTlsStream, WebSocketStream};
use tracing::{error, info, warn};

use crate::client::state::SheetState;
use crate::models::{
    CellEditMessage, CellRef, ClientEvent, CursorMoveMessage, CursorPosition, JoinMessage,
    ServerEvent,
};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Connects a local spreadsheet view to the collaboration hub.
///
/// Local edits are applied to the table first and then sent upstream
/// fire-and-forget: there is no acknowledgment and no replay. Remote
/// broadcasts are folded into the table unconditionally.
pub struct SyncClient {
    spreadsheet_id: String,
    user_id: String,
    display_name: String,
    state: SheetState,
    socket: WsStream,
}

impl SyncClient {
    /// Connect to the hub and announce the join. The join itself must
    /// arrive, so its send failure is an error rather than a dropped edit.
    pub async fn connect(
        url: &str,
        spreadsheet_id: &str,
        user_id: &str,
        display_name: &str,
        rows: u32,
        cols: u32,
    ) -> Result<Self, SyncError> {
        let (socket, _response) = connect_async(url).await.map_err(SyncError::Transport)?;
        info!("Connected to hub at {} as user {}", url, user_id);

        let mut client = Self {
            spreadsheet_id: spreadsheet_id.to_string(),
            user_id: user_id.to_string(),
            display_name: display_name.to_string(),
            state: SheetState::new(rows, cols),
            socket,
        };
        let join = ClientEvent::Join(JoinMessage {
            spreadsheet_id: client.spreadsheet_id.clone(),
            user_id: client.user_id.clone(),
            display_name: client.display_name.clone(),
        });
        client.send_event(&join).await.map_err(SyncError::Transport)?;
        Ok(client)
    }

    pub fn state(&self) -> &SheetState {
        &self.state
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Apply a local edit optimistically, then send it upstream. If the
    /// transport is down the edit stays local; it is not queued or
    /// replayed.
    pub async fn edit(&mut self, cell: CellRef, value: &str) {
        self.state.apply_local_edit(cell, value);
        let event = ClientEvent::CellEdit(CellEditMessage {
            spreadsheet_id: self.spreadsheet_id.clone(),
            cell_id: cell,
            value: value.to_string(),
        });
        if let Err(e) = self.send_event(&event).await {
            warn!("Cell edit {} not delivered: {}", cell, e);
        }
    }

    /// Report the local cursor position to the room. Fire-and-forget.
    pub async fn move_cursor(&mut self, position: CursorPosition) {
        let event = ClientEvent::CursorMove(CursorMoveMessage {
            spreadsheet_id: self.spreadsheet_id.clone(),
            position,
        });
        if let Err(e) = self.send_event(&event).await {
            warn!("Cursor update not delivered: {}", e);
        }
    }

    /// Receive the next broadcast from the hub and fold it into the local
    /// state. Returns the event so a UI layer can react to it, or `None`
    /// once the connection is closed.
    pub async fn next_event(&mut self) -> Option<ServerEvent> {
        while let Some(frame) = self.socket.next().await {
            match frame {
                Ok(tungstenite::Message::Text(text)) => {
                    match serde_json::from_str::<ServerEvent>(&text) {
                        Ok(event) => {
                            self.state.apply_remote(&event);
                            return Some(event);
                        }
                        Err(e) => {
                            error!("Failed to parse server event: {}", e);
                            continue;
                        }
                    }
                }
                Ok(tungstenite::Message::Close(_)) => return None,
                Ok(_) => continue,
                Err(e) => {
                    warn!("WebSocket error: {}", e);
                    return None;
                }
            }
        }
        None
    }

    async fn send_event(&mut self, event: &ClientEvent) -> Result<(), tungstenite::Error> {
        let text = serde_json::to_string(event).expect("client events always serialize");
        self.socket.send(tungstenite::Message::Text(text.into())).await
    }
}

#[derive(Debug)]
pub enum SyncError {
    Transport(tungstenite::Error),
}

impl std::fmt::Display for SyncError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncError::Transport(e) => write!(f, "WebSocket transport error: {}", e),
        }
    }
}

impl std::error::Error for SyncError {}
