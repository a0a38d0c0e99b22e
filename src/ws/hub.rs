use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::models::{
    CellEditMessage, CellUpdatedMessage, ClientEvent, CursorMoveMessage, CursorMovedMessage,
    JoinMessage, ServerEvent, UserJoinedMessage, UserLeftMessage,
};
use crate::ws::presence::{Connection, PresenceRegistry};
use crate::ws::rooms::RoomManager;

/// Inbound events for the hub queue. Transport tasks translate socket
/// frames into these; each is handled to completion before the next.
#[derive(Debug)]
pub enum HubEvent {
    /// A transport session opened; register its outbound channel.
    Connect {
        connection_id: Uuid,
        outbound: mpsc::UnboundedSender<ServerEvent>,
    },
    /// A parsed frame from a client.
    Client {
        connection_id: Uuid,
        event: ClientEvent,
    },
    /// The transport session closed.
    Disconnect { connection_id: Uuid },
    /// Reply with connection/room counts, for diagnostics.
    Stats { reply: oneshot::Sender<HubStats> },
}

#[derive(Debug, Clone, Copy)]
pub struct HubStats {
    pub n_conn: u32,
    pub n_rooms: u32,
}

/// Cloneable handle for feeding events into the hub queue.
#[derive(Clone)]
pub struct HubHandle {
    tx: mpsc::UnboundedSender<HubEvent>,
}

impl HubHandle {
    pub fn send(&self, event: HubEvent) {
        if self.tx.send(event).is_err() {
            warn!("Collaboration hub is no longer running; event dropped");
        }
    }

    /// Ask the running hub for its current counts.
    pub async fn stats(&self) -> Option<HubStats> {
        let (reply, rx) = oneshot::channel();
        self.send(HubEvent::Stats { reply });
        rx.await.ok()
    }
}

/// The collaboration hub: presence, room membership, and the broadcast
/// relay for one process.
///
/// All state lives on the single task running [`CollabHub::run`], so
/// registry and room mutations never interleave and need no locking. The
/// hub stores nothing per event; it is a relay, not a history.
pub struct CollabHub {
    presence: PresenceRegistry,
    rooms: RoomManager,
}

impl Default for CollabHub {
    fn default() -> Self {
        Self::new()
    }
}

impl CollabHub {
    pub fn new() -> Self {
        Self {
            presence: PresenceRegistry::new(),
            rooms: RoomManager::new(),
        }
    }

    /// Spawn the hub event loop and return a handle to it.
    pub fn spawn() -> HubHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(async move {
            CollabHub::new().run(rx).await;
        });
        HubHandle { tx }
    }

    pub async fn run(mut self, mut rx: mpsc::UnboundedReceiver<HubEvent>) {
        info!("Collaboration hub started");
        while let Some(event) = rx.recv().await {
            self.handle(event);
        }
        info!("Collaboration hub stopped");
    }

    pub fn handle(&mut self, event: HubEvent) {
        match event {
            HubEvent::Connect {
                connection_id,
                outbound,
            } => {
                self.rooms.register_peer(connection_id, outbound);
            }
            HubEvent::Client {
                connection_id,
                event,
            } => match event {
                ClientEvent::Join(msg) => self.handle_join(connection_id, msg),
                ClientEvent::CursorMove(msg) => self.handle_cursor_move(connection_id, msg),
                ClientEvent::CellEdit(msg) => self.handle_cell_edit(connection_id, msg),
            },
            HubEvent::Disconnect { connection_id } => self.handle_disconnect(connection_id),
            HubEvent::Stats { reply } => {
                let _ = reply.send(HubStats {
                    n_conn: self.rooms.peer_count() as u32,
                    n_rooms: self.rooms.room_count() as u32,
                });
            }
        }
    }

    /// Register the identity, enter the room, announce the arrival.
    ///
    /// A connection is a member of at most one room: joining a different
    /// spreadsheet leaves the previous room first and announces the
    /// departure there.
    fn handle_join(&mut self, connection_id: Uuid, msg: JoinMessage) {
        if let Some(prev) = self.presence.lookup(&connection_id) {
            if prev.spreadsheet_id != msg.spreadsheet_id {
                let prev = prev.clone();
                self.rooms.leave(&connection_id, &prev.spreadsheet_id);
                self.rooms.broadcast(
                    &prev.spreadsheet_id,
                    &ServerEvent::UserLeft(UserLeftMessage {
                        user_id: prev.user_id,
                        display_name: prev.display_name,
                    }),
                    &connection_id,
                );
            }
        }

        info!(
            "Connection {} joined spreadsheet {} as user {}",
            connection_id, msg.spreadsheet_id, msg.user_id
        );
        self.presence.register(
            connection_id,
            Connection {
                user_id: msg.user_id.clone(),
                display_name: msg.display_name.clone(),
                spreadsheet_id: msg.spreadsheet_id.clone(),
            },
        );
        self.rooms.join(connection_id, &msg.spreadsheet_id);
        self.rooms.broadcast(
            &msg.spreadsheet_id,
            &ServerEvent::UserJoined(UserJoinedMessage {
                user_id: msg.user_id,
                display_name: msg.display_name,
            }),
            &connection_id,
        );
    }

    fn handle_cursor_move(&mut self, connection_id: Uuid, msg: CursorMoveMessage) {
        // An event that raced the join carries no identity yet; drop it.
        let Some(connection) = self.presence.lookup(&connection_id) else {
            debug!("Cursor move from unregistered connection {}; ignored", connection_id);
            return;
        };
        self.rooms.broadcast(
            &msg.spreadsheet_id,
            &ServerEvent::CursorMoved(CursorMovedMessage {
                user_id: connection.user_id.clone(),
                display_name: connection.display_name.clone(),
                position: msg.position,
            }),
            &connection_id,
        );
    }

    /// Relay a cell edit to the rest of the room. The hub neither checks
    /// cell bounds nor reconciles conflicting values; receivers apply
    /// last-write-wins.
    fn handle_cell_edit(&mut self, connection_id: Uuid, msg: CellEditMessage) {
        let Some(connection) = self.presence.lookup(&connection_id) else {
            debug!("Cell edit from unregistered connection {}; ignored", connection_id);
            return;
        };
        self.rooms.broadcast(
            &msg.spreadsheet_id,
            &ServerEvent::CellUpdated(CellUpdatedMessage {
                user_id: connection.user_id.clone(),
                display_name: connection.display_name.clone(),
                cell_id: msg.cell_id,
                value: msg.value,
            }),
            &connection_id,
        );
    }

    /// Terminal transition for a connection. Processing a disconnect for an
    /// already-removed connection is a no-op.
    fn handle_disconnect(&mut self, connection_id: Uuid) {
        if let Some(connection) = self.presence.remove(&connection_id) {
            info!(
                "Connection {} (user {}) left spreadsheet {}",
                connection_id, connection.user_id, connection.spreadsheet_id
            );
            self.rooms.leave(&connection_id, &connection.spreadsheet_id);
            self.rooms.broadcast(
                &connection.spreadsheet_id,
                &ServerEvent::UserLeft(UserLeftMessage {
                    user_id: connection.user_id,
                    display_name: connection.display_name,
                }),
                &connection_id,
            );
        }
        self.rooms.unregister_peer(&connection_id);
    }
}
