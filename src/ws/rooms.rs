use std::collections::{HashMap, HashSet};
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;
use uuid::Uuid;

use crate::models::ServerEvent;

/// Connection-to-room membership and room-scoped broadcast.
///
/// Membership is kept separate from presence identity so "who is in this
/// room" and "who is this connection" can be queried independently, and a
/// connection can leave a room while the disconnect handler still holds
/// its identity record.
#[derive(Default)]
pub struct RoomManager {
    rooms: HashMap<String, HashSet<Uuid>>,
    peers: HashMap<Uuid, UnboundedSender<ServerEvent>>,
}

impl RoomManager {
    pub fn new() -> Self {
        Self {
            rooms: HashMap::new(),
            peers: HashMap::new(),
        }
    }

    /// Register the outbound channel for a connection. Called once when the
    /// transport session is established, before any join.
    pub fn register_peer(&mut self, connection_id: Uuid, outbound: UnboundedSender<ServerEvent>) {
        self.peers.insert(connection_id, outbound);
    }

    /// Drop the outbound channel for a connection. A miss is a no-op.
    pub fn unregister_peer(&mut self, connection_id: &Uuid) {
        self.peers.remove(connection_id);
    }

    /// Add a connection to a room's membership set. Idempotent.
    pub fn join(&mut self, connection_id: Uuid, spreadsheet_id: &str) {
        self.rooms
            .entry(spreadsheet_id.to_string())
            .or_default()
            .insert(connection_id);
    }

    /// Remove a connection from a room's membership set. No-op if absent.
    /// A room with no members left is dropped.
    pub fn leave(&mut self, connection_id: &Uuid, spreadsheet_id: &str) {
        if let Some(members) = self.rooms.get_mut(spreadsheet_id) {
            members.remove(connection_id);
            if members.is_empty() {
                self.rooms.remove(spreadsheet_id);
            }
        }
    }

    pub fn members(&self, spreadsheet_id: &str) -> Option<&HashSet<Uuid>> {
        self.rooms.get(spreadsheet_id)
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn peer_count(&self) -> usize {
        self.peers.len()
    }

    /// Deliver an event to every member of the room except the sender.
    /// Delivery is best-effort: a closed receiver is skipped, never an error.
    pub fn broadcast(&self, spreadsheet_id: &str, event: &ServerEvent, exclude: &Uuid) {
        let Some(members) = self.rooms.get(spreadsheet_id) else {
            return;
        };
        for member in members {
            if member == exclude {
                continue;
            }
            let Some(outbound) = self.peers.get(member) else {
                continue;
            };
            if outbound.send(event.clone()).is_err() {
                debug!("Dropped broadcast to closed connection {}", member);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ServerEvent, UserJoinedMessage};
    use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};

    fn event(user_id: &str) -> ServerEvent {
        ServerEvent::UserJoined(UserJoinedMessage {
            user_id: user_id.to_string(),
            display_name: user_id.to_string(),
        })
    }

    fn drain(rx: &mut UnboundedReceiver<ServerEvent>) -> Vec<ServerEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    fn add_peer(rooms: &mut RoomManager, spreadsheet_id: &str) -> (Uuid, UnboundedReceiver<ServerEvent>) {
        let id = Uuid::new_v4();
        let (tx, rx) = unbounded_channel();
        rooms.register_peer(id, tx);
        rooms.join(id, spreadsheet_id);
        (id, rx)
    }

    #[test]
    fn broadcast_excludes_the_sender() {
        let mut rooms = RoomManager::new();
        let (a, mut a_rx) = add_peer(&mut rooms, "S1");
        let (_b, mut b_rx) = add_peer(&mut rooms, "S1");
        let (_c, mut c_rx) = add_peer(&mut rooms, "S1");

        rooms.broadcast("S1", &event("u1"), &a);

        assert!(drain(&mut a_rx).is_empty());
        assert_eq!(drain(&mut b_rx).len(), 1);
        assert_eq!(drain(&mut c_rx).len(), 1);
    }

    #[test]
    fn broadcast_is_scoped_to_the_room() {
        let mut rooms = RoomManager::new();
        let (a, _a_rx) = add_peer(&mut rooms, "S1");
        let (_b, mut b_rx) = add_peer(&mut rooms, "S2");

        rooms.broadcast("S1", &event("u1"), &a);

        assert!(drain(&mut b_rx).is_empty());
    }

    #[test]
    fn failed_delivery_to_one_member_does_not_block_the_others() {
        let mut rooms = RoomManager::new();
        let (a, _a_rx) = add_peer(&mut rooms, "S1");
        let (_b, b_rx) = add_peer(&mut rooms, "S1");
        let (_c, mut c_rx) = add_peer(&mut rooms, "S1");

        drop(b_rx);
        rooms.broadcast("S1", &event("u1"), &a);

        assert_eq!(drain(&mut c_rx).len(), 1);
    }

    #[test]
    fn join_is_idempotent() {
        let mut rooms = RoomManager::new();
        let (a, _a_rx) = add_peer(&mut rooms, "S1");
        rooms.join(a, "S1");

        assert_eq!(rooms.members("S1").unwrap().len(), 1);
    }

    #[test]
    fn leave_twice_equals_leave_once() {
        let mut rooms = RoomManager::new();
        let (a, _a_rx) = add_peer(&mut rooms, "S1");
        let (_b, _b_rx) = add_peer(&mut rooms, "S1");

        rooms.leave(&a, "S1");
        rooms.leave(&a, "S1");

        assert_eq!(rooms.members("S1").unwrap().len(), 1);
    }

    #[test]
    fn empty_rooms_are_dropped() {
        let mut rooms = RoomManager::new();
        let (a, _a_rx) = add_peer(&mut rooms, "S1");
        rooms.leave(&a, "S1");

        assert!(rooms.members("S1").is_none());
        assert_eq!(rooms.room_count(), 0);
    }
}
