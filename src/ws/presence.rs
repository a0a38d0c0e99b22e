use std::collections::HashMap;
use uuid::Uuid;

/// Identity of one live connection, recorded at join time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Connection {
    pub user_id: String,
    pub display_name: String,
    pub spreadsheet_id: String,
}

/// The single source of truth for who is connected, as whom, in which room.
///
/// Pure in-memory state owned by the hub task; entries live exactly as long
/// as their transport session.
#[derive(Default)]
pub struct PresenceRegistry {
    connections: HashMap<Uuid, Connection>,
}

impl PresenceRegistry {
    pub fn new() -> Self {
        Self {
            connections: HashMap::new(),
        }
    }

    /// Insert or overwrite the entry for a connection. A user may hold
    /// several simultaneous connections; each gets its own entry.
    pub fn register(&mut self, connection_id: Uuid, connection: Connection) {
        self.connections.insert(connection_id, connection);
    }

    /// A miss is not an error: the event raced a disconnect, or arrived
    /// before the join completed.
    pub fn lookup(&self, connection_id: &Uuid) -> Option<&Connection> {
        self.connections.get(connection_id)
    }

    /// Remove the entry, returning it so the caller can announce the
    /// departure before the identity is lost. A miss is a no-op.
    pub fn remove(&mut self, connection_id: &Uuid) -> Option<Connection> {
        self.connections.remove(connection_id)
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conn(user_id: &str, spreadsheet_id: &str) -> Connection {
        Connection {
            user_id: user_id.to_string(),
            display_name: format!("{} display", user_id),
            spreadsheet_id: spreadsheet_id.to_string(),
        }
    }

    #[test]
    fn register_then_lookup_then_remove() {
        let mut registry = PresenceRegistry::new();
        let id = Uuid::new_v4();
        registry.register(id, conn("u1", "S1"));

        assert_eq!(registry.lookup(&id), Some(&conn("u1", "S1")));
        assert_eq!(registry.remove(&id), Some(conn("u1", "S1")));
        assert!(registry.lookup(&id).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn register_overwrites_existing_entry() {
        let mut registry = PresenceRegistry::new();
        let id = Uuid::new_v4();
        registry.register(id, conn("u1", "S1"));
        registry.register(id, conn("u1", "S2"));

        assert_eq!(registry.lookup(&id).unwrap().spreadsheet_id, "S2");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn same_user_may_hold_multiple_connections() {
        let mut registry = PresenceRegistry::new();
        registry.register(Uuid::new_v4(), conn("u1", "S1"));
        registry.register(Uuid::new_v4(), conn("u1", "S1"));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn remove_of_unknown_connection_is_a_silent_noop() {
        let mut registry = PresenceRegistry::new();
        assert!(registry.remove(&Uuid::new_v4()).is_none());
        assert!(registry.lookup(&Uuid::new_v4()).is_none());
    }
}
