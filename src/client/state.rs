use std::collections::HashMap;

use crate::models::{CellRef, CursorPosition, ServerEvent};

/// Default grid dimensions used by spreadsheet frontends.
pub const DEFAULT_ROWS: u32 = 20;
pub const DEFAULT_COLS: u32 = 26;

/// Client-side view of one spreadsheet: the local cell table plus the
/// presence list and cursor overlay derived from hub broadcasts.
///
/// Cell values follow last-write-wins: whichever update is applied last,
/// a local keystroke or a remote broadcast, is the value the table holds.
pub struct SheetState {
    rows: u32,
    cols: u32,
    cells: HashMap<CellRef, String>,
    peers: HashMap<String, String>,
    cursors: HashMap<String, CursorPosition>,
}

impl SheetState {
    /// Every cell of the fixed grid exists up front with an empty value,
    /// so absence is never a state to branch on.
    pub fn new(rows: u32, cols: u32) -> Self {
        let mut cells = HashMap::with_capacity((rows * cols) as usize);
        for row in 0..rows {
            for col in 0..cols {
                cells.insert(CellRef::new(row, col), String::new());
            }
        }
        Self {
            rows,
            cols,
            cells,
            peers: HashMap::new(),
            cursors: HashMap::new(),
        }
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn value(&self, cell: &CellRef) -> Option<&str> {
        self.cells.get(cell).map(String::as_str)
    }

    /// Apply a local keystroke immediately, without waiting for the hub.
    pub fn apply_local_edit(&mut self, cell: CellRef, value: &str) {
        self.cells.insert(cell, value.to_string());
    }

    /// Fold a remote broadcast into the local state. Cell updates overwrite
    /// unconditionally; presence events maintain the peer list and cursor
    /// overlay, independent of the cell table.
    pub fn apply_remote(&mut self, event: &ServerEvent) {
        match event {
            ServerEvent::CellUpdated(update) => {
                self.cells.insert(update.cell_id, update.value.clone());
            }
            ServerEvent::UserJoined(joined) => {
                self.peers
                    .insert(joined.user_id.clone(), joined.display_name.clone());
            }
            ServerEvent::UserLeft(left) => {
                self.peers.remove(&left.user_id);
                self.cursors.remove(&left.user_id);
            }
            ServerEvent::CursorMoved(moved) => {
                self.cursors.insert(moved.user_id.clone(), moved.position);
            }
        }
    }

    /// Peers currently known to be in the room, by user id.
    pub fn peers(&self) -> &HashMap<String, String> {
        &self.peers
    }

    pub fn cursor_of(&self, user_id: &str) -> Option<&CursorPosition> {
        self.cursors.get(user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        CellUpdatedMessage, CursorMovedMessage, UserJoinedMessage, UserLeftMessage,
    };

    fn cell_updated(user_id: &str, cell: CellRef, value: &str) -> ServerEvent {
        ServerEvent::CellUpdated(CellUpdatedMessage {
            user_id: user_id.to_string(),
            display_name: user_id.to_string(),
            cell_id: cell,
            value: value.to_string(),
        })
    }

    #[test]
    fn every_cell_of_the_grid_starts_empty() {
        let state = SheetState::new(20, 26);
        assert_eq!(state.value(&CellRef::new(0, 0)), Some(""));
        assert_eq!(state.value(&CellRef::new(19, 25)), Some(""));
        assert_eq!(state.value(&CellRef::new(20, 0)), None);
    }

    #[test]
    fn last_processed_write_wins() {
        let cell = CellRef::new(1, 1);
        let mut state = SheetState::new(4, 4);

        // remote after local: remote wins
        state.apply_local_edit(cell, "local");
        state.apply_remote(&cell_updated("u2", cell, "A"));
        assert_eq!(state.value(&cell), Some("A"));

        // local after remote: local wins
        state.apply_local_edit(cell, "local again");
        assert_eq!(state.value(&cell), Some("local again"));

        // two remotes in close succession: whichever is processed last wins
        state.apply_remote(&cell_updated("u2", cell, "A"));
        state.apply_remote(&cell_updated("u3", cell, "B"));
        assert_eq!(state.value(&cell), Some("B"));
    }

    #[test]
    fn presence_events_maintain_the_peer_list() {
        let mut state = SheetState::new(2, 2);
        state.apply_remote(&ServerEvent::UserJoined(UserJoinedMessage {
            user_id: "u2".to_string(),
            display_name: "Grace".to_string(),
        }));
        assert_eq!(state.peers().get("u2").map(String::as_str), Some("Grace"));

        state.apply_remote(&ServerEvent::UserLeft(UserLeftMessage {
            user_id: "u2".to_string(),
            display_name: "Grace".to_string(),
        }));
        assert!(state.peers().is_empty());
    }

    #[test]
    fn cursor_overlay_tracks_the_latest_position_and_clears_on_departure() {
        let mut state = SheetState::new(4, 4);
        state.apply_remote(&ServerEvent::CursorMoved(CursorMovedMessage {
            user_id: "u2".to_string(),
            display_name: "Grace".to_string(),
            position: CursorPosition { row: 1, col: 1 },
        }));
        state.apply_remote(&ServerEvent::CursorMoved(CursorMovedMessage {
            user_id: "u2".to_string(),
            display_name: "Grace".to_string(),
            position: CursorPosition { row: 2, col: 3 },
        }));
        assert_eq!(
            state.cursor_of("u2"),
            Some(&CursorPosition { row: 2, col: 3 })
        );

        state.apply_remote(&ServerEvent::UserLeft(UserLeftMessage {
            user_id: "u2".to_string(),
            display_name: "Grace".to_string(),
        }));
        assert!(state.cursor_of("u2").is_none());
    }

    #[test]
    fn presence_and_cell_table_are_independent() {
        let mut state = SheetState::new(2, 2);
        state.apply_remote(&cell_updated("u2", CellRef::new(0, 1), "x"));
        assert!(state.peers().is_empty());
        assert_eq!(state.value(&CellRef::new(0, 1)), Some("x"));
    }
}
