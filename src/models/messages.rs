use serde::{Deserialize, Serialize};
use crate::models::{CellRef, CursorPosition};

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct JoinMessage {
    pub spreadsheet_id: String,
    pub user_id: String,
    pub display_name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CursorMoveMessage {
    pub spreadsheet_id: String,
    pub position: CursorPosition,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CellEditMessage {
    pub spreadsheet_id: String,
    pub cell_id: CellRef,
    pub value: String,
}

/// Events a client sends to the hub.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(tag = "type")]
pub enum ClientEvent {
    #[serde(rename = "join")]
    Join(JoinMessage),
    #[serde(rename = "cursorMove")]
    CursorMove(CursorMoveMessage),
    #[serde(rename = "cellEdit")]
    CellEdit(CellEditMessage),
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UserJoinedMessage {
    pub user_id: String,
    pub display_name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UserLeftMessage {
    pub user_id: String,
    pub display_name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CursorMovedMessage {
    pub user_id: String,
    pub display_name: String,
    pub position: CursorPosition,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CellUpdatedMessage {
    pub user_id: String,
    pub display_name: String,
    pub cell_id: CellRef,
    pub value: String,
}

/// Events the hub broadcasts to the other members of a room.
///
/// Sender identity is always the identity recorded at join time for the
/// originating connection, never data supplied by the triggering event.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(tag = "type")]
pub enum ServerEvent {
    #[serde(rename = "userJoined")]
    UserJoined(UserJoinedMessage),
    #[serde(rename = "userLeft")]
    UserLeft(UserLeftMessage),
    #[serde(rename = "cursorMoved")]
    CursorMoved(CursorMovedMessage),
    #[serde(rename = "cellUpdated")]
    CellUpdated(CellUpdatedMessage),
}
