use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Access level granted to a user a spreadsheet is shared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ShareAccess {
    View,
    Edit,
}

/// One entry of a spreadsheet's shared-access list.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SharedEntry {
    pub user: String,
    pub access: ShareAccess,
}

/// Request to create a spreadsheet
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateSpreadsheetRequest {
    pub title: String,
}

/// Request to share a spreadsheet with another user
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShareSpreadsheetRequest {
    pub user_id: String,
    pub access: ShareAccess,
}

/// Spreadsheet metadata as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SpreadsheetResponse {
    pub id: uuid::Uuid,
    pub title: String,
    pub owner: String,
    pub shared_with: Vec<SharedEntry>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
