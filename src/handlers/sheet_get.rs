use axum::{extract::{Extension, Path}, http::StatusCode, Json};
use tracing::error;
use uuid::Uuid;

use crate::db::dbsheets;
use crate::models::{ErrorResponse, SpreadsheetResponse};
use crate::routes::auth_middleware::AuthedUser;

/// Fetch one spreadsheet's metadata. Visible to its owner and to users
/// on its shared-access list.
pub async fn sheet_get(
    Extension(user): Extension<AuthedUser>,
    Path(sheet_id): Path<Uuid>,
) -> Result<(StatusCode, Json<SpreadsheetResponse>), (StatusCode, Json<ErrorResponse>)> {
    let db = match dbsheets::get_db() {
        Some(db) => db,
        None => {
            error!("Database not initialized");
            let status = StatusCode::INTERNAL_SERVER_ERROR;
            return Err((status, Json(ErrorResponse {
                code: status.as_u16(),
                status: status.to_string(),
                error: "Database not initialized".to_string(),
            })));
        }
    };

    let row = match db.find_spreadsheet(sheet_id).await {
        Ok(Some(row)) => row,
        Ok(None) => {
            let status = StatusCode::NOT_FOUND;
            return Err((status, Json(ErrorResponse {
                code: status.as_u16(),
                status: status.to_string(),
                error: format!("Spreadsheet '{}' not found", sheet_id),
            })));
        }
        Err(e) => {
            error!("Failed to load spreadsheet '{}': {}", sheet_id, e);
            let status = StatusCode::INTERNAL_SERVER_ERROR;
            return Err((status, Json(ErrorResponse {
                code: status.as_u16(),
                status: status.to_string(),
                error: "Failed to load spreadsheet".to_string(),
            })));
        }
    };

    let has_access = row.owner == user.user_id
        || row.shared_with.0.iter().any(|entry| entry.user == user.user_id);
    if !has_access {
        let status = StatusCode::FORBIDDEN;
        return Err((status, Json(ErrorResponse {
            code: status.as_u16(),
            status: status.to_string(),
            error: "Not authorized".to_string(),
        })));
    }

    Ok((StatusCode::OK, Json(row.into())))
}
