use axum::{extract::Extension, http::StatusCode, Json};
use tracing::error;

use crate::db::dbsheets;
use crate::models::{CreateSpreadsheetRequest, ErrorResponse, SpreadsheetResponse};
use crate::routes::auth_middleware::AuthedUser;

/// Create a new spreadsheet owned by the caller
pub async fn sheet_create(
    Extension(user): Extension<AuthedUser>,
    Json(payload): Json<CreateSpreadsheetRequest>,
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

    match db.create_spreadsheet(&payload.title, &user.user_id).await {
        Ok(row) => Ok((StatusCode::CREATED, Json(row.into()))),
        Err(e) => {
            error!("Failed to create spreadsheet '{}': {}", payload.title, e);
            let status = StatusCode::INTERNAL_SERVER_ERROR;
            Err((status, Json(ErrorResponse {
                code: status.as_u16(),
                status: status.to_string(),
                error: "Failed to create spreadsheet".to_string(),
            })))
        }
    }
}
