use axum::{extract::Extension, http::StatusCode, Json};
use tracing::error;

use crate::db::dbsheets;
use crate::models::{ErrorResponse, SpreadsheetResponse};
use crate::routes::auth_middleware::AuthedUser;

/// List the spreadsheets the caller owns
pub async fn sheet_list(
    Extension(user): Extension<AuthedUser>,
) -> Result<(StatusCode, Json<Vec<SpreadsheetResponse>>), (StatusCode, Json<ErrorResponse>)> {
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

    match db.find_spreadsheets_for_owner(&user.user_id).await {
        Ok(rows) => Ok((
            StatusCode::OK,
            Json(rows.into_iter().map(Into::into).collect()),
        )),
        Err(e) => {
            error!("Failed to list spreadsheets for user {}: {}", user.user_id, e);
            let status = StatusCode::INTERNAL_SERVER_ERROR;
            Err((status, Json(ErrorResponse {
                code: status.as_u16(),
                status: status.to_string(),
                error: "Failed to list spreadsheets".to_string(),
            })))
        }
    }
}
