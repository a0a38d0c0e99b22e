use axum::{extract::{Extension, Path}, http::StatusCode, Json};
use tracing::{error, info};
use uuid::Uuid;

use crate::db::dbsheets;
use crate::models::{ErrorResponse, ShareSpreadsheetRequest, SpreadsheetResponse};
use crate::models::spreadsheet::SharedEntry;
use crate::routes::auth_middleware::AuthedUser;

/// Grant another user access to a spreadsheet. Owner only.
pub async fn sheet_share(
    Extension(user): Extension<AuthedUser>,
    Path(sheet_id): Path<Uuid>,
    Json(payload): Json<ShareSpreadsheetRequest>,
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

    if row.owner != user.user_id {
        let status = StatusCode::FORBIDDEN;
        return Err((status, Json(ErrorResponse {
            code: status.as_u16(),
            status: status.to_string(),
            error: "Only the owner can share a spreadsheet".to_string(),
        })));
    }

    // Replace any existing entry for the same user
    let mut shared_with = row.shared_with.0.clone();
    shared_with.retain(|entry| entry.user != payload.user_id);
    shared_with.push(SharedEntry {
        user: payload.user_id.clone(),
        access: payload.access,
    });

    match db.update_sharing(sheet_id, &shared_with).await {
        Ok(Some(updated)) => {
            info!(
                "Spreadsheet {} shared with user {} by {}",
                sheet_id, payload.user_id, user.user_id
            );
            Ok((StatusCode::OK, Json(updated.into())))
        }
        Ok(None) => {
            let status = StatusCode::NOT_FOUND;
            Err((status, Json(ErrorResponse {
                code: status.as_u16(),
                status: status.to_string(),
                error: format!("Spreadsheet '{}' not found", sheet_id),
            })))
        }
        Err(e) => {
            error!("Failed to update sharing for spreadsheet '{}': {}", sheet_id, e);
            let status = StatusCode::INTERNAL_SERVER_ERROR;
            Err((status, Json(ErrorResponse {
                code: status.as_u16(),
                status: status.to_string(),
                error: "Failed to update sharing".to_string(),
            })))
        }
    }
}
