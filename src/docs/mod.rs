use utoipa::OpenApi;
use crate::models::*;

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
#[allow(dead_code)]
pub async fn health_check_doc() {}

/// Create a new spreadsheet
#[utoipa::path(
    post,
    path = "/api/v1/spreadsheets",
    request_body = CreateSpreadsheetRequest,
    responses(
        (status = 201, description = "Spreadsheet created successfully", body = SpreadsheetResponse),
        (status = 401, description = "Missing or invalid credentials", body = ErrorResponse)
    )
)]
#[allow(dead_code)]
pub async fn sheet_create_doc() {}

/// List the caller's spreadsheets
#[utoipa::path(
    get,
    path = "/api/v1/spreadsheets",
    responses(
        (status = 200, description = "Spreadsheets owned by the caller", body = [SpreadsheetResponse]),
        (status = 401, description = "Missing or invalid credentials", body = ErrorResponse)
    )
)]
#[allow(dead_code)]
pub async fn sheet_list_doc() {}

/// Fetch one spreadsheet
#[utoipa::path(
    get,
    path = "/api/v1/spreadsheets/{sheet_id}",
    params(
        ("sheet_id" = uuid::Uuid, Path, description = "Spreadsheet id")
    ),
    responses(
        (status = 200, description = "Spreadsheet metadata", body = SpreadsheetResponse),
        (status = 403, description = "Caller has no access", body = ErrorResponse),
        (status = 404, description = "Spreadsheet not found", body = ErrorResponse)
    )
)]
#[allow(dead_code)]
pub async fn sheet_get_doc() {}

/// Share a spreadsheet with another user
#[utoipa::path(
    post,
    path = "/api/v1/spreadsheets/{sheet_id}/share",
    params(
        ("sheet_id" = uuid::Uuid, Path, description = "Spreadsheet id")
    ),
    request_body = ShareSpreadsheetRequest,
    responses(
        (status = 200, description = "Updated spreadsheet metadata", body = SpreadsheetResponse),
        (status = 403, description = "Caller is not the owner", body = ErrorResponse),
        (status = 404, description = "Spreadsheet not found", body = ErrorResponse)
    )
)]
#[allow(dead_code)]
pub async fn sheet_share_doc() {}

/// Hub and system diagnostics
#[utoipa::path(
    get,
    path = "/api/v1/diagnostics",
    responses(
        (status = 200, description = "Hub and system statistics", body = DiagnosticsResponse)
    )
)]
#[allow(dead_code)]
pub async fn diagnostics_doc() {}

#[derive(OpenApi)]
#[openapi(
    paths(
        health_check_doc,
        sheet_create_doc,
        sheet_list_doc,
        sheet_get_doc,
        sheet_share_doc,
        diagnostics_doc,
    ),
    components(
        schemas(
            HealthResponse,
            CreateSpreadsheetRequest,
            ShareSpreadsheetRequest,
            SpreadsheetResponse,
            SharedEntry,
            ShareAccess,
            DiagnosticsResponse,
            ErrorResponse,
        )
    ),
    tags(
        (name = "api", description = "API endpoints")
    )
)]
pub struct ApiDoc;
