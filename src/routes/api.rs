use axum::{middleware, routing::{get, post}, Router};

use crate::handlers::{diagnostics, health_check, ready_check, sheet_create, sheet_get, sheet_list, sheet_share};
use crate::routes::auth_middleware::auth_middleware;
use crate::ws::hub::HubHandle;

/// Create API routes
pub fn create_api_routes(hub: HubHandle) -> Router {
    Router::new()
        .route("/v1/spreadsheets", post(sheet_create).get(sheet_list))
        .route("/v1/spreadsheets/:sheet_id", get(sheet_get))
        .route("/v1/spreadsheets/:sheet_id/share", post(sheet_share))
        .route("/v1/diagnostics", get(diagnostics))
        .route_layer(middleware::from_fn(auth_middleware)) // Applies to all routes added above
        .route("/health", get(health_check))
        .route("/ready", get(ready_check))
        .with_state(hub)
}
