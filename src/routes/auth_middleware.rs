use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use tracing::error;

use crate::config;
use crate::services::auth_service::{get_auth_token, validate_jwt};

/// Identity of the authenticated caller, set by [`auth_middleware`] for
/// downstream handlers.
#[derive(Clone, Debug)]
pub struct AuthedUser {
    pub user_id: String,
}

/// Validates the bearer credential and resolves the caller identity.
/// Credential issuance lives in a separate service; this layer only
/// verifies what it is handed.
pub async fn auth_middleware(
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    // 1. Get the auth token from the request
    let token = match get_auth_token(&req) {
        Ok(token) => token,
        Err(_) => return Err(StatusCode::UNAUTHORIZED),
    };

    // 2. Validate Token
    let config = config::get_config();
    let secret = match &config.auth_jwt_secret {
        Some(secret) => secret,
        None => {
            error!("Auth JWT secret not configured");
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };
    let token_data = match validate_jwt(&token, secret) {
        Ok(token_data) => token_data,
        Err(e) => {
            error!("JWT validation failed: {}", e);
            return Err(StatusCode::UNAUTHORIZED);
        }
    };

    // 3. Extract the user id from the subject claim
    let user_id = match token_data.claims.get("sub").and_then(|v| v.as_str()) {
        Some(sub) => sub.to_string(),
        None => {
            error!("JWT token does not contain 'sub' claim");
            return Err(StatusCode::UNAUTHORIZED);
        }
    };

    // 4. Set the identity into request extensions for downstream handlers
    req.extensions_mut().insert(AuthedUser { user_id });

    // Token is valid, proceed to next middleware/handler
    Ok(next.run(req).await)
}
