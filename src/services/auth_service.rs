use axum::http::{self};
use jsonwebtoken::{decode, Algorithm, DecodingKey, TokenData, Validation};

// Get the auth token from a request
pub fn get_auth_token<B>(req: &http::Request<B>) -> Result<String, String> {
    // 1. Try to get token from Authorization header
    if let Some(auth_header) = req.headers().get(http::header::AUTHORIZATION) {
        let auth_str = auth_header.to_str().map_err(|_| "Invalid Authorization header".to_string())?;
        Ok(auth_str
            .strip_prefix("Bearer ")
            .unwrap_or(auth_str)
            .to_string())
    }
    // 2. Try to get token from cookies
    else {
        let cookie_header = req.headers().get(http::header::COOKIE)
            .ok_or_else(|| "Missing Authorization header or Cookie".to_string())?
            .to_str()
            .map_err(|_| "Invalid Cookie header".to_string())?;

        for cookie in cookie::Cookie::split_parse(cookie_header) {
            if let Ok(c) = cookie {
                if c.name() == "auth_token" {
                    return Ok(c.value().to_string());
                }
            }
        }
        Err("auth_token cookie not found".to_string())
    }
}

// Validate a JWT token and return the token data
pub fn validate_jwt(token: &str, secret: &str) -> Result<TokenData<serde_json::Value>, jsonwebtoken::errors::Error> {
    let validation = Validation::new(Algorithm::HS256);
    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    decode::<serde_json::Value>(token, &decoding_key, &validation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;
    use jsonwebtoken::{encode, EncodingKey, Header};

    #[test]
    fn bearer_token_is_taken_from_the_authorization_header() {
        let req = Request::builder()
            .header("Authorization", "Bearer abc123")
            .body(())
            .unwrap();
        assert_eq!(get_auth_token(&req).unwrap(), "abc123");
    }

    #[test]
    fn token_falls_back_to_the_auth_cookie() {
        let req = Request::builder()
            .header("Cookie", "theme=dark; auth_token=xyz")
            .body(())
            .unwrap();
        assert_eq!(get_auth_token(&req).unwrap(), "xyz");
    }

    #[test]
    fn missing_token_is_an_error() {
        let req = Request::builder().body(()).unwrap();
        assert!(get_auth_token(&req).is_err());
    }

    #[test]
    fn jwt_round_trip_yields_the_subject_claim() {
        let claims = serde_json::json!({
            "sub": "user-1",
            "exp": chrono::Utc::now().timestamp() + 3600,
        });
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"secret"),
        )
        .unwrap();

        let data = validate_jwt(&token, "secret").unwrap();
        assert_eq!(data.claims.get("sub").and_then(|v| v.as_str()), Some("user-1"));
        assert!(validate_jwt(&token, "wrong-secret").is_err());
    }
}
