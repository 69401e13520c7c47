use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::auth::{user_id_for, validate_jwt, Claims};
use crate::error::ApiError;
use crate::AppState;

/// Authenticated user context extracted from a verified JWT. Handlers and
/// the store trust this value completely and never re-derive identity from
/// request content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub id: String,
    pub username: String,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: user_id_for(&claims.sub),
            username: claims.sub,
        }
    }
}

/// JWT authentication middleware that validates bearer tokens and injects
/// the caller's AuthUser into the request extensions
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(&headers).map_err(ApiError::unauthorized)?;

    let claims = validate_jwt(&state.config.security.jwt_secret, &token)
        .map_err(|e| ApiError::unauthorized(format!("Invalid JWT token: {}", e)))?;

    request.extensions_mut().insert(AuthUser::from(claims));

    Ok(next.run(request).await)
}

/// Extract the bearer token from the Authorization header
fn extract_bearer_token(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get("authorization")
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("Empty bearer token".to_string());
        }
        Ok(token.to_string())
    } else {
        Err("Authorization header must use Bearer token format".to_string())
    }
}
