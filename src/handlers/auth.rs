use axum::{extract::State, response::Json, Extension};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::{generate_jwt, Claims};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub username: String,
    /// Accepted for OAuth-shaped clients but not checked; any username is
    /// issued a token, matching the reference behavior
    pub password: Option<String>,
}

/// POST /oauth/token - issue a bearer token for the given username
pub async fn token_post(
    State(state): State<AppState>,
    Json(payload): Json<TokenRequest>,
) -> Result<Json<Value>, ApiError> {
    let expiry_hours = state.config.security.token_expiry_hours;
    let claims = Claims::new(payload.username, expiry_hours);
    let token = generate_jwt(&state.config.security.jwt_secret, &claims)?;

    Ok(Json(json!({
        "access_token": token,
        "token_type": "bearer",
        "expires_in": expiry_hours * 3600,
    })))
}

/// GET /me - return the authenticated caller's identity
pub async fn me_get(Extension(user): Extension<AuthUser>) -> Json<Value> {
    Json(json!({
        "id": user.id,
        "username": user.username,
    }))
}
