use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Username of the token holder
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(username: impl Into<String>, expiry_hours: i64) -> Self {
        let now = Utc::now();
        Self {
            sub: username.into(),
            exp: (now + Duration::hours(expiry_hours)).timestamp(),
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("JWT secret is empty")]
    EmptySecret,

    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}

pub fn generate_jwt(secret: &str, claims: &Claims) -> Result<String, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::EmptySecret);
    }
    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    Ok(encode(&Header::default(), claims, &encoding_key)?)
}

pub fn validate_jwt(secret: &str, token: &str) -> Result<Claims, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::EmptySecret);
    }
    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let token_data = decode::<Claims>(token, &decoding_key, &Validation::default())?;
    Ok(token_data.claims)
}

/// Stable user id derived from the username: the hex encoding of its UTF-8
/// bytes. The token only carries the username; the id is recomputed on every
/// request, so the same username always maps to the same id.
pub fn user_id_for(username: &str) -> String {
    username.bytes().map(|b| format!("{b:02x}")).collect()
}
