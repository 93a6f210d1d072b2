//! HS256 token issue/decode for the admin session layer.
//!
//! Tokens are stateless: logout is client-side discard, refresh re-issues
//! from a still-valid token's claims.

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::core::app_state::AuthConfig;
use crate::error_handler::AppError;

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user name, mirrors `username`).
    pub sub: String,
    pub username: String,
    pub roles: Vec<String>,
    /// Issued-at, seconds since epoch.
    pub iat: u64,
    /// Expiration time, seconds since epoch.
    pub exp: u64,
}

/// Issues a fresh token for `username` with the given roles.
pub fn issue_token(auth: &AuthConfig, username: &str, roles: &[String]) -> Result<String, AppError> {
    let now = Utc::now().timestamp() as u64;
    let claims = Claims {
        sub: username.to_string(),
        username: username.to_string(),
        roles: roles.to_vec(),
        iat: now,
        exp: now + auth.expiration_ms / 1000,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(auth.jwt_secret.as_bytes()),
    )
    .map_err(|e| AppError::Config(format!("token signing failed: {e}")))
}

/// Decodes and validates a bearer token, returning its claims.
pub fn decode_token(auth: &AuthConfig, token: &str) -> Result<Claims, AppError> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(auth.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::Unauthorized("invalid or expired token".into()))?;

    Ok(data.claims)
}

/// Extracts the token from an `Authorization: Bearer <jwt>` header value.
pub fn bearer_token(header_value: &str) -> Option<&str> {
    header_value.strip_prefix("Bearer ").map(str::trim)
}
