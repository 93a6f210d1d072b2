//! Bearer-token middleware for the admin surface.
//!
//! The decoded principal travels as a request extension, never as global
//! state: handlers that need it take `Extension<AuthUser>`.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{StatusCode, header},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::core::app_state::AppState;
use crate::core::http::response_envelope::ApiResponse;
use crate::security::jwt;

/// Authenticated principal for the current request.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub username: String,
    pub roles: Vec<String>,
}

/// Rejects requests without a valid bearer token.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Response {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(jwt::bearer_token);

    let Some(token) = token else {
        return unauthorized("missing bearer token");
    };

    match jwt::decode_token(&state.auth, token) {
        Ok(claims) => {
            req.extensions_mut().insert(AuthUser {
                username: claims.username,
                roles: claims.roles,
            });
            next.run(req).await
        }
        Err(_) => {
            warn!("admin request with invalid or expired token");
            unauthorized("invalid or expired token")
        }
    }
}

fn unauthorized(message: &str) -> Response {
    ApiResponse::<()>::error("UNAUTHORIZED", message, Vec::new())
        .into_response_with_status(StatusCode::UNAUTHORIZED)
}
