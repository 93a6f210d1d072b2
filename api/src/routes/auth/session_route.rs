//! Login and token lifecycle for the admin account.
//!
//! Tokens are stateless; refresh re-issues from a still-valid token and
//! logout is an acknowledgement only.

use std::sync::Arc;

use axum::{
    extract::{Json, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use axum::extract::rejection::JsonRejection;
use review_engine::signature::constant_time_eq;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::{
    core::app_state::AppState,
    error_handler::{AppError, AppResult},
    security::jwt::{self, Claims},
};

const ADMIN_ROLE: &str = "ADMIN";

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Serialize)]
struct LoginResponse {
    success: bool,
    message: String,
    token: String,
    username: String,
    roles: Vec<String>,
}

#[derive(Serialize)]
struct AuthMessage {
    success: bool,
    message: String,
}

#[derive(Serialize)]
struct RefreshResponse {
    success: bool,
    message: String,
    token: String,
}

#[derive(Serialize)]
struct ValidateResponse {
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    roles: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

/// Verifies the admin credentials and issues a bearer token.
#[instrument(name = "login_route", skip(state, payload))]
pub async fn login_route(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<Response> {
    let Json(body) = payload?;

    // --- Validate the request shape --------------------------------------------
    if body.username.is_empty() || body.username.len() > 50 {
        return Err(AppError::BadRequest(
            "username is required and must be at most 50 characters".into(),
        ));
    }
    if body.password.len() < 6 || body.password.len() > 100 {
        return Err(AppError::BadRequest(
            "password is required and must be 6 to 100 characters".into(),
        ));
    }

    // --- Check credentials ------------------------------------------------------
    let auth = &state.auth;
    let username_ok = body.username == auth.admin_username;
    let password_ok = constant_time_eq(&body.password, &auth.admin_password);

    if !(username_ok && password_ok) {
        warn!(username = %body.username, "login rejected");
        return Ok(failure_response("invalid username or password"));
    }

    let roles = vec![ADMIN_ROLE.to_string()];
    let token = jwt::issue_token(auth, &body.username, &roles)?;
    info!(username = %body.username, "login succeeded");

    Ok((
        StatusCode::OK,
        Json(LoginResponse {
            success: true,
            message: "login successful".into(),
            token,
            username: body.username,
            roles,
        }),
    )
        .into_response())
}

/// Re-issues a fresh token from a still-valid bearer token.
#[instrument(name = "refresh_route", skip(state, headers))]
pub async fn refresh_route(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> AppResult<Response> {
    let Some(claims) = bearer_claims(&state, &headers) else {
        return Ok(failure_response("invalid or expired token"));
    };

    let token = jwt::issue_token(&state.auth, &claims.username, &claims.roles)?;
    Ok((
        StatusCode::OK,
        Json(RefreshResponse {
            success: true,
            message: "token refreshed".into(),
            token,
        }),
    )
        .into_response())
}

/// Reports whether the presented bearer token is valid.
pub async fn validate_route(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    match bearer_claims(&state, &headers) {
        Some(claims) => (
            StatusCode::OK,
            Json(ValidateResponse {
                valid: true,
                username: Some(claims.username),
                roles: Some(claims.roles),
                message: None,
            }),
        )
            .into_response(),
        None => (
            StatusCode::UNAUTHORIZED,
            Json(ValidateResponse {
                valid: false,
                username: None,
                roles: None,
                message: Some("invalid or expired token".into()),
            }),
        )
            .into_response(),
    }
}

/// Acknowledges logout; the client discards its token copy.
pub async fn logout_route() -> Response {
    (
        StatusCode::OK,
        Json(AuthMessage {
            success: true,
            message: "logged out".into(),
        }),
    )
        .into_response()
}

fn bearer_claims(state: &AppState, headers: &HeaderMap) -> Option<Claims> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(jwt::bearer_token)?;
    jwt::decode_token(&state.auth, token).ok()
}

fn failure_response(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(AuthMessage {
            success: false,
            message: message.to_string(),
        }),
    )
        .into_response()
}
