pub mod session_route;

use std::sync::Arc;

use axum::{Router, routing::post};

use crate::core::app_state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/login", post(session_route::login_route))
        .route("/refresh", post(session_route::refresh_route))
        .route("/validate", post(session_route::validate_route))
        .route("/logout", post(session_route::logout_route))
}
