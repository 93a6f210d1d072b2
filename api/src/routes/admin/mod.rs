//! Admin REST surface: model config and repository config management.
//!
//! Every route except `/health` sits behind the bearer-token middleware.

pub mod ai_models_route;
pub mod dashboard_route;
pub mod repositories_route;

use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::core::app_state::AppState;
use crate::middleware_layer::auth_layer::require_auth;

pub fn router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        // --- model configs ---
        .route(
            "/ai-models",
            get(ai_models_route::list_models_route).post(ai_models_route::create_model_route),
        )
        .route("/ai-models/active", get(ai_models_route::list_active_models_route))
        .route(
            "/ai-models/{id}",
            get(ai_models_route::get_model_route)
                .put(ai_models_route::update_model_route)
                .delete(ai_models_route::delete_model_route),
        )
        .route(
            "/ai-models/{id}/set-default",
            post(ai_models_route::set_default_model_route),
        )
        .route(
            "/ai-models/{id}/toggle-status",
            post(ai_models_route::toggle_model_status_route),
        )
        .route(
            "/ai-models/{id}/test-connection",
            post(ai_models_route::test_model_connection_route),
        )
        // --- repository configs ---
        .route(
            "/repositories",
            get(repositories_route::list_repositories_route)
                .post(repositories_route::create_repository_route),
        )
        .route(
            "/repositories/active",
            get(repositories_route::list_active_repositories_route),
        )
        .route(
            "/repositories/{id}",
            get(repositories_route::get_repository_route)
                .put(repositories_route::update_repository_route)
                .delete(repositories_route::delete_repository_route),
        )
        .route(
            "/repositories/{id}/toggle-status",
            post(repositories_route::toggle_repository_status_route),
        )
        .route(
            "/repositories/{id}/toggle-auto-review",
            post(repositories_route::toggle_auto_review_route),
        )
        .route(
            "/repositories/{id}/test-connection",
            post(repositories_route::test_repository_connection_route),
        )
        // --- dashboard ---
        .route("/dashboard", get(dashboard_route::dashboard_route))
        .layer(middleware::from_fn_with_state(state, require_auth))
        // liveness stays reachable without a token
        .route("/health", get(dashboard_route::admin_health_route))
}
