//! Aggregate counts for the admin dashboard.

use std::sync::Arc;

use axum::{Extension, extract::State, response::Response};
use chrono::Utc;
use config_store::ModelConfig;
use serde::Serialize;
use tracing::debug;

use crate::core::{app_state::AppState, http::response_envelope::ApiResponse};
use crate::middleware_layer::auth_layer::AuthUser;

#[derive(Serialize)]
struct DashboardSummary {
    total_ai_models: usize,
    active_models: usize,
    default_model: Option<ModelConfig>,
    total_repositories: usize,
    active_repositories: usize,
    auto_review_repositories: usize,
    /// Review/issue counters need durable storage; fixed at zero until then.
    total_reviews: u64,
    total_issues: u64,
}

pub async fn dashboard_route(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Response {
    debug!(user = %user.username, "dashboard requested");

    let models = state.store.list_models().await;
    let repositories = state.store.list_repositories().await;

    let summary = DashboardSummary {
        total_ai_models: models.len(),
        active_models: models.iter().filter(|m| m.is_active).count(),
        default_model: state.store.get_default_model().await,
        total_repositories: repositories.len(),
        active_repositories: repositories.iter().filter(|r| r.is_active).count(),
        auto_review_repositories: repositories
            .iter()
            .filter(|r| r.is_active && r.auto_review_enabled)
            .count(),
        total_reviews: 0,
        total_issues: 0,
    };

    ApiResponse::success(summary).into_ok_response()
}

pub async fn admin_health_route() -> Response {
    ApiResponse::success(serde_json::json!({
        "status": "UP",
        "timestamp": Utc::now().to_rfc3339(),
    }))
    .into_ok_response()
}
