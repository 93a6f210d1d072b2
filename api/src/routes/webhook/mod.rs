//! Inbound webhook endpoints, one per Git provider.
//!
//! The contract with senders is deliberately forgiving: once a delivery is
//! accepted, everything that can go wrong downstream (diff fetch, LLM call,
//! comment post) ends in a log line, never in a non-2xx response or a retry.

pub mod gitee_route;
pub mod github_route;
pub mod gitlab_route;

use std::sync::Arc;

use axum::{
    Router,
    http::{HeaderMap, StatusCode},
    response::Response,
    routing::{get, post},
};
use chrono::Utc;
use config_store::RepositoryConfig;
use review_engine::{
    ReviewTask,
    git_providers::ProviderClient,
    review::{ReviewDispatcher, ReviewKind},
};
use serde::Serialize;
use serde_json::json;
use tracing::{error, info};

use crate::core::{
    app_state::AppState,
    http::response_envelope::ApiResponse,
    model_bridge::{credential_from, llm_config_from},
};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/gitlab", post(gitlab_route::gitlab_webhook_route))
        .route("/github", post(github_route::github_webhook_route))
        .route("/gitee", post(gitee_route::gitee_webhook_route))
        .route("/health", get(webhook_health_route))
}

/// Reports which webhook endpoints this instance serves.
async fn webhook_health_route() -> Response {
    ApiResponse::success(json!({
        "status": "UP",
        "timestamp": Utc::now().to_rfc3339(),
        "webhooks": {
            "gitlab": "/api/webhook/gitlab",
            "github": "/api/webhook/github",
            "gitee": "/api/webhook/gitee",
        }
    }))
    .into_ok_response()
}

#[derive(Serialize)]
struct WebhookAck {
    message: String,
}

/// 200 acknowledgement with a short message.
pub(super) fn ack(message: &str) -> Response {
    ApiResponse::success(WebhookAck {
        message: message.to_string(),
    })
    .into_ok_response()
}

pub(super) fn bad_request(message: &str) -> Response {
    ApiResponse::<()>::error("BAD_REQUEST", message, Vec::new())
        .into_response_with_status(StatusCode::BAD_REQUEST)
}

pub(super) fn unauthorized(message: &str) -> Response {
    ApiResponse::<()>::error("UNAUTHORIZED", message, Vec::new())
        .into_response_with_status(StatusCode::UNAUTHORIZED)
}

/// Header value as a string, or empty when absent/non-UTF-8.
pub(super) fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> &'a str {
    headers
        .get(name)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("")
}

/// Schedules the fetch-review-comment sequence for one MR/PR.
///
/// The model config is resolved inside the spawned task so the webhook
/// response never waits on the store or the provider. A missing default
/// model or a bad credential ends the task with an error log only.
pub(super) fn schedule_review(state: Arc<AppState>, repo: RepositoryConfig, request_id: u64) {
    info!(
        repository = %repo.name,
        provider = %repo.provider,
        request_id,
        "scheduling auto review"
    );

    tokio::spawn(async move {
        let Some(model) = state.store.get_default_model().await else {
            error!(repository = %repo.name, "no default model config, review skipped");
            return;
        };

        let client = match ProviderClient::from_credential(credential_from(&repo)) {
            Ok(c) => c,
            Err(err) => {
                error!(repository = %repo.name, %err, "provider client rejected credential");
                return;
            }
        };

        let dispatcher =
            match ReviewDispatcher::new(llm_config_from(&model), state.ai_review_enabled) {
                Ok(d) => d,
                Err(err) => {
                    error!(model = %model.name, %err, "model config rejected by dispatcher");
                    return;
                }
            };

        ReviewTask::spawn(
            client,
            Arc::new(dispatcher),
            request_id,
            ReviewKind::Comprehensive,
            repo.review_threshold,
        )
        .detach();
    });
}
