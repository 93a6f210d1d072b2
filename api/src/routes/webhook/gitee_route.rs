use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    response::Response,
};
use config_store::GitProvider;
use review_engine::signature;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use crate::core::app_state::AppState;

use super::{ack, bad_request, header_str, schedule_review, unauthorized};

const EVENT_HEADER: &str = "X-Gitee-Event";
const TOKEN_HEADER: &str = "X-Gitee-Token";

#[derive(Deserialize)]
struct GiteePrEvent {
    action: Option<String>,
    pull_request: GiteePullRequest,
    repository: GiteeRepository,
}

#[derive(Deserialize)]
struct GiteePullRequest {
    number: u64,
}

#[derive(Deserialize)]
struct GiteeRepository {
    full_name: String,
}

/// Gitee webhook receiver.
///
/// Gitee names its MR event like GitLab ("Merge Request Hook") but ships a
/// GitHub-shaped payload, so the two halves mirror the other receivers.
#[instrument(name = "gitee_webhook_route", skip(state, headers, body))]
pub async fn gitee_webhook_route(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    // --- Classify the event ---------------------------------------------------
    let event = header_str(&headers, EVENT_HEADER);
    match event {
        "Merge Request Hook" => {}
        "Push Hook" => {
            debug!("push event acknowledged");
            return ack("push event received");
        }
        "" => return bad_request("missing X-Gitee-Event header"),
        other => {
            debug!(event = other, "unrecognized event");
            return bad_request("unrecognized X-Gitee-Event");
        }
    }

    let payload: GiteePrEvent = match serde_json::from_slice(&body) {
        Ok(p) => p,
        Err(err) => {
            warn!(%err, "malformed pull request payload");
            return bad_request("malformed pull request payload");
        }
    };

    // --- Resolve the repository config ----------------------------------------
    let Some(repo) = state
        .store
        .find_for_webhook(GitProvider::Gitee, &payload.repository.full_name)
        .await
    else {
        info!(
            repository = %payload.repository.full_name,
            "no repository config, auto review not enabled"
        );
        return ack("auto review not enabled");
    };
    if !repo.is_active || !repo.auto_review_enabled {
        info!(repository = %repo.name, "repository inactive or auto review off");
        return ack("auto review not enabled");
    }

    // --- Verify the shared token ----------------------------------------------
    match repo.webhook_secret.as_deref() {
        Some(secret) => {
            if !signature::verify_shared_token(header_str(&headers, TOKEN_HEADER), secret) {
                warn!(repository = %repo.name, "webhook token mismatch");
                return unauthorized("invalid webhook token");
            }
        }
        None => warn!(repository = %repo.name, "no webhook secret configured, token check skipped"),
    }

    // --- Dispatch --------------------------------------------------------------
    let action = payload.action.as_deref().unwrap_or("");
    if !matches!(action, "opened" | "updated") {
        debug!(action, "non-actionable pull request action");
        return ack("event acknowledged");
    }

    schedule_review(state, repo, payload.pull_request.number);
    ack("review started")
}
