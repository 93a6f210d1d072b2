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

const EVENT_HEADER: &str = "X-GitHub-Event";
const SIGNATURE_HEADER: &str = "X-Hub-Signature-256";

#[derive(Deserialize)]
struct GitHubPrEvent {
    action: Option<String>,
    pull_request: GitHubPullRequest,
    repository: GitHubRepository,
}

#[derive(Deserialize)]
struct GitHubPullRequest {
    number: u64,
}

#[derive(Deserialize)]
struct GitHubRepository {
    full_name: String,
}

/// GitHub webhook receiver.
///
/// Unlike GitLab/Gitee token checks, GitHub signs the raw request body with
/// HMAC-SHA256; the signature is verified over the exact bytes received.
#[instrument(name = "github_webhook_route", skip(state, headers, body))]
pub async fn github_webhook_route(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    // --- Classify the event ---------------------------------------------------
    let event = header_str(&headers, EVENT_HEADER);
    match event {
        "pull_request" => {}
        "push" => {
            debug!("push event acknowledged");
            return ack("push event received");
        }
        "" => return bad_request("missing X-GitHub-Event header"),
        other => {
            debug!(event = other, "unrecognized event");
            return bad_request("unrecognized X-GitHub-Event");
        }
    }

    let payload: GitHubPrEvent = match serde_json::from_slice(&body) {
        Ok(p) => p,
        Err(err) => {
            warn!(%err, "malformed pull request payload");
            return bad_request("malformed pull request payload");
        }
    };

    // --- Resolve the repository config ----------------------------------------
    let Some(repo) = state
        .store
        .find_for_webhook(GitProvider::GitHub, &payload.repository.full_name)
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

    // --- Verify the body signature ---------------------------------------------
    match repo.webhook_secret.as_deref() {
        Some(secret) => {
            let provided = header_str(&headers, SIGNATURE_HEADER);
            if !signature::verify_hmac_signature(&body, provided, secret) {
                warn!(repository = %repo.name, "webhook signature mismatch");
                return unauthorized("invalid webhook signature");
            }
        }
        None => warn!(
            repository = %repo.name,
            "no webhook secret configured, signature check skipped"
        ),
    }

    // --- Dispatch --------------------------------------------------------------
    let action = payload.action.as_deref().unwrap_or("");
    if !matches!(action, "opened" | "synchronize") {
        debug!(action, "non-actionable pull request action");
        return ack("event acknowledged");
    }

    schedule_review(state, repo, payload.pull_request.number);
    ack("review started")
}
