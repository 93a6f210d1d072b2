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

const EVENT_HEADER: &str = "X-Gitlab-Event";
const TOKEN_HEADER: &str = "X-Gitlab-Token";

#[derive(Deserialize)]
struct GitLabMrEvent {
    object_attributes: GitLabMrAttributes,
    project: GitLabProject,
}

#[derive(Deserialize)]
struct GitLabMrAttributes {
    iid: u64,
    action: Option<String>,
}

#[derive(Deserialize)]
struct GitLabProject {
    id: u64,
}

/// GitLab webhook receiver.
///
/// Merge Request Hook deliveries with an actionable `action` schedule an
/// auto review; everything else is acknowledged or rejected per the
/// delivery flow.
#[instrument(name = "gitlab_webhook_route", skip(state, headers, body))]
pub async fn gitlab_webhook_route(
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
        "" => return bad_request("missing X-Gitlab-Event header"),
        other => {
            debug!(event = other, "unrecognized event");
            return bad_request("unrecognized X-Gitlab-Event");
        }
    }

    let payload: GitLabMrEvent = match serde_json::from_slice(&body) {
        Ok(p) => p,
        Err(err) => {
            warn!(%err, "malformed merge request payload");
            return bad_request("malformed merge request payload");
        }
    };

    // --- Resolve the repository config ----------------------------------------
    let project_id = payload.project.id.to_string();
    let Some(repo) = state
        .store
        .find_for_webhook(GitProvider::GitLab, &project_id)
        .await
    else {
        info!(project_id, "no repository config, auto review not enabled");
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
    let action = payload.object_attributes.action.as_deref().unwrap_or("");
    if !matches!(action, "opened" | "updated") {
        debug!(action, "non-actionable merge request action");
        return ack("event acknowledged");
    }

    schedule_review(state, repo, payload.object_attributes.iid);
    ack("review started")
}
