//! Direct review submission endpoints (no webhook involved).
//!
//! `/submit` runs in the background against the in-process job registry;
//! the kind-specific endpoints block until the review text is ready.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::Response,
};
use axum::extract::rejection::JsonRejection;
use chrono::{DateTime, Utc};
use review_engine::review::{ReviewDispatcher, ReviewKind};
use serde::Serialize;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    core::{
        app_state::AppState,
        http::response_envelope::ApiResponse,
        model_bridge,
        review_jobs::JobStatus,
    },
    error_handler::{AppError, AppResult},
    routes::code_review::review_request::CodeReviewRequest,
};

#[derive(Serialize)]
struct SubmitResponse {
    review_id: String,
    project_id: String,
    merge_request_id: String,
    status: JobStatus,
    created_at: DateTime<Utc>,
}

/// Registers a review job and runs it in the background.
#[instrument(name = "submit_review_route", skip(state, payload))]
pub async fn submit_review_route(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CodeReviewRequest>, JsonRejection>,
) -> AppResult<Response> {
    let Json(request) = payload?;
    let diff = non_empty_diff(&request)?;

    let review_id = Uuid::new_v4().to_string();
    let job = state
        .review_jobs
        .register(
            review_id.clone(),
            request.project_id.clone(),
            request.merge_request_id.clone(),
            request.review_type,
        )
        .await;
    info!(review_id, review_type = ?request.review_type, "review job registered");

    let worker_state = state.clone();
    let job_id = review_id.clone();
    let kind = request.review_type;
    tokio::spawn(async move {
        let started = Instant::now();
        let result = review_text(&worker_state, &diff, kind).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;
        match result {
            Ok(text) => worker_state.review_jobs.complete(&job_id, text, elapsed_ms).await,
            Err(err) => {
                worker_state
                    .review_jobs
                    .fail(&job_id, err.to_string(), elapsed_ms)
                    .await
            }
        }
    });

    Ok(ApiResponse::success(SubmitResponse {
        review_id,
        project_id: job.project_id,
        merge_request_id: job.merge_request_id,
        status: job.status,
        created_at: job.created_at,
    })
    .into_response_with_status(StatusCode::ACCEPTED))
}

/// Returns the current state of a submitted review job.
pub async fn get_review_route(
    State(state): State<Arc<AppState>>,
    Path(review_id): Path<String>,
) -> AppResult<Response> {
    let job = state
        .review_jobs
        .get(&review_id)
        .await
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success(job).into_ok_response())
}

pub async fn quick_review_route(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CodeReviewRequest>, JsonRejection>,
) -> AppResult<Response> {
    sync_review(state, payload, ReviewKind::Basic).await
}

pub async fn security_review_route(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CodeReviewRequest>, JsonRejection>,
) -> AppResult<Response> {
    sync_review(state, payload, ReviewKind::Security).await
}

pub async fn performance_review_route(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CodeReviewRequest>, JsonRejection>,
) -> AppResult<Response> {
    sync_review(state, payload, ReviewKind::Performance).await
}

pub async fn summary_review_route(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CodeReviewRequest>, JsonRejection>,
) -> AppResult<Response> {
    sync_review(state, payload, ReviewKind::Summary).await
}

pub async fn review_health_route() -> Response {
    ApiResponse::success(serde_json::json!({
        "status": "UP",
        "timestamp": Utc::now().to_rfc3339(),
    }))
    .into_ok_response()
}

#[derive(Serialize)]
struct SyncReviewResponse {
    project_id: String,
    merge_request_id: String,
    review_type: ReviewKind,
    result: String,
    elapsed_ms: u64,
}

/// Runs one review kind to completion and returns the text inline.
async fn sync_review(
    state: Arc<AppState>,
    payload: Result<Json<CodeReviewRequest>, JsonRejection>,
    kind: ReviewKind,
) -> AppResult<Response> {
    let Json(request) = payload?;
    let diff = non_empty_diff(&request)?;

    let started = Instant::now();
    let text = review_text(&state, &diff, kind).await?;
    let elapsed_ms = started.elapsed().as_millis() as u64;
    info!(
        project_id = %request.project_id,
        merge_request_id = %request.merge_request_id,
        ?kind,
        elapsed_ms,
        "synchronous review completed"
    );

    Ok(ApiResponse::success(SyncReviewResponse {
        project_id: request.project_id,
        merge_request_id: request.merge_request_id,
        review_type: kind,
        result: text,
        elapsed_ms,
    })
    .into_ok_response())
}

fn non_empty_diff(request: &CodeReviewRequest) -> Result<String, AppError> {
    let diff = request.diff_content.trim();
    if diff.is_empty() {
        return Err(AppError::BadRequest("diff_content must not be empty".into()));
    }
    Ok(diff.to_string())
}

/// Builds a dispatcher over the default model and runs the review.
async fn review_text(state: &AppState, diff: &str, kind: ReviewKind) -> Result<String, AppError> {
    let model = state
        .store
        .get_default_model()
        .await
        .ok_or_else(|| AppError::Config("no default model config is set".into()))?;

    let dispatcher = ReviewDispatcher::new(
        model_bridge::llm_config_from(&model),
        state.ai_review_enabled,
    )?;
    Ok(dispatcher.review(diff, kind).await?)
}
