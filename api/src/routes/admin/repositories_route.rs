//! CRUD + connectivity probe for watched repository configs.

use std::sync::Arc;

use axum::{
    extract::{Json, Path, State},
    response::Response,
};
use axum::extract::rejection::JsonRejection;
use config_store::RepositoryConfigDraft;
use review_engine::git_providers::ProviderClient;
use serde::Serialize;
use tracing::{info, instrument};

use crate::{
    core::{app_state::AppState, http::response_envelope::ApiResponse, model_bridge},
    error_handler::{AppError, AppResult},
};

pub async fn list_repositories_route(State(state): State<Arc<AppState>>) -> Response {
    ApiResponse::success(state.store.list_repositories().await).into_ok_response()
}

pub async fn list_active_repositories_route(State(state): State<Arc<AppState>>) -> Response {
    ApiResponse::success(state.store.list_active_repositories().await).into_ok_response()
}

pub async fn get_repository_route(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> AppResult<Response> {
    let repo = state
        .store
        .get_repository(id)
        .await
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success(repo).into_ok_response())
}

#[instrument(name = "create_repository_route", skip(state, payload))]
pub async fn create_repository_route(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RepositoryConfigDraft>, JsonRejection>,
) -> AppResult<Response> {
    let Json(draft) = payload?;
    let repo = state.store.create_repository(draft).await?;
    info!(id = repo.id, name = %repo.name, "repository config created");
    Ok(ApiResponse::success(repo).into_ok_response())
}

#[instrument(name = "update_repository_route", skip(state, payload))]
pub async fn update_repository_route(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    payload: Result<Json<RepositoryConfigDraft>, JsonRejection>,
) -> AppResult<Response> {
    let Json(draft) = payload?;
    let repo = state.store.update_repository(id, draft).await?;
    Ok(ApiResponse::success(repo).into_ok_response())
}

#[instrument(name = "delete_repository_route", skip(state))]
pub async fn delete_repository_route(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> AppResult<Response> {
    state.store.delete_repository(id).await?;
    info!(id, "repository config deleted");
    Ok(ApiResponse::success(serde_json::json!({ "id": id })).into_ok_response())
}

pub async fn toggle_repository_status_route(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> AppResult<Response> {
    let repo = state.store.toggle_repository_status(id).await?;
    Ok(ApiResponse::success(repo).into_ok_response())
}

pub async fn toggle_auto_review_route(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> AppResult<Response> {
    let repo = state.store.toggle_auto_review(id).await?;
    Ok(ApiResponse::success(repo).into_ok_response())
}

#[derive(Serialize)]
struct ConnectionTestResult {
    success: bool,
    message: String,
}

/// Probes the provider API with the stored access token.
#[instrument(name = "test_repository_connection_route", skip(state))]
pub async fn test_repository_connection_route(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> AppResult<Response> {
    let repo = state
        .store
        .get_repository(id)
        .await
        .ok_or(AppError::NotFound)?;

    let client = ProviderClient::from_credential(model_bridge::credential_from(&repo))?;
    let success = client.test_connection().await;
    let message = if success {
        format!("{} API reachable with the configured token", repo.provider)
    } else {
        format!("{} API rejected the probe, see server logs", repo.provider)
    };

    Ok(ApiResponse::success(ConnectionTestResult { success, message }).into_ok_response())
}
