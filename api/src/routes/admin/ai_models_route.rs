//! CRUD + connectivity probe for chat model configs.

use std::sync::Arc;

use axum::{
    extract::{Json, Path, State},
    response::Response,
};
use axum::extract::rejection::JsonRejection;
use ai_llm_service::HealthService;
use config_store::ModelConfigDraft;
use serde::Serialize;
use tracing::{info, instrument};

use crate::{
    core::{app_state::AppState, http::response_envelope::ApiResponse, model_bridge},
    error_handler::{AppError, AppResult},
};

pub async fn list_models_route(State(state): State<Arc<AppState>>) -> Response {
    ApiResponse::success(state.store.list_models().await).into_ok_response()
}

pub async fn list_active_models_route(State(state): State<Arc<AppState>>) -> Response {
    ApiResponse::success(state.store.list_active_models().await).into_ok_response()
}

pub async fn get_model_route(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> AppResult<Response> {
    let model = state.store.get_model(id).await.ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success(model).into_ok_response())
}

#[instrument(name = "create_model_route", skip(state, payload))]
pub async fn create_model_route(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ModelConfigDraft>, JsonRejection>,
) -> AppResult<Response> {
    let Json(draft) = payload?;
    let model = state.store.create_model(draft).await?;
    info!(id = model.id, name = %model.name, "model config created");
    Ok(ApiResponse::success(model).into_ok_response())
}

#[instrument(name = "update_model_route", skip(state, payload))]
pub async fn update_model_route(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    payload: Result<Json<ModelConfigDraft>, JsonRejection>,
) -> AppResult<Response> {
    let Json(draft) = payload?;
    let model = state.store.update_model(id, draft).await?;
    Ok(ApiResponse::success(model).into_ok_response())
}

#[instrument(name = "delete_model_route", skip(state))]
pub async fn delete_model_route(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> AppResult<Response> {
    state.store.delete_model(id).await?;
    info!(id, "model config deleted");
    Ok(ApiResponse::success(serde_json::json!({ "id": id })).into_ok_response())
}

pub async fn set_default_model_route(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> AppResult<Response> {
    let model = state.store.set_default_model(id).await?;
    info!(id, name = %model.name, "default model changed");
    Ok(ApiResponse::success(model).into_ok_response())
}

pub async fn toggle_model_status_route(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> AppResult<Response> {
    let model = state.store.toggle_model_status(id).await?;
    Ok(ApiResponse::success(model).into_ok_response())
}

#[derive(Serialize)]
struct ConnectionTestResult {
    success: bool,
    message: String,
    latency_ms: u64,
}

/// Probes the stored config with a one-token chat completion.
#[instrument(name = "test_model_connection_route", skip(state))]
pub async fn test_model_connection_route(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> AppResult<Response> {
    let model = state.store.get_model(id).await.ok_or(AppError::NotFound)?;
    let status = HealthService::check(&model_bridge::llm_config_from(&model)).await;

    Ok(ApiResponse::success(ConnectionTestResult {
        success: status.ok,
        message: status.message,
        latency_ms: status.latency_ms,
    })
    .into_ok_response())
}
