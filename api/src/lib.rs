//! HTTP surface of the review backend.
//!
//! [`start`] wires everything together: shared state from the environment,
//! seed data for an empty store, the axum router, and a listener with
//! graceful shutdown on Ctrl+C. [`app`] builds the router alone so tests can
//! serve it on an ephemeral port.

use std::{env, sync::Arc};

use axum::Router;
use tokio::signal;
use tracing::info;

pub mod core;
pub mod error_handler;
mod middleware_layer;
mod routes;
pub mod security;

pub use crate::core::app_state::AppState;
pub use error_handler::{AppError, AppResult};

/// Builds the full application router over shared state.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/api/webhook", routes::webhook::router())
        .nest("/api/admin", routes::admin::router(state.clone()))
        .nest("/api/auth", routes::auth::router())
        .nest("/api/code-review", routes::code_review::router())
        .with_state(state)
}

/// Loads state, seeds the store, and serves until Ctrl+C.
pub async fn start() -> Result<(), AppError> {
    let state = Arc::new(AppState::from_env()?);

    config_store::seed::seed_example_data(&state.store)
        .await
        .map_err(|e| AppError::BadRequest(format!("seed data rejected: {e}")))?;

    let host_url = env::var("API_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8080".into());
    let listener = tokio::net::TcpListener::bind(&host_url)
        .await
        .map_err(AppError::Bind)?;

    info!(address = %host_url, "review backend listening");

    // Start server with graceful shutdown on Ctrl+C
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    Ok(())
}

/// Returns a future that resolves when Ctrl+C is pressed
async fn shutdown_signal() {
    // Wait for the Ctrl+C signal
    signal::ctrl_c()
        .await
        .expect("Failed to listen for shutdown signal");
}
