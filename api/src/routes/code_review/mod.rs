pub mod review_request;
pub mod review_route;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::app_state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/submit", post(review_route::submit_review_route))
        .route("/quick", post(review_route::quick_review_route))
        .route("/security", post(review_route::security_review_route))
        .route("/performance", post(review_route::performance_review_route))
        .route("/summary", post(review_route::summary_review_route))
        .route("/health", get(review_route::review_health_route))
        .route("/{review_id}", get(review_route::get_review_route))
}
