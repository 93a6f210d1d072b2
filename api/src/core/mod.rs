pub mod app_state;
pub mod http;
pub mod model_bridge;
pub mod review_jobs;
