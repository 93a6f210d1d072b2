//! Chat-completion client shared by the review backend.
//!
//! - [`config::llm_model_config::LlmModelConfig`] describes one model
//!   endpoint (provider, model name, key, limits) and validates itself.
//! - [`services::chat_service::ChatService`] performs single, non-streaming
//!   chat completions against any OpenAI-compatible endpoint.
//! - [`health_service::HealthService`] probes an endpoint without ever
//!   failing; the snapshot it returns is JSON-serializable and suitable for
//!   admin "test connection" responses.

pub mod config;
pub mod error_handler;
pub mod health_service;
pub mod services;

pub use config::llm_model_config::LlmModelConfig;
pub use config::llm_provider::LlmProvider;
pub use error_handler::{AiLlmError, ConfigError, Result};
pub use health_service::{HealthService, HealthStatus};
pub use services::chat_service::ChatService;
