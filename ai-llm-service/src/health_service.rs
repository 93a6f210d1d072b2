//! Health probe for chat-completion endpoints.
//!
//! The probe sends a one-token chat completion and reports how the endpoint
//! responded. The returned [`HealthStatus`] is JSON-serializable and is what
//! the admin "test connection" endpoint returns. [`HealthService::check`] is
//! resilient and never fails (errors are mapped to `ok = false`).

use std::time::Instant;

use serde::Serialize;
use tracing::{info, warn};

use crate::config::llm_model_config::LlmModelConfig;
use crate::services::chat_service::ChatService;

/// A serializable health snapshot for a single model config.
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    /// Provider tag (e.g., "ALIBABA", "OPENAI").
    pub provider: String,
    /// Target endpoint base URL.
    pub endpoint: String,
    /// Model identifier the probe used.
    pub model: String,
    /// Overall health flag.
    pub ok: bool,
    /// Measured latency in milliseconds for the probe.
    pub latency_ms: u64,
    /// Short human-readable message with details.
    pub message: String,
}

/// Connectivity checker for model configs.
pub struct HealthService;

impl HealthService {
    /// Probes the endpoint behind `cfg` with a minimal one-token request.
    ///
    /// This method is **resilient**: it never returns an error. Any failure
    /// (invalid config, network error, non-2xx, bad payload) is converted to
    /// `HealthStatus { ok: false, message: ... }`.
    pub async fn check(cfg: &LlmModelConfig) -> HealthStatus {
        let started = Instant::now();

        let service = match ChatService::new(cfg.clone()) {
            Ok(s) => s,
            Err(err) => {
                warn!(
                    provider = %cfg.provider,
                    endpoint = %cfg.endpoint,
                    error = %err,
                    "health probe rejected config"
                );
                return Self::fail(cfg, 0, err.to_string());
            }
        };

        match service.generate_with_limit("ping", 1).await {
            Ok(_) => {
                let latency_ms = started.elapsed().as_millis() as u64;
                info!(
                    provider = %cfg.provider,
                    endpoint = %cfg.endpoint,
                    model = %cfg.model,
                    latency_ms,
                    "health probe completed"
                );
                HealthStatus {
                    provider: cfg.provider.to_string(),
                    endpoint: cfg.endpoint.clone(),
                    model: cfg.model.clone(),
                    ok: true,
                    latency_ms,
                    message: "endpoint responded to chat completion probe".into(),
                }
            }
            Err(err) => {
                let latency_ms = started.elapsed().as_millis() as u64;
                warn!(
                    provider = %cfg.provider,
                    endpoint = %cfg.endpoint,
                    model = %cfg.model,
                    latency_ms,
                    error = %err,
                    "health probe failed"
                );
                Self::fail(cfg, latency_ms, err.to_string())
            }
        }
    }

    fn fail(cfg: &LlmModelConfig, latency_ms: u64, message: String) -> HealthStatus {
        HealthStatus {
            provider: cfg.provider.to_string(),
            endpoint: cfg.endpoint.clone(),
            model: cfg.model.clone(),
            ok: false,
            latency_ms,
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::llm_provider::LlmProvider;

    #[tokio::test]
    async fn invalid_config_reports_failure_instead_of_erroring() {
        let cfg = LlmModelConfig {
            provider: LlmProvider::OpenAi,
            model: "gpt-4".into(),
            endpoint: "not-a-url".into(),
            api_key: "sk-test".into(),
            max_tokens: 16,
            temperature: 0.7,
            timeout_ms: 1_000,
        };

        let status = HealthService::check(&cfg).await;
        assert!(!status.ok);
        assert_eq!(status.model, "gpt-4");
    }
}
