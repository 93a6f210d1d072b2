//! Crate-wide error hierarchy for review-engine.
//!
//! Goals:
//! - Single root `Error` for all public functions.
//! - Provider-aware mapping (401→Unauthorized, 429→RateLimited, 5xx→Server, etc.).
//! - No dynamic dispatch, no async-trait, ergonomic `?` via `From` impls.

use thiserror::Error;

/// Convenient alias for crate-wide results.
pub type EngineResult<T> = Result<T, Error>;

/// Root error type for the review-engine crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Provider (GitLab/GitHub/Gitee) related failure.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Chat-completion layer failure.
    #[error(transparent)]
    Llm(#[from] ai_llm_service::AiLlmError),

    /// Generic catch-all error when nothing else fits.
    #[error("other error: {0}")]
    Other(String),
}

/// Detailed provider-specific error used inside the provider layer.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Unauthorized (HTTP 401).
    #[error("unauthorized")]
    Unauthorized,

    /// Forbidden (HTTP 403).
    #[error("forbidden")]
    Forbidden,

    /// Not found (HTTP 404).
    #[error("not found")]
    NotFound,

    /// Rate limited (HTTP 429).
    #[error("rate limited")]
    RateLimited { retry_after_secs: Option<u64> },

    /// Gateway/Server error (HTTP 5xx).
    #[error("server error: status {0}")]
    Server(u16),

    /// Other HTTP status (4xx/3xx) not covered above.
    #[error("http status error: {0}")]
    HttpStatus(u16),

    /// Timeout at transport level.
    #[error("timeout")]
    Timeout,

    /// Network/transport failure without status (DNS/connect/reset).
    #[error("network error: {0}")]
    Network(String),
}

// ===== Conversions for `?` ergonomics =====

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Provider(ProviderError::from(e))
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            return ProviderError::Timeout;
        }
        if let Some(status) = e.status() {
            let code = status.as_u16();
            return match code {
                401 => ProviderError::Unauthorized,
                403 => ProviderError::Forbidden,
                404 => ProviderError::NotFound,
                429 => ProviderError::RateLimited {
                    retry_after_secs: None,
                },
                500..=599 => ProviderError::Server(code),
                _ => ProviderError::HttpStatus(code),
            };
        }
        ProviderError::Network(e.to_string())
    }
}
