//! Unified error handling for `ai-llm-service`.
//!
//! This module exposes a single top-level error type [`AiLlmError`] for the
//! whole library, and groups domain-specific errors in nested enums
//! ([`ConfigError`], [`ChatError`]). Validation helpers return the unified
//! [`Result<T>`] alias.
//!
//! All messages include the suffix `[AI LLM Service]` to simplify attribution
//! in logs.

use reqwest::StatusCode;
use thiserror::Error;

/// Unified result alias for the entire crate.
pub type Result<T> = std::result::Result<T, AiLlmError>;

/// Top-level error for the `ai-llm-service` crate.
///
/// Variants wrap domain-specific enums (config/chat) plus the HTTP transport
/// case. Prefer adding new sub-enums for distinct domains instead of growing
/// this type indefinitely. Transport timeouts surface as `HttpTransport`.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum AiLlmError {
    /// Configuration/validation errors (startup/readiness).
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Chat completion request/decoding errors.
    #[error(transparent)]
    Chat(#[from] ChatError),

    /// Underlying HTTP transport error (e.g., `reqwest::Error`).
    #[error("[AI LLM Service] transport error: {0}")]
    HttpTransport(#[from] reqwest::Error),
}

/// Error enum for config-driven setup.
///
/// Keep this focused: only errors that realistically happen at config
/// load/validation time.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Value had the wrong format (e.g., invalid URL).
    #[error("[AI LLM Service] invalid format in {var}: {reason}")]
    InvalidFormat {
        /// Variable or field name (e.g., `api_endpoint`).
        var: &'static str,
        /// Explanation (e.g., `must start with http:// or https://`).
        reason: &'static str,
    },

    /// A numeric field was outside of the allowed range.
    #[error("[AI LLM Service] {field} is out of range: {detail}")]
    OutOfRange {
        /// Field name (e.g., `temperature`).
        field: &'static str,
        /// Description of the expected range (e.g., `expected 0.0..=2.0`).
        detail: &'static str,
    },

    /// Model name was empty or invalid.
    #[error("[AI LLM Service] model name must not be empty")]
    EmptyModel,

    /// API key is required for the configured provider.
    #[error("[AI LLM Service] api key must not be empty")]
    MissingApiKey,
}

/// Error enum for chat completion calls.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ChatError {
    /// Upstream returned a non-successful HTTP status.
    #[error("[AI LLM Service] HTTP {status} from {url}: {snippet}")]
    HttpStatus {
        /// Numeric HTTP status code.
        status: StatusCode,
        /// Request URL.
        url: String,
        /// Short snippet of the response body (trimmed).
        snippet: String,
    },

    /// Response payload could not be decoded as expected.
    #[error("[AI LLM Service] decode error: {0}")]
    Decode(String),

    /// Response decoded fine but contained no choices.
    #[error("[AI LLM Service] chat completion returned no choices")]
    EmptyChoices,
}

/* ------------------------------------------------------------------------- */
/* Validation helpers (return unified `Result<T>`)                           */
/* ------------------------------------------------------------------------- */

/// Validates that an HTTP endpoint starts with `http://` or `https://`.
///
/// # Errors
/// Returns [`AiLlmError::Config`] with [`ConfigError::InvalidFormat`] when
/// the string does not start with a valid HTTP scheme.
pub fn validate_http_endpoint(var: &'static str, value: &str) -> Result<()> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::InvalidFormat {
            var,
            reason: "must start with http:// or https://",
        }
        .into())
    }
}

/// Validates that a floating-point value lies within an inclusive range.
///
/// # Errors
/// Returns [`AiLlmError::Config`] with [`ConfigError::OutOfRange`] if `value`
/// is outside `[min, max]`.
pub fn validate_range_f32(field: &'static str, value: f32, min: f32, max: f32) -> Result<()> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            detail: "expected value in inclusive range",
        }
        .into())
    }
}

/// Trims a response body down to a short, log-friendly snippet.
pub fn make_snippet(text: &str) -> String {
    const MAX: usize = 240;
    let trimmed = text.trim();
    if trimmed.len() <= MAX {
        trimmed.to_string()
    } else {
        let mut end = MAX;
        while !trimmed.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}…", &trimmed[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_validation_requires_http_scheme() {
        assert!(validate_http_endpoint("api_endpoint", "https://api.example.com").is_ok());
        assert!(validate_http_endpoint("api_endpoint", "http://localhost:8080").is_ok());
        assert!(validate_http_endpoint("api_endpoint", "ftp://api.example.com").is_err());
        assert!(validate_http_endpoint("api_endpoint", "").is_err());
    }

    #[test]
    fn range_validation_is_inclusive() {
        assert!(validate_range_f32("temperature", 0.0, 0.0, 2.0).is_ok());
        assert!(validate_range_f32("temperature", 2.0, 0.0, 2.0).is_ok());
        assert!(validate_range_f32("temperature", 2.1, 0.0, 2.0).is_err());
        assert!(validate_range_f32("temperature", f32::NAN, 0.0, 2.0).is_err());
    }

    #[test]
    fn snippet_is_bounded() {
        let long = "x".repeat(1000);
        assert!(make_snippet(&long).chars().count() <= 241);
        assert_eq!(make_snippet("  short  "), "short");
    }
}
