use crate::config::llm_provider::LlmProvider;
use crate::error_handler::{
    ConfigError, Result, validate_http_endpoint, validate_range_f32,
};

/// Configuration for one chat-completion endpoint.
///
/// Mirrors the persisted model config record: the admin surface stores these
/// fields, and both the review dispatcher and the "test connection" probe
/// build clients from them.
#[derive(Debug, Clone)]
pub struct LlmModelConfig {
    /// The LLM vendor behind the endpoint.
    pub provider: LlmProvider,

    /// Model identifier string (e.g., `"qwen-plus"`, `"gpt-4"`).
    pub model: String,

    /// API base URL (the `/v1/chat/completions` path is appended).
    pub endpoint: String,

    /// API key sent as `Authorization: Bearer`.
    pub api_key: String,

    /// Maximum number of tokens to generate.
    pub max_tokens: u32,

    /// Sampling temperature.
    pub temperature: f32,

    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl LlmModelConfig {
    /// Checks the config for problems that would make every request fail.
    ///
    /// # Errors
    /// - [`ConfigError::EmptyModel`] when the model name is blank
    /// - [`ConfigError::MissingApiKey`] when the key is blank
    /// - [`ConfigError::InvalidFormat`] when the endpoint has no http scheme
    /// - [`ConfigError::OutOfRange`] when temperature is outside `0.0..=2.0`
    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(ConfigError::EmptyModel.into());
        }
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey.into());
        }
        validate_http_endpoint("api_endpoint", self.endpoint.trim())?;
        validate_range_f32("temperature", self.temperature, 0.0, 2.0)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> LlmModelConfig {
        LlmModelConfig {
            provider: LlmProvider::OpenAi,
            model: "gpt-4".into(),
            endpoint: "https://api.openai.com".into(),
            api_key: "sk-test".into(),
            max_tokens: 4000,
            temperature: 0.7,
            timeout_ms: 30_000,
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(cfg().validate().is_ok());
    }

    #[test]
    fn blank_fields_are_rejected() {
        let mut c = cfg();
        c.model = "  ".into();
        assert!(c.validate().is_err());

        let mut c = cfg();
        c.api_key = String::new();
        assert!(c.validate().is_err());

        let mut c = cfg();
        c.endpoint = "api.openai.com".into();
        assert!(c.validate().is_err());
    }

    #[test]
    fn temperature_out_of_range_is_rejected() {
        let mut c = cfg();
        c.temperature = 2.5;
        assert!(c.validate().is_err());
    }
}
