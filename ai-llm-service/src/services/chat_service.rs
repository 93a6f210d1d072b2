//! Chat-completion service for OpenAI-compatible endpoints.
//!
//! Minimal, synchronous (non-streaming) client:
//! - POST {endpoint}/v1/chat/completions — chat completion (non-streaming)
//!
//! Constructor validation:
//! - `cfg.model` and `cfg.api_key` must be non-empty
//! - `cfg.endpoint` must start with http:// or https://
//! - `cfg.temperature` must lie in 0.0..=2.0
//!
//! Errors are normalized via unified error types in `error_handler`.

use std::time::{Duration, Instant};

use reqwest::header;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::config::llm_model_config::LlmModelConfig;
use crate::error_handler::{AiLlmError, ChatError, make_snippet};

/// Thin client for one chat-completion endpoint.
///
/// Constructed from a complete [`LlmModelConfig`]. Internally keeps a
/// preconfigured `reqwest::Client` (with timeout and default headers).
#[derive(Debug)]
pub struct ChatService {
    client: reqwest::Client,
    cfg: LlmModelConfig,
    url_chat: String,
}

impl ChatService {
    /// Creates a new [`ChatService`] from the given config.
    ///
    /// Validates the config, then builds an HTTP client with default headers
    /// and the configured timeout.
    ///
    /// # Errors
    /// - [`AiLlmError::Config`] for any validation failure
    /// - [`AiLlmError::HttpTransport`] if the HTTP client cannot be built
    pub fn new(cfg: LlmModelConfig) -> Result<Self, AiLlmError> {
        cfg.validate()?;

        let timeout = Duration::from_millis(cfg.timeout_ms);

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&format!("Bearer {}", cfg.api_key)).map_err(|e| {
                ChatError::Decode(format!("invalid API key header: {e}"))
            })?,
        );
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        let base = cfg.endpoint.trim().trim_end_matches('/').to_string();
        let url_chat = format!("{}/v1/chat/completions", base);

        info!(
            provider = %cfg.provider,
            model = %cfg.model,
            endpoint = %cfg.endpoint,
            timeout_ms = cfg.timeout_ms,
            "ChatService initialized"
        );

        Ok(Self {
            client,
            cfg,
            url_chat,
        })
    }

    /// The config this service was built from.
    pub fn config(&self) -> &LlmModelConfig {
        &self.cfg
    }

    /// Performs a **non-streaming** chat completion request.
    ///
    /// Sends a single user message with `prompt` and returns
    /// `choices[0].message.content` verbatim.
    ///
    /// # Errors
    /// - [`ChatError::HttpStatus`] for non-2xx responses
    /// - [`AiLlmError::HttpTransport`] for client/network failures
    /// - [`ChatError::Decode`] if the JSON cannot be parsed
    /// - [`ChatError::EmptyChoices`] if no choices are returned
    pub async fn generate(&self, prompt: &str) -> Result<String, AiLlmError> {
        self.generate_with_limit(prompt, self.cfg.max_tokens).await
    }

    /// Same as [`generate`](Self::generate) with an explicit token budget.
    ///
    /// The health probe uses this to send a one-token request.
    pub async fn generate_with_limit(
        &self,
        prompt: &str,
        max_tokens: u32,
    ) -> Result<String, AiLlmError> {
        let started = Instant::now();
        let body = ChatCompletionRequest {
            model: &self.cfg.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens,
            temperature: self.cfg.temperature,
        };

        debug!(
            model = %self.cfg.model,
            endpoint = %self.cfg.endpoint,
            prompt_len = prompt.len(),
            max_tokens,
            "POST {}", self.url_chat
        );

        let resp = self.client.post(&self.url_chat).json(&body).send().await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let url = self.url_chat.clone();
            let text = resp.text().await.unwrap_or_default();
            let snippet = make_snippet(&text);

            error!(
                %status,
                %url,
                %snippet,
                model = %self.cfg.model,
                latency_ms = started.elapsed().as_millis() as u64,
                "chat completion returned non-success status"
            );

            return Err(ChatError::HttpStatus {
                status,
                url,
                snippet,
            }
            .into());
        }

        let out: ChatCompletionResponse = resp.json().await.map_err(|e| {
            error!(
                error = %e,
                model = %self.cfg.model,
                latency_ms = started.elapsed().as_millis() as u64,
                "failed to decode chat completion response"
            );
            ChatError::Decode(format!(
                "serde error: {e}; expected `choices[0].message.content`"
            ))
        })?;

        let content = out
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or(ChatError::EmptyChoices)?;

        debug!(
            model = %self.cfg.model,
            latency_ms = started.elapsed().as_millis() as u64,
            output_len = content.len(),
            "chat completion finished"
        );

        Ok(content)
    }
}

/* ----------------------------- wire shapes ------------------------------ */

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}
