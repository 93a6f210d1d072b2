//! Record types managed by the admin surface.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Git hosting provider a repository config belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GitProvider {
    #[serde(rename = "GITLAB")]
    GitLab,
    #[serde(rename = "GITHUB")]
    GitHub,
    #[serde(rename = "GITEE")]
    Gitee,
}

impl GitProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            GitProvider::GitLab => "GITLAB",
            GitProvider::GitHub => "GITHUB",
            GitProvider::Gitee => "GITEE",
        }
    }
}

impl std::fmt::Display for GitProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Upstream LLM vendor for a model config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelProvider {
    #[serde(rename = "ALIBABA")]
    Alibaba,
    #[serde(rename = "OPENAI")]
    OpenAi,
    #[serde(rename = "ANTHROPIC")]
    Anthropic,
}

impl ModelProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelProvider::Alibaba => "ALIBABA",
            ModelProvider::OpenAi => "OPENAI",
            ModelProvider::Anthropic => "ANTHROPIC",
        }
    }
}

impl std::fmt::Display for ModelProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Chat model configuration.
///
/// `name` is unique and doubles as the model identifier sent to the
/// provider API (e.g. `qwen-plus`). At most one record is the default.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub id: u64,
    pub name: String,
    pub provider: ModelProvider,
    pub api_key: String,
    pub api_endpoint: String,
    pub temperature: f64,
    pub max_tokens: u32,
    pub timeout_ms: u64,
    pub is_active: bool,
    pub is_default: bool,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating or replacing a [`ModelConfig`].
///
/// Optional fields fall back to the stock defaults when omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfigDraft {
    pub name: String,
    pub provider: ModelProvider,
    pub api_key: String,
    pub api_endpoint: String,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
    pub timeout_ms: Option<u64>,
    pub is_active: Option<bool>,
    pub is_default: Option<bool>,
    pub description: Option<String>,
}

impl ModelConfigDraft {
    pub const DEFAULT_TEMPERATURE: f64 = 0.7;
    pub const DEFAULT_MAX_TOKENS: u32 = 4000;
    pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;
}

/// Watched repository configuration.
///
/// `project_id` carries the provider-native identifier: a numeric project
/// id for GitLab, the `owner/repo` full name for GitHub and Gitee.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryConfig {
    pub id: u64,
    pub name: String,
    pub repository_url: String,
    pub provider: GitProvider,
    pub project_id: Option<String>,
    pub access_token: String,
    pub webhook_secret: Option<String>,
    pub webhook_url: Option<String>,
    pub is_active: bool,
    pub auto_review_enabled: bool,
    /// Diff line budget; larger diffs are truncated before review.
    pub review_threshold: u32,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating or replacing a [`RepositoryConfig`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryConfigDraft {
    pub name: String,
    pub repository_url: String,
    pub provider: GitProvider,
    pub project_id: Option<String>,
    pub access_token: String,
    pub webhook_secret: Option<String>,
    pub webhook_url: Option<String>,
    pub is_active: Option<bool>,
    pub auto_review_enabled: Option<bool>,
    pub review_threshold: Option<u32>,
    pub description: Option<String>,
}

impl RepositoryConfigDraft {
    pub const DEFAULT_REVIEW_THRESHOLD: u32 = 100;
}
