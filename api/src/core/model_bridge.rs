//! Conversions from stored config records into the client-facing configs
//! the engine crates expect.

use ai_llm_service::{LlmModelConfig, LlmProvider};
use config_store::{GitProvider, ModelConfig, RepositoryConfig};
use review_engine::git_providers::{ProviderCredential, ProviderKind};

/// Builds an LLM client config from a stored model config.
pub fn llm_config_from(model: &ModelConfig) -> LlmModelConfig {
    LlmModelConfig {
        provider: match model.provider {
            config_store::ModelProvider::Alibaba => LlmProvider::Alibaba,
            config_store::ModelProvider::OpenAi => LlmProvider::OpenAi,
            config_store::ModelProvider::Anthropic => LlmProvider::Anthropic,
        },
        model: model.name.clone(),
        endpoint: model.api_endpoint.clone(),
        api_key: model.api_key.clone(),
        max_tokens: model.max_tokens,
        temperature: model.temperature as f32,
        timeout_ms: model.timeout_ms,
    }
}

/// Builds a provider credential from a stored repository config.
///
/// `project_id` falls back to the record name, which GitHub/Gitee configs
/// commonly set to the `owner/repo` full name.
pub fn credential_from(repo: &RepositoryConfig) -> ProviderCredential {
    ProviderCredential {
        kind: provider_kind(repo.provider),
        repository_url: repo.repository_url.clone(),
        project: repo
            .project_id
            .clone()
            .unwrap_or_else(|| repo.name.clone()),
        token: repo.access_token.clone(),
    }
}

pub fn provider_kind(provider: GitProvider) -> ProviderKind {
    match provider {
        GitProvider::GitLab => ProviderKind::GitLab,
        GitProvider::GitHub => ProviderKind::GitHub,
        GitProvider::Gitee => ProviderKind::Gitee,
    }
}
