//! Example records inserted into an empty store at boot.
//!
//! Seeding is skipped per entity type when records already exist, so a
//! deployment that manages its own configs never sees these.

use tracing::info;

use crate::entities::{GitProvider, ModelConfigDraft, ModelProvider, RepositoryConfigDraft};
use crate::errors::StoreError;
use crate::store::ConfigStore;

/// Populates an empty store with example model and repository configs.
pub async fn seed_example_data(store: &ConfigStore) -> Result<(), StoreError> {
    if store.list_models().await.is_empty() {
        for draft in example_models() {
            store.create_model(draft).await?;
        }
        let count = store.list_models().await.len();
        info!(count, "seeded example model configs");
    }

    if store.list_repositories().await.is_empty() {
        for draft in example_repositories() {
            store.create_repository(draft).await?;
        }
        let count = store.list_repositories().await.len();
        info!(count, "seeded example repository configs");
    }

    Ok(())
}

fn example_models() -> Vec<ModelConfigDraft> {
    vec![
        ModelConfigDraft {
            name: "qwen-plus".into(),
            provider: ModelProvider::Alibaba,
            api_key: "sk-your-dashscope-key".into(),
            api_endpoint: "https://dashscope.aliyuncs.com/compatible-mode".into(),
            temperature: None,
            max_tokens: None,
            timeout_ms: None,
            is_active: Some(true),
            is_default: Some(true),
            description: Some("Alibaba qwen-plus, default review model".into()),
        },
        ModelConfigDraft {
            name: "gpt-4".into(),
            provider: ModelProvider::OpenAi,
            api_key: "sk-your-openai-key".into(),
            api_endpoint: "https://api.openai.com".into(),
            temperature: None,
            max_tokens: None,
            timeout_ms: None,
            is_active: Some(true),
            is_default: None,
            description: Some("OpenAI GPT-4".into()),
        },
        ModelConfigDraft {
            name: "claude-3-sonnet".into(),
            provider: ModelProvider::Anthropic,
            api_key: "sk-your-anthropic-key".into(),
            api_endpoint: "https://api.anthropic.example.com".into(),
            temperature: None,
            max_tokens: None,
            timeout_ms: None,
            is_active: Some(false),
            is_default: None,
            description: Some("Anthropic Claude 3 Sonnet (inactive)".into()),
        },
    ]
}

fn example_repositories() -> Vec<RepositoryConfigDraft> {
    vec![
        RepositoryConfigDraft {
            name: "example-gitlab-project".into(),
            repository_url: "https://gitlab.com/example/project".into(),
            provider: GitProvider::GitLab,
            project_id: Some("123".into()),
            access_token: "glpat-your-token".into(),
            webhook_secret: Some("gitlab-webhook-secret".into()),
            webhook_url: Some("https://review.example.com/api/webhook/gitlab".into()),
            is_active: Some(true),
            auto_review_enabled: Some(true),
            review_threshold: Some(100),
            description: Some("Example GitLab project".into()),
        },
        RepositoryConfigDraft {
            name: "example/github-repo".into(),
            repository_url: "https://github.com/example/github-repo".into(),
            provider: GitProvider::GitHub,
            project_id: Some("456".into()),
            access_token: "ghp-your-token".into(),
            webhook_secret: Some("github-webhook-secret".into()),
            webhook_url: Some("https://review.example.com/api/webhook/github".into()),
            is_active: Some(true),
            auto_review_enabled: Some(true),
            review_threshold: Some(150),
            description: Some("Example GitHub repository".into()),
        },
        RepositoryConfigDraft {
            name: "example/gitee-repo".into(),
            repository_url: "https://gitee.com/example/gitee-repo".into(),
            provider: GitProvider::Gitee,
            project_id: Some("789".into()),
            access_token: "gitee-your-token".into(),
            webhook_secret: None,
            webhook_url: Some("https://review.example.com/api/webhook/gitee".into()),
            is_active: Some(false),
            auto_review_enabled: Some(false),
            review_threshold: Some(80),
            description: Some("Example Gitee repository (inactive)".into()),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn seeding_fills_an_empty_store_once() {
        let store = ConfigStore::new();
        seed_example_data(&store).await.unwrap();

        assert_eq!(store.list_models().await.len(), 3);
        assert_eq!(store.list_repositories().await.len(), 3);
        assert_eq!(store.get_default_model().await.unwrap().name, "qwen-plus");

        // Re-running must not duplicate anything.
        seed_example_data(&store).await.unwrap();
        assert_eq!(store.list_models().await.len(), 3);
        assert_eq!(store.list_repositories().await.len(), 3);
    }

    #[tokio::test]
    async fn seeding_skips_non_empty_entity_types() {
        let store = ConfigStore::new();
        store
            .create_model(ModelConfigDraft {
                name: "custom".into(),
                provider: ModelProvider::OpenAi,
                api_key: "key".into(),
                api_endpoint: "https://api.example.com".into(),
                temperature: None,
                max_tokens: None,
                timeout_ms: None,
                is_active: None,
                is_default: None,
                description: None,
            })
            .await
            .unwrap();

        seed_example_data(&store).await.unwrap();

        // Models untouched, repositories seeded.
        assert_eq!(store.list_models().await.len(), 1);
        assert_eq!(store.list_repositories().await.len(), 3);
    }
}
