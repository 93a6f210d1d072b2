//! CRUD store with the invariants the admin surface relies on:
//! unique names per record type and at most one default model config.

use std::collections::HashMap;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::entities::{
    GitProvider, ModelConfig, ModelConfigDraft, RepositoryConfig, RepositoryConfigDraft,
};
use crate::errors::StoreError;

#[derive(Default)]
struct StoreInner {
    models: HashMap<u64, ModelConfig>,
    repositories: HashMap<u64, RepositoryConfig>,
    next_model_id: u64,
    next_repository_id: u64,
}

/// Shared handle over the in-process configuration records.
pub struct ConfigStore {
    inner: RwLock<StoreInner>,
}

impl ConfigStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(StoreInner::default()),
        }
    }

    /* ------------------------------ models ------------------------------ */

    pub async fn list_models(&self) -> Vec<ModelConfig> {
        let inner = self.inner.read().await;
        let mut all: Vec<_> = inner.models.values().cloned().collect();
        all.sort_by_key(|m| m.id);
        all
    }

    pub async fn list_active_models(&self) -> Vec<ModelConfig> {
        self.list_models()
            .await
            .into_iter()
            .filter(|m| m.is_active)
            .collect()
    }

    pub async fn get_model(&self, id: u64) -> Option<ModelConfig> {
        self.inner.read().await.models.get(&id).cloned()
    }

    pub async fn get_model_by_name(&self, name: &str) -> Option<ModelConfig> {
        let inner = self.inner.read().await;
        inner.models.values().find(|m| m.name == name).cloned()
    }

    pub async fn get_default_model(&self) -> Option<ModelConfig> {
        let inner = self.inner.read().await;
        inner.models.values().find(|m| m.is_default).cloned()
    }

    pub async fn create_model(&self, draft: ModelConfigDraft) -> Result<ModelConfig, StoreError> {
        let mut inner = self.inner.write().await;

        if inner.models.values().any(|m| m.name == draft.name) {
            return Err(StoreError::DuplicateName(draft.name));
        }

        let wants_default = draft.is_default.unwrap_or(false);
        if wants_default {
            clear_default(&mut inner.models);
        }

        inner.next_model_id += 1;
        let id = inner.next_model_id;
        let now = Utc::now();
        let record = ModelConfig {
            id,
            name: draft.name,
            provider: draft.provider,
            api_key: draft.api_key,
            api_endpoint: draft.api_endpoint,
            temperature: draft
                .temperature
                .unwrap_or(ModelConfigDraft::DEFAULT_TEMPERATURE),
            max_tokens: draft
                .max_tokens
                .unwrap_or(ModelConfigDraft::DEFAULT_MAX_TOKENS),
            timeout_ms: draft
                .timeout_ms
                .unwrap_or(ModelConfigDraft::DEFAULT_TIMEOUT_MS),
            is_active: draft.is_active.unwrap_or(true),
            is_default: wants_default,
            description: draft.description,
            created_at: now,
            updated_at: now,
        };

        info!(id, name = %record.name, "model config created");
        inner.models.insert(id, record.clone());
        Ok(record)
    }

    pub async fn update_model(
        &self,
        id: u64,
        draft: ModelConfigDraft,
    ) -> Result<ModelConfig, StoreError> {
        let mut inner = self.inner.write().await;

        let current = inner.models.get(&id).ok_or(StoreError::NotFound(id))?;
        if current.name != draft.name && inner.models.values().any(|m| m.name == draft.name) {
            return Err(StoreError::DuplicateName(draft.name));
        }

        // Granting the default flag displaces the previous holder;
        // omitting it never revokes an existing default.
        let becomes_default = draft.is_default.unwrap_or(false) && !current.is_default;
        if becomes_default {
            clear_default(&mut inner.models);
        }

        let record = inner.models.get_mut(&id).expect("checked above");
        record.name = draft.name;
        record.provider = draft.provider;
        record.api_key = draft.api_key;
        record.api_endpoint = draft.api_endpoint;
        if let Some(t) = draft.temperature {
            record.temperature = t;
        }
        if let Some(m) = draft.max_tokens {
            record.max_tokens = m;
        }
        if let Some(t) = draft.timeout_ms {
            record.timeout_ms = t;
        }
        if let Some(a) = draft.is_active {
            record.is_active = a;
        }
        if becomes_default {
            record.is_default = true;
        }
        record.description = draft.description;
        record.updated_at = Utc::now();

        debug!(id, "model config updated");
        Ok(record.clone())
    }

    pub async fn delete_model(&self, id: u64) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;

        let record = inner.models.get(&id).ok_or(StoreError::NotFound(id))?;
        if record.is_default {
            return Err(StoreError::DefaultModelDeletion);
        }

        inner.models.remove(&id);
        info!(id, "model config deleted");
        Ok(())
    }

    /// Makes `id` the only default model config.
    pub async fn set_default_model(&self, id: u64) -> Result<ModelConfig, StoreError> {
        let mut inner = self.inner.write().await;

        if !inner.models.contains_key(&id) {
            return Err(StoreError::NotFound(id));
        }

        clear_default(&mut inner.models);
        let record = inner.models.get_mut(&id).expect("checked above");
        record.is_default = true;
        record.updated_at = Utc::now();

        info!(id, name = %record.name, "default model changed");
        Ok(record.clone())
    }

    /// Flips the active flag. Deactivating the default model hands the
    /// default to the lowest-id model that is still active, if any.
    pub async fn toggle_model_status(&self, id: u64) -> Result<ModelConfig, StoreError> {
        let mut inner = self.inner.write().await;

        let record = inner.models.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        record.is_active = !record.is_active;
        record.updated_at = Utc::now();
        let lost_default = !record.is_active && record.is_default;
        if lost_default {
            record.is_default = false;
        }
        let result = record.clone();

        if lost_default {
            let successor = inner
                .models
                .values_mut()
                .filter(|m| m.is_active)
                .min_by_key(|m| m.id);
            if let Some(next) = successor {
                next.is_default = true;
                next.updated_at = Utc::now();
                info!(id = next.id, name = %next.name, "default model reassigned");
            }
        }

        Ok(result)
    }

    /* --------------------------- repositories --------------------------- */

    pub async fn list_repositories(&self) -> Vec<RepositoryConfig> {
        let inner = self.inner.read().await;
        let mut all: Vec<_> = inner.repositories.values().cloned().collect();
        all.sort_by_key(|r| r.id);
        all
    }

    pub async fn list_active_repositories(&self) -> Vec<RepositoryConfig> {
        self.list_repositories()
            .await
            .into_iter()
            .filter(|r| r.is_active)
            .collect()
    }

    pub async fn list_auto_review_repositories(&self) -> Vec<RepositoryConfig> {
        self.list_repositories()
            .await
            .into_iter()
            .filter(|r| r.is_active && r.auto_review_enabled)
            .collect()
    }

    pub async fn get_repository(&self, id: u64) -> Option<RepositoryConfig> {
        self.inner.read().await.repositories.get(&id).cloned()
    }

    pub async fn get_repository_by_name(&self, name: &str) -> Option<RepositoryConfig> {
        let inner = self.inner.read().await;
        inner
            .repositories
            .values()
            .find(|r| r.name == name)
            .cloned()
    }

    /// Resolves the repository a webhook delivery belongs to.
    ///
    /// GitLab sends a numeric project id, GitHub and Gitee send the
    /// `owner/repo` full name; configs may carry either in `project_id`
    /// or use the full name as the record name, so both are matched.
    pub async fn find_for_webhook(
        &self,
        provider: GitProvider,
        identifier: &str,
    ) -> Option<RepositoryConfig> {
        let inner = self.inner.read().await;
        inner
            .repositories
            .values()
            .find(|r| {
                r.provider == provider
                    && (r.project_id.as_deref() == Some(identifier) || r.name == identifier)
            })
            .cloned()
    }

    pub async fn create_repository(
        &self,
        draft: RepositoryConfigDraft,
    ) -> Result<RepositoryConfig, StoreError> {
        let mut inner = self.inner.write().await;

        if inner.repositories.values().any(|r| r.name == draft.name) {
            return Err(StoreError::DuplicateName(draft.name));
        }

        inner.next_repository_id += 1;
        let id = inner.next_repository_id;
        let now = Utc::now();
        let record = RepositoryConfig {
            id,
            name: draft.name,
            repository_url: draft.repository_url,
            provider: draft.provider,
            project_id: draft.project_id,
            access_token: draft.access_token,
            webhook_secret: draft.webhook_secret,
            webhook_url: draft.webhook_url,
            is_active: draft.is_active.unwrap_or(true),
            auto_review_enabled: draft.auto_review_enabled.unwrap_or(true),
            review_threshold: draft
                .review_threshold
                .unwrap_or(RepositoryConfigDraft::DEFAULT_REVIEW_THRESHOLD),
            description: draft.description,
            created_at: now,
            updated_at: now,
        };

        info!(id, name = %record.name, provider = %record.provider, "repository config created");
        inner.repositories.insert(id, record.clone());
        Ok(record)
    }

    pub async fn update_repository(
        &self,
        id: u64,
        draft: RepositoryConfigDraft,
    ) -> Result<RepositoryConfig, StoreError> {
        let mut inner = self.inner.write().await;

        let current = inner.repositories.get(&id).ok_or(StoreError::NotFound(id))?;
        if current.name != draft.name && inner.repositories.values().any(|r| r.name == draft.name) {
            return Err(StoreError::DuplicateName(draft.name));
        }

        let record = inner.repositories.get_mut(&id).expect("checked above");
        record.name = draft.name;
        record.repository_url = draft.repository_url;
        record.provider = draft.provider;
        record.project_id = draft.project_id;
        record.access_token = draft.access_token;
        record.webhook_secret = draft.webhook_secret;
        record.webhook_url = draft.webhook_url;
        if let Some(a) = draft.is_active {
            record.is_active = a;
        }
        if let Some(a) = draft.auto_review_enabled {
            record.auto_review_enabled = a;
        }
        if let Some(t) = draft.review_threshold {
            record.review_threshold = t;
        }
        record.description = draft.description;
        record.updated_at = Utc::now();

        debug!(id, "repository config updated");
        Ok(record.clone())
    }

    pub async fn delete_repository(&self, id: u64) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;

        if inner.repositories.remove(&id).is_none() {
            return Err(StoreError::NotFound(id));
        }
        info!(id, "repository config deleted");
        Ok(())
    }

    pub async fn toggle_repository_status(&self, id: u64) -> Result<RepositoryConfig, StoreError> {
        let mut inner = self.inner.write().await;

        let record = inner.repositories.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        record.is_active = !record.is_active;
        record.updated_at = Utc::now();
        Ok(record.clone())
    }

    pub async fn toggle_auto_review(&self, id: u64) -> Result<RepositoryConfig, StoreError> {
        let mut inner = self.inner.write().await;

        let record = inner.repositories.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        record.auto_review_enabled = !record.auto_review_enabled;
        record.updated_at = Utc::now();
        Ok(record.clone())
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

fn clear_default(models: &mut HashMap<u64, ModelConfig>) {
    for model in models.values_mut() {
        if model.is_default {
            model.is_default = false;
            model.updated_at = Utc::now();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::ModelProvider;

    fn model_draft(name: &str) -> ModelConfigDraft {
        ModelConfigDraft {
            name: name.to_string(),
            provider: ModelProvider::OpenAi,
            api_key: "key".into(),
            api_endpoint: "https://api.example.com".into(),
            temperature: None,
            max_tokens: None,
            timeout_ms: None,
            is_active: None,
            is_default: None,
            description: None,
        }
    }

    fn repo_draft(name: &str, provider: GitProvider) -> RepositoryConfigDraft {
        RepositoryConfigDraft {
            name: name.to_string(),
            repository_url: "https://github.com/acme/widget".into(),
            provider,
            project_id: None,
            access_token: "token".into(),
            webhook_secret: None,
            webhook_url: None,
            is_active: None,
            auto_review_enabled: None,
            review_threshold: None,
            description: None,
        }
    }

    #[tokio::test]
    async fn create_applies_defaults() {
        let store = ConfigStore::new();
        let created = store.create_model(model_draft("m1")).await.unwrap();

        assert_eq!(created.temperature, 0.7);
        assert_eq!(created.max_tokens, 4000);
        assert_eq!(created.timeout_ms, 30_000);
        assert!(created.is_active);
        assert!(!created.is_default);
    }

    #[tokio::test]
    async fn duplicate_names_rejected() {
        let store = ConfigStore::new();
        store.create_model(model_draft("m1")).await.unwrap();

        let err = store.create_model(model_draft("m1")).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateName(_)));

        // Renaming onto an existing name is also rejected.
        let b = store.create_model(model_draft("m2")).await.unwrap();
        let err = store.update_model(b.id, model_draft("m1")).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateName(_)));
    }

    #[tokio::test]
    async fn set_default_leaves_exactly_one_default() {
        let store = ConfigStore::new();
        let a = store.create_model(model_draft("a")).await.unwrap();
        let b = store.create_model(model_draft("b")).await.unwrap();
        let c = store.create_model(model_draft("c")).await.unwrap();

        for id in [a.id, c.id, b.id, b.id] {
            store.set_default_model(id).await.unwrap();
            let defaults: Vec<_> = store
                .list_models()
                .await
                .into_iter()
                .filter(|m| m.is_default)
                .collect();
            assert_eq!(defaults.len(), 1);
            assert_eq!(defaults[0].id, id);
        }
    }

    #[tokio::test]
    async fn create_with_default_displaces_previous() {
        let store = ConfigStore::new();
        let a = store.create_model(model_draft("a")).await.unwrap();
        store.set_default_model(a.id).await.unwrap();

        let mut draft = model_draft("b");
        draft.is_default = Some(true);
        let b = store.create_model(draft).await.unwrap();

        assert!(b.is_default);
        assert!(!store.get_model(a.id).await.unwrap().is_default);
    }

    #[tokio::test]
    async fn default_model_cannot_be_deleted() {
        let store = ConfigStore::new();
        let a = store.create_model(model_draft("a")).await.unwrap();
        store.set_default_model(a.id).await.unwrap();

        let err = store.delete_model(a.id).await.unwrap_err();
        assert!(matches!(err, StoreError::DefaultModelDeletion));
    }

    #[tokio::test]
    async fn deactivating_default_reassigns_it() {
        let store = ConfigStore::new();
        let a = store.create_model(model_draft("a")).await.unwrap();
        let b = store.create_model(model_draft("b")).await.unwrap();
        store.set_default_model(a.id).await.unwrap();

        let toggled = store.toggle_model_status(a.id).await.unwrap();
        assert!(!toggled.is_active);
        assert!(!toggled.is_default);
        assert!(store.get_model(b.id).await.unwrap().is_default);
    }

    #[tokio::test]
    async fn webhook_lookup_matches_project_id_or_name() {
        let store = ConfigStore::new();

        let mut by_project = repo_draft("gitlab main", GitProvider::GitLab);
        by_project.project_id = Some("123".into());
        store.create_repository(by_project).await.unwrap();

        // GitHub configs often use the full name as the record name.
        store
            .create_repository(repo_draft("acme/widget", GitProvider::GitHub))
            .await
            .unwrap();

        let found = store.find_for_webhook(GitProvider::GitLab, "123").await;
        assert_eq!(found.unwrap().name, "gitlab main");

        let found = store
            .find_for_webhook(GitProvider::GitHub, "acme/widget")
            .await;
        assert_eq!(found.unwrap().name, "acme/widget");

        // Provider mismatch never matches.
        assert!(store.find_for_webhook(GitProvider::Gitee, "123").await.is_none());
    }

    #[tokio::test]
    async fn name_lookups_find_exact_records() {
        let store = ConfigStore::new();
        let model = store.create_model(model_draft("qwen-plus")).await.unwrap();
        let repo = store
            .create_repository(repo_draft("acme/widget", GitProvider::GitHub))
            .await
            .unwrap();

        assert_eq!(
            store.get_model_by_name("qwen-plus").await.unwrap().id,
            model.id
        );
        assert_eq!(
            store.get_repository_by_name("acme/widget").await.unwrap().id,
            repo.id
        );

        assert!(store.get_model_by_name("qwen").await.is_none());
        assert!(store.get_repository_by_name("acme").await.is_none());
    }

    #[tokio::test]
    async fn auto_review_listing_requires_active_and_enabled() {
        let store = ConfigStore::new();

        // active + auto review on (both default true)
        store
            .create_repository(repo_draft("both", GitProvider::GitLab))
            .await
            .unwrap();

        let mut inactive = repo_draft("inactive", GitProvider::GitLab);
        inactive.is_active = Some(false);
        store.create_repository(inactive).await.unwrap();

        let mut manual = repo_draft("manual", GitProvider::GitLab);
        manual.auto_review_enabled = Some(false);
        store.create_repository(manual).await.unwrap();

        let auto: Vec<_> = store
            .list_auto_review_repositories()
            .await
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(auto, vec!["both".to_string()]);

        // the inactive one is excluded from the active listing too
        assert_eq!(store.list_active_repositories().await.len(), 2);
    }

    #[tokio::test]
    async fn unknown_ids_return_not_found() {
        let store = ConfigStore::new();
        assert!(matches!(
            store.delete_model(7).await.unwrap_err(),
            StoreError::NotFound(7)
        ));
        assert!(matches!(
            store.toggle_auto_review(7).await.unwrap_err(),
            StoreError::NotFound(7)
        ));
    }
}
