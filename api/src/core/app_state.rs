use std::sync::Arc;

use config_store::ConfigStore;
use tracing::warn;

use crate::core::review_jobs::ReviewJobRegistry;
use crate::error_handler::AppError;

/// Default JWT secret for local development only.
const DEV_JWT_SECRET: &str = "dev-only-change-me";

/// Settings for the login/session layer.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HS256 signing secret.
    pub jwt_secret: String,
    /// Token lifetime in milliseconds.
    pub expiration_ms: u64,
    /// Admin account credentials checked by `/api/auth/login`.
    pub admin_username: String,
    pub admin_password: String,
}

impl AuthConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let jwt_secret = match std::env::var("JWT_SECRET") {
            Ok(v) if !v.trim().is_empty() => v,
            _ => {
                warn!("JWT_SECRET not set, using development default");
                DEV_JWT_SECRET.to_string()
            }
        };

        let expiration_ms = match std::env::var("JWT_EXPIRATION_MS") {
            Ok(v) if !v.trim().is_empty() => v.parse::<u64>().map_err(|_| {
                AppError::Config("JWT_EXPIRATION_MS must be a number of milliseconds".into())
            })?,
            _ => 86_400_000, // 24h
        };

        Ok(Self {
            jwt_secret,
            expiration_ms,
            admin_username: std::env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".into()),
            admin_password: std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".into()),
        })
    }
}

/// Shared state for all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// Configuration records (model configs, repository configs).
    pub store: Arc<ConfigStore>,
    /// Login/session settings.
    pub auth: AuthConfig,
    /// Kill switch: when false, reviews return a fixed notice instead of
    /// calling the LLM.
    pub ai_review_enabled: bool,
    /// In-memory registry of submitted review jobs.
    pub review_jobs: ReviewJobRegistry,
}

impl AppState {
    /// Builds state with explicit parts (tests use this directly).
    pub fn new(store: Arc<ConfigStore>, auth: AuthConfig, ai_review_enabled: bool) -> Self {
        Self {
            store,
            auth,
            ai_review_enabled,
            review_jobs: ReviewJobRegistry::new(),
        }
    }

    /// Load shared state from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        let ai_review_enabled = std::env::var("AI_REVIEW_ENABLED")
            .map(|v| v != "false")
            .unwrap_or(true);
        if !ai_review_enabled {
            warn!("AI_REVIEW_ENABLED=false, reviews will return a disabled notice");
        }

        Ok(Self::new(
            Arc::new(ConfigStore::new()),
            AuthConfig::from_env()?,
            ai_review_enabled,
        ))
    }
}
