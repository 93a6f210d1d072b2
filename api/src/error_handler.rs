use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use config_store::StoreError;
use thiserror::Error;

use crate::core::http::response_envelope::ApiResponse;

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Boot / config ---
    #[error("missing required environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("configuration error: {0}")]
    Config(String),

    // --- IO / network / server ---
    #[error("failed to bind listener")]
    Bind(#[source] std::io::Error),

    #[error("server error")]
    Server(#[source] std::io::Error),

    // --- Request / routing ---
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("not found")]
    NotFound,

    /// Rich HTTP error mapped from lower layers with specific status & code.
    #[error("{message}")]
    Http {
        status: StatusCode,
        code: &'static str,
        message: String,
    },
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            // startup-only
            AppError::MissingEnv(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,

            // 4xx
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound => StatusCode::NOT_FOUND,

            // custom mapped
            AppError::Http { status, .. } => *status,

            // 5xx
            AppError::Bind(_) | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::MissingEnv(_) => "MISSING_ENV",
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Bind(_) => "BIND_ERROR",
            AppError::Server(_) => "SERVER_ERROR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::NotFound => "NOT_FOUND",
            AppError::Http { code, .. } => code,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        ApiResponse::<()>::error(self.error_code(), self.to_string(), Vec::new())
            .into_response_with_status(status)
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;

/// Convert common Axum rejections to `AppError`.
impl From<axum::extract::rejection::JsonRejection> for AppError {
    fn from(err: axum::extract::rejection::JsonRejection) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<axum::extract::rejection::PathRejection> for AppError {
    fn from(err: axum::extract::rejection::PathRejection) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

/// Store errors carry precise HTTP semantics: unknown id → 404, name taken
/// → 409, deleting the default model → 400.
impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => AppError::NotFound,
            StoreError::DuplicateName(name) => AppError::Http {
                status: StatusCode::CONFLICT,
                code: "DUPLICATE_NAME",
                message: format!("name already in use: {name}"),
            },
            StoreError::DefaultModelDeletion => AppError::Http {
                status: StatusCode::BAD_REQUEST,
                code: "DEFAULT_MODEL_DELETION",
                message: "the default model config cannot be deleted".into(),
            },
        }
    }
}

/// LLM failures on synchronous endpoints surface as a 500 with the error
/// message in the body.
impl From<ai_llm_service::AiLlmError> for AppError {
    fn from(err: ai_llm_service::AiLlmError) -> Self {
        AppError::Http {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: "LLM_ERROR",
            message: err.to_string(),
        }
    }
}

impl From<review_engine::errors::Error> for AppError {
    fn from(err: review_engine::errors::Error) -> Self {
        AppError::Http {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: "REVIEW_ERROR",
            message: err.to_string(),
        }
    }
}
