//! Operation-boundary error taxonomy.
//!
//! Every public operation returns `Result<T, AppError>`. Handlers turn the error into a stable
//! external code plus message; nothing here retries.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::store::StoreError;

/// Structured error body returned to clients.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed or missing input, rejected before touching the store.
    #[error("Invalid request: {0}")]
    Validation(String),
    /// Referenced record absent, or not visible because the hospital is unverified.
    #[error("Not found: {0}")]
    NotFound(String),
    /// The caller lacks rights to mutate this record.
    #[error("Forbidden: {0}")]
    Authorization(String),
    /// Store or transport unavailable.
    #[error("Dependency unavailable: {0}")]
    Dependency(String),
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Authorization(_) => "FORBIDDEN",
            AppError::Dependency(_) => "DEPENDENCY_UNAVAILABLE",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Authorization(_) => StatusCode::FORBIDDEN,
            AppError::Dependency(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Client-facing detail. Dependency failures are not described beyond their code.
    pub fn detail(&self) -> ErrorDetail {
        let message = match self {
            AppError::Validation(m) | AppError::NotFound(m) | AppError::Authorization(m) => {
                m.clone()
            }
            AppError::Dependency(_) => "A required service is temporarily unavailable".to_string(),
        };
        ErrorDetail {
            code: self.code().to_string(),
            message,
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(detail) => AppError::Dependency(detail),
            StoreError::NotFound { entity, id } => {
                AppError::NotFound(format!("{} {} not found", entity, id))
            }
            StoreError::Conflict(detail) => AppError::Validation(detail),
            StoreError::Duplicate(detail) => AppError::Validation(detail),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Dependency(detail) => tracing::error!("Dependency failure: {}", detail),
            other => tracing::debug!("Request rejected: {}", other),
        }

        let body = ErrorBody {
            error: self.detail(),
        };
        (self.status(), Json(body)).into_response()
    }
}
