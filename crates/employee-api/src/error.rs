//! # API Error Types
//!
//! Unified error handling for the HTTP layer. Every error carries the status
//! code it is rendered with.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use employee_domain::DomainError;
use employee_persistence::PersistenceError;
use thiserror::Error;

/// API-level errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{entity_type} with the given id not found")]
    NotFound { entity_type: String, id: String },

    #[error("couldn't update the {entity_type} record")]
    NotUpdated { entity_type: String, id: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Validation(#[from] DomainError),

    #[error("Persistence error: {0}")]
    Persistence(PersistenceError),
}

impl ApiError {
    /// Get HTTP status code for this error
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::NotUpdated { .. } => StatusCode::CONFLICT,
            Self::InvalidInput(_) | Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get machine-readable error code
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::NotUpdated { .. } => "NOT_UPDATED",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::Validation(_) => "VALIDATION_FAILED",
            Self::Persistence(_) => "PERSISTENCE_ERROR",
        }
    }

    /// Message shown to clients. Backing store details stay in the logs.
    fn public_message(&self) -> String {
        match self {
            Self::Persistence(_) => "internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<PersistenceError> for ApiError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::NotFound { entity_type, key } => Self::NotFound {
                entity_type,
                id: key,
            },
            PersistenceError::NotUpdated { entity_type, key } => Self::NotUpdated {
                entity_type,
                id: key,
            },
            PersistenceError::Validation(e) => Self::Validation(e),
            other => Self::Persistence(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, code = self.error_code(), "Request failed");
        }

        let body = serde_json::json!({
            "error": {
                "message": self.public_message(),
                "code": self.error_code(),
            }
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;
