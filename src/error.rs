//! Error types for the backend
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Errors raised by the cache layer itself (never by a loader).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Key is empty or too long
    #[error("Invalid cache key: {0}")]
    InvalidKey(String),

    /// TTL is zero
    #[error("Invalid TTL: {0}")]
    InvalidTtl(String),

    /// Value could not be serialized for storage
    #[error("Serialization failed: {0}")]
    Serialization(String),

    /// Fast store could not be reached
    #[error("Cache unavailable: {0}")]
    Unavailable(String),
}

// == Storage Error Enum ==
/// Errors raised by the authoritative record stores.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// Unique constraint violated
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Backing store could not be reached
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

// == App Error Enum ==
/// Service-level error type, mapped to HTTP responses.
#[derive(Error, Debug)]
pub enum AppError {
    /// Request data failed validation
    #[error("Invalid request: {0}")]
    Validation(String),

    /// Record does not exist
    #[error("{0}")]
    NotFound(String),

    /// Record clashes with an existing one
    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error(transparent)]
    Storage(StorageError),
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Conflict(msg) => AppError::Conflict(msg),
            other => AppError::Storage(other),
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Cache(CacheError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Cache(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Storage(_) => StatusCode::SERVICE_UNAVAILABLE,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the services and handlers.
pub type Result<T> = std::result::Result<T, AppError>;
