//! Persistence layer error types

use employee_domain::DomainError;
use thiserror::Error;

/// Persistence layer errors
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("PostgreSQL error: {0}")]
    Database(String),

    #[error("Connection pool error: {0}")]
    Pool(String),

    #[error("Redis error: {0}")]
    Redis(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Entity not found: {entity_type} with key {key}")]
    NotFound { entity_type: String, key: String },

    #[error("Record not updated: {entity_type} with key {key}")]
    NotUpdated { entity_type: String, key: String },

    #[error("Validation failed: {0}")]
    Validation(#[from] DomainError),
}

impl PersistenceError {
    pub(crate) fn employee_not_found(id: i64) -> Self {
        Self::NotFound {
            entity_type: "employee".to_string(),
            key: id.to_string(),
        }
    }

    pub(crate) fn employee_not_updated(id: i64) -> Self {
        Self::NotUpdated {
            entity_type: "employee".to_string(),
            key: id.to_string(),
        }
    }

    /// True when a backing store or the cache could not be reached.
    #[must_use]
    pub const fn is_unavailable(&self) -> bool {
        matches!(self, Self::Database(_) | Self::Pool(_) | Self::Redis(_))
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(feature = "postgres")]
impl From<tokio_postgres::Error> for PersistenceError {
    fn from(err: tokio_postgres::Error) -> Self {
        Self::Database(err.to_string())
    }
}

#[cfg(feature = "postgres")]
impl From<deadpool_postgres::PoolError> for PersistenceError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        Self::Pool(err.to_string())
    }
}

#[cfg(feature = "postgres")]
impl From<deadpool_postgres::CreatePoolError> for PersistenceError {
    fn from(err: deadpool_postgres::CreatePoolError) -> Self {
        Self::Pool(err.to_string())
    }
}

#[cfg(feature = "redis")]
impl From<redis::RedisError> for PersistenceError {
    fn from(err: redis::RedisError) -> Self {
        Self::Redis(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PersistenceError>;
