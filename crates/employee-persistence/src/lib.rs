//! # Employee Persistence Library
//!
//! Cache-coordinated persistence layer for the employee records service.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Application Layer                        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    EmployeeAccessor                          │
//! │   (look-aside reads, batch miss resolution, write-through)   │
//! └─────────────────────────────────────────────────────────────┘
//!                    │                   │
//!                    ▼                   ▼
//! ┌─────────────────────────┐   ┌──────────────────────────────┐
//! │   KeyValueCache         │   │       RecordStore            │
//! │   (Redis, TTL 60s)      │   │  (PostgreSQL, source of      │
//! │                         │   │   truth)                     │
//! └─────────────────────────┘   └──────────────────────────────┘
//! ```
//!
//! ## Features
//!
//! - `postgres`: Enable the PostgreSQL record store (default)
//! - `redis`: Enable the Redis cache (default)
//!
//! In-memory implementations of both traits are always available.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use employee_persistence::{
//!     CacheConfig, EmployeeAccessor, PostgresClient, PostgresConfig,
//!     PostgresEmployeeStore, RedisCache,
//! };
//!
//! let postgres = Arc::new(PostgresClient::new(PostgresConfig::default()).await?);
//! postgres.migrate().await?;
//! let cache = RedisCache::new(CacheConfig::default()).await?;
//!
//! let accessor = EmployeeAccessor::new(
//!     Arc::new(PostgresEmployeeStore::new(postgres)),
//!     Arc::new(cache),
//! );
//!
//! let employee = accessor.get_by_id(1).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod accessor;
pub mod cache;
pub mod error;
pub mod repository;
pub mod strategy;

// Re-export commonly used types
pub use accessor::{EmployeeAccessor, cache_key};
pub use cache::{DEFAULT_EMPLOYEE_TTL, KeyValueCache, MAX_CACHE_TTL, MemoryCache, SharedCache};
#[cfg(feature = "redis")]
pub use cache::{CacheConfig, RedisCache};
pub use error::{PersistenceError, Result};
#[cfg(feature = "postgres")]
pub use repository::{PostgresClient, PostgresConfig, PostgresEmployeeStore};
pub use repository::{MemoryEmployeeStore, RecordStore, SharedRecordStore};
pub use strategy::CacheWritePolicy;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
