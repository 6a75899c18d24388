//! # Cache Module
//!
//! Look-aside key-value cache with per-key TTL.
//!
//! Values are opaque bytes here; callers own the encoding. A `get` that
//! returns `Ok(None)` is a miss (absent or expired) and is part of normal
//! operation, while `Err` means the cache itself failed and must not be
//! treated as a miss.

pub mod memory;
#[cfg(feature = "redis")]
pub mod redis_client;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::error::Result;

pub use memory::MemoryCache;
#[cfg(feature = "redis")]
pub use redis_client::{CacheConfig, RedisCache};

/// Default lifetime of a cached employee snapshot.
pub const DEFAULT_EMPLOYEE_TTL: Duration = Duration::from_secs(60);

/// Longest TTL a configured cache accepts (one year).
pub const MAX_CACHE_TTL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Abstract TTL key-value cache
#[async_trait]
pub trait KeyValueCache: Send + Sync {
    /// Get a value, `None` on miss
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Set a value that expires after `ttl`
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<()>;

    /// Delete a key, returning whether it existed
    async fn delete(&self, key: &str) -> Result<bool>;

    /// Drop every key
    async fn flush(&self) -> Result<()>;
}

/// Shared cache handle injected into the accessor
pub type SharedCache = Arc<dyn KeyValueCache>;
