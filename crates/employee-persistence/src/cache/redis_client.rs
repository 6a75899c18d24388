//! # Redis Cache Layer
//!
//! Redis-backed [`KeyValueCache`] over a multiplexed connection manager.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use std::time::Duration;

use super::KeyValueCache;
use crate::error::Result;

/// Redis cache configuration
#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub url: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379".to_string(),
        }
    }
}

/// Redis cache client
#[derive(Clone)]
pub struct RedisCache {
    conn: ConnectionManager,
}

impl RedisCache {
    /// Connect and verify the server answers `PING`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the server is unreachable.
    pub async fn new(config: CacheConfig) -> Result<Self> {
        let client = Client::open(config.url.as_str())?;
        let mut conn = ConnectionManager::new(client).await?;
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;

        Ok(Self { conn })
    }
}

/// `PSETEX` argument for a TTL. The server rejects zero, so the floor is 1ms.
fn expiry_millis(ttl: Duration) -> u64 {
    u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1)
}

#[async_trait]
impl KeyValueCache for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut conn = self.conn.clone();
        let value: Option<Vec<u8>> = conn.get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: () = conn.pset_ex(key, value, expiry_millis(ttl)).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        let mut conn = self.conn.clone();
        let deleted: i64 = conn.del(key).await?;
        Ok(deleted > 0)
    }

    async fn flush(&self) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: () = redis::cmd("FLUSHDB").query_async(&mut conn).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry_keeps_sub_second_precision() {
        assert_eq!(expiry_millis(Duration::from_millis(1500)), 1500);
        assert_eq!(expiry_millis(Duration::from_secs(60)), 60_000);
    }

    #[test]
    fn test_expiry_floors_at_one_millisecond() {
        assert_eq!(expiry_millis(Duration::ZERO), 1);
        assert_eq!(expiry_millis(Duration::from_micros(200)), 1);
    }

    #[test]
    fn test_expiry_saturates() {
        assert_eq!(expiry_millis(Duration::MAX), u64::MAX);
    }
}
