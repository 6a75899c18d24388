//! In-process TTL cache, used for tests and single-node deployments without Redis.

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use super::KeyValueCache;
use crate::error::Result;

#[derive(Debug, Clone)]
struct Entry {
    value: Vec<u8>,
    /// `None` when the TTL overflows the clock: never expires.
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|deadline| now < deadline)
    }
}

/// Map-backed [`KeyValueCache`] with lazy expiry.
///
/// Expired entries are dropped when read and swept on every `set`.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, Entry>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of unexpired entries.
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .read()
            .await
            .values()
            .filter(|entry| entry.is_live(now))
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl KeyValueCache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let now = Instant::now();
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(entry) if entry.is_live(now) => return Ok(Some(entry.value.clone())),
                Some(_) => {}
                None => return Ok(None),
            }
        }

        // Expired: drop it unless a writer refreshed it meanwhile
        let mut entries = self.entries.write().await;
        if entries.get(key).is_some_and(|entry| !entry.is_live(now)) {
            entries.remove(key);
        }
        Ok(None)
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<()> {
        let now = Instant::now();
        let expires_at = now.checked_add(ttl);

        let mut entries = self.entries.write().await;
        entries.retain(|_, entry| entry.is_live(now));
        entries.insert(key.to_string(), Entry { value, expires_at });
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        Ok(self.entries.write().await.remove(key).is_some())
    }

    async fn flush(&self) -> Result<()> {
        self.entries.write().await.clear();
        Ok(())
    }
}
