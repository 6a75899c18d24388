//! # API Context
//!
//! Application state and dependency injection for HTTP handlers.

use std::sync::Arc;

use crate::config::CacheSettings;
use employee_persistence::{
    EmployeeAccessor, MemoryCache, MemoryEmployeeStore, SharedCache, SharedRecordStore,
};

/// Application context shared across all handlers
#[derive(Clone)]
pub struct ApiContext {
    /// Cache-coordinated employee access
    pub accessor: Arc<EmployeeAccessor>,
}

impl ApiContext {
    /// Create a new API context over the given store and cache
    pub fn new(store: SharedRecordStore, cache: SharedCache, settings: CacheSettings) -> Self {
        let accessor = EmployeeAccessor::new(store, cache)
            .with_ttl(settings.ttl)
            .with_write_policy(settings.write_policy);

        Self {
            accessor: Arc::new(accessor),
        }
    }

    /// Context backed by in-memory store and cache
    pub fn in_memory(settings: CacheSettings) -> Self {
        Self::new(
            Arc::new(MemoryEmployeeStore::new()),
            Arc::new(MemoryCache::new()),
            settings,
        )
    }
}
