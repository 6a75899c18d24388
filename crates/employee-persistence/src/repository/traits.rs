//! # Repository Traits
//!
//! Abstract record store interface for employee rows.
//! Implementations can be swapped for different backends (PostgreSQL, in-memory, etc.)

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::Result;
use employee_domain::Employee;

/// Durable store of employee rows with an `active` soft-delete flag.
///
/// Only active rows are visible through these operations. The store knows
/// nothing about caching.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Count active rows
    async fn count_active(&self) -> Result<i64>;

    /// Ids of active rows in ascending order.
    ///
    /// A negative `limit` means unbounded and a negative `offset` means no skip.
    async fn list_active_ids(&self, limit: i64, offset: i64) -> Result<Vec<i64>>;

    /// Fetch a batch of active rows in one round trip. Unknown ids are absent
    /// from the result rather than an error.
    async fn fetch_many(&self, ids: &[i64]) -> Result<HashMap<i64, Employee>>;

    /// Fetch one active row, `NotFound` if there is none
    async fn fetch_one(&self, id: i64) -> Result<Employee>;

    /// Insert a new active row and return its assigned id
    async fn insert(&self, name: &str, dob: DateTime<FixedOffset>) -> Result<i64>;

    /// Overwrite name and dob of an active row, `NotUpdated` if no row matched
    async fn update_one(&self, id: i64, name: &str, dob: DateTime<FixedOffset>) -> Result<()>;
}

/// Shared record store handle
pub type SharedRecordStore = Arc<dyn RecordStore>;
