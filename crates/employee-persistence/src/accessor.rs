//! # Employee Accessor
//!
//! Cache-coordinated access to employee records.
//!
//! Reads are look-aside: probe the cache, fall back to the record store on a
//! miss, then repopulate the cache. Writes go to the record store first and
//! then push the new snapshot into the cache under [`cache_key`]. The record
//! store is the only source of truth; every cache entry is a disposable
//! projection that expires after the configured TTL.
//!
//! The accessor keeps no mutable state of its own and takes no locks, so it
//! is shared across request tasks as `Arc<EmployeeAccessor>`. Concurrent
//! updates of one id are not linearizable: the last cache write wins until
//! the entry expires.

use std::collections::HashMap;
use std::time::Duration;

use crate::cache::{DEFAULT_EMPLOYEE_TTL, SharedCache};
use crate::error::{PersistenceError, Result};
use crate::repository::SharedRecordStore;
use crate::strategy::CacheWritePolicy;
use employee_domain::{
    Employee, EmployeeCreateRequest, EmployeeList, EmployeeUpdateRequest, Pagination, parse_dob,
};

/// Cache key of an employee snapshot.
#[must_use]
pub fn cache_key(id: i64) -> String {
    format!("emp:{id}")
}

/// Coordinates the record store and the look-aside cache.
#[derive(Clone)]
pub struct EmployeeAccessor {
    store: SharedRecordStore,
    cache: SharedCache,
    ttl: Duration,
    write_policy: CacheWritePolicy,
}

impl EmployeeAccessor {
    /// Create an accessor with the default TTL and fail-fast cache writes.
    pub fn new(store: SharedRecordStore, cache: SharedCache) -> Self {
        Self {
            store,
            cache,
            ttl: DEFAULT_EMPLOYEE_TTL,
            write_policy: CacheWritePolicy::default(),
        }
    }

    #[must_use]
    pub const fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    #[must_use]
    pub const fn with_write_policy(mut self, policy: CacheWritePolicy) -> Self {
        self.write_policy = policy;
        self
    }

    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    pub const fn write_policy(&self) -> CacheWritePolicy {
        self.write_policy
    }

    // =========================================================================
    // READS
    // =========================================================================

    /// List one page of active employees in ascending id order.
    ///
    /// The total count and the id window always come from the record store.
    /// Only full records are cached; ids missing from the cache are resolved
    /// with a single batch fetch and written back. An id that vanishes
    /// between the window query and the batch fetch is returned as
    /// `Employee::default()` in its slot.
    ///
    /// # Errors
    ///
    /// Returns the first store or cache error encountered.
    pub async fn list(&self, pagination: &Pagination) -> Result<EmployeeList> {
        let total_count = self.store.count_active().await.inspect_err(|e| {
            tracing::error!(error = %e, "Failed to count active employees");
        })?;

        let ids = self
            .store
            .list_active_ids(pagination.limit(), pagination.offset())
            .await
            .inspect_err(|e| {
                tracing::error!(
                    error = %e,
                    limit = pagination.limit(),
                    offset = pagination.offset(),
                    "Failed to list employee ids"
                );
            })?;

        let mut resolved: HashMap<i64, Employee> = HashMap::with_capacity(ids.len());
        let mut missing = Vec::new();
        for &id in &ids {
            match self.cached(id).await? {
                Some(employee) => {
                    resolved.insert(id, employee);
                }
                None => missing.push(id),
            }
        }

        tracing::debug!(
            window = ids.len(),
            hits = resolved.len(),
            misses = missing.len(),
            "Resolved employee window against cache"
        );

        if !missing.is_empty() {
            let mut fetched = self.store.fetch_many(&missing).await.inspect_err(|e| {
                tracing::error!(error = %e, count = missing.len(), "Failed to batch fetch employees");
            })?;

            for id in &missing {
                if let Some(employee) = fetched.remove(id) {
                    self.populate(&employee).await?;
                    resolved.insert(*id, employee);
                }
            }
        }

        let employees = ids
            .iter()
            .map(|id| resolved.remove(id).unwrap_or_default())
            .collect();

        Ok(EmployeeList {
            employees,
            total_count,
        })
    }

    /// Get one active employee, cache first.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when no active row exists, or any store or cache error.
    pub async fn get_by_id(&self, id: i64) -> Result<Employee> {
        if let Some(employee) = self.cached(id).await? {
            tracing::debug!(id, "Cache hit");
            return Ok(employee);
        }

        tracing::debug!(id, "Cache miss, falling back to store");
        let employee = self.store.fetch_one(id).await.inspect_err(|e| {
            if !matches!(e, PersistenceError::NotFound { .. }) {
                tracing::error!(id, error = %e, "Failed to fetch employee");
            }
        })?;

        self.populate(&employee).await?;
        Ok(employee)
    }

    // =========================================================================
    // WRITES
    // =========================================================================

    /// Insert a new employee and cache it.
    ///
    /// Not idempotent: a retried call after a lost response inserts a second row.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for a malformed dob, or any store or cache error.
    pub async fn create(&self, request: &EmployeeCreateRequest) -> Result<Employee> {
        let dob = parse_dob(&request.dob)?;

        let id = self.store.insert(&request.name, dob).await.inspect_err(|e| {
            tracing::error!(error = %e, "Failed to insert employee");
        })?;

        let employee = Employee::new(id, request.name.clone(), dob);
        self.populate(&employee).await?;

        tracing::info!(id, "Employee created");
        Ok(employee)
    }

    /// Update name and dob of an existing employee and refresh its cache entry.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for a malformed dob, `NotFound` when the employee
    /// does not exist, `NotUpdated` when the row disappeared before the write,
    /// or any store or cache error.
    pub async fn update(&self, request: &EmployeeUpdateRequest) -> Result<Employee> {
        let dob = parse_dob(&request.dob)?;

        let mut employee = self.get_by_id(request.id).await?;

        self.store
            .update_one(employee.id, &request.name, dob)
            .await
            .inspect_err(|e| {
                tracing::error!(id = employee.id, error = %e, "Failed to update employee");
            })?;

        employee.name.clone_from(&request.name);
        employee.dob = dob;
        self.populate(&employee).await?;

        tracing::info!(id = employee.id, "Employee updated");
        Ok(employee)
    }

    // =========================================================================
    // CACHE
    // =========================================================================

    /// Probe the cache. A decode failure is an error, not a miss.
    async fn cached(&self, id: i64) -> Result<Option<Employee>> {
        let key = cache_key(id);
        let Some(raw) = self.cache.get(&key).await.inspect_err(|e| {
            tracing::error!(key, error = %e, "Failed to read employee from cache");
        })?
        else {
            return Ok(None);
        };

        let employee = serde_json::from_slice(&raw).map_err(|e| {
            tracing::error!(key, error = %e, "Failed to decode cached employee");
            PersistenceError::from(e)
        })?;
        Ok(Some(employee))
    }

    async fn populate(&self, employee: &Employee) -> Result<()> {
        let key = cache_key(employee.id);
        let json = serde_json::to_vec(employee)?;
        self.write_policy
            .write(&key, self.cache.set(&key, json, self.ttl))
            .await
    }
}
