//! In-memory record store.
//!
//! Mirrors the PostgreSQL semantics (ascending ids, soft-delete visibility,
//! zero-row updates) closely enough to exercise the accessor without a server.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;

use super::traits::RecordStore;
use crate::error::{PersistenceError, Result};
use employee_domain::Employee;

#[derive(Debug, Clone)]
struct StoredRow {
    employee: Employee,
    active: bool,
}

#[derive(Debug, Default)]
struct Table {
    rows: BTreeMap<i64, StoredRow>,
    last_id: i64,
}

impl Table {
    fn active(&self) -> impl Iterator<Item = &StoredRow> {
        self.rows.values().filter(|row| row.active)
    }

    fn active_row(&self, id: i64) -> Option<&StoredRow> {
        self.rows.get(&id).filter(|row| row.active)
    }
}

/// Ordered-map [`RecordStore`].
#[derive(Debug, Default)]
pub struct MemoryEmployeeStore {
    table: RwLock<Table>,
}

impl MemoryEmployeeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the soft-delete flag. Returns false when the id was never inserted.
    pub async fn set_active(&self, id: i64, active: bool) -> bool {
        let mut table = self.table.write().await;
        table.rows.get_mut(&id).is_some_and(|row| {
            row.active = active;
            true
        })
    }
}

#[async_trait]
impl RecordStore for MemoryEmployeeStore {
    async fn count_active(&self) -> Result<i64> {
        let count = self.table.read().await.active().count();
        Ok(i64::try_from(count).unwrap_or(i64::MAX))
    }

    async fn list_active_ids(&self, limit: i64, offset: i64) -> Result<Vec<i64>> {
        let skip = usize::try_from(offset).unwrap_or(0);
        let take = usize::try_from(limit).unwrap_or(usize::MAX);

        let table = self.table.read().await;
        Ok(table
            .active()
            .skip(skip)
            .take(take)
            .map(|row| row.employee.id)
            .collect())
    }

    async fn fetch_many(&self, ids: &[i64]) -> Result<HashMap<i64, Employee>> {
        let table = self.table.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| table.active_row(*id))
            .map(|row| (row.employee.id, row.employee.clone()))
            .collect())
    }

    async fn fetch_one(&self, id: i64) -> Result<Employee> {
        self.table
            .read()
            .await
            .active_row(id)
            .map(|row| row.employee.clone())
            .ok_or_else(|| PersistenceError::employee_not_found(id))
    }

    async fn insert(&self, name: &str, dob: DateTime<FixedOffset>) -> Result<i64> {
        let mut table = self.table.write().await;
        table.last_id += 1;
        let id = table.last_id;
        table.rows.insert(
            id,
            StoredRow {
                employee: Employee::new(id, name, dob),
                active: true,
            },
        );
        Ok(id)
    }

    async fn update_one(&self, id: i64, name: &str, dob: DateTime<FixedOffset>) -> Result<()> {
        let mut table = self.table.write().await;
        match table.rows.get_mut(&id).filter(|row| row.active) {
            Some(row) => {
                row.employee.name = name.to_string();
                row.employee.dob = dob;
                Ok(())
            }
            None => Err(PersistenceError::employee_not_updated(id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use employee_domain::parse_dob;

    fn dob() -> DateTime<FixedOffset> {
        parse_dob("1985-06-15 09:30 +0000").unwrap()
    }

    async fn seeded(n: usize) -> MemoryEmployeeStore {
        let store = MemoryEmployeeStore::new();
        for i in 0..n {
            store.insert(&format!("employee-{i}"), dob()).await.unwrap();
        }
        store
    }

    #[tokio::test]
    async fn test_insert_assigns_ascending_ids() {
        let store = MemoryEmployeeStore::new();
        assert_eq!(store.insert("a", dob()).await.unwrap(), 1);
        assert_eq!(store.insert("b", dob()).await.unwrap(), 2);
        assert_eq!(store.count_active().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_list_window() {
        let store = seeded(5).await;
        assert_eq!(store.list_active_ids(2, 1).await.unwrap(), vec![2, 3]);
        assert_eq!(store.list_active_ids(-1, -1).await.unwrap(), vec![1, 2, 3, 4, 5]);
        assert_eq!(store.list_active_ids(0, 0).await.unwrap(), Vec::<i64>::new());
        assert!(store.list_active_ids(10, 50).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_inactive_rows_are_invisible() {
        let store = seeded(3).await;
        assert!(store.set_active(2, false).await);
        assert!(!store.set_active(42, false).await);

        assert_eq!(store.count_active().await.unwrap(), 2);
        assert_eq!(store.list_active_ids(-1, 0).await.unwrap(), vec![1, 3]);
        assert!(!store.fetch_many(&[1, 2, 3]).await.unwrap().contains_key(&2));
        assert!(matches!(
            store.fetch_one(2).await,
            Err(PersistenceError::NotFound { .. })
        ));
        assert!(matches!(
            store.update_one(2, "x", dob()).await,
            Err(PersistenceError::NotUpdated { .. })
        ));
    }

    #[tokio::test]
    async fn test_fetch_many_skips_unknown_ids() {
        let store = seeded(2).await;
        let found = store.fetch_many(&[2, 99]).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[&2].name, "employee-1");
    }

    #[tokio::test]
    async fn test_update_one() {
        let store = seeded(1).await;
        let new_dob = parse_dob("1970-01-01 00:00 +0200").unwrap();
        store.update_one(1, "renamed", new_dob).await.unwrap();

        let employee = store.fetch_one(1).await.unwrap();
        assert_eq!(employee.name, "renamed");
        assert_eq!(employee.dob, new_dob);

        assert!(matches!(
            store.update_one(9, "nobody", new_dob).await,
            Err(PersistenceError::NotUpdated { .. })
        ));
    }
}
