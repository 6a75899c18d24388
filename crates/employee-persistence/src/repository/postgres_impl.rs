//! PostgreSQL record store implementation.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use deadpool_postgres::{Config, ManagerConfig, Pool, PoolConfig, RecyclingMethod, Runtime};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio_postgres::{NoTls, Row};

use super::traits::RecordStore;
use crate::error::{PersistenceError, Result};
use employee_domain::Employee;

// =============================================================================
// POSTGRES CONFIGURATION
// =============================================================================

/// PostgreSQL connection configuration.
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub dbname: String,
    pub pool_size: usize,
    pub connect_timeout: Duration,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            password: "password".to_string(),
            dbname: "employee_db".to_string(),
            pool_size: 16,
            connect_timeout: Duration::from_secs(30),
        }
    }
}

// =============================================================================
// POSTGRES CLIENT
// =============================================================================

const CREATE_EMPLOYEES_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS employees (
        id     BIGSERIAL PRIMARY KEY,
        name   VARCHAR(100) NOT NULL,
        dob    TIMESTAMP WITH TIME ZONE NOT NULL,
        active BOOLEAN NOT NULL
    )
";

const CREATE_ACTIVE_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_active_employee ON employees (active)";

/// Pooled PostgreSQL client.
pub struct PostgresClient {
    pool: Pool,
    pub config: PostgresConfig,
}

impl PostgresClient {
    /// Create the pool and verify one connection can be checked out.
    ///
    /// # Errors
    ///
    /// Returns an error if the pool cannot be built or the server is unreachable.
    pub async fn new(config: PostgresConfig) -> Result<Self> {
        let mut cfg = Config::new();
        cfg.host = Some(config.host.clone());
        cfg.port = Some(config.port);
        cfg.user = Some(config.user.clone());
        cfg.password = Some(config.password.clone());
        cfg.dbname = Some(config.dbname.clone());
        cfg.connect_timeout = Some(config.connect_timeout);
        cfg.manager = Some(ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        });
        cfg.pool = Some(PoolConfig::new(config.pool_size));

        let pool = cfg.create_pool(Some(Runtime::Tokio1), NoTls)?;

        let conn = pool.get().await?;
        conn.simple_query("SELECT 1").await?;

        Ok(Self { pool, config })
    }

    /// Get pool reference.
    pub const fn pool(&self) -> &Pool {
        &self.pool
    }

    /// Create the `employees` table and its `active` index if missing.
    ///
    /// # Errors
    ///
    /// Returns an error if either statement fails; the transaction is rolled back.
    pub async fn migrate(&self) -> Result<()> {
        let mut conn = self.pool.get().await?;
        let tx = conn.transaction().await?;
        tx.batch_execute(CREATE_EMPLOYEES_TABLE).await?;
        tx.batch_execute(CREATE_ACTIVE_INDEX).await?;
        tx.commit().await?;

        tracing::info!(dbname = %self.config.dbname, "Database migrated");
        Ok(())
    }
}

// =============================================================================
// EMPLOYEE STORE
// =============================================================================

const COUNT_ACTIVE: &str = "SELECT count(id) FROM employees WHERE active = $1";

// NULL limit/offset behave as LIMIT ALL / OFFSET 0
const LIST_ACTIVE_IDS: &str =
    "SELECT id FROM employees WHERE active = $1 ORDER BY id LIMIT $2 OFFSET $3";

const FETCH_MANY: &str =
    "SELECT id, name, dob FROM employees WHERE id = ANY($1) AND active = $2";

const FETCH_ONE: &str = "SELECT id, name, dob FROM employees WHERE id = $1 AND active = $2";

const INSERT: &str = "INSERT INTO employees (name, dob, active) VALUES ($1, $2, $3) RETURNING id";

const UPDATE: &str = "UPDATE employees SET name = $1, dob = $2 WHERE id = $3 AND active = $4";

/// Record store over the `employees` table.
pub struct PostgresEmployeeStore {
    client: Arc<PostgresClient>,
}

impl PostgresEmployeeStore {
    pub const fn new(client: Arc<PostgresClient>) -> Self {
        Self { client }
    }
}

fn employee_from_row(row: &Row) -> Result<Employee> {
    Ok(Employee {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        dob: row.try_get("dob")?,
    })
}

#[async_trait]
impl RecordStore for PostgresEmployeeStore {
    async fn count_active(&self) -> Result<i64> {
        let conn = self.client.pool.get().await?;
        let stmt = conn.prepare_cached(COUNT_ACTIVE).await?;
        let row = conn.query_one(&stmt, &[&true]).await?;
        Ok(row.try_get(0)?)
    }

    async fn list_active_ids(&self, limit: i64, offset: i64) -> Result<Vec<i64>> {
        let limit = (limit >= 0).then_some(limit);
        let offset = (offset >= 0).then_some(offset);

        let conn = self.client.pool.get().await?;
        let stmt = conn.prepare_cached(LIST_ACTIVE_IDS).await?;
        let rows = conn.query(&stmt, &[&true, &limit, &offset]).await?;

        rows.iter()
            .map(|row| row.try_get::<_, i64>(0).map_err(PersistenceError::from))
            .collect()
    }

    async fn fetch_many(&self, ids: &[i64]) -> Result<HashMap<i64, Employee>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let conn = self.client.pool.get().await?;
        let stmt = conn.prepare_cached(FETCH_MANY).await?;
        let rows = conn.query(&stmt, &[&ids, &true]).await?;

        let mut found = HashMap::with_capacity(rows.len());
        for row in &rows {
            let employee = employee_from_row(row)?;
            found.insert(employee.id, employee);
        }
        Ok(found)
    }

    async fn fetch_one(&self, id: i64) -> Result<Employee> {
        let conn = self.client.pool.get().await?;
        let stmt = conn.prepare_cached(FETCH_ONE).await?;

        match conn.query_opt(&stmt, &[&id, &true]).await? {
            Some(row) => employee_from_row(&row),
            None => Err(PersistenceError::employee_not_found(id)),
        }
    }

    async fn insert(&self, name: &str, dob: DateTime<FixedOffset>) -> Result<i64> {
        let conn = self.client.pool.get().await?;
        let stmt = conn.prepare_cached(INSERT).await?;
        let row = conn.query_one(&stmt, &[&name, &dob, &true]).await?;
        Ok(row.try_get(0)?)
    }

    async fn update_one(&self, id: i64, name: &str, dob: DateTime<FixedOffset>) -> Result<()> {
        let conn = self.client.pool.get().await?;
        let stmt = conn.prepare_cached(UPDATE).await?;
        let affected = conn.execute(&stmt, &[&name, &dob, &id, &true]).await?;

        if affected == 0 {
            return Err(PersistenceError::employee_not_updated(id));
        }
        Ok(())
    }
}
