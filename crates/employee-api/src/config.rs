//! # API Configuration
//!
//! Environment-based configuration for the employee API service.

use anyhow::{anyhow, bail};
use std::env;
use std::fmt::Display;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use employee_persistence::{CacheConfig, CacheWritePolicy, MAX_CACHE_TTL, PostgresConfig};

/// API server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address
    pub server_addr: SocketAddr,

    /// Logging level
    pub log_level: String,

    /// Per-request timeout
    pub request_timeout: Duration,

    /// Create the schema on startup
    pub run_migrations: bool,

    /// CORS allowed origins, `*` for any
    pub cors_origins: Vec<String>,

    /// PostgreSQL configuration
    pub database: DatabaseConfig,

    /// Redis configuration
    pub redis: RedisConfig,

    /// Cache behavior
    pub cache: CacheSettings,
}

/// PostgreSQL connection configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub pool_size: usize,
}

/// Redis connection configuration
#[derive(Debug, Clone)]
pub struct RedisConfig {
    pub url: String,
}

/// Cache behavior shared by every accessor operation
#[derive(Debug, Clone, Copy)]
pub struct CacheSettings {
    pub ttl: Duration,
    pub write_policy: CacheWritePolicy,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error naming the variable when a value cannot be parsed.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    ///
    /// # Errors
    ///
    /// Returns an error naming the variable when a value cannot be parsed.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let cache_ttl = Duration::from_secs(parse_or(&get, "CACHE_TTL_SECS", 60)?);
        if cache_ttl > MAX_CACHE_TTL {
            bail!(
                "invalid CACHE_TTL_SECS '{}': must be at most {}",
                cache_ttl.as_secs(),
                MAX_CACHE_TTL.as_secs()
            );
        }

        Ok(Self {
            server_addr: parse_or(&get, "SERVER_ADDR", SocketAddr::from(([127, 0, 0, 1], 9000)))?,

            log_level: get("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),

            request_timeout: Duration::from_secs(parse_or(&get, "REQUEST_TIMEOUT_SECS", 30)?),

            run_migrations: get("RUN_MIGRATIONS").map_or(true, |v| v == "true" || v == "1"),

            cors_origins: get("CORS_ORIGINS")
                .unwrap_or_else(|| "*".to_string())
                .split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect(),

            database: DatabaseConfig {
                host: get("DATABASE_HOST").unwrap_or_else(|| "localhost".to_string()),
                port: parse_or(&get, "DATABASE_PORT", 5432)?,
                user: get("DATABASE_USER").unwrap_or_else(|| "postgres".to_string()),
                password: get("DATABASE_PASSWORD").unwrap_or_else(|| "password".to_string()),
                name: get("DATABASE_NAME").unwrap_or_else(|| "employee_db".to_string()),
                pool_size: parse_or(&get, "DATABASE_POOL_SIZE", 16)?,
            },

            redis: RedisConfig {
                url: get("REDIS_URL").unwrap_or_else(|| "redis://127.0.0.1:6379".to_string()),
            },

            cache: CacheSettings {
                ttl: cache_ttl,
                write_policy: parse_or(&get, "CACHE_WRITE_POLICY", CacheWritePolicy::default())?,
            },
        })
    }

    pub fn postgres_config(&self) -> PostgresConfig {
        PostgresConfig {
            host: self.database.host.clone(),
            port: self.database.port,
            user: self.database.user.clone(),
            password: self.database.password.clone(),
            dbname: self.database.name.clone(),
            pool_size: self.database.pool_size,
            ..PostgresConfig::default()
        }
    }

    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig {
            url: self.redis.url.clone(),
        }
    }
}

fn parse_or<T>(get: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match get(key).filter(|v| !v.trim().is_empty()) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("invalid {key} '{raw}': {e}")),
        None => Ok(default),
    }
}
