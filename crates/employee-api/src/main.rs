//! # Employee Records API Server
//!
//! Binary entry point for the employee API service.

use anyhow::Context;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use employee_api::{ApiContext, Config, build_router};
use employee_persistence::{PostgresClient, PostgresEmployeeStore, RedisCache};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    tracing::info!(
        version = employee_api::VERSION,
        "Starting Employee Records API"
    );

    // Initialize PostgreSQL pool
    tracing::info!(
        host = %config.database.host,
        port = config.database.port,
        dbname = %config.database.name,
        "Connecting to PostgreSQL"
    );

    let postgres = PostgresClient::new(config.postgres_config())
        .await
        .context("connecting to PostgreSQL")?;
    tracing::info!("PostgreSQL connected");

    if config.run_migrations {
        postgres.migrate().await.context("migrating database")?;
    }

    // Initialize Redis cache
    tracing::info!(url = %config.redis.url, "Connecting to Redis");

    let cache = RedisCache::new(config.cache_config())
        .await
        .context("connecting to Redis")?;
    tracing::info!("Redis connected");

    // Build API context
    let store = PostgresEmployeeStore::new(Arc::new(postgres));
    let api_ctx = ApiContext::new(Arc::new(store), Arc::new(cache), config.cache);

    tracing::info!(
        ttl_secs = config.cache.ttl.as_secs(),
        write_policy = %config.cache.write_policy,
        "Employee accessor ready"
    );

    // Build router
    let app = build_router(api_ctx, &config);

    // Start server
    let addr = config.server_addr;
    tracing::info!(%addr, "Starting HTTP server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shut down gracefully");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, shutting down");
        }
    }
}
