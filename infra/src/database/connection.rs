//! Database connection pool management
//!
//! Wraps the SQLx MySQL pool with configuration from
//! [`DatabaseConfig`], health checks and schema bootstrap.

use sqlx::{
    mysql::{MySqlConnectOptions, MySqlPoolOptions},
    ConnectOptions, MySqlPool,
};
use std::str::FromStr;
use std::time::Duration;
use log::LevelFilter;

use tp_shared::DatabaseConfig;

use crate::InfrastructureError;

/// Schema of the refresh token table
///
/// `token` is the primary key, which is what makes duplicate inserts fail.
pub const REFRESH_TOKENS_SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS refresh_tokens (
        token VARCHAR(512) CHARACTER SET ascii NOT NULL,
        user_id VARCHAR(255) NOT NULL,
        expire_date DATETIME(6) NOT NULL,
        created_at DATETIME(6) NOT NULL,
        PRIMARY KEY (token),
        INDEX idx_refresh_tokens_user_id (user_id),
        INDEX idx_refresh_tokens_expire_date (expire_date)
    )
"#;

/// Database connection pool wrapper
#[derive(Clone)]
pub struct DatabasePool {
    pool: MySqlPool,
    config: DatabaseConfig,
}

impl DatabasePool {
    /// Create a new database connection pool
    ///
    /// # Returns
    /// * `Err(InfrastructureError::Config)` - No URL configured or the URL does not parse
    /// * `Err(InfrastructureError::Database)` - The pool could not connect
    pub async fn new(config: DatabaseConfig) -> Result<Self, InfrastructureError> {
        let url = config
            .url
            .as_deref()
            .ok_or_else(|| InfrastructureError::Config("DATABASE_URL is not set".to_string()))?;

        tracing::info!(
            max_connections = config.max_connections,
            "Creating database connection pool"
        );

        let connect_options = MySqlConnectOptions::from_str(url)
            .map_err(|e| InfrastructureError::Config(format!("Invalid database URL: {}", e)))?
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_secs(1));

        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(1)
            .acquire_timeout(Duration::from_secs(config.connect_timeout))
            .idle_timeout(Duration::from_secs(config.idle_timeout))
            .max_lifetime(Duration::from_secs(config.max_lifetime))
            .test_before_acquire(true)
            .connect_with(connect_options)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to create database pool");
                InfrastructureError::Database(e)
            })?;

        tracing::info!("Database connection pool created");

        Ok(Self { pool, config })
    }

    /// Get a reference to the underlying SQLx pool
    pub fn get_pool(&self) -> &MySqlPool {
        &self.pool
    }

    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    /// Check if the database connection is healthy
    pub async fn health_check(&self) -> Result<bool, InfrastructureError> {
        let row = sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Database health check failed");
                InfrastructureError::Database(e)
            })?;

        let value: i64 = sqlx::Row::try_get(&row, 0)?;
        Ok(value == 1)
    }

    /// Get connection pool statistics
    pub fn get_statistics(&self) -> PoolStatistics {
        PoolStatistics {
            connections: self.pool.size(),
            idle_connections: self.pool.num_idle(),
            max_connections: self.pool.options().get_max_connections(),
        }
    }

    /// Close all connections in the pool
    pub async fn close(&self) {
        tracing::info!("Closing database connection pool");
        self.pool.close().await;
    }

    /// Create the `refresh_tokens` table if it does not exist yet
    pub async fn run_migrations(&self) -> Result<(), InfrastructureError> {
        tracing::info!("Ensuring refresh_tokens schema");
        sqlx::query(REFRESH_TOKENS_SCHEMA)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

/// Connection pool statistics
#[derive(Debug, Clone)]
pub struct PoolStatistics {
    /// Total number of connections in the pool
    pub connections: u32,
    /// Number of idle connections
    pub idle_connections: usize,
    /// Maximum allowed connections
    pub max_connections: u32,
}

impl std::fmt::Display for PoolStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Pool Stats: {}/{} connections ({} idle)",
            self.connections, self.max_connections, self.idle_connections
        )
    }
}
