//! # Infrastructure Layer
//!
//! Concrete implementations of the persistence boundary declared in
//! `tp_core`.
//!
//! ## Architecture
//!
//! - **Database**: MySQL connection pool and the `refresh_tokens` store using SQLx
//!
//! ## Features
//!
//! - `mysql`: Enable MySQL database support (default)

use std::sync::Arc;

use tp_core::repositories::{InMemoryRefreshTokenStore, RefreshTokenStore};
use tp_shared::DatabaseConfig;

/// Database module - MySQL implementations using SQLx
#[cfg(feature = "mysql")]
pub mod database;

/// Build the refresh token store selected by configuration
///
/// A configured database URL yields the MySQL store (creating the schema
/// when `run_migrations` is set). Without one, the in-memory store is used.
pub async fn create_refresh_token_store(
    config: &DatabaseConfig,
) -> Result<Arc<dyn RefreshTokenStore>, InfrastructureError> {
    #[cfg(feature = "mysql")]
    {
        if config.is_configured() {
            let pool = database::DatabasePool::new(config.clone()).await?;
            if config.run_migrations {
                pool.run_migrations().await?;
            }
            return Ok(Arc::new(database::MySqlRefreshTokenStore::new(
                pool.get_pool().clone(),
            )));
        }
    }

    tracing::warn!("No database configured, refresh tokens are kept in memory");
    Ok(Arc::new(InMemoryRefreshTokenStore::new()))
}

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
