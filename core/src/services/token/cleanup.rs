//! Background sweep of expired refresh tokens
//!
//! The refresh path never deletes expired records, it only ignores them.
//! This service removes them on a fixed interval so the table stays small.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tp_shared::TokenConfig;
use tracing::{error, info, warn};

use crate::errors::StoreError;
use crate::repositories::RefreshTokenStore;

use super::deadline::Deadline;

/// Configuration for the cleanup service
#[derive(Debug, Clone)]
pub struct TokenCleanupConfig {
    /// How often to run cleanup (in seconds)
    pub interval_seconds: u64,
    /// Upper bound for a single sweep (in seconds)
    pub timeout_seconds: u64,
    /// Whether to enable automatic cleanup
    pub enabled: bool,
}

impl Default for TokenCleanupConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 3600,
            timeout_seconds: 30,
            enabled: true,
        }
    }
}

impl TokenCleanupConfig {
    pub fn from_token_config(config: &TokenConfig) -> Self {
        Self {
            interval_seconds: config.cleanup_interval_seconds,
            enabled: config.cleanup_interval_seconds > 0,
            ..Self::default()
        }
    }
}

/// Result of a cleanup cycle
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CleanupResult {
    /// Number of expired refresh tokens deleted
    pub expired_tokens_deleted: u64,
    /// Errors encountered during the cycle
    pub errors: Vec<String>,
}

impl CleanupResult {
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Periodically deletes expired refresh token records
pub struct TokenCleanupService<S: RefreshTokenStore + ?Sized + 'static> {
    store: Arc<S>,
    config: TokenCleanupConfig,
}

impl<S: RefreshTokenStore + ?Sized + 'static> TokenCleanupService<S> {
    pub fn new(store: Arc<S>, config: TokenCleanupConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &TokenCleanupConfig {
        &self.config
    }

    /// Run a single cleanup cycle
    ///
    /// Store failures are collected into the result instead of aborting, so
    /// the next cycle still runs.
    pub async fn run_cleanup(&self) -> CleanupResult {
        let mut result = CleanupResult::default();
        if !self.config.enabled {
            return result;
        }

        let deadline = Deadline::timeout(Duration::from_secs(self.config.timeout_seconds));
        match self.cleanup_expired_tokens(&deadline).await {
            Ok(count) => {
                result.expired_tokens_deleted = count;
                info!(deleted = count, "Expired refresh tokens removed");
            }
            Err(e) => {
                error!(error = %e, "Failed to cleanup expired tokens");
                result.errors.push(format!("Token cleanup error: {}", e));
            }
        }

        result
    }

    async fn cleanup_expired_tokens(&self, deadline: &Deadline) -> Result<u64, StoreError> {
        self.store.delete_expired(Utc::now(), deadline).await
    }

    /// Start the cleanup service as a background task
    ///
    /// The task runs until `shutdown` is cancelled. Returns `None` when the
    /// service is disabled.
    pub fn start_background_task(self: Arc<Self>, shutdown: CancellationToken) -> Option<JoinHandle<()>> {
        if !self.config.enabled {
            warn!("Token cleanup service is disabled");
            return None;
        }

        let interval = Duration::from_secs(self.config.interval_seconds);

        Some(tokio::spawn(async move {
            info!(
                interval_seconds = self.config.interval_seconds,
                "Token cleanup service started"
            );

            let mut timer = tokio::time::interval(interval);
            timer.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => break,
                    _ = timer.tick() => {
                        let result = self.run_cleanup().await;
                        if !result.is_success() {
                            warn!(errors = ?result.errors, "Cleanup completed with errors");
                        }
                    }
                }
            }

            info!("Token cleanup service stopped");
        }))
    }
}
