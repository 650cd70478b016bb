//! Unit tests for the expired token sweep

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::Duration;
use tokio_util::sync::CancellationToken;

use super::{record_expiring_in, test_config};
use crate::repositories::InMemoryRefreshTokenStore;
use crate::services::token::{TokenCleanupConfig, TokenCleanupService};

async fn seeded_store() -> Arc<InMemoryRefreshTokenStore> {
    let store = Arc::new(InMemoryRefreshTokenStore::new());
    store
        .seed(record_expiring_in("expired-1", "u1", Duration::hours(-2)))
        .await;
    store
        .seed(record_expiring_in("expired-2", "u2", Duration::days(-3)))
        .await;
    store
        .seed(record_expiring_in("live", "u1", Duration::days(2)))
        .await;
    store
}

#[tokio::test]
async fn test_run_cleanup_removes_expired_only() {
    let store = seeded_store().await;
    let service = TokenCleanupService::new(store.clone(), TokenCleanupConfig::default());

    let result = service.run_cleanup().await;

    assert!(result.is_success());
    assert_eq!(result.expired_tokens_deleted, 2);
    assert_eq!(store.len().await, 1);
    assert!(store.record("live").await.is_some());
}

#[tokio::test]
async fn test_disabled_cleanup_does_nothing() {
    let store = seeded_store().await;
    let config = TokenCleanupConfig {
        enabled: false,
        ..TokenCleanupConfig::default()
    };
    let service = Arc::new(TokenCleanupService::new(store.clone(), config));

    let result = service.run_cleanup().await;
    assert_eq!(result.expired_tokens_deleted, 0);
    assert_eq!(store.len().await, 3);

    assert!(service.start_background_task(CancellationToken::new()).is_none());
}

#[tokio::test]
async fn test_store_failure_is_collected() {
    let store = seeded_store().await;
    store.set_unavailable(true);
    let service = TokenCleanupService::new(store, TokenCleanupConfig::default());

    let result = service.run_cleanup().await;

    assert!(!result.is_success());
    assert_eq!(result.errors.len(), 1);
}

#[tokio::test]
async fn test_background_task_sweeps_and_stops() {
    let store = seeded_store().await;
    let config = TokenCleanupConfig {
        interval_seconds: 1,
        ..TokenCleanupConfig::default()
    };
    let service = Arc::new(TokenCleanupService::new(store.clone(), config));
    let shutdown = CancellationToken::new();

    let handle = service.start_background_task(shutdown.clone()).unwrap();

    // The first tick fires immediately
    for _ in 0..50 {
        if store.len().await == 1 {
            break;
        }
        tokio::time::sleep(StdDuration::from_millis(10)).await;
    }
    assert_eq!(store.len().await, 1);

    shutdown.cancel();
    tokio::time::timeout(StdDuration::from_secs(1), handle)
        .await
        .unwrap()
        .unwrap();
}

#[test]
fn test_config_from_token_config() {
    let mut token_config = test_config();
    token_config.cleanup_interval_seconds = 120;
    let config = TokenCleanupConfig::from_token_config(&token_config);
    assert_eq!(config.interval_seconds, 120);
    assert!(config.enabled);

    token_config.cleanup_interval_seconds = 0;
    assert!(!TokenCleanupConfig::from_token_config(&token_config).enabled);
}
