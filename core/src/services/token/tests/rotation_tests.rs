//! Unit tests for the rotation state machine

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{Duration, Utc};
use tp_shared::RotationMode;

use super::{record_expiring_in, test_config};
use crate::domain::entities::token::RefreshTokenRecord;
use crate::errors::{AuthorizationError, RefreshError, StoreError};
use crate::repositories::{InMemoryRefreshTokenStore, RefreshTokenStore};
use crate::services::token::{Deadline, RotationOutcome, RotationPolicy, TokenSigner, TokenState};

fn policy_with(
    store: Arc<InMemoryRefreshTokenStore>,
    mode: RotationMode,
) -> RotationPolicy<InMemoryRefreshTokenStore> {
    let config = test_config().with_rotation_mode(mode);
    let signer = Arc::new(TokenSigner::new(&config).unwrap());
    RotationPolicy::new(store, signer, &config)
}

fn deadline() -> Deadline {
    Deadline::timeout(StdDuration::from_secs(5))
}

#[test]
fn test_classify_states() {
    let policy = policy_with(Arc::new(InMemoryRefreshTokenStore::new()), RotationMode::Retain);
    let now = Utc::now();

    assert_eq!(policy.classify(None, now), TokenState::NotFound);

    let fresh = record_expiring_in("a", "u1", Duration::days(3));
    assert_eq!(policy.classify(Some(&fresh), now), TokenState::ValidFresh);

    let near = record_expiring_in("b", "u1", Duration::hours(6));
    assert_eq!(policy.classify(Some(&near), now), TokenState::ValidNearExpiry);

    let expired = record_expiring_in("c", "u1", Duration::minutes(-1));
    assert_eq!(policy.classify(Some(&expired), now), TokenState::Expired);
}

#[test]
fn test_classify_with_unrepresentable_window() {
    let now = Utc::now();
    let record = record_expiring_in("far", "u1", Duration::days(3650));

    for hours in [i64::MAX, 200_000_000 * 24] {
        let config = test_config().with_rotation_window_hours(hours);
        let signer = Arc::new(TokenSigner::new(&config).unwrap());
        let policy = RotationPolicy::new(Arc::new(InMemoryRefreshTokenStore::new()), signer, &config);

        assert_eq!(policy.classify(Some(&record), now), TokenState::ValidNearExpiry);
    }
}

#[test]
fn test_classify_window_boundary() {
    let policy = policy_with(Arc::new(InMemoryRefreshTokenStore::new()), RotationMode::Retain);
    let now = Utc::now();

    let at_edge = RefreshTokenRecord::with_expiry(
        "edge",
        "u1",
        now + Duration::hours(24),
        now,
    );
    assert_eq!(policy.classify(Some(&at_edge), now), TokenState::ValidNearExpiry);

    let past_edge = RefreshTokenRecord::with_expiry(
        "edge",
        "u1",
        now + Duration::hours(24) + Duration::seconds(1),
        now,
    );
    assert_eq!(policy.classify(Some(&past_edge), now), TokenState::ValidFresh);
}

#[tokio::test]
async fn test_fresh_token_is_reused_without_write() {
    let store = Arc::new(InMemoryRefreshTokenStore::new());
    let record = record_expiring_in("rt-fresh", "u1", Duration::days(6));
    store.seed(record.clone()).await;

    let policy = policy_with(store.clone(), RotationMode::Retain);
    let outcome = policy.evaluate("rt-fresh", &deadline()).await.unwrap();

    assert_eq!(outcome, RotationOutcome::Reused(record));
    assert_eq!(store.write_count(), 0);
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_near_expiry_token_rotates_and_retains_previous() {
    let store = Arc::new(InMemoryRefreshTokenStore::new());
    store
        .seed(record_expiring_in("rt-abc", "u1", Duration::hours(6)))
        .await;

    let policy = policy_with(store.clone(), RotationMode::Retain);
    let outcome = policy.evaluate("rt-abc", &deadline()).await.unwrap();

    let RotationOutcome::Rotated { previous, current } = outcome else {
        panic!("expected rotation");
    };
    assert_eq!(previous.token, "rt-abc");
    assert_ne!(current.token, "rt-abc");
    assert_eq!(current.user_id, "u1");

    let expected = Utc::now() + Duration::days(7);
    assert!((current.expire_date - expected).num_seconds().abs() <= 2);

    assert_eq!(store.write_count(), 1);
    assert!(store.get("rt-abc", &deadline()).await.unwrap().is_some());
    assert!(store.get(&current.token, &deadline()).await.unwrap().is_some());
}

#[tokio::test]
async fn test_rotated_token_is_signed_subject_only() {
    let store = Arc::new(InMemoryRefreshTokenStore::new());
    store
        .seed(record_expiring_in("rt-abc", "u1", Duration::hours(1)))
        .await;

    let config = test_config();
    let signer = Arc::new(TokenSigner::new(&config).unwrap());
    let policy = RotationPolicy::new(store, signer.clone(), &config);

    let RotationOutcome::Rotated { current, .. } =
        policy.evaluate("rt-abc", &deadline()).await.unwrap()
    else {
        panic!("expected rotation");
    };

    let claims = signer.verify(&current.token).unwrap();
    assert_eq!(claims.claims.sub, "u1");
    assert_eq!(claims.claims.email, None);
    assert!((claims.lifetime_seconds() - 300).abs() <= 1);
}

#[tokio::test]
async fn test_revoke_mode_removes_previous() {
    let store = Arc::new(InMemoryRefreshTokenStore::new());
    store
        .seed(record_expiring_in("rt-abc", "u1", Duration::hours(6)))
        .await;

    let policy = policy_with(store.clone(), RotationMode::Revoke);
    let outcome = policy.evaluate("rt-abc", &deadline()).await.unwrap();

    let RotationOutcome::Rotated { current, .. } = outcome else {
        panic!("expected rotation");
    };
    assert_eq!(store.record("rt-abc").await, None);
    assert_eq!(store.records_for_user("u1").await, vec![current]);
}

#[tokio::test]
async fn test_revoke_mode_second_rotation_loses() {
    let store = Arc::new(InMemoryRefreshTokenStore::new());
    store
        .seed(record_expiring_in("rt-abc", "u1", Duration::hours(6)))
        .await;

    let policy = policy_with(store.clone(), RotationMode::Revoke);
    policy.evaluate("rt-abc", &deadline()).await.unwrap();

    let second = policy.evaluate("rt-abc", &deadline()).await.unwrap();
    assert_eq!(second, RotationOutcome::Rejected(TokenState::NotFound));
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_unknown_and_expired_are_rejected_without_write() {
    let store = Arc::new(InMemoryRefreshTokenStore::new());
    store
        .seed(record_expiring_in("rt-old", "u1", Duration::minutes(-5)))
        .await;

    let policy = policy_with(store.clone(), RotationMode::Retain);

    let unknown = policy.evaluate("rt-missing", &deadline()).await.unwrap();
    let expired = policy.evaluate("rt-old", &deadline()).await.unwrap();

    assert_eq!(unknown, RotationOutcome::Rejected(TokenState::NotFound));
    assert_eq!(expired, RotationOutcome::Rejected(TokenState::NotFound));
    assert_eq!(store.write_count(), 0);
}

#[tokio::test]
async fn test_issue_persists_new_token() {
    let store = Arc::new(InMemoryRefreshTokenStore::new());
    let policy = policy_with(store.clone(), RotationMode::Retain);

    let record = policy.issue("u9", &deadline()).await.unwrap();

    assert_eq!(record.user_id, "u9");
    assert_eq!(store.record(&record.token).await, Some(record));
}

#[tokio::test]
async fn test_store_failure_is_propagated() {
    let store = Arc::new(InMemoryRefreshTokenStore::new());
    store.set_unavailable(true);

    let policy = policy_with(store, RotationMode::Retain);
    let err = policy.evaluate("rt-abc", &deadline()).await.unwrap_err();

    assert!(matches!(err, RefreshError::Store(StoreError::Backend { .. })));
}

#[test]
fn test_revoke_replace_race_maps_to_unauthorized() {
    let err: RefreshError = StoreError::NotFound.into();
    assert!(matches!(
        err,
        RefreshError::Unauthorized(AuthorizationError::RefreshTokenNotFound)
    ));
}
