mod cleanup_tests;
mod rotation_tests;

use chrono::{Duration, Utc};
use tp_shared::TokenConfig;

use crate::domain::entities::token::RefreshTokenRecord;

pub(super) const TEST_SECRET: &str = "test-secret-key-for-hs256-signing";
pub(super) const TEST_ISSUER: &str = "token-provider-test";
pub(super) const TEST_AUDIENCE: &str = "token-provider-test-api";

pub(super) fn test_config() -> TokenConfig {
    TokenConfig::new(TEST_SECRET, TEST_ISSUER, TEST_AUDIENCE)
}

/// A stored record for `user_id` that expires `remaining` from now
pub(super) fn record_expiring_in(token: &str, user_id: &str, remaining: Duration) -> RefreshTokenRecord {
    let now = Utc::now();
    RefreshTokenRecord::with_expiry(token, user_id, now + remaining, now - Duration::days(1))
}
