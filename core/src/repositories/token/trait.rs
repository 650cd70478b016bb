//! Refresh token store trait defining the persistence boundary.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::token::RefreshTokenRecord;
use crate::errors::StoreError;
use crate::services::token::Deadline;

/// Persistence boundary for refresh token records
///
/// Records are append-only: rotation inserts a new record and never updates
/// an existing one. Every suspending call observes the request [`Deadline`]
/// and returns [`StoreError::TimedOut`] or [`StoreError::Cancelled`] promptly.
///
/// # Concurrency
/// Token uniqueness is enforced by the store itself. Two inserts with the
/// same token value must fail deterministically with
/// [`StoreError::Duplicate`]; the second must never overwrite the first.
#[async_trait]
pub trait RefreshTokenStore: Send + Sync {
    /// Fetch a record by token value
    ///
    /// # Returns
    /// * `Ok(Some(record))` - Token exists and `expire_date > now`
    /// * `Ok(None)` - Token is unknown or expired; the two cases are not distinguished
    /// * `Err(StoreError)` - Backend failure, timeout or cancellation
    async fn get(
        &self,
        token: &str,
        deadline: &Deadline,
    ) -> Result<Option<RefreshTokenRecord>, StoreError>;

    /// Insert a new record expiring `lifetime_days` from now
    ///
    /// # Returns
    /// * `Ok(record)` - The stored record
    /// * `Err(StoreError::Duplicate)` - The token value is already taken
    /// * `Err(StoreError)` - Any other persistence failure; fatal for the request
    async fn insert(
        &self,
        token: &str,
        user_id: &str,
        lifetime_days: i64,
        deadline: &Deadline,
    ) -> Result<RefreshTokenRecord, StoreError>;

    /// Atomically insert a new record and delete `previous`
    ///
    /// # Returns
    /// * `Ok(record)` - The new record; `previous` no longer exists
    /// * `Err(StoreError::NotFound)` - `previous` was already gone; nothing was written
    /// * `Err(StoreError::Duplicate)` - The new token value is already taken; nothing was written
    async fn replace(
        &self,
        previous: &str,
        token: &str,
        user_id: &str,
        lifetime_days: i64,
        deadline: &Deadline,
    ) -> Result<RefreshTokenRecord, StoreError>;

    /// Delete every record whose expiry is at or before `now`
    ///
    /// # Returns
    /// * `Ok(count)` - Number of records deleted
    async fn delete_expired(
        &self,
        now: DateTime<Utc>,
        deadline: &Deadline,
    ) -> Result<u64, StoreError>;

    /// Check that the backing store is reachable
    async fn ping(&self, deadline: &Deadline) -> Result<(), StoreError> {
        let _ = deadline;
        Ok(())
    }
}
