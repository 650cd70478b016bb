//! In-memory implementation of RefreshTokenStore
//!
//! Used for development without a database and throughout the test suites.
//! Exposes read/write counters and fault injection so callers can assert
//! which store operations a workflow performed.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::domain::entities::token::RefreshTokenRecord;
use crate::errors::StoreError;
use crate::services::token::Deadline;

use super::r#trait::RefreshTokenStore;

/// In-memory refresh token store
#[derive(Default)]
pub struct InMemoryRefreshTokenStore {
    records: Arc<RwLock<HashMap<String, RefreshTokenRecord>>>,
    reads: AtomicUsize,
    writes: AtomicUsize,
    unavailable: AtomicBool,
    latency: Option<Duration>,
}

impl InMemoryRefreshTokenStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every operation by `latency`
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Put a record in place without counting it as a write
    pub async fn seed(&self, record: RefreshTokenRecord) {
        self.records
            .write()
            .await
            .insert(record.token.clone(), record);
    }

    /// Make every subsequent operation fail with a backend error
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of lookups performed
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Number of insert/replace attempts
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Raw access to a record, including expired ones
    pub async fn record(&self, token: &str) -> Option<RefreshTokenRecord> {
        self.records.read().await.get(token).cloned()
    }

    /// All records held for a user, including expired ones
    pub async fn records_for_user(&self, user_id: &str) -> Vec<RefreshTokenRecord> {
        self.records
            .read()
            .await
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    async fn simulate_backend(&self) -> Result<(), StoreError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::backend("in-memory store marked unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl RefreshTokenStore for InMemoryRefreshTokenStore {
    async fn get(
        &self,
        token: &str,
        deadline: &Deadline,
    ) -> Result<Option<RefreshTokenRecord>, StoreError> {
        self.reads.fetch_add(1, Ordering::SeqCst);

        deadline
            .run(async {
                self.simulate_backend().await?;
                let now = Utc::now();
                let records = self.records.read().await;
                Ok(records
                    .get(token)
                    .filter(|r| !r.is_expired_at(now))
                    .cloned())
            })
            .await
    }

    async fn insert(
        &self,
        token: &str,
        user_id: &str,
        lifetime_days: i64,
        deadline: &Deadline,
    ) -> Result<RefreshTokenRecord, StoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);

        deadline
            .run(async {
                self.simulate_backend().await?;
                let mut records = self.records.write().await;

                if records.contains_key(token) {
                    return Err(StoreError::Duplicate);
                }

                let record = RefreshTokenRecord::new(token, user_id, lifetime_days)
                    .ok_or(StoreError::InvalidLifetime {
                        days: lifetime_days,
                    })?;
                records.insert(record.token.clone(), record.clone());
                Ok(record)
            })
            .await
    }

    async fn replace(
        &self,
        previous: &str,
        token: &str,
        user_id: &str,
        lifetime_days: i64,
        deadline: &Deadline,
    ) -> Result<RefreshTokenRecord, StoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);

        deadline
            .run(async {
                self.simulate_backend().await?;
                // One write guard covers both steps, so the swap is atomic.
                let mut records = self.records.write().await;

                let now = Utc::now();
                if !records.get(previous).is_some_and(|r| !r.is_expired_at(now)) {
                    return Err(StoreError::NotFound);
                }
                if records.contains_key(token) {
                    return Err(StoreError::Duplicate);
                }

                let record = RefreshTokenRecord::new(token, user_id, lifetime_days)
                    .ok_or(StoreError::InvalidLifetime {
                        days: lifetime_days,
                    })?;
                records.remove(previous);
                records.insert(record.token.clone(), record.clone());
                Ok(record)
            })
            .await
    }

    async fn delete_expired(
        &self,
        now: DateTime<Utc>,
        deadline: &Deadline,
    ) -> Result<u64, StoreError> {
        deadline
            .run(async {
                self.simulate_backend().await?;
                let mut records = self.records.write().await;
                let before = records.len();
                records.retain(|_, r| !r.is_expired_at(now));
                Ok((before - records.len()) as u64)
            })
            .await
    }

    async fn ping(&self, deadline: &Deadline) -> Result<(), StoreError> {
        deadline.run(self.simulate_backend()).await
    }
}
