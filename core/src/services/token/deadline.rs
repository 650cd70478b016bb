//! Per-request deadline combining a fixed timeout with caller cancellation

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::errors::StoreError;

/// A single deadline derived at the start of a request and passed to
/// every suspending store call.
///
/// Whichever fires first, the timeout or the caller's cancellation token,
/// aborts the pending operation.
#[derive(Debug, Clone)]
pub struct Deadline {
    expires_at: Instant,
    cancel: CancellationToken,
}

impl Deadline {
    /// Deadline `timeout` from now, also bound to `cancel`
    pub fn after(timeout: Duration, cancel: CancellationToken) -> Self {
        Self {
            expires_at: Instant::now() + timeout,
            cancel,
        }
    }

    /// Deadline with only a timeout
    pub fn timeout(timeout: Duration) -> Self {
        Self::after(timeout, CancellationToken::new())
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }

    /// Time left before the deadline, zero if already passed
    pub fn remaining(&self) -> Duration {
        self.expires_at.saturating_duration_since(Instant::now())
    }

    /// Drive `operation` to completion unless the deadline fires first
    pub async fn run<T, F>(&self, operation: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        if self.cancel.is_cancelled() {
            return Err(StoreError::Cancelled);
        }
        if self.is_expired() {
            return Err(StoreError::TimedOut);
        }

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(StoreError::Cancelled),
            result = tokio::time::timeout_at(self.expires_at, operation) => {
                result.unwrap_or(Err(StoreError::TimedOut))
            }
        }
    }
}
