//! Refresh token rotation policy
//!
//! Decides, per presented refresh token, whether it is handed back as is,
//! replaced by a fresh token, or refused.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tp_shared::{RotationMode, TokenConfig};
use tracing::{debug, info, warn};

use crate::domain::entities::token::RefreshTokenRecord;
use crate::errors::{RefreshResult, SigningError};
use crate::repositories::RefreshTokenStore;

use super::claims::ClaimsBuilder;
use super::deadline::Deadline;
use super::signer::TokenSigner;

/// Lifecycle state of a presented refresh token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenState {
    /// Valid and outside the rotation window
    ValidFresh,
    /// Valid but expiring within the rotation window
    ValidNearExpiry,
    Expired,
    NotFound,
}

/// What the policy decided for a presented token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RotationOutcome {
    /// Token is fresh; nothing was written
    Reused(RefreshTokenRecord),
    /// Token was near expiry; `current` has been persisted
    Rotated {
        previous: RefreshTokenRecord,
        current: RefreshTokenRecord,
    },
    /// Token is unusable; nothing was written
    Rejected(TokenState),
}

/// Applies the rotation state machine against a refresh token store
pub struct RotationPolicy<S: RefreshTokenStore + ?Sized> {
    store: Arc<S>,
    signer: Arc<TokenSigner>,
    rotation_window: Option<Duration>,
    claim_lifetime: Option<Duration>,
    lifetime_days: i64,
    mode: RotationMode,
}

impl<S: RefreshTokenStore + ?Sized> RotationPolicy<S> {
    pub fn new(store: Arc<S>, signer: Arc<TokenSigner>, config: &TokenConfig) -> Self {
        Self {
            store,
            signer,
            rotation_window: Duration::try_hours(config.rotation_window_hours),
            claim_lifetime: Duration::try_minutes(config.refresh_token_claim_minutes),
            lifetime_days: config.refresh_token_lifetime_days,
            mode: config.rotation_mode,
        }
    }

    pub fn mode(&self) -> RotationMode {
        self.mode
    }

    /// Classifies a looked-up record at `now`
    ///
    /// A record expiring exactly at `now + window` is already near expiry.
    /// A window reaching past the representable range covers every record.
    pub fn classify(&self, record: Option<&RefreshTokenRecord>, now: DateTime<Utc>) -> TokenState {
        let horizon = self
            .rotation_window
            .and_then(|window| now.checked_add_signed(window));

        match (record, horizon) {
            (None, _) => TokenState::NotFound,
            (Some(r), _) if r.is_expired_at(now) => TokenState::Expired,
            (Some(r), Some(horizon)) if r.expire_date > horizon => TokenState::ValidFresh,
            (Some(_), _) => TokenState::ValidNearExpiry,
        }
    }

    /// Looks up `presented` and reuses, rotates or rejects it
    ///
    /// At most one write happens, and only for a near-expiry token.
    pub async fn evaluate(&self, presented: &str, deadline: &Deadline) -> RefreshResult<RotationOutcome> {
        let record = self.store.get(presented, deadline).await?;
        let state = self.classify(record.as_ref(), Utc::now());

        let previous = match (state, record) {
            (TokenState::ValidFresh, Some(record)) => {
                debug!(user_id = %record.user_id, "Refresh token reused");
                return Ok(RotationOutcome::Reused(record));
            }
            (TokenState::ValidNearExpiry, Some(record)) => record,
            (state, _) => {
                warn!(token = %token_hint(presented), ?state, "Refresh token rejected");
                return Ok(RotationOutcome::Rejected(state));
            }
        };

        let token = self.mint(&previous.user_id)?;
        let current = match self.mode {
            RotationMode::Retain => {
                self.store
                    .insert(&token, &previous.user_id, self.lifetime_days, deadline)
                    .await?
            }
            RotationMode::Revoke => {
                self.store
                    .replace(
                        &previous.token,
                        &token,
                        &previous.user_id,
                        self.lifetime_days,
                        deadline,
                    )
                    .await?
            }
        };

        info!(
            user_id = %current.user_id,
            mode = %self.mode,
            expire_date = %current.expire_date,
            "Refresh token rotated"
        );

        Ok(RotationOutcome::Rotated { previous, current })
    }

    /// Mints and persists a brand-new refresh token for `user_id`
    pub async fn issue(&self, user_id: &str, deadline: &Deadline) -> RefreshResult<RefreshTokenRecord> {
        let token = self.mint(user_id)?;
        let record = self
            .store
            .insert(&token, user_id, self.lifetime_days, deadline)
            .await?;

        info!(user_id = %record.user_id, "Refresh token issued");
        Ok(record)
    }

    /// Signs a refresh token value carrying only the subject
    ///
    /// The embedded expiry is short and independent of the stored expiry.
    pub fn mint(&self, user_id: &str) -> Result<String, SigningError> {
        let claims = ClaimsBuilder::refresh_claims(Some(user_id))
            .map_err(|e| SigningError::Invalid(e.to_string()))?;
        let lifetime = self.claim_lifetime.ok_or(SigningError::LifetimeOutOfRange)?;
        self.signer
            .sign_for(&claims, lifetime)
            .map(|(token, _)| token)
    }
}

/// Tail of a token value, enough to correlate log lines
pub(crate) fn token_hint(token: &str) -> &str {
    let start = token.len().saturating_sub(8);
    token.get(start..).unwrap_or("")
}
