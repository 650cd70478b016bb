//! Refresh workflow: validate, rotate, sign

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tp_shared::TokenConfig;
use tracing::{error, info, warn};

use crate::domain::entities::token::RefreshTokenRecord;
use crate::domain::value_objects::token_request::non_blank;
use crate::domain::value_objects::{
    AccessTokenResult, CookieSpec, RefreshResponse, RefreshTokenResult, TokenRequest, TokenStatus,
};
use crate::errors::{
    AuthorizationError, ErrorKind, RefreshError, RefreshResult, SigningError,
};
use crate::repositories::RefreshTokenStore;

use super::claims::ClaimsBuilder;
use super::deadline::Deadline;
use super::rotation::{token_hint, RotationOutcome, RotationPolicy, TokenState};
use super::signer::TokenSigner;

/// Entry point of the refresh endpoint
///
/// Owns the signer and the rotation policy. Holds no per-request state and
/// is shared behind an `Arc` by the web layer.
pub struct RefreshOrchestrator<S: RefreshTokenStore + ?Sized> {
    signer: Arc<TokenSigner>,
    policy: RotationPolicy<S>,
    access_lifetime: chrono::Duration,
    timeout: Duration,
}

impl<S: RefreshTokenStore + ?Sized> RefreshOrchestrator<S> {
    /// Creates an orchestrator over `store`
    ///
    /// # Returns
    /// * `Err(SigningError::MissingKey)` - No signing key configured
    /// * `Err(SigningError::LifetimeOutOfRange)` - Access token lifetime not representable
    pub fn new(store: Arc<S>, config: &TokenConfig) -> Result<Self, SigningError> {
        let signer = Arc::new(TokenSigner::new(config)?);
        let access_lifetime = chrono::Duration::try_minutes(config.access_token_lifetime_minutes)
            .ok_or(SigningError::LifetimeOutOfRange)?;
        let policy = RotationPolicy::new(store, signer.clone(), config);

        Ok(Self {
            signer,
            policy,
            access_lifetime,
            timeout: Duration::from_secs(config.request_timeout_seconds),
        })
    }

    /// Overrides the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn signer(&self) -> &TokenSigner {
        &self.signer
    }

    pub fn policy(&self) -> &RotationPolicy<S> {
        &self.policy
    }

    /// Handles one refresh call
    ///
    /// Identity is validated before the presented token is looked at, and
    /// neither check touches the store. A single deadline, derived here from
    /// the configured timeout and `cancel`, bounds every store call.
    pub async fn handle(
        &self,
        request: &TokenRequest,
        presented: Option<&str>,
        cancel: CancellationToken,
    ) -> RefreshResult<RefreshResponse> {
        let result = self.refresh(request, presented, cancel).await;
        if let Err(e) = &result {
            log_failure(e);
        }
        result
    }

    async fn refresh(
        &self,
        request: &TokenRequest,
        presented: Option<&str>,
        cancel: CancellationToken,
    ) -> RefreshResult<RefreshResponse> {
        let (user_id, email) = request.identity()?;
        let presented =
            non_blank(presented).ok_or(AuthorizationError::MissingRefreshToken)?;

        let deadline = Deadline::after(self.timeout, cancel);

        let refresh = match self.policy.evaluate(presented, &deadline).await? {
            RotationOutcome::Reused(record) => refresh_result(TokenStatus::Reused, record),
            RotationOutcome::Rotated { current, .. } => {
                refresh_result(TokenStatus::Rotated, current)
            }
            RotationOutcome::Rejected(TokenState::Expired) => {
                return Err(AuthorizationError::RefreshTokenExpired.into());
            }
            RotationOutcome::Rejected(_) => {
                return Err(AuthorizationError::RefreshTokenNotFound.into());
            }
        };

        // Ownership is not enforced; the record's owner is only compared for the log.
        if refresh.user_id != user_id {
            warn!(
                user_id = %user_id,
                owner = %refresh.user_id,
                token = %token_hint(presented),
                "Refresh token presented for a different user"
            );
        }

        let access = self.generate_access_token(Some(user_id), Some(email), Some(&refresh.token))?;

        info!(user_id = %user_id, status = ?refresh.status, "Tokens refreshed");
        Ok(RefreshResponse { access, refresh })
    }

    /// Issues a first refresh token and a matching access token
    pub async fn issue(
        &self,
        request: &TokenRequest,
        cancel: CancellationToken,
    ) -> RefreshResult<RefreshResponse> {
        let result = self.issue_new(request, cancel).await;
        if let Err(e) = &result {
            log_failure(e);
        }
        result
    }

    async fn issue_new(
        &self,
        request: &TokenRequest,
        cancel: CancellationToken,
    ) -> RefreshResult<RefreshResponse> {
        let (user_id, email) = request.identity()?;
        let deadline = Deadline::after(self.timeout, cancel);

        let record = self.policy.issue(user_id, &deadline).await?;
        let refresh = refresh_result(TokenStatus::Issued, record);
        let access = self.generate_access_token(Some(user_id), Some(email), Some(&refresh.token))?;

        Ok(RefreshResponse { access, refresh })
    }

    /// Signs an access token for the given identity
    pub fn generate_access_token(
        &self,
        user_id: Option<&str>,
        email: Option<&str>,
        refresh_ref: Option<&str>,
    ) -> RefreshResult<AccessTokenResult> {
        let claims = ClaimsBuilder::access_claims(user_id, email, refresh_ref)?;
        let (token, expires_at) = self.signer.sign_for(&claims, self.access_lifetime)?;

        Ok(AccessTokenResult {
            status: TokenStatus::Issued,
            token,
            expires_at,
        })
    }
}

fn refresh_result(status: TokenStatus, record: RefreshTokenRecord) -> RefreshTokenResult {
    RefreshTokenResult {
        status,
        cookie: Some(CookieSpec::refresh_token(record.expire_date)),
        expire_date: record.expire_date,
        user_id: record.user_id,
        token: record.token,
    }
}

fn log_failure(e: &RefreshError) {
    match e.kind() {
        ErrorKind::Internal => error!(error = %e, "Token refresh failed"),
        ErrorKind::Timeout => warn!(error = %e, "Token refresh did not complete in time"),
        ErrorKind::Validation | ErrorKind::Authorization => {
            info!(error = %e, "Token refresh refused")
        }
    }
}
