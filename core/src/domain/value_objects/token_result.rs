//! Results of access and refresh token decisions.
//!
//! These are plain return values; failures travel separately as
//! [`RefreshError`](crate::errors::RefreshError).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How a token in a result came to be
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenStatus {
    /// Freshly minted (access tokens, initial refresh tokens)
    Issued,
    /// The presented refresh token is handed back unchanged
    Reused,
    /// The presented refresh token was near expiry and has been replaced
    Rotated,
}

/// Cross-site policy of a cookie
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

/// Transport attribute describing how the refresh token travels back to the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookieSpec {
    pub http_only: bool,
    pub secure: bool,
    pub same_site: SameSite,
    /// Required for the client to function; never subject to consent filtering
    pub essential: bool,
    pub path: String,
    pub expires: DateTime<Utc>,
}

impl CookieSpec {
    /// HTTP-only, secure, `SameSite=Lax`, essential cookie expiring at `expires`
    pub fn refresh_token(expires: DateTime<Utc>) -> Self {
        Self {
            http_only: true,
            secure: true,
            same_site: SameSite::Lax,
            essential: true,
            path: "/".to_string(),
            expires,
        }
    }
}

/// A signed access token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessTokenResult {
    pub status: TokenStatus,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// The refresh token decision for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshTokenResult {
    pub status: TokenStatus,
    pub token: String,
    /// Owner of the stored record
    pub user_id: String,
    pub expire_date: DateTime<Utc>,
    /// Set when the token value must be (re)written on the client
    pub cookie: Option<CookieSpec>,
}

impl RefreshTokenResult {
    pub fn is_rotated(&self) -> bool {
        self.status == TokenStatus::Rotated
    }
}

/// Both credentials produced by one refresh call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshResponse {
    pub access: AccessTokenResult,
    pub refresh: RefreshTokenResult,
}
