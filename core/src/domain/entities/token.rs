//! Token entities: JWT claims and the persisted refresh token record.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Access token lifetime (5 minutes)
pub const ACCESS_TOKEN_LIFETIME_MINUTES: i64 = 5;

/// Expiry embedded in a signed refresh token (5 minutes).
/// The stored record has its own, much longer, expiry.
pub const REFRESH_TOKEN_CLAIM_MINUTES: i64 = 5;

/// Refresh token storage lifetime (7 days)
pub const REFRESH_TOKEN_LIFETIME_DAYS: i64 = 7;

/// Rotation window before refresh token expiry (1 day)
pub const ROTATION_WINDOW_HOURS: i64 = 24;

/// The identity assertions embedded in a signed token
///
/// Access tokens carry every field; refresh tokens carry only `sub`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimSet {
    /// Subject (user ID)
    pub sub: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Reference to the refresh token the access token was issued against
    #[serde(
        rename = "refreshToken",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub refresh_token: Option<String>,
}

/// Claims structure for the JWT payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(flatten)]
    pub claims: ClaimSet,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Not before timestamp
    pub nbf: i64,

    /// Issuer
    pub iss: String,

    /// Audience
    pub aud: String,

    /// JWT ID, makes two tokens signed in the same second distinct
    pub jti: String,
}

impl Claims {
    /// Checks if the claims have expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// Lifetime the token was issued with, in seconds
    pub fn lifetime_seconds(&self) -> i64 {
        self.exp - self.iat
    }
}

/// Refresh token record stored in the database
///
/// Records are immutable once written. Rotation appends a new record
/// instead of updating the old one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshTokenRecord {
    /// Token value; primary key and bearer credential
    pub token: String,

    /// User ID this token belongs to
    pub user_id: String,

    /// Instant after which the record is invalid
    pub expire_date: DateTime<Utc>,

    /// Timestamp when the record was created
    pub created_at: DateTime<Utc>,
}

impl RefreshTokenRecord {
    /// Creates a record expiring `lifetime_days` from now
    ///
    /// Returns `None` when the expiry cannot be represented.
    pub fn new(
        token: impl Into<String>,
        user_id: impl Into<String>,
        lifetime_days: i64,
    ) -> Option<Self> {
        let now = Utc::now();
        let expire_date = expiry_after(now, lifetime_days)?;
        Some(Self::with_expiry(token, user_id, expire_date, now))
    }

    /// Creates a record with an explicit expiry
    pub fn with_expiry(
        token: impl Into<String>,
        user_id: impl Into<String>,
        expire_date: DateTime<Utc>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            token: token.into(),
            user_id: user_id.into(),
            expire_date,
            created_at,
        }
    }

    /// Checks if the record has expired at `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expire_date <= now
    }

    /// Checks if the record has expired
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Time remaining until expiration, or zero if expired
    pub fn time_until_expiration(&self, now: DateTime<Utc>) -> Duration {
        if self.expire_date > now {
            self.expire_date - now
        } else {
            Duration::zero()
        }
    }
}

/// `now + lifetime_days`, or `None` on overflow
pub fn expiry_after(now: DateTime<Utc>, lifetime_days: i64) -> Option<DateTime<Utc>> {
    Duration::try_days(lifetime_days).and_then(|lifetime| now.checked_add_signed(lifetime))
}
