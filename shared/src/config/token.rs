//! Token issuance and rotation configuration

use serde::{Deserialize, Serialize};

/// Name of the cookie carrying the refresh token
pub const REFRESH_TOKEN_COOKIE: &str = "refreshToken";

/// Longest accepted access token or refresh claim lifetime (one day)
pub const MAX_TOKEN_LIFETIME_MINUTES: i64 = 24 * 60;

/// Longest accepted refresh token storage lifetime (ten years)
pub const MAX_REFRESH_LIFETIME_DAYS: i64 = 3650;

/// What happens to a refresh token once a replacement has been issued
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RotationMode {
    /// The previous token stays valid until its own expiry.
    /// A user may hold several valid refresh tokens at once.
    Retain,
    /// The previous token is deleted in the same transaction that stores its replacement.
    Revoke,
}

impl Default for RotationMode {
    fn default() -> Self {
        RotationMode::Retain
    }
}

impl std::fmt::Display for RotationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RotationMode::Retain => write!(f, "retain"),
            RotationMode::Revoke => write!(f, "revoke"),
        }
    }
}

impl std::str::FromStr for RotationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "retain" | "keep" => Ok(RotationMode::Retain),
            "revoke" | "replace" => Ok(RotationMode::Revoke),
            _ => Err(format!("Invalid rotation mode: {}", s)),
        }
    }
}

/// Signing and lifetime settings for access and refresh tokens
///
/// Built once at startup and handed to the signer and rotation policy.
/// Nothing below the API layer reads the process environment.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TokenConfig {
    /// Symmetric HS256 signing key
    #[serde(skip_serializing)]
    pub secret_key: String,

    /// `iss` claim
    pub issuer: String,

    /// `aud` claim
    pub audience: String,

    /// Access token lifetime in minutes
    #[serde(default = "default_access_token_minutes")]
    pub access_token_lifetime_minutes: i64,

    /// Expiry embedded in the signed refresh token itself.
    /// Unrelated to how long the stored record stays valid.
    #[serde(default = "default_refresh_claim_minutes")]
    pub refresh_token_claim_minutes: i64,

    /// Storage lifetime of a refresh token record in days
    #[serde(default = "default_refresh_lifetime_days")]
    pub refresh_token_lifetime_days: i64,

    /// Span before expiry in which a refresh call mints a replacement
    #[serde(default = "default_rotation_window_hours")]
    pub rotation_window_hours: i64,

    #[serde(default)]
    pub rotation_mode: RotationMode,

    /// Upper bound on a single refresh request, in seconds
    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,

    /// How often expired records are swept, in seconds (0 disables the sweep)
    #[serde(default = "default_cleanup_interval_seconds")]
    pub cleanup_interval_seconds: u64,

    /// Environment settings that were present but could not be parsed
    #[serde(skip)]
    pub invalid_settings: Vec<String>,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            secret_key: String::new(),
            issuer: String::from("token-provider"),
            audience: String::from("token-provider-api"),
            access_token_lifetime_minutes: default_access_token_minutes(),
            refresh_token_claim_minutes: default_refresh_claim_minutes(),
            refresh_token_lifetime_days: default_refresh_lifetime_days(),
            rotation_window_hours: default_rotation_window_hours(),
            rotation_mode: RotationMode::default(),
            request_timeout_seconds: default_request_timeout_seconds(),
            cleanup_interval_seconds: default_cleanup_interval_seconds(),
            invalid_settings: Vec::new(),
        }
    }
}

impl TokenConfig {
    /// Create a configuration with the given signing parameters
    pub fn new(
        secret_key: impl Into<String>,
        issuer: impl Into<String>,
        audience: impl Into<String>,
    ) -> Self {
        Self {
            secret_key: secret_key.into(),
            issuer: issuer.into(),
            audience: audience.into(),
            ..Default::default()
        }
    }

    /// Create from environment variables
    ///
    /// A missing `TOKEN_SECRETKEY` yields an empty key; the signer refuses
    /// to start with it.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create from an arbitrary key lookup
    ///
    /// Unset keys take their default. A key that is set but does not parse
    /// also takes its default and is recorded in `invalid_settings`, which
    /// [`TokenConfig::validate`] rejects. Lifetimes in days must be whole
    /// numbers.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let mut invalid = Vec::new();

        let access_token_lifetime_minutes = parse_setting(
            &lookup,
            &mut invalid,
            "TOKEN_ACCESSTOKEN_LIFETIME_MINUTES",
            defaults.access_token_lifetime_minutes,
        );
        let refresh_token_lifetime_days = parse_setting(
            &lookup,
            &mut invalid,
            "TOKEN_REFRESHTOKEN_LIFETIME",
            defaults.refresh_token_lifetime_days,
        );
        let rotation_window_hours = parse_setting(
            &lookup,
            &mut invalid,
            "TOKEN_ROTATION_WINDOW_HOURS",
            defaults.rotation_window_hours,
        );
        let rotation_mode = parse_setting(
            &lookup,
            &mut invalid,
            "TOKEN_ROTATION_MODE",
            defaults.rotation_mode,
        );
        let request_timeout_seconds = parse_setting(
            &lookup,
            &mut invalid,
            "TOKEN_REQUEST_TIMEOUT_SECONDS",
            defaults.request_timeout_seconds,
        );
        let cleanup_interval_seconds = parse_setting(
            &lookup,
            &mut invalid,
            "TOKEN_CLEANUP_INTERVAL_SECONDS",
            defaults.cleanup_interval_seconds,
        );

        Self {
            secret_key: lookup("TOKEN_SECRETKEY").unwrap_or_default(),
            issuer: lookup("TOKEN_ISSUER").unwrap_or(defaults.issuer),
            audience: lookup("TOKEN_AUDIENCE").unwrap_or(defaults.audience),
            access_token_lifetime_minutes,
            refresh_token_claim_minutes: defaults.refresh_token_claim_minutes,
            refresh_token_lifetime_days,
            rotation_window_hours,
            rotation_mode,
            request_timeout_seconds,
            cleanup_interval_seconds,
            invalid_settings: invalid,
        }
    }

    /// Check that every setting parsed and lies within its accepted range
    pub fn validate(&self) -> Result<(), String> {
        if !self.invalid_settings.is_empty() {
            return Err(format!(
                "Invalid token settings: {}",
                self.invalid_settings.join("; ")
            ));
        }
        if !(1..=MAX_TOKEN_LIFETIME_MINUTES).contains(&self.access_token_lifetime_minutes) {
            return Err(format!(
                "TOKEN_ACCESSTOKEN_LIFETIME_MINUTES must be between 1 and {}",
                MAX_TOKEN_LIFETIME_MINUTES
            ));
        }
        if !(1..=MAX_TOKEN_LIFETIME_MINUTES).contains(&self.refresh_token_claim_minutes) {
            return Err(format!(
                "Refresh token claim lifetime must be between 1 and {} minutes",
                MAX_TOKEN_LIFETIME_MINUTES
            ));
        }
        if !(1..=MAX_REFRESH_LIFETIME_DAYS).contains(&self.refresh_token_lifetime_days) {
            return Err(format!(
                "TOKEN_REFRESHTOKEN_LIFETIME must be between 1 and {} days",
                MAX_REFRESH_LIFETIME_DAYS
            ));
        }
        let max_window_hours = self.refresh_token_lifetime_days * 24;
        if !(0..=max_window_hours).contains(&self.rotation_window_hours) {
            return Err(format!(
                "TOKEN_ROTATION_WINDOW_HOURS must be between 0 and {} (the refresh token lifetime)",
                max_window_hours
            ));
        }
        if self.request_timeout_seconds == 0 {
            return Err("TOKEN_REQUEST_TIMEOUT_SECONDS must be positive".to_string());
        }
        Ok(())
    }

    /// Set the refresh token storage lifetime in days
    pub fn with_refresh_lifetime_days(mut self, days: i64) -> Self {
        self.refresh_token_lifetime_days = days;
        self
    }

    /// Set the rotation window in hours
    pub fn with_rotation_window_hours(mut self, hours: i64) -> Self {
        self.rotation_window_hours = hours;
        self
    }

    /// Set the rotation mode
    pub fn with_rotation_mode(mut self, mode: RotationMode) -> Self {
        self.rotation_mode = mode;
        self
    }

    /// Set the per-request timeout in seconds
    pub fn with_request_timeout_seconds(mut self, seconds: u64) -> Self {
        self.request_timeout_seconds = seconds;
        self
    }

    /// Check whether a signing key has been provided
    pub fn has_secret_key(&self) -> bool {
        !self.secret_key.trim().is_empty()
    }
}

fn parse_setting<T, F>(lookup: &F, invalid: &mut Vec<String>, key: &str, default: T) -> T
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => default,
        Some(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                invalid.push(format!("{}={:?} is not valid", key, raw));
                default
            }
        },
    }
}

fn default_access_token_minutes() -> i64 {
    5
}

fn default_refresh_claim_minutes() -> i64 {
    5
}

fn default_refresh_lifetime_days() -> i64 {
    7
}

fn default_rotation_window_hours() -> i64 {
    24
}

fn default_request_timeout_seconds() -> u64 {
    10
}

fn default_cleanup_interval_seconds() -> u64 {
    3600
}
