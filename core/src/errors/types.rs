//! Layer-specific error types for claims, signing, storage and authorization.
//!
//! Display strings are meant for logs. Client-facing wording is chosen in
//! [`RefreshError::public_message`](super::RefreshError::public_message).

use thiserror::Error;

/// Input validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Field required: {field}")]
    RequiredField { field: &'static str },
}

/// Token signing and verification errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SigningError {
    #[error("Signing key is missing or empty")]
    MissingKey,

    #[error("Token encoding failed: {0}")]
    Encoding(String),

    #[error("Token lifetime is out of range")]
    LifetimeOutOfRange,

    #[error("Token expired")]
    Expired,

    #[error("Invalid token: {0}")]
    Invalid(String),
}

/// Refresh token store errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Refresh token already exists")]
    Duplicate,

    #[error("Refresh token not found")]
    NotFound,

    #[error("Store operation timed out")]
    TimedOut,

    #[error("Store operation cancelled")]
    Cancelled,

    #[error("Refresh token lifetime of {days} days is out of range")]
    InvalidLifetime { days: i64 },

    #[error("Store backend error: {message}")]
    Backend { message: String },
}

impl StoreError {
    pub fn backend(message: impl Into<String>) -> Self {
        StoreError::Backend {
            message: message.into(),
        }
    }
}

/// Reasons a presented refresh credential is refused
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationError {
    #[error("No refresh token was presented")]
    MissingRefreshToken,

    /// Unknown and expired records are indistinguishable at the store
    #[error("Refresh token not found or expired")]
    RefreshTokenNotFound,

    #[error("Refresh token has expired")]
    RefreshTokenExpired,
}
