//! Domain error types and error handling.

mod types;


pub use types::{AuthorizationError, SigningError, StoreError, ValidationError};

use thiserror::Error;

/// Errors surfaced by the refresh workflow
///
/// Every lower-layer failure is converted into one of these at the
/// orchestrator boundary. The API layer maps [`ErrorKind`] to a status code.
#[derive(Error, Debug)]
pub enum RefreshError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Unauthorized: {0}")]
    Unauthorized(#[from] AuthorizationError),

    #[error("Signing failed: {0}")]
    Signing(#[from] SigningError),

    #[error("Refresh token store failed: {0}")]
    Store(StoreError),

    #[error("Refresh request timed out")]
    Timeout,

    #[error("Refresh request cancelled")]
    Cancelled,
}

impl From<StoreError> for RefreshError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::TimedOut => RefreshError::Timeout,
            StoreError::Cancelled => RefreshError::Cancelled,
            // A concurrent rotation deleted the token first.
            StoreError::NotFound => {
                RefreshError::Unauthorized(AuthorizationError::RefreshTokenNotFound)
            }
            other => RefreshError::Store(other),
        }
    }
}

/// Coarse classification used for transport mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Authorization,
    Internal,
    Timeout,
}

impl RefreshError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RefreshError::Validation(_) => ErrorKind::Validation,
            RefreshError::Unauthorized(_) => ErrorKind::Authorization,
            RefreshError::Signing(_) | RefreshError::Store(_) => ErrorKind::Internal,
            RefreshError::Timeout | RefreshError::Cancelled => ErrorKind::Timeout,
        }
    }

    /// Stable message safe to return to a client
    pub fn public_message(&self) -> &'static str {
        match self {
            RefreshError::Validation(_) => "Please provide a valid userid and email address",
            RefreshError::Unauthorized(AuthorizationError::MissingRefreshToken) => {
                "No refresh token was found."
            }
            RefreshError::Unauthorized(AuthorizationError::RefreshTokenExpired) => {
                "Refresh token has expired"
            }
            RefreshError::Unauthorized(AuthorizationError::RefreshTokenNotFound) => {
                "Refresh token not found or expired"
            }
            RefreshError::Timeout | RefreshError::Cancelled => {
                "The request timed out while generating tokens"
            }
            RefreshError::Signing(_) | RefreshError::Store(_) => {
                "An unexpected error occurred while generating tokens"
            }
        }
    }
}

pub type RefreshResult<T> = Result<T, RefreshError>;
