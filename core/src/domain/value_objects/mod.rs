//! Value objects representing immutable domain concepts.

pub mod token_request;
pub mod token_result;

// Re-export commonly used types
pub use token_request::TokenRequest;
pub use token_result::{
    AccessTokenResult, CookieSpec, RefreshResponse, RefreshTokenResult, SameSite, TokenStatus,
};
