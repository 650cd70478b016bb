//! # TokenProvider Core
//!
//! Core business logic for issuing and rotating access and refresh tokens.
//! This crate contains domain entities, the claims builder and token signer,
//! the refresh token store interface, the rotation policy and the refresh
//! orchestrator that ties them together.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
