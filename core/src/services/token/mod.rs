//! Token service module
//!
//! This module handles the token lifecycle:
//! - Claim construction and HS256 signing/verification
//! - Refresh token rotation against a store
//! - The refresh workflow used by the web layer
//! - Per-request deadlines
//! - Background cleanup of expired tokens

mod claims;
mod cleanup;
mod deadline;
mod orchestrator;
mod rotation;
mod signer;

#[cfg(test)]
mod tests;

pub use claims::ClaimsBuilder;
pub use cleanup::{CleanupResult, TokenCleanupConfig, TokenCleanupService};
pub use deadline::Deadline;
pub use orchestrator::RefreshOrchestrator;
pub use rotation::{RotationOutcome, RotationPolicy, TokenState};
pub use signer::TokenSigner;
