//! Business services containing domain logic and use cases.

pub mod token;

// Re-export commonly used types
pub use token::{
    ClaimsBuilder, CleanupResult, Deadline, RefreshOrchestrator, RotationOutcome, RotationPolicy,
    TokenCleanupConfig, TokenCleanupService, TokenSigner, TokenState,
};
