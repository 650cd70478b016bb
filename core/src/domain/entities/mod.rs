//! Domain entities representing core business objects.

pub mod token;

// Re-export commonly used types
pub use token::{
    ClaimSet, Claims, RefreshTokenRecord,
    ACCESS_TOKEN_LIFETIME_MINUTES, REFRESH_TOKEN_CLAIM_MINUTES,
    REFRESH_TOKEN_LIFETIME_DAYS, ROTATION_WINDOW_HOURS,
};
