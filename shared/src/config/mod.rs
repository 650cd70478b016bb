//! Configuration module with business-specific sub-modules
//!
//! - `token` - Signing parameters, token lifetimes and rotation policy
//! - `database` - Refresh token store connection settings
//! - `environment` - Environment detection
//! - `server` - HTTP server and CORS configuration
//!
//! Everything is read from the process environment exactly once, in
//! [`AppConfig::from_env`], and passed down as immutable values.

pub mod database;
pub mod environment;
pub mod server;
pub mod token;

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use database::DatabaseConfig;
pub use environment::Environment;
pub use server::{CorsConfig, ServerConfig};
pub use token::{RotationMode, TokenConfig, REFRESH_TOKEN_COOKIE};

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Server configuration
    pub server: ServerConfig,

    /// Refresh token store configuration
    pub database: DatabaseConfig,

    /// Token signing and rotation configuration
    pub token: TokenConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            token: TokenConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment
    pub fn from_env() -> Self {
        Self {
            environment: Environment::from_env(),
            server: ServerConfig::from_env(),
            database: DatabaseConfig::from_env(),
            token: TokenConfig::from_env(),
        }
    }

    /// Check the settings that must hold before the server may start
    pub fn validate(&self) -> Result<(), String> {
        if !self.token.has_secret_key() {
            return Err("TOKEN_SECRETKEY must be set".to_string());
        }
        self.token.validate()?;
        if self.environment.is_production() && !self.database.is_configured() {
            return Err("DATABASE_URL must be set in production".to_string());
        }
        Ok(())
    }
}
