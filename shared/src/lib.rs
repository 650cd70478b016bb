//! Shared configuration and common types for the TokenProvider server
//!
//! This crate provides functionality used across all server modules:
//! - Configuration types, read once at process startup
//! - Error response structures returned on the wire
//! - Health check response types

pub mod config;
pub mod types;

// Re-export commonly used items at crate root
pub use config::{AppConfig, DatabaseConfig, Environment, RotationMode, ServerConfig, TokenConfig};
pub use types::{ErrorResponse, HealthResponse, HealthStatus, ServiceHealth};
