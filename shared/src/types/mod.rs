//! Type definitions shared between the core and API layers

pub mod response;

pub use response::{ErrorResponse, HealthResponse, HealthStatus, ServiceHealth};
