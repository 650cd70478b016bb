//! HTTP layer of the token provider
//!
//! Exposes the refresh endpoint and health check on top of `tp_core`.
//! Exported as a library so integration tests can build the app.

pub mod app;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
