//! MySQL implementations of the core persistence traits

pub mod refresh_token_store;

pub use refresh_token_store::MySqlRefreshTokenStore;
