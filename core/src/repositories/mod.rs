pub mod token;

pub use token::{InMemoryRefreshTokenStore, RefreshTokenStore};
