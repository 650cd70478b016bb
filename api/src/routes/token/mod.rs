//! Token route handlers
//!
//! - Token refresh

pub mod refresh;

use std::sync::Arc;

use tp_core::repositories::RefreshTokenStore;
use tp_core::services::RefreshOrchestrator;

/// Shared state handed to every worker
pub struct AppState<S: RefreshTokenStore + ?Sized> {
    pub orchestrator: Arc<RefreshOrchestrator<S>>,
    pub store: Arc<S>,
}

impl<S: RefreshTokenStore + ?Sized> AppState<S> {
    pub fn new(orchestrator: Arc<RefreshOrchestrator<S>>, store: Arc<S>) -> Self {
        Self {
            orchestrator,
            store,
        }
    }
}
