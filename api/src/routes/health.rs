use std::collections::HashMap;
use std::time::Duration;

use actix_web::{web, HttpResponse};
use tp_core::repositories::RefreshTokenStore;
use tp_core::services::Deadline;
use tp_shared::{HealthResponse, HealthStatus, ServiceHealth};

use super::token::AppState;

const STORE_PING_TIMEOUT: Duration = Duration::from_secs(2);

/// Public detail reported for a failing store; the cause is only logged
pub const STORE_UNAVAILABLE_MESSAGE: &str = "Refresh token store is unavailable";

/// Handler for GET /health
///
/// Reports 200 while the refresh token store answers, 503 otherwise.
pub async fn health_check<S>(state: web::Data<AppState<S>>) -> HttpResponse
where
    S: RefreshTokenStore + ?Sized + 'static,
{
    let store = match state.store.ping(&Deadline::timeout(STORE_PING_TIMEOUT)).await {
        Ok(()) => ServiceHealth::healthy(),
        Err(e) => {
            log::warn!("Health check: refresh token store unavailable: {}", e);
            ServiceHealth::unhealthy(STORE_UNAVAILABLE_MESSAGE)
        }
    };

    let mut services = HashMap::new();
    services.insert("refresh_token_store".to_string(), store);

    let health = HealthResponse::from_services(services, env!("CARGO_PKG_VERSION"));
    match health.status {
        HealthStatus::Unhealthy => HttpResponse::ServiceUnavailable().json(health),
        _ => HttpResponse::Ok().json(health),
    }
}
