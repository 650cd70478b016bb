//! CORS middleware configuration for cross-origin requests.
//!
//! Browsers send the refresh cookie only on credentialed requests, so the
//! policy always supports credentials. Origins come from [`CorsConfig`]:
//! an empty list (the development default) mirrors any origin, otherwise
//! only the listed origins are accepted.

use actix_cors::Cors;
use actix_web::http::{header, Method};
use tp_shared::config::CorsConfig;

/// Creates a CORS middleware instance from configuration
pub fn create_cors(config: &CorsConfig) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec![Method::GET, Method::POST, Method::OPTIONS])
        .allowed_headers(vec![
            header::ACCEPT,
            header::CONTENT_TYPE,
            header::ORIGIN,
            header::HeaderName::from_static("x-requested-with"),
        ])
        .max_age(config.max_age)
        .supports_credentials();

    if config.allows_any_origin() {
        log::info!("Configuring CORS for any origin");
        cors = cors.allow_any_origin();
    } else {
        for origin in &config.allowed_origins {
            log::info!("Adding allowed origin: {}", origin);
            cors = cors.allowed_origin(origin);
        }
    }

    cors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_permissive_cors() {
        let _cors = create_cors(&CorsConfig::default());
    }

    #[test]
    fn test_create_restricted_cors() {
        let config = CorsConfig {
            allowed_origins: vec!["https://app.example.com".to_string()],
            max_age: 600,
        };
        let _cors = create_cors(&config);
    }
}
