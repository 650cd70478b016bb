//! Application factory
//!
//! Builds the Actix-web application around shared [`AppState`].

use actix_web::{middleware::Logger, web, App, HttpResponse};
use tp_core::repositories::RefreshTokenStore;
use tp_shared::ServerConfig;

use crate::dto::ErrorResponse;
use crate::handlers::error_handler::json_error_handler;
use crate::middleware::cors::create_cors;
use crate::routes::health::health_check;
use crate::routes::token::{refresh::refresh, AppState};

/// Create and configure the application
///
/// The refresh endpoint is served at `/token/refresh` and again under the
/// `/api` prefix.
pub fn create_app<S>(
    app_state: web::Data<AppState<S>>,
    server: &ServerConfig,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    S: RefreshTokenStore + ?Sized + 'static,
{
    App::new()
        .app_data(app_state)
        .app_data(
            web::JsonConfig::default()
                .limit(server.max_payload_size)
                .error_handler(json_error_handler),
        )
        .wrap(create_cors(&server.cors))
        .wrap(Logger::default())
        .route("/health", web::get().to(health_check::<S>))
        .service(token_scope::<S>("/token"))
        .service(web::scope("/api").service(token_scope::<S>("/token")))
        .default_service(web::route().to(not_found))
}

fn token_scope<S>(path: &str) -> actix_web::Scope
where
    S: RefreshTokenStore + ?Sized + 'static,
{
    web::scope(path).route("/refresh", web::post().to(refresh::<S>))
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new("The requested resource was not found"))
}
