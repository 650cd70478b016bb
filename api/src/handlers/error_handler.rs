use actix_web::{error::InternalError, error::JsonPayloadError, HttpRequest, HttpResponse};
use tp_core::errors::{ErrorKind, RefreshError};

use crate::dto::ErrorResponse;

/// Message returned when the request body cannot be read as JSON
pub const MALFORMED_BODY_MESSAGE: &str = "Please provide a valid userid and email address";

/// Map a refresh failure to its HTTP response
///
/// Validation is 400, authorization is 401 and everything else is 500.
/// Only the fixed public message reaches the client; the cause is logged.
pub fn handle_refresh_error(error: &RefreshError) -> HttpResponse {
    let body = ErrorResponse::new(error.public_message());

    match error.kind() {
        ErrorKind::Validation => {
            log::debug!("Refresh rejected: {}", error);
            HttpResponse::BadRequest().json(body)
        }
        ErrorKind::Authorization => {
            log::info!("Refresh unauthorized: {}", error);
            HttpResponse::Unauthorized().json(body)
        }
        ErrorKind::Timeout => {
            log::warn!("Refresh timed out: {}", error);
            HttpResponse::InternalServerError().json(body)
        }
        ErrorKind::Internal => {
            log::error!("Refresh failed: {:?}", error);
            HttpResponse::InternalServerError().json(body)
        }
    }
}

/// Turns JSON extraction failures into a 400 with the standard error body
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    log::debug!("Malformed refresh request body: {}", err);
    let response = HttpResponse::BadRequest().json(ErrorResponse::new(MALFORMED_BODY_MESSAGE));
    InternalError::from_response(err, response).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use tp_core::errors::{AuthorizationError, StoreError, ValidationError};

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                RefreshError::Validation(ValidationError::RequiredField { field: "UserId" }),
                StatusCode::BAD_REQUEST,
            ),
            (
                RefreshError::Unauthorized(AuthorizationError::MissingRefreshToken),
                StatusCode::UNAUTHORIZED,
            ),
            (
                RefreshError::Store(StoreError::backend("down")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (RefreshError::Timeout, StatusCode::INTERNAL_SERVER_ERROR),
            (RefreshError::Cancelled, StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, status) in cases {
            assert_eq!(handle_refresh_error(&error).status(), status);
        }
    }
}
