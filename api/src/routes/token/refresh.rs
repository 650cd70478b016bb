use actix_web::cookie::{time::OffsetDateTime, Cookie, SameSite as CookieSameSite};
use actix_web::{web, HttpRequest, HttpResponse};
use tokio_util::sync::CancellationToken;
use tp_core::domain::value_objects::{CookieSpec, SameSite};
use tp_core::repositories::RefreshTokenStore;
use tp_shared::config::REFRESH_TOKEN_COOKIE;

use crate::dto::token_dto::{RefreshTokenRequest, RefreshTokenResponse};
use crate::handlers::error_handler::handle_refresh_error;

use super::AppState;

/// Handler for POST /token/refresh
///
/// Exchanges the `refreshToken` cookie for a new access token.
///
/// # Request Body
///
/// ```json
/// {
///     "UserId": "string",
///     "Email": "string"
/// }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "AccessToken": "eyJ...",
///     "RefreshToken": "eyJ..."
/// }
/// ```
/// The refresh token is also written back as an HTTP-only cookie.
///
/// ## Errors
/// - 400 Bad Request: `UserId` or `Email` missing, or body is not JSON
/// - 401 Unauthorized: Refresh cookie missing, unknown or expired
/// - 500 Internal Server Error: Store or signing failure, or timeout
pub async fn refresh<S>(
    state: web::Data<AppState<S>>,
    req: HttpRequest,
    body: web::Json<RefreshTokenRequest>,
) -> HttpResponse
where
    S: RefreshTokenStore + ?Sized + 'static,
{
    let presented = req.cookie(REFRESH_TOKEN_COOKIE);

    // Cancelled when actix drops this future, e.g. on client disconnect.
    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    match state
        .orchestrator
        .handle(&body, presented.as_ref().map(|c| c.value()), cancel)
        .await
    {
        Ok(response) => {
            let mut builder = HttpResponse::Ok();
            if let Some(spec) = &response.refresh.cookie {
                builder.cookie(refresh_cookie(&response.refresh.token, spec));
            }
            builder.json(RefreshTokenResponse::from(&response))
        }
        Err(error) => handle_refresh_error(&error),
    }
}

/// Build the `refreshToken` cookie from its transport attributes
///
/// `essential` has no header representation and only matters to consent
/// filtering, which this service does not apply.
pub fn refresh_cookie(token: &str, spec: &CookieSpec) -> Cookie<'static> {
    let mut cookie = Cookie::build(REFRESH_TOKEN_COOKIE, token.to_owned())
        .http_only(spec.http_only)
        .secure(spec.secure)
        .same_site(match spec.same_site {
            SameSite::Strict => CookieSameSite::Strict,
            SameSite::Lax => CookieSameSite::Lax,
            SameSite::None => CookieSameSite::None,
        })
        .path(spec.path.clone())
        .finish();

    if let Ok(expires) = OffsetDateTime::from_unix_timestamp(spec.expires.timestamp()) {
        cookie.set_expires(expires);
    }

    cookie
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_refresh_cookie_attributes() {
        let expires = Utc.with_ymd_and_hms(2030, 1, 2, 3, 4, 5).unwrap();
        let cookie = refresh_cookie("rt-abc", &CookieSpec::refresh_token(expires));

        assert_eq!(cookie.name(), "refreshToken");
        assert_eq!(cookie.value(), "rt-abc");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(CookieSameSite::Lax));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(
            cookie.expires_datetime().map(|e| e.unix_timestamp()),
            Some(expires.timestamp())
        );
    }
}
