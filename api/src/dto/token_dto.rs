//! Wire shapes of the token endpoints

use serde::{Deserialize, Serialize};
use tp_core::domain::value_objects::RefreshResponse;

pub use tp_core::domain::value_objects::TokenRequest as RefreshTokenRequest;

/// Success body of `POST /token/refresh`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RefreshTokenResponse {
    #[serde(rename = "AccessToken")]
    pub access_token: String,

    #[serde(rename = "RefreshToken")]
    pub refresh_token: String,
}

impl From<&RefreshResponse> for RefreshTokenResponse {
    fn from(response: &RefreshResponse) -> Self {
        Self {
            access_token: response.access.token.clone(),
            refresh_token: response.refresh.token.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_uses_pascal_case() {
        let body = RefreshTokenResponse {
            access_token: "a".to_string(),
            refresh_token: "r".to_string(),
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json, serde_json::json!({ "AccessToken": "a", "RefreshToken": "r" }));
    }

    #[test]
    fn test_request_uses_pascal_case() {
        let request: RefreshTokenRequest =
            serde_json::from_str(r#"{"UserId":"u1","Email":"u1@x.com"}"#).unwrap();
        assert_eq!(request.user_id.as_deref(), Some("u1"));
        assert_eq!(request.email.as_deref(), Some("u1@x.com"));
    }
}
