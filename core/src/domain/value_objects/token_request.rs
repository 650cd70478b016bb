//! Caller identity presented to the refresh endpoint.

use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

/// Request body of `POST token/refresh`
///
/// Both fields are optional on the wire so that a missing field is reported
/// as a validation error rather than a deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRequest {
    #[serde(rename = "UserId", default)]
    pub user_id: Option<String>,

    #[serde(rename = "Email", default)]
    pub email: Option<String>,
}

impl TokenRequest {
    pub fn new(user_id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            email: Some(email.into()),
        }
    }

    /// Returns `(user_id, email)` when both are present and non-blank
    pub fn identity(&self) -> Result<(&str, &str), ValidationError> {
        let user_id = non_blank(self.user_id.as_deref()).ok_or(ValidationError::RequiredField {
            field: "UserId",
        })?;
        let email = non_blank(self.email.as_deref()).ok_or(ValidationError::RequiredField {
            field: "Email",
        })?;
        Ok((user_id, email))
    }
}

pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_pascal_case() {
        let request: TokenRequest =
            serde_json::from_str(r#"{"UserId":"u1","Email":"u1@x.com"}"#).unwrap();
        assert_eq!(request, TokenRequest::new("u1", "u1@x.com"));
    }

    #[test]
    fn test_missing_fields_deserialize_to_none() {
        let request: TokenRequest = serde_json::from_str(r#"{"UserId":"u1"}"#).unwrap();
        assert_eq!(request.email, None);
        assert!(matches!(
            request.identity(),
            Err(ValidationError::RequiredField { field: "Email" })
        ));
    }

    #[test]
    fn test_blank_user_id_is_missing() {
        let request = TokenRequest::new("  ", "u1@x.com");
        assert!(matches!(
            request.identity(),
            Err(ValidationError::RequiredField { field: "UserId" })
        ));
    }

    #[test]
    fn test_identity() {
        let request = TokenRequest::new("u1", "u1@x.com");
        assert_eq!(request.identity().unwrap(), ("u1", "u1@x.com"));
    }
}
