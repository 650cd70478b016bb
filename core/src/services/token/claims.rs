//! Claim set construction for access and refresh tokens

use crate::domain::entities::token::ClaimSet;
use crate::domain::value_objects::token_request::non_blank;
use crate::errors::ValidationError;

/// Builds the identity claims embedded in signed tokens
pub struct ClaimsBuilder;

impl ClaimsBuilder {
    /// Claims for an access token
    ///
    /// The email doubles as the display name. `refresh_ref` links the access
    /// token to the refresh token it was issued against.
    pub fn access_claims(
        user_id: Option<&str>,
        email: Option<&str>,
        refresh_ref: Option<&str>,
    ) -> Result<ClaimSet, ValidationError> {
        let user_id = require("UserId", user_id)?;
        let email = require("Email", email)?;

        Ok(ClaimSet {
            sub: user_id.to_string(),
            name: Some(email.to_string()),
            email: Some(email.to_string()),
            refresh_token: non_blank(refresh_ref).map(str::to_string),
        })
    }

    /// Claims for a refresh token: the subject only
    pub fn refresh_claims(user_id: Option<&str>) -> Result<ClaimSet, ValidationError> {
        let user_id = require("UserId", user_id)?;

        Ok(ClaimSet {
            sub: user_id.to_string(),
            name: None,
            email: None,
            refresh_token: None,
        })
    }
}

fn require<'a>(field: &'static str, value: Option<&'a str>) -> Result<&'a str, ValidationError> {
    non_blank(value).ok_or(ValidationError::RequiredField { field })
}
