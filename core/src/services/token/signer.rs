//! HS256 signing and verification of token claims

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tp_shared::TokenConfig;
use uuid::Uuid;

use crate::domain::entities::token::{ClaimSet, Claims};
use crate::errors::SigningError;

/// Signs claim sets into compact JWTs and verifies them again
///
/// Key, issuer and audience are fixed at construction. The signer holds no
/// mutable state and is shared freely across requests.
pub struct TokenSigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: String,
    audience: String,
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .finish_non_exhaustive()
    }
}

impl TokenSigner {
    /// Creates a signer from the token configuration
    ///
    /// # Returns
    /// * `Ok(TokenSigner)` - Ready to sign
    /// * `Err(SigningError::MissingKey)` - The configured key is empty or blank
    pub fn new(config: &TokenConfig) -> Result<Self, SigningError> {
        if !config.has_secret_key() {
            return Err(SigningError::MissingKey);
        }

        let secret = config.secret_key.as_bytes();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_audience(&[config.audience.as_str()]);
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.leeway = 0;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
        })
    }

    /// Signs `claims` into a token valid until `expires_at`
    ///
    /// Registered claims `iss`, `aud`, `iat`, `nbf` and a random `jti` are
    /// added here, so two tokens for the same subject never collide.
    pub fn sign(&self, claims: &ClaimSet, expires_at: DateTime<Utc>) -> Result<String, SigningError> {
        self.encode_at(claims, Utc::now(), expires_at)
    }

    /// Signs `claims` into a token living exactly `lifetime` from now
    ///
    /// Returns the token and its expiry.
    pub fn sign_for(
        &self,
        claims: &ClaimSet,
        lifetime: Duration,
    ) -> Result<(String, DateTime<Utc>), SigningError> {
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(lifetime)
            .ok_or(SigningError::LifetimeOutOfRange)?;
        let token = self.encode_at(claims, now, expires_at)?;
        Ok((token, expires_at))
    }

    fn encode_at(
        &self,
        claims: &ClaimSet,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<String, SigningError> {
        let payload = Claims {
            claims: claims.clone(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            nbf: issued_at.timestamp(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &payload, &self.encoding_key)
            .map_err(|e| SigningError::Encoding(e.to_string()))
    }

    /// Decodes `token` and checks signature, issuer, audience, expiry and not-before
    pub fn verify(&self, token: &str) -> Result<Claims, SigningError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => SigningError::Expired,
                _ => SigningError::Invalid(e.to_string()),
            })
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn audience(&self) -> &str {
        &self.audience
    }
}
