use chrono::DateTime;
use chrono::Utc;
use thiserror::Error;

use crate::jwt::JwtError;
use crate::jwt::TokenClass;
use crate::jwt::TokenCodec;

/// Reasons a presented token is rejected.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token is invalid: {0}")]
    Invalid(String),

    #[error("Token is expired")]
    Expired,

    #[error("Expected a {expected} token, got a {found} token")]
    WrongClass {
        expected: TokenClass,
        found: TokenClass,
    },
}

impl From<JwtError> for TokenError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::ExpiredToken => TokenError::Expired,
            other => TokenError::Invalid(other.to_string()),
        }
    }
}

/// Decodes tokens and enforces the class the caller expects.
///
/// Only the cryptographic and temporal checks live here. Confirming that a
/// refresh token is still the one stored for its identity is up to the caller.
#[derive(Clone)]
pub struct TokenVerifier {
    codec: TokenCodec,
}

impl TokenVerifier {
    pub fn new(codec: TokenCodec) -> Self {
        Self { codec }
    }

    /// Returns the identity key of a valid access token.
    pub fn verify_access(&self, token: &str) -> Result<String, TokenError> {
        self.verify_at(token, TokenClass::Access, Utc::now())
    }

    /// Returns the identity key of a valid refresh token.
    pub fn verify_refresh(&self, token: &str) -> Result<String, TokenError> {
        self.verify_at(token, TokenClass::Refresh, Utc::now())
    }

    /// Returns the identity key of a valid email-confirmation token.
    pub fn verify_email_confirmation(&self, token: &str) -> Result<String, TokenError> {
        self.verify_at(token, TokenClass::Verify, Utc::now())
    }

    /// Decode `token` at `now` and require it to be of class `expected`.
    ///
    /// # Errors
    /// * `Invalid` - Bad signature or malformed token
    /// * `Expired` - `now` is at or past the token's expiry
    /// * `WrongClass` - Token is valid but of another class
    pub fn verify_at(
        &self,
        token: &str,
        expected: TokenClass,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let claims = self.codec.decode_at(token, now)?;

        if claims.token_type != expected {
            return Err(TokenError::WrongClass {
                expected,
                found: claims.token_type,
            });
        }

        Ok(claims.sub)
    }
}
