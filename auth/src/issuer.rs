use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use crate::jwt::JwtError;
use crate::jwt::SessionClaims;
use crate::jwt::TokenClass;
use crate::jwt::TokenCodec;

/// Validity window per token class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenLifetimes {
    pub access: Duration,
    pub refresh: Duration,
    pub verify: Duration,
}

impl TokenLifetimes {
    pub fn for_class(&self, class: TokenClass) -> Duration {
        match class {
            TokenClass::Access => self.access,
            TokenClass::Refresh => self.refresh,
            TokenClass::Verify => self.verify,
        }
    }

    /// Every class must have a positive lifetime.
    ///
    /// # Errors
    /// * `InvalidLifetime` - A lifetime is zero or negative
    pub fn validate(&self) -> Result<(), JwtError> {
        for class in [TokenClass::Access, TokenClass::Refresh, TokenClass::Verify] {
            if self.for_class(class) <= Duration::zero() {
                return Err(JwtError::InvalidLifetime(format!(
                    "{} lifetime must be positive",
                    class
                )));
            }
        }
        Ok(())
    }
}

impl Default for TokenLifetimes {
    fn default() -> Self {
        Self {
            access: Duration::minutes(15),
            refresh: Duration::days(30),
            verify: Duration::hours(24),
        }
    }
}

/// Mints typed tokens bound to an identity key.
///
/// Persisting a freshly issued refresh token is the caller's job: the issuer
/// never touches storage.
#[derive(Clone)]
pub struct TokenIssuer {
    codec: TokenCodec,
    lifetimes: TokenLifetimes,
}

impl TokenIssuer {
    pub fn new(codec: TokenCodec, lifetimes: TokenLifetimes) -> Self {
        Self { codec, lifetimes }
    }

    pub fn lifetimes(&self) -> &TokenLifetimes {
        &self.lifetimes
    }

    pub fn issue_access(&self, subject: &str) -> Result<String, JwtError> {
        self.issue_at(TokenClass::Access, subject, Utc::now())
    }

    pub fn issue_refresh(&self, subject: &str) -> Result<String, JwtError> {
        self.issue_at(TokenClass::Refresh, subject, Utc::now())
    }

    pub fn issue_verify(&self, subject: &str) -> Result<String, JwtError> {
        self.issue_at(TokenClass::Verify, subject, Utc::now())
    }

    /// Issue a token of `class` as if minted at `issued_at`.
    ///
    /// # Errors
    /// * `InvalidLifetime` - Expiry falls outside the representable range
    /// * `EncodingFailed` - Token signing failed
    pub fn issue_at(
        &self,
        class: TokenClass,
        subject: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<String, JwtError> {
        let claims =
            SessionClaims::new(subject, class, issued_at, self.lifetimes.for_class(class))?;
        self.codec.encode(&claims)
    }
}
