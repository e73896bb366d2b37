use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use super::errors::JwtError;

/// Discriminator embedded in every token.
///
/// Prevents one class of token from being accepted where another is required.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenClass {
    Access,
    Refresh,
    Verify,
}

impl TokenClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenClass::Access => "access",
            TokenClass::Refresh => "refresh",
            TokenClass::Verify => "verify",
        }
    }
}

impl fmt::Display for TokenClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TokenClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "access" => Ok(TokenClass::Access),
            "refresh" => Ok(TokenClass::Refresh),
            "verify" => Ok(TokenClass::Verify),
            other => Err(format!("unknown token class: {}", other)),
        }
    }
}

/// Claims carried by session tokens.
///
/// Every field is mandatory: a payload missing any of them, or carrying an
/// unrecognised `token_type`, does not deserialize.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionClaims {
    /// Subject (identity key, the email address)
    pub sub: String,

    /// Token class discriminator
    pub token_type: TokenClass,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Unique token identifier, so two tokens minted in the same second differ
    pub jti: String,
}

impl SessionClaims {
    /// Build claims issued at `issued_at` and valid for `lifetime`.
    ///
    /// # Arguments
    /// * `subject` - Identity key
    /// * `token_type` - Class of token being minted
    /// * `issued_at` - Issuance instant
    /// * `lifetime` - Class-specific validity window
    ///
    /// # Errors
    /// * `InvalidLifetime` - Lifetime is not positive or the expiry overflows
    pub fn new(
        subject: impl ToString,
        token_type: TokenClass,
        issued_at: DateTime<Utc>,
        lifetime: Duration,
    ) -> Result<Self, JwtError> {
        if lifetime <= Duration::zero() {
            return Err(JwtError::InvalidLifetime(format!(
                "{} lifetime must be positive",
                token_type
            )));
        }

        let expires_at = issued_at.checked_add_signed(lifetime).ok_or_else(|| {
            JwtError::InvalidLifetime(format!("{} expiry is out of range", token_type))
        })?;

        Ok(Self {
            sub: subject.to_string(),
            token_type,
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            jti: Uuid::new_v4().to_string(),
        })
    }

    /// A token is valid only strictly before its expiry instant.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        current_timestamp >= self.exp
    }
}
