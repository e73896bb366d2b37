use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::identity::errors::EmailError;

/// Registered account, keyed by email.
///
/// Owned by the identity store. The session cache holds snapshots of this
/// exact shape, so a cache hit and a store read are indistinguishable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: IdentityId,
    pub email: EmailAddress,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub confirmed: bool,
    /// The single active refresh token. Any other refresh token is revoked.
    pub refresh_token: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Identity {
    /// A freshly signed-up identity: unconfirmed, no refresh token.
    pub fn new(
        email: EmailAddress,
        password_hash: String,
        first_name: String,
        last_name: Option<String>,
    ) -> Self {
        Self {
            id: IdentityId::new(),
            email,
            password_hash,
            first_name,
            last_name,
            confirmed: false,
            refresh_token: None,
            created_at: Utc::now(),
        }
    }

    pub fn display_name(&self) -> String {
        match &self.last_name {
            Some(last_name) => format!("{} {}", self.first_name, last_name),
            None => self.first_name.clone(),
        }
    }
}

/// Identity unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityId(pub Uuid);

impl IdentityId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for IdentityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for IdentityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validates email format using RFC 5322 compliant parser.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = EmailError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EmailAddress> for String {
    fn from(email: EmailAddress) -> Self {
        email.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Command to register a new identity
#[derive(Debug)]
pub struct SignupCommand {
    pub email: EmailAddress,
    /// Plain text password (hashed by the service)
    pub password: String,
    pub first_name: String,
    pub last_name: Option<String>,
}

impl SignupCommand {
    pub fn new(
        email: EmailAddress,
        password: String,
        first_name: String,
        last_name: Option<String>,
    ) -> Self {
        Self {
            email,
            password,
            first_name,
            last_name,
        }
    }
}

/// Tokens handed back by login and refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    /// Present on login, and on refresh only when rotation is enabled.
    pub refresh_token: Option<String>,
}

/// Outcome of asking for a confirmation email.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationRequest {
    Sent,
    AlreadyConfirmed,
}

/// Outcome of presenting an email-confirmation token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    AlreadyConfirmed,
}

/// What the refresh flow does with the presented refresh token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefreshPolicy {
    /// Keep the stored refresh token; only a new access token is issued.
    #[default]
    Reuse,
    /// Issue and persist a new refresh token, revoking the presented one.
    Rotate,
}

/// Immutable knobs for the auth orchestrator.
#[derive(Debug, Clone, Copy)]
pub struct ServiceSettings {
    /// Session cache TTL. Also the staleness bound for cached identities.
    pub cache_ttl: Duration,
    pub store_timeout: Duration,
    pub cache_timeout: Duration,
    pub notification_timeout: Duration,
    pub refresh_policy: RefreshPolicy,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::from_secs(900),
            store_timeout: Duration::from_secs(5),
            cache_timeout: Duration::from_millis(500),
            notification_timeout: Duration::from_secs(10),
            refresh_policy: RefreshPolicy::Reuse,
        }
    }
}
