use auth::AuthenticationError;
use auth::JwtError;
use auth::PasswordError;
use auth::TokenError;
use thiserror::Error;

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Error for session cache operations
#[derive(Debug, Clone, Error)]
pub enum CacheError {
    #[error("Session cache unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to (de)serialize cached identity: {0}")]
    Serialization(String),
}

/// Error for confirmation delivery
#[derive(Debug, Clone, Error)]
pub enum NotificationError {
    #[error("Failed to deliver confirmation email: {0}")]
    DeliveryFailed(String),

    #[error("Mail provider rejected the message with status {0}")]
    Rejected(u16),
}

/// Top-level error for all authentication operations.
///
/// Credential and token variants all surface to clients as "not authorized";
/// `EmailNotConfirmed` is the one deliberately distinct signal.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Unknown email or wrong password, indistinguishable on purpose.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Email not confirmed")]
    EmailNotConfirmed,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token is expired")]
    ExpiredToken,

    #[error("Wrong token class")]
    WrongTokenClass,

    /// Structurally valid refresh token that has been rotated away.
    #[error("Refresh token has been revoked")]
    RevokedToken,

    #[error("Identity not found: {0}")]
    NotFound(String),

    #[error("Account already exists: {0}")]
    AlreadyExists(String),

    // Infrastructure errors
    #[error("Identity store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Session cache unavailable: {0}")]
    CacheUnavailable(String),

    #[error("Timed out waiting for {0}")]
    Timeout(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Only infrastructure failures may be retried, and only by the caller.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AuthError::StoreUnavailable(_) | AuthError::CacheUnavailable(_) | AuthError::Timeout(_)
        )
    }
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Invalid(_) => AuthError::InvalidToken,
            TokenError::Expired => AuthError::ExpiredToken,
            TokenError::WrongClass { .. } => AuthError::WrongTokenClass,
        }
    }
}

impl From<JwtError> for AuthError {
    fn from(err: JwtError) -> Self {
        AuthError::Internal(format!("Token generation failed: {}", err))
    }
}

impl From<PasswordError> for AuthError {
    fn from(err: PasswordError) -> Self {
        AuthError::Internal(err.to_string())
    }
}

impl From<AuthenticationError> for AuthError {
    fn from(err: AuthenticationError) -> Self {
        match err {
            AuthenticationError::InvalidCredentials => AuthError::InvalidCredentials,
            AuthenticationError::PasswordError(e) => e.into(),
            AuthenticationError::JwtError(e) => e.into(),
        }
    }
}

impl From<CacheError> for AuthError {
    fn from(err: CacheError) -> Self {
        AuthError::CacheUnavailable(err.to_string())
    }
}
