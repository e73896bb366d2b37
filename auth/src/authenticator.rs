use uuid::Uuid;

use crate::issuer::TokenIssuer;
use crate::issuer::TokenLifetimes;
use crate::jwt::JwtError;
use crate::jwt::TokenCodec;
use crate::password::HashCost;
use crate::password::PasswordError;
use crate::password::PasswordHasher;
use crate::verifier::TokenVerifier;

/// Immutable configuration for the authentication core.
///
/// Built once at startup and handed to `Authenticator::new`, so tests can run
/// with their own secret, lifetimes and hashing cost.
#[derive(Clone)]
pub struct AuthSettings {
    pub algorithm: String,
    pub secret: Vec<u8>,
    pub lifetimes: TokenLifetimes,
    pub hash_cost: HashCost,
}

impl AuthSettings {
    /// Settings with default lifetimes and hashing cost.
    pub fn new(secret: impl Into<Vec<u8>>, algorithm: impl Into<String>) -> Self {
        Self {
            algorithm: algorithm.into(),
            secret: secret.into(),
            lifetimes: TokenLifetimes::default(),
            hash_cost: HashCost::default(),
        }
    }

    pub fn with_lifetimes(mut self, lifetimes: TokenLifetimes) -> Self {
        self.lifetimes = lifetimes;
        self
    }

    pub fn with_hash_cost(mut self, hash_cost: HashCost) -> Self {
        self.hash_cost = hash_cost;
        self
    }
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

/// Authentication coordinator combining password hashing, token issuance and
/// token verification over one shared codec.
#[derive(Clone)]
pub struct Authenticator {
    password_hasher: PasswordHasher,
    /// Digest checked when no identity exists, at the configured cost.
    decoy_digest: String,
    issuer: TokenIssuer,
    verifier: TokenVerifier,
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Errors
    /// * `JwtError` - Unsupported signing algorithm or non-positive lifetime
    /// * `PasswordError` - Invalid hashing cost
    pub fn new(settings: AuthSettings) -> Result<Self, AuthenticationError> {
        settings.lifetimes.validate()?;
        let codec = TokenCodec::new(&settings.secret, &settings.algorithm)?;
        let password_hasher = PasswordHasher::with_cost(settings.hash_cost)?;
        let decoy_digest = password_hasher.hash(&Uuid::new_v4().to_string())?;

        Ok(Self {
            password_hasher,
            decoy_digest,
            issuer: TokenIssuer::new(codec.clone(), settings.lifetimes),
            verifier: TokenVerifier::new(codec),
        })
    }

    /// Hash a password for storage.
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Check a plaintext password against a stored digest.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Stored digest is malformed
    pub fn check_password(&self, password: &str, digest: &str) -> Result<(), AuthenticationError> {
        if self.password_hasher.verify(password, digest)? {
            Ok(())
        } else {
            Err(AuthenticationError::InvalidCredentials)
        }
    }

    /// Reject a login for an unknown account.
    ///
    /// Runs one full verification against the decoy digest so the rejection
    /// costs the same as a wrong password. Always returns `InvalidCredentials`.
    pub fn reject_unknown(&self, password: &str) -> AuthenticationError {
        let _ = self.password_hasher.verify(password, &self.decoy_digest);
        AuthenticationError::InvalidCredentials
    }

    pub fn issuer(&self) -> &TokenIssuer {
        &self.issuer
    }

    pub fn verifier(&self) -> &TokenVerifier {
        &self.verifier
    }
}
