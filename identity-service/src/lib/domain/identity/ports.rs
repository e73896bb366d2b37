use std::time::Duration;

use async_trait::async_trait;

use crate::identity::errors::AuthError;
use crate::identity::errors::CacheError;
use crate::identity::errors::NotificationError;
use crate::identity::models::Confirmation;
use crate::identity::models::Identity;
use crate::identity::models::SignupCommand;
use crate::identity::models::TokenPair;
use crate::identity::models::VerificationRequest;

/// Port for the authentication flows.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new, unconfirmed identity and send it a confirmation link.
    ///
    /// # Arguments
    /// * `command` - Validated signup data
    /// * `base_url` - Public base URL embedded in the confirmation link
    ///
    /// # Errors
    /// * `AlreadyExists` - Email is already registered
    /// * `StoreUnavailable` / `Timeout` - Identity store failed
    async fn signup(&self, command: SignupCommand, base_url: &str)
        -> Result<Identity, AuthError>;

    /// Exchange email and password for an access and a refresh token.
    ///
    /// The new refresh token replaces any previously stored one.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password
    /// * `EmailNotConfirmed` - Credentials are right but email is unconfirmed
    async fn login(&self, email: &str, password: &str) -> Result<TokenPair, AuthError>;

    /// Exchange the active refresh token for a new access token.
    ///
    /// # Errors
    /// * `InvalidToken` / `ExpiredToken` / `WrongTokenClass` - Token rejected
    /// * `RevokedToken` - Token is not the identity's active refresh token
    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError>;

    /// Send a fresh confirmation link unless the email is already confirmed.
    ///
    /// # Errors
    /// * `NotFound` - No identity with this email
    async fn request_verification_email(
        &self,
        email: &str,
        base_url: &str,
    ) -> Result<VerificationRequest, AuthError>;

    /// Mark the identity named by a verify token as confirmed.
    ///
    /// # Errors
    /// * `InvalidToken` / `ExpiredToken` / `WrongTokenClass` - Token rejected
    /// * `NotFound` - Token subject no longer exists
    async fn confirm_email(&self, token: &str) -> Result<Confirmation, AuthError>;

    /// Resolve the identity behind an access token, consulting the session
    /// cache before the identity store.
    ///
    /// # Errors
    /// * `InvalidToken` / `ExpiredToken` / `WrongTokenClass` - Token rejected
    async fn authenticate_access(&self, access_token: &str) -> Result<Identity, AuthError>;
}

/// Persistence operations for identities.
///
/// Each call is atomic and immediately consistent from the caller's side.
#[async_trait]
pub trait IdentityRepository: Send + Sync + 'static {
    /// Retrieve identity by email address.
    ///
    /// # Returns
    /// Optional identity (None if not found)
    ///
    /// # Errors
    /// * `StoreUnavailable` - Database operation failed
    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, AuthError>;

    /// Persist a new identity.
    ///
    /// # Errors
    /// * `AlreadyExists` - Email is already registered
    /// * `StoreUnavailable` - Database operation failed
    async fn create(&self, identity: Identity) -> Result<Identity, AuthError>;

    /// Overwrite the identity's single active refresh token.
    ///
    /// # Errors
    /// * `NotFound` - Identity does not exist
    /// * `StoreUnavailable` - Database operation failed
    async fn set_refresh_token(&self, email: &str, token: &str) -> Result<(), AuthError>;

    /// Mark the identity's email as confirmed.
    ///
    /// # Errors
    /// * `NotFound` - Identity does not exist
    /// * `StoreUnavailable` - Database operation failed
    async fn set_confirmed(&self, email: &str) -> Result<(), AuthError>;
}

/// Short-lived cache of identity snapshots keyed by email.
///
/// Purely a latency optimization: there is no invalidation hook, so cached
/// readers may observe an identity up to one TTL old.
#[async_trait]
pub trait SessionCache: Send + Sync + 'static {
    async fn get(&self, email: &str) -> Result<Option<Identity>, CacheError>;

    async fn set(&self, email: &str, identity: &Identity, ttl: Duration)
        -> Result<(), CacheError>;
}

/// Delivery of email-confirmation links.
#[async_trait]
pub trait ConfirmationNotifier: Send + Sync + 'static {
    /// Send `verify_token` to the identity, embedded in a link under `base_url`.
    ///
    /// # Errors
    /// * `DeliveryFailed` - Transport failure
    /// * `Rejected` - Provider refused the message
    async fn send_confirmation(
        &self,
        identity: &Identity,
        verify_token: &str,
        base_url: &str,
    ) -> Result<(), NotificationError>;
}
