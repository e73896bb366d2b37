use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;
use tokio::time::timeout;

use crate::identity::errors::AuthError;
use crate::identity::models::Confirmation;
use crate::identity::models::Identity;
use crate::identity::models::RefreshPolicy;
use crate::identity::models::ServiceSettings;
use crate::identity::models::SignupCommand;
use crate::identity::models::TokenPair;
use crate::identity::models::VerificationRequest;
use crate::identity::ports::AuthServicePort;
use crate::identity::ports::ConfirmationNotifier;
use crate::identity::ports::IdentityRepository;
use crate::identity::ports::SessionCache;

/// Auth orchestrator.
///
/// Composes the authentication core with the identity store, the session
/// cache and the confirmation notifier. Holds no mutable state of its own;
/// concurrent logins for one identity serialize on the store's row update and
/// the last write wins.
pub struct AuthService<IR, SC, CN>
where
    IR: IdentityRepository,
    SC: SessionCache,
    CN: ConfirmationNotifier,
{
    repository: Arc<IR>,
    cache: Arc<SC>,
    notifier: Arc<CN>,
    authenticator: Arc<Authenticator>,
    settings: ServiceSettings,
}

impl<IR, SC, CN> AuthService<IR, SC, CN>
where
    IR: IdentityRepository,
    SC: SessionCache,
    CN: ConfirmationNotifier,
{
    /// Create a new auth service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Identity store
    /// * `cache` - Session cache for the access-token path
    /// * `notifier` - Confirmation email delivery
    /// * `authenticator` - Hasher, issuer and verifier
    /// * `settings` - Cache TTL, collaborator deadlines and refresh policy
    pub fn new(
        repository: Arc<IR>,
        cache: Arc<SC>,
        notifier: Arc<CN>,
        authenticator: Arc<Authenticator>,
        settings: ServiceSettings,
    ) -> Self {
        Self {
            repository,
            cache,
            notifier,
            authenticator,
            settings,
        }
    }

    /// Run an identity store call under the store deadline.
    async fn store<T, F>(&self, call: F) -> Result<T, AuthError>
    where
        F: Future<Output = Result<T, AuthError>>,
    {
        timeout(self.settings.store_timeout, call)
            .await
            .map_err(|_| AuthError::Timeout("identity store".to_string()))?
    }

    async fn hash_password(&self, password: String) -> Result<String, AuthError> {
        let authenticator = Arc::clone(&self.authenticator);
        tokio::task::spawn_blocking(move || authenticator.hash_password(&password))
            .await
            .map_err(|e| AuthError::Internal(format!("Password hashing task failed: {}", e)))?
            .map_err(AuthError::from)
    }

    async fn check_password(&self, password: &str, digest: &str) -> Result<(), AuthError> {
        let authenticator = Arc::clone(&self.authenticator);
        let password = password.to_string();
        let digest = digest.to_string();
        tokio::task::spawn_blocking(move || authenticator.check_password(&password, &digest))
            .await
            .map_err(|e| AuthError::Internal(format!("Password check task failed: {}", e)))?
            .map_err(AuthError::from)
    }

    /// Spend one password verification, then reject.
    async fn reject_unknown(&self, password: &str) -> AuthError {
        let authenticator = Arc::clone(&self.authenticator);
        let password = password.to_string();
        match tokio::task::spawn_blocking(move || authenticator.reject_unknown(&password)).await {
            Ok(e) => e.into(),
            Err(e) => AuthError::Internal(format!("Password check task failed: {}", e)),
        }
    }

    /// Issue a verify token and hand it to the notifier.
    ///
    /// Never fails the calling flow: every failure is logged and dropped.
    async fn send_confirmation(&self, identity: &Identity, base_url: &str) {
        let token = match self.authenticator.issuer().issue_verify(identity.email.as_str()) {
            Ok(token) => token,
            Err(e) => {
                tracing::error!(email = %identity.email, error = %e, "Failed to issue verify token");
                return;
            }
        };

        let delivery = timeout(
            self.settings.notification_timeout,
            self.notifier.send_confirmation(identity, &token, base_url),
        )
        .await;

        match delivery {
            Ok(Ok(())) => tracing::info!(email = %identity.email, "Confirmation email sent"),
            Ok(Err(e)) => tracing::error!(
                email = %identity.email,
                error = %e,
                "Failed to send confirmation email"
            ),
            Err(_) => tracing::error!(
                email = %identity.email,
                "Timed out sending confirmation email"
            ),
        }
    }

    /// Cache first, store second, write-through on miss.
    ///
    /// Cache failures degrade to a store read; a failed cache write is logged.
    async fn resolve_identity(&self, email: &str) -> Result<Identity, AuthError> {
        match timeout(self.settings.cache_timeout, self.cache.get(email)).await {
            Ok(Ok(Some(identity))) => {
                tracing::debug!(email, "Session cache hit");
                return Ok(identity);
            }
            Ok(Ok(None)) => tracing::debug!(email, "Session cache miss"),
            Ok(Err(e)) => tracing::warn!(email, error = %e, "Session cache read failed"),
            Err(_) => tracing::warn!(email, "Session cache read timed out"),
        }

        let identity = self
            .store(self.repository.find_by_email(email))
            .await?
            .ok_or(AuthError::InvalidToken)?;

        match timeout(
            self.settings.cache_timeout,
            self.cache.set(email, &identity, self.settings.cache_ttl),
        )
        .await
        {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::warn!(email, error = %e, "Session cache write failed"),
            Err(_) => tracing::warn!(email, "Session cache write timed out"),
        }

        Ok(identity)
    }
}

#[async_trait]
impl<IR, SC, CN> AuthServicePort for AuthService<IR, SC, CN>
where
    IR: IdentityRepository,
    SC: SessionCache,
    CN: ConfirmationNotifier,
{
    async fn signup(
        &self,
        command: SignupCommand,
        base_url: &str,
    ) -> Result<Identity, AuthError> {
        let existing = self
            .store(self.repository.find_by_email(command.email.as_str()))
            .await?;
        if existing.is_some() {
            return Err(AuthError::AlreadyExists(command.email.to_string()));
        }

        let password_hash = self.hash_password(command.password).await?;
        let identity = Identity::new(
            command.email,
            password_hash,
            command.first_name,
            command.last_name,
        );

        let created = self.store(self.repository.create(identity)).await?;
        tracing::info!(identity_id = %created.id, email = %created.email, "Identity created");

        self.send_confirmation(&created, base_url).await;

        Ok(created)
    }

    async fn login(&self, email: &str, password: &str) -> Result<TokenPair, AuthError> {
        let identity = match self.store(self.repository.find_by_email(email)).await? {
            Some(identity) => identity,
            None => {
                tracing::info!(email, "Login rejected");
                return Err(self.reject_unknown(password).await);
            }
        };

        if let Err(e) = self.check_password(password, &identity.password_hash).await {
            tracing::info!(email, "Login rejected");
            return Err(e);
        }

        if !identity.confirmed {
            return Err(AuthError::EmailNotConfirmed);
        }

        let issuer = self.authenticator.issuer();
        let access_token = issuer.issue_access(email)?;
        let refresh_token = issuer.issue_refresh(email)?;

        self.store(self.repository.set_refresh_token(email, &refresh_token))
            .await?;
        tracing::info!(identity_id = %identity.id, "Login succeeded");

        Ok(TokenPair {
            access_token,
            refresh_token: Some(refresh_token),
        })
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        let email = self
            .authenticator
            .verifier()
            .verify_refresh(refresh_token)
            .map_err(|e| {
                tracing::info!(error = %e, "Refresh token rejected");
                AuthError::from(e)
            })?;

        let identity = self
            .store(self.repository.find_by_email(&email))
            .await?
            .ok_or(AuthError::InvalidToken)?;

        if identity.refresh_token.as_deref() != Some(refresh_token) {
            tracing::warn!(identity_id = %identity.id, "Superseded refresh token presented");
            return Err(AuthError::RevokedToken);
        }

        let issuer = self.authenticator.issuer();
        let access_token = issuer.issue_access(&email)?;

        let refresh_token = match self.settings.refresh_policy {
            RefreshPolicy::Reuse => None,
            RefreshPolicy::Rotate => {
                let rotated = issuer.issue_refresh(&email)?;
                self.store(self.repository.set_refresh_token(&email, &rotated))
                    .await?;
                Some(rotated)
            }
        };
        tracing::info!(identity_id = %identity.id, "Access token refreshed");

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    async fn request_verification_email(
        &self,
        email: &str,
        base_url: &str,
    ) -> Result<VerificationRequest, AuthError> {
        let identity = self
            .store(self.repository.find_by_email(email))
            .await?
            .ok_or_else(|| AuthError::NotFound(email.to_string()))?;

        if identity.confirmed {
            return Ok(VerificationRequest::AlreadyConfirmed);
        }

        self.send_confirmation(&identity, base_url).await;

        Ok(VerificationRequest::Sent)
    }

    async fn confirm_email(&self, token: &str) -> Result<Confirmation, AuthError> {
        let email = self
            .authenticator
            .verifier()
            .verify_email_confirmation(token)
            .map_err(|e| {
                tracing::info!(error = %e, "Verify token rejected");
                AuthError::from(e)
            })?;

        let identity = self
            .store(self.repository.find_by_email(&email))
            .await?
            .ok_or_else(|| AuthError::NotFound(email.clone()))?;

        if identity.confirmed {
            return Ok(Confirmation::AlreadyConfirmed);
        }

        self.store(self.repository.set_confirmed(&email)).await?;
        tracing::info!(identity_id = %identity.id, "Email confirmed");

        Ok(Confirmation::Confirmed)
    }

    async fn authenticate_access(&self, access_token: &str) -> Result<Identity, AuthError> {
        let email = self
            .authenticator
            .verifier()
            .verify_access(access_token)
            .map_err(|e| {
                tracing::debug!(error = %e, "Access token rejected");
                AuthError::from(e)
            })?;

        self.resolve_identity(&email).await
    }
}
