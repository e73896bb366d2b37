use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use auth::AuthSettings;
use auth::Authenticator;
use auth::HashCost;
use identity_service::identity::errors::AuthError;
use identity_service::identity::errors::NotificationError;
use identity_service::identity::models::Identity;
use identity_service::identity::models::ServiceSettings;
use identity_service::identity::ports::ConfirmationNotifier;
use identity_service::identity::ports::IdentityRepository;
use identity_service::identity::service::AuthService;
use identity_service::inbound::http::router::create_router;
use identity_service::outbound::cache::InMemorySessionCache;

pub const SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Identity store kept in process memory.
#[derive(Default)]
pub struct InMemoryIdentityRepository {
    identities: Mutex<HashMap<String, Identity>>,
}

#[async_trait]
impl IdentityRepository for InMemoryIdentityRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, AuthError> {
        Ok(self.identities.lock().unwrap().get(email).cloned())
    }

    async fn create(&self, identity: Identity) -> Result<Identity, AuthError> {
        let mut identities = self.identities.lock().unwrap();
        if identities.contains_key(identity.email.as_str()) {
            return Err(AuthError::AlreadyExists(identity.email.to_string()));
        }
        identities.insert(identity.email.to_string(), identity.clone());
        Ok(identity)
    }

    async fn set_refresh_token(&self, email: &str, token: &str) -> Result<(), AuthError> {
        let mut identities = self.identities.lock().unwrap();
        let identity = identities
            .get_mut(email)
            .ok_or_else(|| AuthError::NotFound(email.to_string()))?;
        identity.refresh_token = Some(token.to_string());
        Ok(())
    }

    async fn set_confirmed(&self, email: &str) -> Result<(), AuthError> {
        let mut identities = self.identities.lock().unwrap();
        let identity = identities
            .get_mut(email)
            .ok_or_else(|| AuthError::NotFound(email.to_string()))?;
        identity.confirmed = true;
        Ok(())
    }
}

/// Notifier that records every verify token instead of sending mail.
#[derive(Default)]
pub struct CapturingNotifier {
    sent: Mutex<Vec<(String, String)>>,
}

impl CapturingNotifier {
    /// Latest verify token sent to `email`.
    pub fn last_token_for(&self, email: &str) -> Option<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(to, _)| to == email)
            .map(|(_, token)| token.clone())
    }

    pub fn count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl ConfirmationNotifier for CapturingNotifier {
    async fn send_confirmation(
        &self,
        identity: &Identity,
        verify_token: &str,
        _base_url: &str,
    ) -> Result<(), NotificationError> {
        self.sent
            .lock()
            .unwrap()
            .push((identity.email.to_string(), verify_token.to_string()));
        Ok(())
    }
}

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub notifier: Arc<CapturingNotifier>,
    pub authenticator: Arc<Authenticator>,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let settings = AuthSettings::new(SECRET, "HS256").with_hash_cost(HashCost {
            memory_kib: 8,
            iterations: 1,
            parallelism: 1,
        });
        let authenticator =
            Arc::new(Authenticator::new(settings).expect("Failed to create authenticator"));
        let notifier = Arc::new(CapturingNotifier::default());

        let auth_service = Arc::new(AuthService::new(
            Arc::new(InMemoryIdentityRepository::default()),
            Arc::new(InMemorySessionCache::new()),
            Arc::clone(&notifier),
            Arc::clone(&authenticator),
            ServiceSettings::default(),
        ));

        let router = create_router(auth_service, &address);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            notifier,
            authenticator,
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make POST request with Bearer token
    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    pub async fn signup(&self, email: &str, password: &str) -> reqwest::Response {
        self.post("/api/auth/signup")
            .json(&serde_json::json!({
                "email": email,
                "password": password,
                "first_name": "Ada",
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn login(&self, email: &str, password: &str) -> reqwest::Response {
        self.post("/api/auth/login")
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Sign up and confirm through the captured verify token.
    pub async fn confirmed_account(&self, email: &str, password: &str) {
        self.signup(email, password).await;
        let token = self
            .notifier
            .last_token_for(email)
            .expect("No confirmation token captured");
        let response = self
            .get(&format!("/api/auth/confirmed_email/{}", token))
            .send()
            .await
            .expect("Failed to execute request");
        assert!(response.status().is_success());
    }
}
