use std::env;
use std::time::Duration;

use auth::AuthSettings;
use auth::HashCost;
use auth::TokenLifetimes;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

use crate::identity::models::RefreshPolicy;
use crate::identity::models::ServiceSettings;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub password: PasswordConfig,
    pub redis: RedisConfig,
    #[serde(default)]
    pub timeouts: TimeoutsConfig,
    pub mail: MailConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
    /// Base URL embedded in confirmation links.
    pub public_url: String,
}

#[derive(Deserialize, Clone)]
pub struct JwtConfig {
    #[serde(default = "default_algorithm")]
    pub algorithm: String,
    pub secret: String,
    #[serde(default = "default_access_minutes")]
    pub access_token_expire_minutes: i64,
    #[serde(default = "default_refresh_days")]
    pub refresh_token_expire_days: i64,
    #[serde(default = "default_verify_hours")]
    pub verify_token_expire_hours: i64,
    #[serde(default)]
    pub rotate_refresh_tokens: bool,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("algorithm", &self.algorithm)
            .field("secret", &"<redacted>")
            .field("access_token_expire_minutes", &self.access_token_expire_minutes)
            .field("refresh_token_expire_days", &self.refresh_token_expire_days)
            .field("verify_token_expire_hours", &self.verify_token_expire_hours)
            .field("rotate_refresh_tokens", &self.rotate_refresh_tokens)
            .finish()
    }
}

/// Argon2id cost parameters.
#[derive(Debug, Deserialize, Clone)]
pub struct PasswordConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        let cost = HashCost::default();
        Self {
            memory_kib: cost.memory_kib,
            iterations: cost.iterations,
            parallelism: cost.parallelism,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct RedisConfig {
    pub url: String,
    #[serde(default = "default_ttl_seconds")]
    pub ttl_seconds: u64,
}

/// Deadlines for collaborator calls, in milliseconds.
#[derive(Debug, Deserialize, Clone)]
pub struct TimeoutsConfig {
    pub store_ms: u64,
    pub cache_ms: u64,
    pub notification_ms: u64,
}

impl Default for TimeoutsConfig {
    fn default() -> Self {
        Self {
            store_ms: 5_000,
            cache_ms: 500,
            notification_ms: 10_000,
        }
    }
}

#[derive(Deserialize, Clone)]
pub struct MailConfig {
    pub api_url: String,
    pub api_key: String,
    pub from: String,
}

impl std::fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &"<redacted>")
            .field("from", &self.from)
            .finish()
    }
}

fn default_algorithm() -> String {
    "HS256".to_string()
}

fn default_access_minutes() -> i64 {
    15
}

fn default_refresh_days() -> i64 {
    30
}

fn default_verify_hours() -> i64 {
    24
}

fn default_ttl_seconds() -> u64 {
    900
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, JWT__SECRET, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: JWT__SECRET=... overrides jwt.secret
            .add_source(Environment::with_prefix("").separator("__"))
            .build()?;

        let config: Config = configuration.try_deserialize()?;

        Ok(config)
    }

    /// Immutable settings for the authentication core.
    ///
    /// Fails when a token lifetime does not fit a chrono duration.
    pub fn auth_settings(&self) -> Result<AuthSettings, ConfigError> {
        let out_of_range =
            |key: &str| ConfigError::Message(format!("jwt.{} is out of range", key));

        let lifetimes = TokenLifetimes {
            access: chrono::Duration::try_minutes(self.jwt.access_token_expire_minutes)
                .ok_or_else(|| out_of_range("access_token_expire_minutes"))?,
            refresh: chrono::Duration::try_days(self.jwt.refresh_token_expire_days)
                .ok_or_else(|| out_of_range("refresh_token_expire_days"))?,
            verify: chrono::Duration::try_hours(self.jwt.verify_token_expire_hours)
                .ok_or_else(|| out_of_range("verify_token_expire_hours"))?,
        };

        Ok(
            AuthSettings::new(self.jwt.secret.as_bytes(), self.jwt.algorithm.as_str())
                .with_lifetimes(lifetimes)
                .with_hash_cost(HashCost {
                    memory_kib: self.password.memory_kib,
                    iterations: self.password.iterations,
                    parallelism: self.password.parallelism,
                }),
        )
    }

    /// Immutable settings for the auth orchestrator.
    pub fn service_settings(&self) -> ServiceSettings {
        ServiceSettings {
            cache_ttl: Duration::from_secs(self.redis.ttl_seconds),
            store_timeout: Duration::from_millis(self.timeouts.store_ms),
            cache_timeout: Duration::from_millis(self.timeouts.cache_ms),
            notification_timeout: Duration::from_millis(self.timeouts.notification_ms),
            refresh_policy: if self.jwt.rotate_refresh_tokens {
                RefreshPolicy::Rotate
            } else {
                RefreshPolicy::Reuse
            },
        }
    }
}
