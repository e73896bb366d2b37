//! Session authentication core
//!
//! Provides the cryptographic building blocks of the identity service:
//! - Password hashing (Argon2id)
//! - Typed, signed, expiring session tokens (`access`, `refresh`, `verify`)
//! - Token issuance and class-aware verification
//!
//! Everything here is synchronous and free of shared mutable state, so one
//! `Authenticator` can serve concurrent requests behind an `Arc`.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash).unwrap());
//! ```
//!
//! ## Session Tokens
//! ```
//! use auth::{AuthSettings, Authenticator, TokenError};
//!
//! let auth = Authenticator::new(AuthSettings::new(
//!     b"secret_key_at_least_32_bytes_long!".to_vec(),
//!     "HS256",
//! ))
//! .unwrap();
//!
//! let access = auth.issuer().issue_access("a@x.com").unwrap();
//! assert_eq!(auth.verifier().verify_access(&access).unwrap(), "a@x.com");
//!
//! // An access token is never accepted where a refresh token is required
//! assert!(matches!(
//!     auth.verifier().verify_refresh(&access),
//!     Err(TokenError::WrongClass { .. })
//! ));
//! ```

pub mod authenticator;
pub mod issuer;
pub mod jwt;
pub mod password;
pub mod verifier;

// Re-export commonly used items
pub use authenticator::AuthSettings;
pub use authenticator::AuthenticationError;
pub use authenticator::Authenticator;
pub use issuer::TokenIssuer;
pub use issuer::TokenLifetimes;
pub use jwt::JwtError;
pub use jwt::SessionClaims;
pub use jwt::TokenClass;
pub use jwt::TokenCodec;
pub use password::HashCost;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use verifier::TokenError;
pub use verifier::TokenVerifier;
