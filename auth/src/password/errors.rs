use thiserror::Error;

/// Error type for password operations.
#[derive(Debug, Clone, Error)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    /// The stored digest could not be parsed. Signals corrupted credential data.
    #[error("Malformed password digest: {0}")]
    MalformedDigest(String),

    #[error("Invalid hashing parameters: {0}")]
    InvalidParameters(String),
}
