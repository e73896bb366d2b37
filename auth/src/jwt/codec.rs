use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::SessionClaims;
use super::errors::JwtError;

/// Signed token codec.
///
/// Produces and parses the compact `header.payload.signature` form. Only HMAC
/// algorithms are accepted since the key is a shared secret.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
}

impl TokenCodec {
    /// Create a codec for a secret and an algorithm name.
    ///
    /// # Arguments
    /// * `secret` - Shared signing secret
    /// * `algorithm` - `HS256`, `HS384` or `HS512`
    ///
    /// # Errors
    /// * `UnsupportedAlgorithm` - Unknown or non-HMAC algorithm
    ///
    /// # Security Notes
    /// - The secret should be at least as long as the digest (32 bytes for HS256)
    /// - Store secrets in environment variables or secure vaults, never in code
    pub fn new(secret: &[u8], algorithm: &str) -> Result<Self, JwtError> {
        let algorithm = Algorithm::from_str(algorithm)
            .map_err(|_| JwtError::UnsupportedAlgorithm(algorithm.to_string()))?;

        match algorithm {
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => Ok(Self {
                encoding_key: EncodingKey::from_secret(secret),
                decoding_key: DecodingKey::from_secret(secret),
                algorithm,
            }),
            other => Err(JwtError::UnsupportedAlgorithm(format!("{:?}", other))),
        }
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Sign claims into a compact token string.
    ///
    /// # Errors
    /// * `EncodingFailed` - Serialization or signing failed
    pub fn encode(&self, claims: &SessionClaims) -> Result<String, JwtError> {
        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Verify and decode a token against the current instant.
    ///
    /// # Errors
    /// * `InvalidToken` - Signature mismatch, malformed structure or claims
    /// * `ExpiredToken` - Current instant is at or past `exp`
    pub fn decode(&self, token: &str) -> Result<SessionClaims, JwtError> {
        self.decode_at(token, Utc::now())
    }

    /// Verify and decode a token against an explicit instant.
    ///
    /// The signature is checked before any claim is read. Expiry is checked
    /// here rather than by `jsonwebtoken`, which treats `now == exp` as valid
    /// and applies leeway.
    pub fn decode_at(&self, token: &str, now: DateTime<Utc>) -> Result<SessionClaims, JwtError> {
        let mut validation = Validation::new(self.algorithm);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let token_data = decode::<SessionClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| JwtError::InvalidToken(e.to_string()))?;

        let claims = token_data.claims;
        if claims.is_expired(now.timestamp()) {
            return Err(JwtError::ExpiredToken);
        }

        Ok(claims)
    }
}
