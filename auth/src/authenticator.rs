use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use crate::jwt::DecodedToken;
use crate::jwt::IssuedToken;
use crate::jwt::JwtError;
use crate::jwt::TokenCodec;
use crate::jwt::TokenKind;
use crate::secret::SecretError;
use crate::secret::SecretHasher;

/// Authentication coordinator combining secret hashing and token handling.
///
/// Owns the token lifetimes so that every token of a kind is issued with the
/// same TTL, and applies the expiry policy the codec leaves to its callers.
pub struct Authenticator {
    secret_hasher: SecretHasher,
    codec: TokenCodec,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

/// Access and refresh tokens issued together on login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access: IssuedToken,
    pub refresh: IssuedToken,
}

/// Authentication operation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Secret error: {0}")]
    SecretError(#[from] SecretError),

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `codec` - Token codec with one key per token kind
    /// * `access_ttl` - Lifetime of access tokens
    /// * `refresh_ttl` - Lifetime of refresh tokens
    pub fn new(codec: TokenCodec, access_ttl: Duration, refresh_ttl: Duration) -> Self {
        Self {
            secret_hasher: SecretHasher::new(),
            codec,
            access_ttl,
            refresh_ttl,
        }
    }

    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }

    /// Hash a secret for storage.
    pub fn hash_secret(&self, secret: &str) -> Result<String, SecretError> {
        self.secret_hasher.hash(secret)
    }

    /// Hash that no secret verifies against.
    pub fn unusable_hash(&self) -> Result<String, SecretError> {
        self.secret_hasher.unusable_hash()
    }

    /// Verify a plaintext secret against a stored hash.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Secret does not match
    /// * `SecretError` - Stored hash is malformed
    pub fn verify_secret(&self, secret: &str, stored_hash: &str) -> Result<(), AuthenticationError> {
        if self.secret_hasher.verify(secret, stored_hash)? {
            Ok(())
        } else {
            Err(AuthenticationError::InvalidCredentials)
        }
    }

    /// Issue a token of `kind` for `subject` with the configured lifetime.
    pub fn issue_token(&self, subject: &str, kind: TokenKind) -> Result<IssuedToken, JwtError> {
        let ttl = match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        };
        self.codec.issue(subject, kind, ttl)
    }

    /// Issue an access token and a refresh token for `subject`.
    pub fn issue_token_pair(&self, subject: &str) -> Result<TokenPair, JwtError> {
        Ok(TokenPair {
            access: self.issue_token(subject, TokenKind::Access)?,
            refresh: self.issue_token(subject, TokenKind::Refresh)?,
        })
    }

    /// Decode a token and reject it if it has expired at `now`.
    ///
    /// Revocation is not checked here.
    ///
    /// # Errors
    /// * `InvalidToken` / `MissingClaim` - Token failed verification
    /// * `TokenExpired` - `now` is at or past the token's expiry
    pub fn validate_token(
        &self,
        token: &str,
        kind: TokenKind,
        now: DateTime<Utc>,
    ) -> Result<DecodedToken, JwtError> {
        let decoded = self.codec.decode(token, kind)?;

        if decoded.is_expired_at(now) {
            return Err(JwtError::TokenExpired);
        }

        Ok(decoded)
    }
}
