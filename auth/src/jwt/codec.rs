use std::fmt;

use chrono::DateTime;
use chrono::Duration;
use chrono::TimeZone;
use chrono::Utc;

use super::claims::Claims;
use super::errors::JwtError;
use super::handler::JwtHandler;

/// Kind of token, each signed with its own key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Access,
    Refresh,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Access => f.write_str("access"),
            TokenKind::Refresh => f.write_str("refresh"),
        }
    }
}

/// A freshly signed token together with the metadata needed to revoke it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub jti: String,
    pub expires_at: DateTime<Utc>,
}

/// Verified contents of a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedToken {
    pub subject: String,
    pub jti: String,
    pub expires_at: DateTime<Utc>,
}

impl DecodedToken {
    /// Whether the token is no longer valid at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Token codec holding one signing key per token kind.
///
/// A refresh token never verifies as an access token and vice versa.
pub struct TokenCodec {
    access: JwtHandler,
    refresh: JwtHandler,
}

impl TokenCodec {
    /// Create a codec signing both kinds with HS256.
    pub fn new(access_secret: &[u8], refresh_secret: &[u8]) -> Self {
        Self {
            access: JwtHandler::new(access_secret),
            refresh: JwtHandler::new(refresh_secret),
        }
    }

    /// Create a codec for a named HMAC algorithm.
    ///
    /// # Errors
    /// * `UnsupportedAlgorithm` - Algorithm is unknown or not HMAC
    pub fn with_algorithm(
        access_secret: &[u8],
        refresh_secret: &[u8],
        algorithm: &str,
    ) -> Result<Self, JwtError> {
        Ok(Self {
            access: JwtHandler::with_algorithm(access_secret, algorithm)?,
            refresh: JwtHandler::with_algorithm(refresh_secret, algorithm)?,
        })
    }

    fn handler(&self, kind: TokenKind) -> &JwtHandler {
        match kind {
            TokenKind::Access => &self.access,
            TokenKind::Refresh => &self.refresh,
        }
    }

    /// Sign a token for `subject` that expires `ttl` from now.
    ///
    /// # Errors
    /// * `EncodingFailed` - Signing failed
    pub fn issue(
        &self,
        subject: &str,
        kind: TokenKind,
        ttl: Duration,
    ) -> Result<IssuedToken, JwtError> {
        let now = Utc::now();
        let claims = Claims::issue(subject, ttl, now);
        let token = self.handler(kind).encode(&claims)?;

        // Report the expiry at the second precision the token carries.
        let expires_at = claims
            .exp
            .and_then(|exp| Utc.timestamp_opt(exp, 0).single())
            .unwrap_or(now + ttl);

        Ok(IssuedToken {
            token,
            jti: claims.jti.unwrap_or_default(),
            expires_at,
        })
    }

    /// Verify a token with the key for `kind` and extract its contents.
    ///
    /// Neither expiry nor revocation is checked.
    ///
    /// # Errors
    /// * `InvalidToken` - Bad signature, wrong kind, or malformed payload
    /// * `MissingClaim` - `sub`, `jti` or `exp` is absent
    pub fn decode(&self, token: &str, kind: TokenKind) -> Result<DecodedToken, JwtError> {
        let claims: Claims = self.handler(kind).decode(token)?;

        let subject = claims
            .sub
            .filter(|s| !s.is_empty())
            .ok_or_else(|| JwtError::MissingClaim("sub".to_string()))?;
        let jti = claims
            .jti
            .filter(|s| !s.is_empty())
            .ok_or_else(|| JwtError::MissingClaim("jti".to_string()))?;
        let exp = claims
            .exp
            .ok_or_else(|| JwtError::MissingClaim("exp".to_string()))?;
        let expires_at = Utc
            .timestamp_opt(exp, 0)
            .single()
            .ok_or_else(|| JwtError::InvalidToken(format!("exp out of range: {}", exp)))?;

        Ok(DecodedToken {
            subject,
            jti,
            expires_at,
        })
    }
}
