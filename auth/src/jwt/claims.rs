use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use rand::rngs::OsRng;
use rand::RngCore;
use serde::Deserialize;
use serde::Serialize;

/// Number of random bytes behind a token id.
const JTI_BYTES: usize = 32;

/// JWT claims carried by access and refresh tokens.
///
/// Standard RFC 7519 fields only. Every field is optional on the wire so that
/// a token missing a claim still deserializes and can be rejected with a
/// precise error instead of a generic parse failure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Claims {
    /// Subject (email or phone number of the user)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Expiration time (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,

    /// Issued at (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// JWT ID, the revocation key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
}

impl Claims {
    /// Create new empty claims.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create claims for a subject expiring `ttl` after `now`, with a fresh token id.
    ///
    /// # Arguments
    /// * `subject` - Token subject
    /// * `ttl` - Lifetime of the token
    /// * `now` - Issue instant
    pub fn issue(subject: impl ToString, ttl: Duration, now: DateTime<Utc>) -> Self {
        Self {
            sub: Some(subject.to_string()),
            exp: Some((now + ttl).timestamp()),
            iat: Some(now.timestamp()),
            jti: Some(generate_jti()),
        }
    }

    /// Set subject.
    pub fn with_subject(mut self, sub: impl ToString) -> Self {
        self.sub = Some(sub.to_string());
        self
    }

    /// Set expiration (Unix timestamp).
    pub fn with_expiration(mut self, exp: i64) -> Self {
        self.exp = Some(exp);
        self
    }

    /// Set token id.
    pub fn with_jti(mut self, jti: impl ToString) -> Self {
        self.jti = Some(jti.to_string());
        self
    }
}

/// Generate a high-entropy, URL-safe token id.
pub fn generate_jti() -> String {
    let mut bytes = [0u8; JTI_BYTES];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
