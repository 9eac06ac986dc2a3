use thiserror::Error;

use crate::domain::blacklist::errors::BlacklistError;
use crate::user::errors::UserError;

/// Error for one-time code delivery
#[derive(Debug, Clone, Error)]
pub enum NotifierError {
    #[error("Delivery failed: {0}")]
    DeliveryFailed(String),
}

/// Top-level error for authentication flows
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error(transparent)]
    User(#[from] UserError),

    #[error("Invalid or expired OTP")]
    InvalidCredentials,

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("Could not deliver one-time code: {0}")]
    Delivery(#[from] NotifierError),

    // Infrastructure errors
    #[error("Secret error: {0}")]
    Secret(#[from] auth::SecretError),

    #[error("Token error: {0}")]
    Token(#[from] auth::JwtError),

    #[error("Blacklist error: {0}")]
    Blacklist(#[from] BlacklistError),
}

impl AuthError {
    /// Generic rejection for any unusable bearer or refresh token.
    pub fn invalid_token() -> Self {
        AuthError::Unauthorized("Could not validate credentials".to_string())
    }
}
