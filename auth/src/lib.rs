//! Authentication utilities library
//!
//! Provides reusable authentication infrastructure for the shop services:
//! - Secret hashing (Argon2id) for passwords and one-time codes
//! - One-time code generation
//! - JWT access/refresh token issuing and validation, one key per kind
//! - Authentication coordination
//! - Client for the internal admin verification endpoint
//!
//! # Examples
//!
//! ## Secret Hashing
//! ```
//! use auth::SecretHasher;
//!
//! let hasher = SecretHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## Tokens
//! ```
//! use auth::{TokenCodec, TokenKind};
//! use chrono::Duration;
//!
//! let codec = TokenCodec::new(
//!     b"access_secret_at_least_32_bytes_long!",
//!     b"refresh_secret_at_least_32_bytes_long",
//! );
//! let issued = codec.issue("a@x.com", TokenKind::Access, Duration::minutes(15)).unwrap();
//! let decoded = codec.decode(&issued.token, TokenKind::Access).unwrap();
//! assert_eq!(decoded.jti, issued.jti);
//! assert!(codec.decode(&issued.token, TokenKind::Refresh).is_err());
//! ```
//!
//! ## One-Time Codes
//! ```
//! use auth::OneTimeCode;
//!
//! let code = OneTimeCode::generate();
//! assert_eq!(code.as_str().len(), 6);
//! ```

pub mod authenticator;
pub mod internal;
pub mod jwt;
pub mod otp;
pub mod secret;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::Authenticator;
pub use authenticator::TokenPair;
pub use jwt::Claims;
pub use jwt::DecodedToken;
pub use jwt::IssuedToken;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use jwt::TokenCodec;
pub use jwt::TokenKind;
pub use otp::OneTimeCode;
pub use secret::SecretError;
pub use secret::SecretHasher;
