use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::rand_core::RngCore;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Argon2;
use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::Engine;

use super::errors::SecretError;

/// Hasher for stored secrets: passwords and one-time codes alike.
///
/// Argon2id with a random salt per hash, PHC string output.
#[derive(Debug, Clone, Copy, Default)]
pub struct SecretHasher;

impl SecretHasher {
    pub fn new() -> Self {
        Self
    }

    /// Hash a plaintext secret.
    ///
    /// # Errors
    /// * `HashingFailed` - Argon2 rejected the input or parameters
    pub fn hash(&self, secret: &str) -> Result<String, SecretError> {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(secret.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| SecretError::HashingFailed(e.to_string()))
    }

    /// Verify a plaintext secret against a stored PHC hash.
    ///
    /// # Errors
    /// * `VerificationFailed` - Stored hash is not a valid PHC string
    pub fn verify(&self, secret: &str, hash: &str) -> Result<bool, SecretError> {
        let parsed_hash = PasswordHash::new(hash).map_err(|e| {
            SecretError::VerificationFailed(format!("Invalid secret hash: {}", e))
        })?;

        Ok(Argon2::default()
            .verify_password(secret.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash of a random value that is discarded immediately.
    ///
    /// Nothing can verify against it, which makes it the placeholder for a
    /// credential that has been consumed or cleared.
    pub fn unusable_hash(&self) -> Result<String, SecretError> {
        let mut bytes = [0u8; 32];
        OsRng.fill_bytes(&mut bytes);
        self.hash(&STANDARD_NO_PAD.encode(bytes))
    }
}
