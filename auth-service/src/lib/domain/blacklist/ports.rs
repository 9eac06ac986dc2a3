use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;

use crate::domain::blacklist::errors::BlacklistError;
use crate::domain::blacklist::models::RevokedToken;

/// Persistence operations for revoked token identifiers.
#[async_trait]
pub trait BlacklistRepository: Send + Sync + 'static {
    /// Record a revocation. Recording the same jti twice is a no-op.
    ///
    /// # Returns
    /// `true` if this call created the record, `false` if the jti was
    /// already present
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn insert(&self, token: &RevokedToken) -> Result<bool, BlacklistError>;

    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find(&self, jti: &str) -> Result<Option<RevokedToken>, BlacklistError>;

    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn delete(&self, jti: &str) -> Result<(), BlacklistError>;

    /// Remove every record whose token has expired at `now`.
    ///
    /// # Returns
    /// Number of records removed
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, BlacklistError>;
}
