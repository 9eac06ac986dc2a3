use std::sync::Arc;

use chrono::DateTime;
use chrono::Utc;

use crate::domain::blacklist::errors::BlacklistError;
use crate::domain::blacklist::models::RevokedToken;
use crate::domain::blacklist::ports::BlacklistRepository;

/// Token blacklist keyed by jti.
///
/// A jti is revoked while the token it belongs to has not expired. Records
/// past their expiry are dead weight and get purged, either lazily on lookup
/// or by the periodic sweep.
pub struct TokenBlacklist<BR>
where
    BR: BlacklistRepository,
{
    repository: Arc<BR>,
}

impl<BR> Clone for TokenBlacklist<BR>
where
    BR: BlacklistRepository,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<BR> TokenBlacklist<BR>
where
    BR: BlacklistRepository,
{
    pub fn new(repository: Arc<BR>) -> Self {
        Self { repository }
    }

    /// Revoke `jti` until `expires_at`. Idempotent.
    ///
    /// # Returns
    /// `true` if this call revoked the jti, `false` if it was already revoked
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    pub async fn revoke(&self, jti: &str, expires_at: DateTime<Utc>) -> Result<bool, BlacklistError> {
        let inserted = self
            .repository
            .insert(&RevokedToken::new(jti, expires_at))
            .await?;

        tracing::debug!(jti = %jti, expires_at = %expires_at, inserted, "Token revoked");
        Ok(inserted)
    }

    /// Whether `jti` is revoked right now.
    ///
    /// # Errors
    /// * `DatabaseError` - Lookup failed; callers treat this as revoked
    pub async fn is_revoked(&self, jti: &str) -> Result<bool, BlacklistError> {
        let Some(record) = self.repository.find(jti).await? else {
            return Ok(false);
        };

        if record.is_active_at(Utc::now()) {
            return Ok(true);
        }

        if let Err(e) = self.repository.delete(jti).await {
            tracing::debug!(jti = %jti, error = %e, "Failed to purge expired blacklist entry");
        }
        Ok(false)
    }

    /// Remove every expired record.
    ///
    /// # Returns
    /// Number of records removed
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    pub async fn purge_expired(&self) -> Result<u64, BlacklistError> {
        let removed = self.repository.delete_expired(Utc::now()).await?;
        if removed > 0 {
            tracing::info!(removed, "Purged expired blacklist entries");
        }
        Ok(removed)
    }
}
