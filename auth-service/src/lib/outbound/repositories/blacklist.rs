use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::FromRow;
use sqlx::PgPool;

use crate::domain::blacklist::errors::BlacklistError;
use crate::domain::blacklist::models::RevokedToken;
use crate::domain::blacklist::ports::BlacklistRepository;

pub struct PostgresBlacklistRepository {
    pool: PgPool,
}

impl PostgresBlacklistRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct BlacklistedTokenRow {
    jti: String,
    expires_at: DateTime<Utc>,
    blacklisted_at: DateTime<Utc>,
}

impl From<BlacklistedTokenRow> for RevokedToken {
    fn from(row: BlacklistedTokenRow) -> Self {
        RevokedToken {
            jti: row.jti,
            expires_at: row.expires_at,
            blacklisted_at: row.blacklisted_at,
        }
    }
}

fn database_error(e: sqlx::Error) -> BlacklistError {
    BlacklistError::DatabaseError(e.to_string())
}

#[async_trait]
impl BlacklistRepository for PostgresBlacklistRepository {
    async fn insert(&self, token: &RevokedToken) -> Result<bool, BlacklistError> {
        let result = sqlx::query(
            r#"
            INSERT INTO blacklisted_tokens (jti, expires_at, blacklisted_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (jti) DO NOTHING
            "#,
        )
        .bind(&token.jti)
        .bind(token.expires_at)
        .bind(token.blacklisted_at)
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        Ok(result.rows_affected() == 1)
    }

    async fn find(&self, jti: &str) -> Result<Option<RevokedToken>, BlacklistError> {
        let row: Option<BlacklistedTokenRow> = sqlx::query_as(
            r#"
            SELECT jti, expires_at, blacklisted_at
            FROM blacklisted_tokens
            WHERE jti = $1
            "#,
        )
        .bind(jti)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?;

        Ok(row.map(RevokedToken::from))
    }

    async fn delete(&self, jti: &str) -> Result<(), BlacklistError> {
        sqlx::query("DELETE FROM blacklisted_tokens WHERE jti = $1")
            .bind(jti)
            .execute(&self.pool)
            .await
            .map_err(database_error)?;

        Ok(())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, BlacklistError> {
        let result = sqlx::query("DELETE FROM blacklisted_tokens WHERE expires_at <= $1")
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(database_error)?;

        Ok(result.rows_affected())
    }
}
