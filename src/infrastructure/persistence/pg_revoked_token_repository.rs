//! PostgreSQL implementation of revoked token repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use crate::domain::entities::RevokedToken;
use crate::domain::repositories::RevokedTokenRepository;
use crate::error::AppError;

#[derive(FromRow)]
struct RevokedTokenRow {
    id: i64,
    token_hash: String,
    expires_at: DateTime<Utc>,
    revoked_at: DateTime<Utc>,
}

impl From<RevokedTokenRow> for RevokedToken {
    fn from(row: RevokedTokenRow) -> Self {
        RevokedToken {
            id: row.id,
            token_hash: row.token_hash,
            expires_at: row.expires_at,
            revoked_at: row.revoked_at,
        }
    }
}

/// PostgreSQL repository for the token blacklist.
///
/// Stores HMAC fingerprints only. Raw tokens are never persisted.
pub struct PgRevokedTokenRepository {
    pool: Arc<PgPool>,
}

impl PgRevokedTokenRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RevokedTokenRepository for PgRevokedTokenRepository {
    async fn revoke(&self, token_hash: &str, expires_at: DateTime<Utc>) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO revoked_tokens (token_hash, expires_at)
            VALUES ($1, $2)
            ON CONFLICT (token_hash) DO NOTHING
            "#,
        )
        .bind(token_hash)
        .bind(expires_at)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn is_revoked(&self, token_hash: &str) -> Result<bool, AppError> {
        let revoked: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM revoked_tokens WHERE token_hash = $1
            )
            "#,
        )
        .bind(token_hash)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(revoked)
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<RevokedToken>, AppError> {
        let rows = sqlx::query_as::<_, RevokedTokenRow>(
            r#"
            SELECT id, token_hash, expires_at, revoked_at
            FROM revoked_tokens
            ORDER BY revoked_at DESC, id DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(RevokedToken::from).collect())
    }

    async fn purge_expired(&self) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM revoked_tokens WHERE expires_at <= NOW()")
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected())
    }
}
