//! Repository trait for revoked access tokens.

use crate::domain::entities::RevokedToken;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Repository interface for the token blacklist.
///
/// Works on token fingerprints only; raw tokens never reach the store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RevokedTokenRepository: Send + Sync {
    /// Records a token fingerprint as revoked.
    ///
    /// Revoking the same fingerprint twice is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn revoke(&self, token_hash: &str, expires_at: DateTime<Utc>) -> Result<(), AppError>;

    /// Returns `true` if the fingerprint has been revoked.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn is_revoked(&self, token_hash: &str) -> Result<bool, AppError>;

    /// Lists the most recent revocations, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list_recent(&self, limit: i64) -> Result<Vec<RevokedToken>, AppError>;

    /// Deletes records whose token has expired on its own.
    ///
    /// Returns the number of deleted records.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn purge_expired(&self) -> Result<u64, AppError>;
}
