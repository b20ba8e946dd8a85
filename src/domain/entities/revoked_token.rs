//! Revoked access token entity.

use chrono::{DateTime, Utc};

/// Marker stating that a previously issued access token must be rejected.
///
/// Only the HMAC fingerprint of the token is stored. `expires_at` mirrors the
/// token's own expiry; once it has passed the record can be purged because the
/// token would be rejected anyway.
#[derive(Debug, Clone)]
pub struct RevokedToken {
    pub id: i64,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: DateTime<Utc>,
}

impl RevokedToken {
    /// Returns true once the underlying token has expired on its own.
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}
