//! Access token issuance, verification and fingerprinting.

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use hmac::{Hmac, Mac};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::entities::User;
use crate::error::AppError;

type HmacSha256 = Hmac<Sha256>;

/// Claims embedded in every access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub iss: String,
    /// User id.
    pub sub: String,
    /// Unique token id, so two tokens issued in the same second still differ.
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
    pub email: String,
}

impl Claims {
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.exp, 0).single()
    }
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("failed to encode token: {0}")]
    Encoding(jsonwebtoken::errors::Error),

    #[error("token has expired")]
    Expired,

    #[error("invalid token signature")]
    InvalidSignature,

    #[error("invalid token")]
    Invalid,
}

impl From<TokenError> for AppError {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::Encoding(_) => AppError::internal(e.to_string()),
            _ => AppError::unauthorized("Unauthorized"),
        }
    }
}

/// Settings for access token signing.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// HMAC secret shared by JWT signing and token fingerprints.
    pub secret: String,
    /// Token lifetime in seconds.
    pub ttl_seconds: u64,
    pub issuer: String,
}

/// Issues and verifies HS256 JWT access tokens.
///
/// Also derives the fingerprint under which a token is blacklisted: an
/// HMAC-SHA256 of the raw token keyed by the same server secret, so a leaked
/// blacklist table reveals nothing usable.
#[derive(Clone)]
pub struct TokenService {
    config: TokenConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenService {
    pub fn new(config: TokenConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Issues a signed access token for `user`.
    pub fn issue(&self, user: &User) -> Result<String, TokenError> {
        let now = Utc::now().timestamp();
        let ttl = i64::try_from(self.config.ttl_seconds).unwrap_or(i64::MAX);

        let claims = Claims {
            iss: self.config.issuer.clone(),
            sub: user.id.to_string(),
            jti: Uuid::new_v4().to_string(),
            iat: now,
            exp: now.saturating_add(ttl),
            email: user.email.clone(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(TokenError::Encoding)
    }

    /// Verifies signature, issuer and expiry, returning the claims.
    ///
    /// Expiry is checked without leeway: a token is rejected from its `exp`
    /// second on, which is also when its revocation record becomes purgeable.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.config.issuer]);
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                _ => TokenError::Invalid,
            })
    }

    /// Point in time after which a revocation record for `token` is useless.
    ///
    /// Uses the end of the token's last valid second when it verifies;
    /// otherwise falls back to now + TTL, which outlives any token this
    /// service could have issued.
    pub fn revocation_expiry(&self, token: &str) -> DateTime<Utc> {
        self.verify(token)
            .ok()
            .and_then(|claims| claims.expires_at())
            .and_then(|at| at.checked_add_signed(TimeDelta::seconds(1)))
            .unwrap_or_else(|| {
                let ttl = i64::try_from(self.config.ttl_seconds)
                    .ok()
                    .and_then(TimeDelta::try_seconds)
                    .unwrap_or(TimeDelta::MAX);
                Utc::now()
                    .checked_add_signed(ttl)
                    .unwrap_or(DateTime::<Utc>::MAX_UTC)
            })
    }

    /// Hashes a raw token with HMAC-SHA256 using the server secret.
    ///
    /// Returns a 64-character lowercase hex-encoded MAC.
    pub fn fingerprint(&self, token: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(self.config.secret.as_bytes())
            .expect("HMAC accepts any key length");
        mac.update(token.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }
}
