//! Password hashing and verification using Argon2id.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};
use thiserror::Error;
use tokio::sync::OnceCell;

use crate::error::AppError;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("failed to hash password: {0}")]
    HashingFailed(String),

    #[error("invalid password hash format")]
    InvalidHashFormat,

    #[error("invalid Argon2 parameters: {0}")]
    InvalidParams(String),

    #[error("password task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl From<PasswordError> for AppError {
    fn from(e: PasswordError) -> Self {
        AppError::internal(e.to_string())
    }
}

/// Hashes and verifies passwords.
///
/// Hashes are PHC strings (`$argon2id$v=19$...`) carrying their own salt and
/// parameters, so changing the cost settings later does not invalidate
/// existing hashes. Both operations are CPU-bound and run on the blocking
/// thread pool.
///
/// Clones share the decoy hash and the verification counter.
#[derive(Clone, Default)]
pub struct PasswordService {
    params: Params,
    decoy_hash: Arc<OnceCell<String>>,
    verifications: Arc<AtomicU64>,
}

/// Plaintext behind the decoy hash. Never stored for any account.
const DECOY_PASSWORD: &str = "decoy-password-for-unknown-accounts";

impl PasswordService {
    /// Creates a service with the library's recommended Argon2id parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a service with explicit cost parameters.
    ///
    /// # Arguments
    ///
    /// - `memory_kib` - memory cost in KiB
    /// - `iterations` - time cost
    /// - `parallelism` - lanes
    pub fn with_params(
        memory_kib: u32,
        iterations: u32,
        parallelism: u32,
    ) -> Result<Self, PasswordError> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|e| PasswordError::InvalidParams(e.to_string()))?;

        Ok(Self {
            params,
            ..Self::default()
        })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hashes a plaintext password with a fresh random salt.
    pub async fn hash(&self, password: String) -> Result<String, PasswordError> {
        let argon2 = self.argon2();

        tokio::task::spawn_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);
            argon2
                .hash_password(password.as_bytes(), &salt)
                .map(|hash| hash.to_string())
                .map_err(|e| PasswordError::HashingFailed(e.to_string()))
        })
        .await?
    }

    /// Compares a plaintext password against a stored PHC hash.
    ///
    /// Returns `Ok(false)` on mismatch; errors only for malformed hashes.
    pub async fn verify(&self, password: String, hash: String) -> Result<bool, PasswordError> {
        let argon2 = self.argon2();
        self.verifications.fetch_add(1, Ordering::Relaxed);

        tokio::task::spawn_blocking(move || {
            let parsed = PasswordHash::new(&hash).map_err(|_| PasswordError::InvalidHashFormat)?;
            Ok(argon2.verify_password(password.as_bytes(), &parsed).is_ok())
        })
        .await?
    }

    /// Verifies a password against a decoy hash built with this service's
    /// parameters, so a missing account costs the same as a wrong password.
    pub async fn verify_decoy(&self, password: String) -> Result<(), PasswordError> {
        let hash = self.decoy_hash().await?;
        self.verify(password, hash).await?;
        Ok(())
    }

    /// Builds the decoy hash ahead of the first login.
    pub async fn warm_up(&self) -> Result<(), PasswordError> {
        self.decoy_hash().await.map(|_| ())
    }

    /// Number of verifications run by this service and its clones.
    pub fn verifications(&self) -> u64 {
        self.verifications.load(Ordering::Relaxed)
    }

    async fn decoy_hash(&self) -> Result<String, PasswordError> {
        self.decoy_hash
            .get_or_try_init(|| self.hash(DECOY_PASSWORD.to_string()))
            .await
            .cloned()
    }
}
