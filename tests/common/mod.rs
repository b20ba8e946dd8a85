#![allow(dead_code)]

use async_trait::async_trait;
use axum::{Router, middleware};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use user_accounts::api::middleware::auth;
use user_accounts::api::routes::{protected_routes, public_routes};
use user_accounts::application::services::{
    AuthService, PasswordService, TokenConfig, TokenService,
};
use user_accounts::domain::entities::{FullName, NewUser, RevokedToken, User, UserCredentials};
use user_accounts::domain::repositories::{RevokedTokenRepository, UserRepository};
use user_accounts::error::AppError;
use user_accounts::state::AppState;

pub const TEST_SECRET: &str = "integration-test-secret-0123456789abcdef";
pub const TEST_ISSUER: &str = "user-accounts";

/// User store backed by a vector; enforces unique emails like the real table.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<UserCredentials>>,
    calls: AtomicUsize,
}

impl InMemoryUserRepository {
    /// Number of repository calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    fn touch(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, new_user: NewUser) -> Result<User, AppError> {
        self.touch();
        let mut users = self.users.lock().unwrap();

        if users.iter().any(|c| c.user.email == new_user.email) {
            return Err(AppError::conflict(
                "Unique constraint violation: users_email_key",
            ));
        }

        let now = Utc::now();
        let user = User::new(
            users.len() as i64 + 1,
            FullName {
                first_name: new_user.first_name,
                last_name: new_user.last_name,
            },
            new_user.email,
            now,
            now,
        );

        users.push(UserCredentials {
            user: user.clone(),
            password_hash: new_user.password_hash,
        });

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        self.touch();
        let users = self.users.lock().unwrap();
        Ok(users
            .iter()
            .find(|c| c.user.email == email)
            .map(|c| c.user.clone()))
    }

    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserCredentials>, AppError> {
        self.touch();
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|c| c.user.email == email).cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        self.touch();
        let users = self.users.lock().unwrap();
        Ok(users
            .iter()
            .find(|c| c.user.id == id)
            .map(|c| c.user.clone()))
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<User>, AppError> {
        self.touch();
        let users = self.users.lock().unwrap();
        Ok(users
            .iter()
            .rev()
            .skip(offset as usize)
            .take(limit as usize)
            .map(|c| c.user.clone())
            .collect())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

/// Revoked token store backed by a map of fingerprint to expiry.
#[derive(Default)]
pub struct InMemoryRevokedTokenRepository {
    records: Mutex<HashMap<String, DateTime<Utc>>>,
    writes: AtomicUsize,
}

impl InMemoryRevokedTokenRepository {
    /// Number of `revoke` calls made so far.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

#[async_trait]
impl RevokedTokenRepository for InMemoryRevokedTokenRepository {
    async fn revoke(&self, token_hash: &str, expires_at: DateTime<Utc>) -> Result<(), AppError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.records
            .lock()
            .unwrap()
            .entry(token_hash.to_string())
            .or_insert(expires_at);
        Ok(())
    }

    async fn is_revoked(&self, token_hash: &str) -> Result<bool, AppError> {
        Ok(self.records.lock().unwrap().contains_key(token_hash))
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<RevokedToken>, AppError> {
        let records = self.records.lock().unwrap();
        Ok(records
            .iter()
            .take(limit as usize)
            .enumerate()
            .map(|(i, (hash, expires_at))| RevokedToken {
                id: i as i64 + 1,
                token_hash: hash.clone(),
                expires_at: *expires_at,
                revoked_at: Utc::now(),
            })
            .collect())
    }

    async fn purge_expired(&self) -> Result<u64, AppError> {
        let now = Utc::now();
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|_, expires_at| *expires_at > now);
        Ok((before - records.len()) as u64)
    }
}

/// User store whose every call fails as if the database were down.
pub struct UnavailableUserRepository;

#[async_trait]
impl UserRepository for UnavailableUserRepository {
    async fn create(&self, _new_user: NewUser) -> Result<User, AppError> {
        Err(unavailable())
    }

    async fn find_by_email(&self, _email: &str) -> Result<Option<User>, AppError> {
        Err(unavailable())
    }

    async fn find_credentials_by_email(
        &self,
        _email: &str,
    ) -> Result<Option<UserCredentials>, AppError> {
        Err(unavailable())
    }

    async fn find_by_id(&self, _id: i64) -> Result<Option<User>, AppError> {
        Err(unavailable())
    }

    async fn list(&self, _limit: i64, _offset: i64) -> Result<Vec<User>, AppError> {
        Err(unavailable())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Err(unavailable())
    }
}

fn unavailable() -> AppError {
    AppError::internal("Database error: connection refused (os error 111) at 10.0.0.5:5432")
}

pub fn token_config() -> TokenConfig {
    TokenConfig {
        secret: TEST_SECRET.to_string(),
        ttl_seconds: 3600,
        issuer: TEST_ISSUER.to_string(),
    }
}

pub fn token_service() -> TokenService {
    TokenService::new(token_config())
}

/// Argon2 with minimal cost so tests stay fast.
pub fn password_service() -> PasswordService {
    PasswordService::with_params(8, 1, 1).unwrap()
}

pub fn create_state(
    users: Arc<dyn UserRepository>,
    revoked_tokens: Arc<dyn RevokedTokenRepository>,
) -> AppState {
    let auth_service = AuthService::new(users, revoked_tokens, password_service(), token_service());
    AppState::new(Arc::new(auth_service))
}

/// State over fresh in-memory stores, returned alongside them for inspection.
pub fn create_test_state() -> (
    AppState,
    Arc<InMemoryUserRepository>,
    Arc<InMemoryRevokedTokenRepository>,
) {
    let users = Arc::new(InMemoryUserRepository::default());
    let revoked = Arc::new(InMemoryRevokedTokenRepository::default());
    let state = create_state(users.clone(), revoked.clone());
    (state, users, revoked)
}

/// The `/api` router as served, minus the per-IP rate limiter
/// (which needs a peer address the test transport does not provide).
pub fn api_router(state: AppState) -> Router {
    let protected = protected_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));

    Router::new()
        .nest("/api", public_routes().merge(protected))
        .with_state(state)
}
