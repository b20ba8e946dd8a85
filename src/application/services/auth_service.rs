//! Account service: registration, login, logout and token authentication.

use std::sync::Arc;

use crate::application::services::password_service::PasswordService;
use crate::application::services::token_service::TokenService;
use crate::domain::entities::{NewUser, User, normalize_email};
use crate::domain::repositories::{RevokedTokenRepository, UserRepository};
use crate::error::AppError;

/// Message for a registration that reuses an existing email.
pub const USER_EXISTS_MESSAGE: &str = "User already exist";

/// Message for every failed login. Never says which part was wrong.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid email or password";

/// Message for requests whose access token cannot be accepted.
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized";

/// Validated registration input. All required fields are non-empty.
#[derive(Debug, Clone)]
pub struct Registration {
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: String,
    pub password: String,
}

/// Result of a successful registration.
#[derive(Debug, Clone)]
pub struct RegisteredUser {
    pub user: User,
    pub token: String,
}

/// Orchestrates the account flows on top of the user and revoked-token stores.
///
/// Stores are injected as trait objects so tests can substitute fakes.
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    revoked_tokens: Arc<dyn RevokedTokenRepository>,
    passwords: PasswordService,
    tokens: TokenService,
}

impl AuthService {
    /// Creates a new account service.
    pub fn new(
        users: Arc<dyn UserRepository>,
        revoked_tokens: Arc<dyn RevokedTokenRepository>,
        passwords: PasswordService,
        tokens: TokenService,
    ) -> Self {
        Self {
            users,
            revoked_tokens,
            passwords,
            tokens,
        }
    }

    /// Registers a new user and issues an access token.
    ///
    /// The email lookup is only a fast path: the store's unique constraint is
    /// authoritative, and a conflict on insert yields the same error.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the email is already registered.
    /// Returns [`AppError::Internal`] on store, hashing or signing failures.
    pub async fn register(&self, registration: Registration) -> Result<RegisteredUser, AppError> {
        let email = normalize_email(&registration.email);

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict(USER_EXISTS_MESSAGE));
        }

        let password_hash = self.passwords.hash(registration.password).await?;

        let new_user = NewUser {
            first_name: registration.first_name,
            last_name: registration.last_name,
            email,
            password_hash,
        };

        let user = self.users.create(new_user).await.map_err(|e| match e {
            AppError::Conflict { .. } => AppError::conflict(USER_EXISTS_MESSAGE),
            other => other,
        })?;

        let token = self.tokens.issue(&user)?;

        tracing::info!(user_id = user.id, "user registered");

        Ok(RegisteredUser { user, token })
    }

    /// Checks credentials and issues an access token.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] with the same message whether the
    /// email is unknown or the password is wrong. Both paths run one Argon2
    /// verification.
    /// Returns [`AppError::Internal`] on store, hashing or signing failures.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, AppError> {
        let email = normalize_email(email);

        let Some(credentials) = self.users.find_credentials_by_email(&email).await? else {
            self.passwords.verify_decoy(password.to_string()).await?;
            tracing::debug!("login rejected: unknown email");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS_MESSAGE));
        };

        let matches = self
            .passwords
            .verify(password.to_string(), credentials.password_hash)
            .await?;

        if !matches {
            tracing::debug!(user_id = credentials.user.id, "login rejected: wrong password");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS_MESSAGE));
        }

        let token = self.tokens.issue(&credentials.user)?;

        tracing::info!(user_id = credentials.user.id, "user logged in");

        Ok(token)
    }

    /// Revokes `token` if one was presented.
    ///
    /// Returns `true` when a revocation record was written. Without a token
    /// nothing is written.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the revoked-token store fails.
    pub async fn logout(&self, token: Option<&str>) -> Result<bool, AppError> {
        let Some(token) = token.filter(|t| !t.is_empty()) else {
            tracing::debug!("logout without token, nothing to revoke");
            return Ok(false);
        };

        let token_hash = self.tokens.fingerprint(token);
        let expires_at = self.tokens.revocation_expiry(token);

        self.revoked_tokens.revoke(&token_hash, expires_at).await?;

        tracing::info!("access token revoked");

        Ok(true)
    }

    /// Resolves the user behind an access token.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the token is invalid, expired,
    /// revoked, or belongs to a user that no longer exists.
    /// Returns [`AppError::Internal`] on store failures.
    pub async fn authenticate(&self, token: &str) -> Result<User, AppError> {
        let claims = self.tokens.verify(token).map_err(|e| {
            tracing::debug!(reason = %e, "token rejected");
            AppError::unauthorized(UNAUTHORIZED_MESSAGE)
        })?;

        let token_hash = self.tokens.fingerprint(token);
        if self.revoked_tokens.is_revoked(&token_hash).await? {
            tracing::debug!("token rejected: revoked");
            return Err(AppError::unauthorized(UNAUTHORIZED_MESSAGE));
        }

        let user_id = claims
            .user_id()
            .ok_or_else(|| AppError::unauthorized(UNAUTHORIZED_MESSAGE))?;

        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::unauthorized(UNAUTHORIZED_MESSAGE))
    }

    /// Checks that the user store is reachable.
    pub async fn health_check(&self) -> Result<(), AppError> {
        self.users.ping().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::token_service::TokenConfig;
    use crate::domain::entities::{FullName, UserCredentials};
    use crate::domain::repositories::{MockRevokedTokenRepository, MockUserRepository};
    use chrono::Utc;

    fn token_service() -> TokenService {
        TokenService::new(TokenConfig {
            secret: "test-signing-secret-with-enough-bytes!".to_string(),
            ttl_seconds: 3600,
            issuer: "user-accounts".to_string(),
        })
    }

    fn password_service() -> PasswordService {
        PasswordService::with_params(8, 1, 1).unwrap()
    }

    fn service(users: MockUserRepository, revoked: MockRevokedTokenRepository) -> AuthService {
        AuthService::new(
            Arc::new(users),
            Arc::new(revoked),
            password_service(),
            token_service(),
        )
    }

    fn create_test_user(id: i64, email: &str) -> User {
        User::new(
            id,
            FullName {
                first_name: "Test".to_string(),
                last_name: Some("User".to_string()),
            },
            email.to_string(),
            Utc::now(),
            Utc::now(),
        )
    }

    fn registration(email: &str) -> Registration {
        Registration {
            first_name: "Test".to_string(),
            last_name: Some("User".to_string()),
            email: email.to_string(),
            password: "password123".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_success() {
        let mut users = MockUserRepository::new();

        users
            .expect_find_by_email()
            .withf(|email| email == "new@example.com")
            .times(1)
            .returning(|_| Ok(None));

        users
            .expect_create()
            .withf(|new_user| {
                new_user.email == "new@example.com"
                    && new_user.password_hash.starts_with("$argon2id$")
                    && new_user.password_hash != "password123"
            })
            .times(1)
            .returning(|new_user| Ok(create_test_user(1, &new_user.email)));

        let service = service(users, MockRevokedTokenRepository::new());

        let result = service
            .register(registration("  New@Example.com "))
            .await
            .unwrap();

        assert_eq!(result.user.id, 1);
        assert!(!result.token.is_empty());
        assert_eq!(
            token_service().verify(&result.token).unwrap().user_id(),
            Some(1)
        );
    }

    #[tokio::test]
    async fn test_register_existing_email() {
        let mut users = MockUserRepository::new();

        users
            .expect_find_by_email()
            .times(1)
            .returning(|email| Ok(Some(create_test_user(1, email))));
        users.expect_create().never();

        let service = service(users, MockRevokedTokenRepository::new());

        let err = service
            .register(registration("taken@example.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict { .. }));
        assert_eq!(err.to_string(), USER_EXISTS_MESSAGE);
    }

    #[tokio::test]
    async fn test_register_conflict_on_insert() {
        let mut users = MockUserRepository::new();

        users.expect_find_by_email().returning(|_| Ok(None));
        users
            .expect_create()
            .times(1)
            .returning(|_| Err(AppError::conflict("Unique constraint violation: users_email_key")));

        let service = service(users, MockRevokedTokenRepository::new());

        let err = service
            .register(registration("race@example.com"))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), USER_EXISTS_MESSAGE);
    }

    #[tokio::test]
    async fn test_register_store_failure() {
        let mut users = MockUserRepository::new();

        users
            .expect_find_by_email()
            .returning(|_| Err(AppError::internal("connection reset")));

        let service = service(users, MockRevokedTokenRepository::new());

        let err = service
            .register(registration("x@example.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Internal { .. }));
    }

    async fn credentials_for(email: &str, password: &str) -> UserCredentials {
        UserCredentials {
            user: create_test_user(5, email),
            password_hash: password_service().hash(password.to_string()).await.unwrap(),
        }
    }

    #[tokio::test]
    async fn test_login_success() {
        let credentials = credentials_for("a@example.com", "correct-horse").await;
        let mut users = MockUserRepository::new();

        users
            .expect_find_credentials_by_email()
            .withf(|email| email == "a@example.com")
            .times(1)
            .returning(move |_| Ok(Some(credentials.clone())));

        let service = service(users, MockRevokedTokenRepository::new());

        let token = service
            .login("A@example.com", "correct-horse")
            .await
            .unwrap();

        assert_eq!(token_service().verify(&token).unwrap().user_id(), Some(5));
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let credentials = credentials_for("a@example.com", "correct-horse").await;
        let mut users = MockUserRepository::new();

        users
            .expect_find_credentials_by_email()
            .returning(move |email| {
                if email == "a@example.com" {
                    Ok(Some(credentials.clone()))
                } else {
                    Ok(None)
                }
            });

        let service = service(users, MockRevokedTokenRepository::new());

        let wrong_password = service
            .login("a@example.com", "wrong-horse")
            .await
            .unwrap_err();
        let unknown_email = service
            .login("nobody@example.com", "correct-horse")
            .await
            .unwrap_err();

        assert!(matches!(wrong_password, AppError::Unauthorized { .. }));
        assert!(matches!(unknown_email, AppError::Unauthorized { .. }));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
        assert_eq!(wrong_password.to_string(), INVALID_CREDENTIALS_MESSAGE);
    }

    #[tokio::test]
    async fn test_login_verifies_password_for_unknown_email() {
        let credentials = credentials_for("a@example.com", "correct-horse").await;
        let mut users = MockUserRepository::new();

        users
            .expect_find_credentials_by_email()
            .returning(move |email| {
                if email == "a@example.com" {
                    Ok(Some(credentials.clone()))
                } else {
                    Ok(None)
                }
            });

        let passwords = password_service();
        let service = AuthService::new(
            Arc::new(users),
            Arc::new(MockRevokedTokenRepository::new()),
            passwords.clone(),
            token_service(),
        );

        service
            .login("nobody@example.com", "correct-horse")
            .await
            .unwrap_err();
        assert_eq!(passwords.verifications(), 1);

        service
            .login("a@example.com", "wrong-horse")
            .await
            .unwrap_err();
        assert_eq!(passwords.verifications(), 2);
    }

    #[tokio::test]
    async fn test_logout_with_token_revokes_fingerprint() {
        let tokens = token_service();
        let token = tokens.issue(&create_test_user(3, "c@example.com")).unwrap();
        let expected_hash = tokens.fingerprint(&token);

        let mut revoked = MockRevokedTokenRepository::new();
        revoked
            .expect_revoke()
            .withf(move |hash, _| hash == expected_hash)
            .times(1)
            .returning(|_, _| Ok(()));

        let service = service(MockUserRepository::new(), revoked);

        assert!(service.logout(Some(&token)).await.unwrap());
    }

    #[tokio::test]
    async fn test_logout_without_token_skips_write() {
        let mut revoked = MockRevokedTokenRepository::new();
        revoked.expect_revoke().never();

        let service = service(MockUserRepository::new(), revoked);

        assert!(!service.logout(None).await.unwrap());
        assert!(!service.logout(Some("")).await.unwrap());
    }

    #[tokio::test]
    async fn test_logout_store_failure() {
        let mut revoked = MockRevokedTokenRepository::new();
        revoked
            .expect_revoke()
            .returning(|_, _| Err(AppError::internal("disk full")));

        let service = service(MockUserRepository::new(), revoked);

        let err = service.logout(Some("some-token")).await.unwrap_err();
        assert!(matches!(err, AppError::Internal { .. }));
    }

    #[tokio::test]
    async fn test_authenticate_success() {
        let user = create_test_user(9, "me@example.com");
        let token = token_service().issue(&user).unwrap();

        let mut users = MockUserRepository::new();
        let found = user.clone();
        users
            .expect_find_by_id()
            .withf(|id| *id == 9)
            .times(1)
            .returning(move |_| Ok(Some(found.clone())));

        let mut revoked = MockRevokedTokenRepository::new();
        revoked.expect_is_revoked().returning(|_| Ok(false));

        let service = service(users, revoked);

        assert_eq!(service.authenticate(&token).await.unwrap(), user);
    }

    #[tokio::test]
    async fn test_authenticate_revoked_token() {
        let token = token_service()
            .issue(&create_test_user(9, "me@example.com"))
            .unwrap();

        let mut users = MockUserRepository::new();
        users.expect_find_by_id().never();

        let mut revoked = MockRevokedTokenRepository::new();
        revoked.expect_is_revoked().returning(|_| Ok(true));

        let service = service(users, revoked);

        let err = service.authenticate(&token).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized { .. }));
    }

    #[tokio::test]
    async fn test_authenticate_invalid_token() {
        let mut revoked = MockRevokedTokenRepository::new();
        revoked.expect_is_revoked().never();

        let service = service(MockUserRepository::new(), revoked);

        let err = service.authenticate("garbage").await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized { .. }));
    }

    #[tokio::test]
    async fn test_authenticate_deleted_user() {
        let token = token_service()
            .issue(&create_test_user(9, "gone@example.com"))
            .unwrap();

        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(|_| Ok(None));

        let mut revoked = MockRevokedTokenRepository::new();
        revoked.expect_is_revoked().returning(|_| Ok(false));

        let service = service(users, revoked);

        let err = service.authenticate(&token).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized { .. }));
    }
}
