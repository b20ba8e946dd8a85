//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx.
//!
//! # Repositories
//!
//! - [`PgUserRepository`] - User accounts and credentials
//! - [`PgRevokedTokenRepository`] - Token blacklist

pub mod pg_revoked_token_repository;
pub mod pg_user_repository;

pub use pg_revoked_token_repository::PgRevokedTokenRepository;
pub use pg_user_repository::PgUserRepository;
