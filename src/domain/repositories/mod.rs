//! Repository trait definitions for the domain layer.
//!
//! Traits define the contract for data operations; implementations live in
//! `crate::infrastructure::persistence`. Mock implementations are generated
//! via `mockall` for unit tests.
//!
//! # Available Repositories
//!
//! - [`UserRepository`] - User accounts and credentials
//! - [`RevokedTokenRepository`] - Logged-out access tokens
//!
//! # Testing
//!
//! See integration tests in `tests/repository_*.rs` for usage examples.

pub mod revoked_token_repository;
pub mod user_repository;

pub use revoked_token_repository::RevokedTokenRepository;
pub use user_repository::UserRepository;

#[cfg(test)]
pub use revoked_token_repository::MockRevokedTokenRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
