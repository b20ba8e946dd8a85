//! Application layer services implementing business logic.
//!
//! Services coordinate repository calls, credential handling and business
//! rules, and give HTTP handlers a small API to call into.
//!
//! # Available Services
//!
//! - [`services::auth_service::AuthService`] - Register, login, logout, token authentication
//! - [`services::password_service::PasswordService`] - Argon2id password hashing
//! - [`services::token_service::TokenService`] - JWT issuance and token fingerprints

pub mod services;
