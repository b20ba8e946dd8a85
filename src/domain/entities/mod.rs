//! Core domain entities.
//!
//! Entities are plain data structures. Creation inputs use separate structs
//! (`NewUser`) so that database-assigned fields never have to be faked.
//!
//! - [`User`] - A registered account, without its credential
//! - [`UserCredentials`] - A user plus password hash, loaded only for login
//! - [`RevokedToken`] - A logged-out access token

pub mod revoked_token;
pub mod user;

pub use revoked_token::RevokedToken;
pub use user::{FullName, NewUser, User, UserCredentials, normalize_email};
