//! Business logic services for the application layer.

pub mod auth_service;
pub mod password_service;
pub mod token_service;

pub use auth_service::{AuthService, RegisteredUser, Registration};
pub use password_service::PasswordService;
pub use token_service::{Claims, TokenConfig, TokenService};
