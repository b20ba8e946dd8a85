//! HTTP request handlers for API endpoints.

pub mod health;
pub mod login;
pub mod logout;
pub mod profile;
pub mod register;

pub use health::health_handler;
pub use login::login_handler;
pub use logout::logout_handler;
pub use profile::profile_handler;
pub use register::register_handler;
