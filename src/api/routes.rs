//! API route configuration.
//!
//! Account endpoints live under `/users`. Only the profile requires an
//! access token; it is guarded by [`crate::api::middleware::auth`].

use crate::api::handlers::{login_handler, logout_handler, profile_handler, register_handler};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Routes reachable without an access token.
///
/// # Endpoints
///
/// - `POST /users/register`      - Create an account and return a token
/// - `POST /users/login`         - Exchange credentials for a token and session cookie
/// - `GET|POST /users/logout`    - Revoke the presented token and clear the cookie
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/users/register", post(register_handler))
        .route("/users/login", post(login_handler))
        .route("/users/logout", get(logout_handler).post(logout_handler))
}

/// Routes that require an authenticated caller.
///
/// # Endpoints
///
/// - `GET /users/profile` - The authenticated user's account
pub fn protected_routes() -> Router<AppState> {
    Router::new().route("/users/profile", get(profile_handler))
}
