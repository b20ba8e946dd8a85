//! Handler for user login.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use axum_extra::extract::cookie::CookieJar;
use validator::Validate;

use crate::api::dto::auth::{LoginRequest, TokenData};
use crate::api::dto::envelope::ApiResponse;
use crate::api::session::session_cookie;
use crate::error::AppError;
use crate::state::AppState;

/// Exchanges email and password for an access token.
///
/// # Endpoint
///
/// `POST /api/users/login`
///
/// # Request Body
///
/// ```json
/// { "email": "ada@example.com", "password": "analytical" }
/// ```
///
/// # Response
///
/// `200 OK`, with the token both in the body and in a
/// `token=<jwt>; HttpOnly; Secure; Path=/` cookie.
///
/// ```json
/// { "success": true, "message": "Login successful", "data": { "token": "eyJhbGciOi..." } }
/// ```
///
/// # Errors
///
/// - `400` on validation failures or missing fields
/// - `401` "Invalid email or password" for an unknown email or a wrong password
/// - `500` on store failures
pub async fn login_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<(CookieJar, ApiResponse<TokenData>), AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let (email, password) = payload.into_credentials()?;

    let token = state.auth_service.login(&email, &password).await?;

    let jar = jar.add(session_cookie(token.clone()));

    Ok((jar, ApiResponse::ok("Login successful", TokenData { token })))
}
