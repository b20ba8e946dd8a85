//! Handler for user logout.

use axum::extract::State;
use axum_extra::extract::cookie::CookieJar;

use crate::api::dto::envelope::ApiResponse;
use crate::api::session::{SessionToken, session_cookie_removal};
use crate::error::AppError;
use crate::state::AppState;

/// Revokes the presented access token and clears the session cookie.
///
/// # Endpoint
///
/// `GET /api/users/logout` or `POST /api/users/logout`
///
/// # Token Source
///
/// The `token` cookie is checked first, then `Authorization: Bearer <token>`.
/// Without either, nothing is revoked but the response is still `200`.
///
/// # Errors
///
/// Returns `500` if the revocation cannot be stored.
pub async fn logout_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    SessionToken(token): SessionToken,
) -> Result<(CookieJar, ApiResponse<()>), AppError> {
    state.auth_service.logout(token.as_deref()).await?;

    let jar = jar.add(session_cookie_removal());

    Ok((jar, ApiResponse::message("Logout successful")))
}
