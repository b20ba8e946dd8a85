//! Access token authentication middleware.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::Response,
};

use crate::api::session::{CurrentUser, SessionToken};
use crate::application::services::auth_service::UNAUTHORIZED_MESSAGE;
use crate::{error::AppError, state::AppState};

/// Authenticates requests and attaches the user to the request.
///
/// # Token Sources
///
/// ```text
/// Cookie: token=<token>
/// Authorization: Bearer <token>
/// ```
///
/// The cookie wins when both are present.
///
/// # Authentication Flow
///
/// 1. Extract the token (cookie, then header)
/// 2. Verify signature, issuer and expiry
/// 3. Reject revoked tokens
/// 4. Load the user and insert [`CurrentUser`] into request extensions
/// 5. Continue to next middleware/handler
///
/// # Errors
///
/// Returns `401 Unauthorized` (with `WWW-Authenticate: Bearer`) if the token
/// is missing, invalid, expired, revoked, or its user no longer exists.
///
/// # Example
///
/// ```rust,ignore
/// use axum::{Router, routing::get, middleware};
/// use crate::api::middleware::auth;
///
/// let protected = Router::new()
///     .route("/users/profile", get(profile_handler))
///     .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));
/// ```
pub async fn layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let token = match SessionToken::from_request_parts(&mut parts, &st).await {
        Ok(SessionToken(token)) => token,
        Err(never) => match never {},
    };

    let token = token.ok_or_else(|| AppError::unauthorized(UNAUTHORIZED_MESSAGE))?;

    let user = st.auth_service.authenticate(&token).await?;
    parts.extensions.insert(CurrentUser(user));

    let req = Request::from_parts(parts, body);

    Ok(next.run(req).await)
}
