//! Access token transport: the `token` cookie and bearer header.

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};
use axum_auth::AuthBearer;
use axum_extra::extract::cookie::{Cookie, CookieJar};

use crate::domain::entities::User;
use crate::error::AppError;

/// Name of the cookie carrying the access token.
pub const TOKEN_COOKIE: &str = "token";

/// Builds the `HttpOnly; Secure` cookie set on login.
pub fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(true)
        .build()
}

/// Expired, empty cookie that clears the session cookie on logout.
///
/// Added to the jar unconditionally, so the `Set-Cookie` header is sent even
/// when the request carried no cookie. Path must match [`session_cookie`].
pub fn session_cookie_removal() -> Cookie<'static> {
    let mut cookie = Cookie::build(TOKEN_COOKIE)
        .path("/")
        .http_only(true)
        .secure(true)
        .build();
    cookie.make_removal();
    cookie
}

/// Access token presented by the client, if any.
///
/// Looks at the `token` cookie first, then at `Authorization: Bearer <token>`.
/// Empty values are treated as absent. Never rejects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken(pub Option<String>);

impl<S> FromRequestParts<S> for SessionToken
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);

        if let Some(cookie) = jar.get(TOKEN_COOKIE)
            && !cookie.value().is_empty()
        {
            return Ok(Self(Some(cookie.value().to_string())));
        }

        let bearer = AuthBearer::from_request_parts(parts, &())
            .await
            .ok()
            .map(|AuthBearer(token)| token)
            .filter(|token| !token.is_empty());

        Ok(Self(bearer))
    }
}

/// The authenticated user attached to the request by
/// [`crate::api::middleware::auth::layer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser(pub User);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<CurrentUser>().cloned().ok_or_else(|| {
            AppError::internal("authenticated user missing from request context")
        })
    }
}
