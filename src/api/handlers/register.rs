//! Handler for user registration.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use validator::Validate;

use crate::api::dto::auth::{RegisterData, RegisterRequest};
use crate::api::dto::envelope::ApiResponse;
use crate::application::services::RegisteredUser;
use crate::error::AppError;
use crate::state::AppState;

/// Registers a new user account.
///
/// # Endpoint
///
/// `POST /api/users/register`
///
/// # Request Body
///
/// ```json
/// {
///   "firstName": "Ada",
///   "lastName": "Lovelace",
///   "email": "ada@example.com",
///   "password": "analytical"
/// }
/// ```
///
/// # Response
///
/// `201 Created`
///
/// ```json
/// {
///   "success": true,
///   "message": "User registered successfully",
///   "data": {
///     "user": { "id": 1, "fullName": { "firstName": "Ada", "lastName": "Lovelace" }, "email": "ada@example.com", ... },
///     "token": "eyJhbGciOi..."
///   }
/// }
/// ```
///
/// # Errors
///
/// - `400` "Validation Error" when a field is malformed
/// - `400` "All fields are required" when `firstName`, `email` or `password` is missing
/// - `400` "User already exist" when the email is taken
/// - `500` on store failures
pub async fn register_handler(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<ApiResponse<RegisterData>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let registration = payload.into_registration()?;

    let RegisteredUser { user, token } = state.auth_service.register(registration).await?;

    Ok(ApiResponse::created(
        "User registered successfully",
        RegisterData { user, token },
    ))
}
