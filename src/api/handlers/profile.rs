//! Handler for the authenticated user's profile.

use crate::api::dto::auth::ProfileData;
use crate::api::dto::envelope::ApiResponse;
use crate::api::session::CurrentUser;

/// Returns the user attached by the authentication middleware, unchanged.
///
/// # Endpoint
///
/// `GET /api/users/profile`
///
/// # Authentication
///
/// Requires [`crate::api::middleware::auth::layer`].
pub async fn profile_handler(CurrentUser(user): CurrentUser) -> ApiResponse<ProfileData> {
    ApiResponse::ok("Profile fetched successfully", ProfileData { user })
}
