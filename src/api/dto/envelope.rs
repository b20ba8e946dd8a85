//! Uniform response envelope shared by every endpoint.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::error::ErrorInfo;

/// JSON body returned by every handler.
///
/// ```json
/// { "success": true, "message": "Login successful", "data": { "token": "..." } }
/// ```
///
/// `data` is omitted entirely when there is nothing to return.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn success(message: impl Into<String>, data: Option<T>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
        }
    }
}

impl Envelope<ErrorInfo> {
    pub fn failure(message: impl Into<String>, info: ErrorInfo) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: Some(info),
        }
    }
}

/// Successful handler result: status code plus envelope.
///
/// Errors travel separately as [`crate::error::AppError`], which renders the
/// same envelope with `success: false`.
#[derive(Debug)]
pub struct ApiResponse<T> {
    status: StatusCode,
    body: Envelope<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// `200 OK` with a data payload.
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            status: StatusCode::OK,
            body: Envelope::success(message, Some(data)),
        }
    }

    /// `201 Created` with a data payload.
    pub fn created(message: impl Into<String>, data: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            body: Envelope::success(message, Some(data)),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn body(&self) -> &Envelope<T> {
        &self.body
    }
}

impl ApiResponse<()> {
    /// `200 OK` without a data payload.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::OK,
            body: Envelope::success(message, None),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
