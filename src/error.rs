//! Application error type and its JSON envelope rendering.
//!
//! Every failure leaves the service as the same envelope shape used for
//! successful responses, with `success: false` and a stable `code` in `data`:
//!
//! ```json
//! {
//!   "success": false,
//!   "message": "Validation Error",
//!   "data": {
//!     "code": "validation_error",
//!     "errors": [{ "field": "email", "code": "email", "message": "Invalid Email" }]
//!   }
//! }
//! ```

use axum::{
    extract::rejection::JsonRejection,
    http::{HeaderValue, StatusCode, header::WWW_AUTHENTICATE},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use validator::ValidationErrors;

use crate::api::dto::envelope::Envelope;

/// Message returned for every unexpected failure. Internal details are logged only.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

/// A single structural validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub code: String,
    pub message: String,
}

/// Machine-readable part of an error envelope.
#[derive(Debug, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation Error")]
    Validation { errors: Vec<FieldError> },

    #[error("All fields are required")]
    MissingFields,

    #[error("{message}")]
    Conflict { message: String },

    #[error("{message}")]
    Unauthorized { message: String },

    #[error("internal error: {message}")]
    Internal { message: String },
}

impl AppError {
    pub fn validation(errors: Vec<FieldError>) -> Self {
        Self::Validation { errors }
    }

    pub fn missing_fields() -> Self {
        Self::MissingFields
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Stable identifier of the error kind, exposed to clients as `data.code`.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation_error",
            Self::MissingFields => "missing_fields",
            Self::Conflict { .. } => "duplicate_resource",
            Self::Unauthorized { .. } => "unauthorized",
            Self::Internal { .. } => "internal_error",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            // Duplicates are reported as a plain bad request.
            Self::Validation { .. } | Self::MissingFields | Self::Conflict { .. } => {
                StatusCode::BAD_REQUEST
            }
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to the client.
    pub fn public_message(&self) -> String {
        match self {
            Self::Internal { .. } => INTERNAL_ERROR_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }

    pub fn to_error_info(&self) -> ErrorInfo {
        let errors = match self {
            Self::Validation { errors } => Some(errors.clone()),
            _ => None,
        };

        ErrorInfo {
            code: self.code(),
            errors,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if let Self::Internal { message } = &self {
            tracing::error!(error = %message, "request failed with internal error");
        }

        let body = Envelope::failure(self.public_message(), self.to_error_info());
        let mut response = (status, axum::Json(body)).into_response();

        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }

        response
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut list: Vec<FieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, field_errors)| {
                field_errors.iter().map(move |e| FieldError {
                    field: field.to_string(),
                    code: e.code.to_string(),
                    message: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value for {field}")),
                })
            })
            .collect();

        // HashMap iteration order is unstable
        list.sort_by(|a, b| a.field.cmp(&b.field).then(a.code.cmp(&b.code)));

        AppError::validation(list)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::validation(vec![FieldError {
            field: "body".to_string(),
            code: "invalid_json".to_string(),
            message: rejection.body_text(),
        }])
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db) = e.as_database_error()
            && db.is_unique_violation()
        {
            return AppError::conflict(format!(
                "Unique constraint violation: {}",
                db.constraint().unwrap_or("unknown")
            ));
        }

        AppError::internal(format!("Database error: {e}"))
    }
}
