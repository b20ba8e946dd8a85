//! DTOs for the account endpoints.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::application::services::Registration;
use crate::domain::entities::User;
use crate::error::AppError;

/// Registration request body.
///
/// Fields are optional at the type level so that an absent field reaches the
/// required-field check instead of failing JSON decoding. Renames are per
/// field so validation errors report the wire name.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(rename = "firstName")]
    #[validate(length(min = 3, message = "First name must be at least 3 characters long"))]
    pub first_name: Option<String>,

    #[serde(rename = "lastName")]
    pub last_name: Option<String>,

    #[validate(email(message = "Invalid Email"))]
    pub email: Option<String>,

    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    pub password: Option<String>,
}

impl RegisterRequest {
    /// Checks required fields and converts into service input.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::MissingFields`] if `firstName`, `email` or
    /// `password` is absent or empty. `lastName` is optional.
    pub fn into_registration(self) -> Result<Registration, AppError> {
        let (Some(first_name), Some(email), Some(password)) = (
            required_text(self.first_name),
            required_text(self.email),
            required_secret(self.password),
        ) else {
            return Err(AppError::missing_fields());
        };

        Ok(Registration {
            first_name,
            last_name: required_text(self.last_name),
            email,
            password,
        })
    }
}

/// Login request body.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(email(message = "Invalid Email"))]
    pub email: Option<String>,

    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    pub password: Option<String>,
}

impl LoginRequest {
    /// Returns `(email, password)` once both are present.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::MissingFields`] if either field is absent or empty.
    pub fn into_credentials(self) -> Result<(String, String), AppError> {
        match (required_text(self.email), required_secret(self.password)) {
            (Some(email), Some(password)) => Ok((email, password)),
            _ => Err(AppError::missing_fields()),
        }
    }
}

/// Trimmed value, or `None` when absent or blank.
fn required_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Passwords are taken verbatim; only the empty string counts as missing.
fn required_secret(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// `data` of a successful registration.
#[derive(Debug, Serialize)]
pub struct RegisterData {
    pub user: User,
    pub token: String,
}

/// `data` of a successful login.
#[derive(Debug, Serialize)]
pub struct TokenData {
    pub token: String,
}

/// `data` of the profile endpoint.
#[derive(Debug, Serialize)]
pub struct ProfileData {
    pub user: User,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register_request() -> RegisterRequest {
        RegisterRequest {
            first_name: Some("Alice".to_string()),
            last_name: Some("Smith".to_string()),
            email: Some("alice@example.com".to_string()),
            password: Some("secret123".to_string()),
        }
    }

    #[test]
    fn test_register_request_deserializes_camel_case() {
        let request: RegisterRequest = serde_json::from_str(
            r#"{"firstName":"Alice","lastName":"Smith","email":"a@b.io","password":"secret1"}"#,
        )
        .unwrap();

        assert_eq!(request.first_name.as_deref(), Some("Alice"));
        assert_eq!(request.last_name.as_deref(), Some("Smith"));
    }

    #[test]
    fn test_register_request_missing_fields_deserialize_as_none() {
        let request: RegisterRequest = serde_json::from_str(r#"{"email":"a@b.io"}"#).unwrap();

        assert!(request.first_name.is_none());
        assert!(request.password.is_none());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_register_request_valid() {
        let request = register_request();
        assert!(request.validate().is_ok());

        let registration = request.into_registration().unwrap();
        assert_eq!(registration.first_name, "Alice");
        assert_eq!(registration.last_name.as_deref(), Some("Smith"));
    }

    #[test]
    fn test_register_request_validation_rules() {
        let request = RegisterRequest {
            first_name: Some("Al".to_string()),
            email: Some("not-an-email".to_string()),
            password: Some("123".to_string()),
            ..register_request()
        };

        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();

        assert_eq!(fields.len(), 3);
        assert!(fields.contains_key("firstName"));
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
    }

    #[test]
    fn test_register_request_last_name_optional() {
        let request = RegisterRequest {
            last_name: None,
            ..register_request()
        };

        let registration = request.into_registration().unwrap();
        assert!(registration.last_name.is_none());
    }

    #[test]
    fn test_register_request_blank_last_name_dropped() {
        let request = RegisterRequest {
            last_name: Some("   ".to_string()),
            ..register_request()
        };

        assert!(request.into_registration().unwrap().last_name.is_none());
    }

    #[test]
    fn test_register_request_missing_required() {
        for request in [
            RegisterRequest {
                first_name: None,
                ..register_request()
            },
            RegisterRequest {
                email: Some("   ".to_string()),
                ..register_request()
            },
            RegisterRequest {
                password: Some(String::new()),
                ..register_request()
            },
        ] {
            let err = request.into_registration().unwrap_err();
            assert!(matches!(err, AppError::MissingFields));
        }
    }

    #[test]
    fn test_login_request() {
        let request = LoginRequest {
            email: Some(" bob@example.com ".to_string()),
            password: Some("hunter22".to_string()),
        };

        assert_eq!(
            request.into_credentials().unwrap(),
            ("bob@example.com".to_string(), "hunter22".to_string())
        );
    }

    #[test]
    fn test_login_request_missing_password() {
        let request = LoginRequest {
            email: Some("bob@example.com".to_string()),
            password: None,
        };

        assert!(matches!(
            request.into_credentials(),
            Err(AppError::MissingFields)
        ));
    }
}
