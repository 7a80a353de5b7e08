//! Authentication request/response models
//!
//! Request bodies carry their own validation rules; the messages produced
//! here are the exact strings returned on the wire, collected in field
//! order by [`collect_messages`].

use crate::db::models::PublicUser;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

/// Register request body
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(custom(function = validate_name))]
    pub name: String,
    #[validate(email(message = "Valid email required"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be 8+ characters"))]
    pub password: String,
    #[validate(must_match(other = password, message = "Passwords don't match"))]
    #[serde(rename = "confirmPassword")]
    pub confirm_password: String,
}

/// Login request body
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Valid email required"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be 8+ characters"))]
    pub password: String,
}

/// Success envelope for register and login responses
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub success: bool,
    pub user: PublicUser,
}

/// Generic success response (logout)
#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Lowercase an email address so matching is case-insensitive
pub fn normalize_email(email: &str) -> String {
    email.to_lowercase()
}

// Names are measured after trimming, which the length validator cannot do.
fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().chars().count() < 2 {
        let mut error = ValidationError::new("length");
        error.message = Some("Name too short".into());
        return Err(error);
    }
    Ok(())
}

/// Field order for validation messages on the wire
const FIELD_ORDER: [&str; 4] = ["name", "email", "password", "confirm_password"];

/// Flatten validation failures into their wire messages, in field order
pub fn collect_messages(errors: &ValidationErrors) -> Vec<String> {
    let field_errors = errors.field_errors();
    let mut messages = Vec::new();

    for field in FIELD_ORDER {
        if let Some(errs) = field_errors.get(field) {
            for error in errs.iter() {
                if let Some(message) = &error.message {
                    messages.push(message.to_string());
                }
            }
        }
    }

    messages
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(name: &str, email: &str, password: &str, confirm: &str) -> RegisterRequest {
        RegisterRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            confirm_password: confirm.to_string(),
        }
    }

    #[test]
    fn test_valid_register_request() {
        let req = register("Alice", "alice@test.com", "Password123!", "Password123!");
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_all_messages_in_field_order() {
        let req = register("A", "not-an-email", "short", "different");
        let errors = req.validate().unwrap_err();

        assert_eq!(
            collect_messages(&errors),
            vec![
                "Name too short",
                "Valid email required",
                "Password must be 8+ characters",
                "Passwords don't match",
            ]
        );
    }

    #[test]
    fn test_name_is_trimmed_before_length_check() {
        let req = register("  a  ", "alice@test.com", "Password123!", "Password123!");
        let errors = req.validate().unwrap_err();

        assert_eq!(collect_messages(&errors), vec!["Name too short"]);
    }

    #[test]
    fn test_password_mismatch_detected() {
        let req = register("Alice", "alice@test.com", "Password123!", "Password123?");
        let errors = req.validate().unwrap_err();

        assert_eq!(collect_messages(&errors), vec!["Passwords don't match"]);
    }

    #[test]
    fn test_login_short_password() {
        let req = LoginRequest {
            email: "alice@test.com".to_string(),
            password: "short".to_string(),
        };
        let errors = req.validate().unwrap_err();

        assert_eq!(
            collect_messages(&errors),
            vec!["Password must be 8+ characters"]
        );
    }

    #[test]
    fn test_confirm_password_uses_camel_case_on_the_wire() {
        let req: RegisterRequest = serde_json::from_value(serde_json::json!({
            "name": "Alice",
            "email": "alice@test.com",
            "password": "Password123!",
            "confirmPassword": "Password123!",
        }))
        .unwrap();

        assert_eq!(req.confirm_password, "Password123!");
    }

    #[test]
    fn test_normalize_email_lowercases() {
        assert_eq!(normalize_email("ALICE@TEST.com"), "alice@test.com");
        assert_eq!(normalize_email("a@b.com"), "a@b.com");
    }
}
