//! Registration and login payload validation

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

use crate::error::FieldError;
use crate::models::NewUser;
use crate::schemas::{FromData, require_string_with};

/// Validate email format
pub fn validate_email(email: &str) -> Result<(), String> {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err("Invalid email".to_string());
    }

    Ok(())
}

/// Validate password strength: at least 8 characters with an uppercase
/// letter, a lowercase letter and a digit; specials limited to @ $ ! % * ? & #
pub fn validate_password(password: &str) -> Result<(), String> {
    const POLICY: &str = "Password must contain at least 8 characters, one uppercase letter, \
         one lowercase letter, and one number. Valid special characters: @ $ ! % * ? & #";

    if password.len() < 8 {
        return Err(POLICY.to_string());
    }

    let mut has_upper = false;
    let mut has_lower = false;
    let mut has_digit = false;

    for c in password.chars() {
        if c.is_ascii_uppercase() {
            has_upper = true;
        } else if c.is_ascii_lowercase() {
            has_lower = true;
        } else if c.is_ascii_digit() {
            has_digit = true;
        } else if !"@$!%*?&#".contains(c) {
            return Err(POLICY.to_string());
        }
    }

    if !has_upper || !has_lower || !has_digit {
        return Err(POLICY.to_string());
    }

    Ok(())
}

/// Shared field extraction for payloads that carry new-user data
pub(crate) fn new_user_fields(value: &Value, errors: &mut Vec<FieldError>) -> Option<NewUser> {
    let name = require_string_with(value, "name", "Name is required", errors);

    let email = require_string_with(value, "email", "Email is required", errors).and_then(|email| {
        match validate_email(&email) {
            Ok(()) => Some(email),
            Err(message) => {
                errors.push(FieldError::new("email", message));
                None
            }
        }
    });

    let password = require_string_with(value, "password", "Password is required", errors)
        .and_then(|password| match validate_password(&password) {
            Ok(()) => Some(password),
            Err(message) => {
                errors.push(FieldError::new("password", message));
                None
            }
        });

    match (name, email, password) {
        (Some(name), Some(email), Some(password)) => Some(NewUser {
            name,
            email,
            password,
        }),
        _ => None,
    }
}

impl FromData for NewUser {
    fn from_data(value: &Value) -> Result<Self, Vec<FieldError>> {
        let mut errors = vec![];
        match new_user_fields(value, &mut errors) {
            Some(user) if errors.is_empty() => Ok(user),
            _ => Err(errors),
        }
    }
}

/// Login payload: presence only, no format rules
#[derive(Debug, Clone)]
pub struct LoginPayload {
    pub email: String,
    pub password: String,
}

impl FromData for LoginPayload {
    fn from_data(value: &Value) -> Result<Self, Vec<FieldError>> {
        let mut errors = vec![];
        let email = require_string_with(value, "email", "Email is required", &mut errors);
        let password = require_string_with(value, "password", "Password is required", &mut errors);

        match (email, password) {
            (Some(email), Some(password)) if errors.is_empty() => {
                Ok(LoginPayload { email, password })
            }
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validate_password_policy() {
        assert!(validate_password("Sup3rSecret").is_ok());
        assert!(validate_password("S3cret!?").is_ok());

        // too short
        assert!(validate_password("S3cret").is_err());
        // missing uppercase
        assert!(validate_password("sup3rsecret").is_err());
        // missing lowercase
        assert!(validate_password("SUP3RSECRET").is_err());
        // missing digit
        assert!(validate_password("SuperSecret").is_err());
        // disallowed special character
        assert!(validate_password("Sup3rSecret^").is_err());
    }

    #[test]
    fn test_validate_email_format() {
        assert!(validate_email("ana@example.org").is_ok());
        assert!(validate_email("ana.maria+tag@sub.example.org").is_ok());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("missing@tld").is_err());
    }

    #[test]
    fn test_register_payload_valid() {
        let value = json!({
            "name": "Ana",
            "email": "ana@example.org",
            "password": "Sup3rSecret"
        });
        let user = NewUser::from_data(&value).unwrap();
        assert_eq!(user.email, "ana@example.org");
    }

    #[test]
    fn test_register_payload_collects_field_errors() {
        let value = json!({"email": "nope", "password": "short"});
        let errors = NewUser::from_data(&value).unwrap_err();

        let paths: Vec<_> = errors.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["name", "email", "password"]);
        assert_eq!(errors[0].message, "Name is required");
        assert_eq!(errors[1].message, "Invalid email");
    }

    #[test]
    fn test_login_payload_requires_both_fields() {
        let errors = LoginPayload::from_data(&json!({})).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].message, "Email is required");
        assert_eq!(errors[1].message, "Password is required");
    }
}
