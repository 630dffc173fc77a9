//! User management payload validation

use serde_json::Value;

use crate::error::FieldError;
use crate::models::{NewUser, UserUpdate};
use crate::schemas::{FromData, optional_string, optional_string_array};

use super::auth::{new_user_fields, validate_email, validate_password};

/// Admin user-creation payload: registration fields plus an optional
/// authority list
#[derive(Debug, Clone)]
pub struct CreateUserPayload {
    pub user: NewUser,
    pub authorities: Vec<String>,
}

impl FromData for CreateUserPayload {
    fn from_data(value: &Value) -> Result<Self, Vec<FieldError>> {
        let mut errors = vec![];

        let user = new_user_fields(value, &mut errors);
        let authorities = optional_string_array(value, "authorities", &mut errors);

        match user {
            Some(user) if errors.is_empty() => Ok(CreateUserPayload {
                user,
                authorities: authorities.unwrap_or_default(),
            }),
            _ => Err(errors),
        }
    }
}

impl FromData for UserUpdate {
    fn from_data(value: &Value) -> Result<Self, Vec<FieldError>> {
        let mut errors = vec![];

        let name = optional_string(value, "name", &mut errors);

        let email = optional_string(value, "email", &mut errors).and_then(|email| {
            match validate_email(&email) {
                Ok(()) => Some(email),
                Err(message) => {
                    errors.push(FieldError::new("email", message));
                    None
                }
            }
        });

        let password = optional_string(value, "password", &mut errors).and_then(|password| {
            match validate_password(&password) {
                Ok(()) => Some(password),
                Err(message) => {
                    errors.push(FieldError::new("password", message));
                    None
                }
            }
        });

        let authorities = optional_string_array(value, "authorities", &mut errors);

        if errors.is_empty() {
            Ok(UserUpdate {
                name,
                email,
                password,
                authorities,
            })
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_user_payload_with_authorities() {
        let value = json!({
            "name": "Ana",
            "email": "ana@example.org",
            "password": "Sup3rSecret",
            "authorities": ["admin"]
        });
        let payload = CreateUserPayload::from_data(&value).unwrap();
        assert_eq!(payload.authorities, vec!["admin".to_string()]);
    }

    #[test]
    fn test_user_update_accepts_partial_payloads() {
        let update = UserUpdate::from_data(&json!({"name": "Ana Maria"})).unwrap();
        assert_eq!(update.name.as_deref(), Some("Ana Maria"));
        assert!(update.email.is_none());
    }

    #[test]
    fn test_user_update_still_validates_present_fields() {
        let errors = UserUpdate::from_data(&json!({"email": "nope", "password": "weak"}))
            .unwrap_err();
        let paths: Vec<_> = errors.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["email", "password"]);
    }
}
