//! Event enrollment payload validation

use serde_json::Value;

use crate::error::FieldError;
use crate::schemas::FromData;

/// Enrollment payload: whether the attendee wants event remainders
#[derive(Debug, Clone)]
pub struct EnrollPayload {
    pub remainders: bool,
}

impl FromData for EnrollPayload {
    fn from_data(value: &Value) -> Result<Self, Vec<FieldError>> {
        match value.get("remainders") {
            Some(raw) if !raw.is_null() => match raw.as_bool() {
                Some(remainders) => Ok(EnrollPayload { remainders }),
                None => Err(vec![FieldError::new(
                    "remainders",
                    "remainders must be a boolean",
                )]),
            },
            _ => Err(vec![FieldError::new(
                "remainders",
                "Parameter 'remainders' is required",
            )]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_enroll_payload() {
        assert!(EnrollPayload::from_data(&json!({"remainders": true})).unwrap().remainders);

        let errors = EnrollPayload::from_data(&json!({})).unwrap_err();
        assert_eq!(errors[0].message, "Parameter 'remainders' is required");

        let errors = EnrollPayload::from_data(&json!({"remainders": "yes"})).unwrap_err();
        assert_eq!(errors[0].message, "remainders must be a boolean");
    }
}
