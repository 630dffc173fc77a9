//! Request payload validation
//!
//! REST bodies arrive enveloped as `{"data": <payload>}`. The [`ValidData`]
//! extractor unwraps the envelope and validates the payload before the
//! handler runs; failures answer 400 with a structured per-field list.

use axum::{
    Json, async_trait,
    extract::{FromRequest, Request},
};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde_json::Value;

use crate::error::{ApiError, FieldError};

pub mod attendee;
pub mod auth;
pub mod organization;
pub mod post;
pub mod user;

/// Payload types that can validate themselves out of a raw JSON value
pub trait FromData: Sized {
    fn from_data(value: &Value) -> Result<Self, Vec<FieldError>>;
}

/// Extractor that unwraps the `{"data": …}` envelope and validates the
/// payload
pub struct ValidData<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidData<T>
where
    S: Send + Sync,
    T: FromData + Send,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|e| ApiError::Validation(e.to_string()))?;

        let data = body
            .get("data")
            .filter(|v| !v.is_null())
            .ok_or_else(|| ApiError::Schema(vec![FieldError::new("data", "data is required")]))?;

        T::from_data(data).map(ValidData).map_err(ApiError::Schema)
    }
}

/// Treat JSON null the same as an absent field
fn get<'a>(value: &'a Value, field: &str) -> Option<&'a Value> {
    value.get(field).filter(|v| !v.is_null())
}

pub(crate) fn require_string(
    value: &Value,
    field: &str,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    require_string_with(value, field, &format!("{field} is required"), errors)
}

pub(crate) fn require_string_with(
    value: &Value,
    field: &str,
    required_message: &str,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    match get(value, field) {
        None => {
            errors.push(FieldError::new(field, required_message));
            None
        }
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            errors.push(FieldError::new(field, format!("{field} must be a string")));
            None
        }
    }
}

pub(crate) fn optional_string(
    value: &Value,
    field: &str,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    match get(value, field) {
        None => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            errors.push(FieldError::new(field, format!("{field} must be a string")));
            None
        }
    }
}

fn string_array(
    raw: &Value,
    field: &str,
    errors: &mut Vec<FieldError>,
) -> Option<Vec<String>> {
    let Some(items) = raw.as_array() else {
        errors.push(FieldError::new(
            field,
            format!("{field} must be an array of strings"),
        ));
        return None;
    };

    let mut out = Vec::with_capacity(items.len());
    for item in items {
        match item.as_str() {
            Some(s) => out.push(s.to_string()),
            None => {
                errors.push(FieldError::new(
                    field,
                    format!("{field} must be an array of strings"),
                ));
                return None;
            }
        }
    }
    Some(out)
}

pub(crate) fn require_string_array(
    value: &Value,
    field: &str,
    errors: &mut Vec<FieldError>,
) -> Option<Vec<String>> {
    match get(value, field) {
        None => {
            errors.push(FieldError::new(field, format!("{field} is required")));
            None
        }
        Some(raw) => string_array(raw, field, errors),
    }
}

pub(crate) fn optional_string_array(
    value: &Value,
    field: &str,
    errors: &mut Vec<FieldError>,
) -> Option<Vec<String>> {
    match get(value, field) {
        None => None,
        Some(raw) => string_array(raw, field, errors),
    }
}

/// Coerce a date-like string into a UTC timestamp; accepts RFC 3339 or a
/// plain `YYYY-MM-DD` date
pub(crate) fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN).and_utc())
}

pub(crate) fn require_date(
    value: &Value,
    field: &str,
    errors: &mut Vec<FieldError>,
) -> Option<DateTime<Utc>> {
    let raw = require_string(value, field, errors)?;
    match parse_date(&raw) {
        Some(date) => Some(date),
        None => {
            errors.push(FieldError::new(field, format!("{field} is not a valid date")));
            None
        }
    }
}

pub(crate) fn optional_date(
    value: &Value,
    field: &str,
    errors: &mut Vec<FieldError>,
) -> Option<DateTime<Utc>> {
    let raw = optional_string(value, field, errors)?;
    match parse_date(&raw) {
        Some(date) => Some(date),
        None => {
            errors.push(FieldError::new(field, format!("{field} is not a valid date")));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_require_string_collects_errors() {
        let mut errors = vec![];
        let value = json!({"title": 42});

        assert!(require_string(&value, "title", &mut errors).is_none());
        assert!(require_string(&value, "description", &mut errors).is_none());

        assert_eq!(errors[0], FieldError::new("title", "title must be a string"));
        assert_eq!(
            errors[1],
            FieldError::new("description", "description is required")
        );
    }

    #[test]
    fn test_null_counts_as_missing() {
        let mut errors = vec![];
        let value = json!({"title": null});
        assert!(require_string(&value, "title", &mut errors).is_none());
        assert_eq!(errors[0].message, "title is required");
    }

    #[test]
    fn test_string_array_rejects_mixed_items() {
        let mut errors = vec![];
        let value = json!({"cities": ["X", 3]});
        assert!(require_string_array(&value, "cities", &mut errors).is_none());
        assert_eq!(errors[0].message, "cities must be an array of strings");
    }

    #[test]
    fn test_parse_date_accepts_rfc3339_and_plain_dates() {
        assert!(parse_date("2026-06-01T18:00:00Z").is_some());
        assert!(parse_date("2026-06-01T18:00:00-05:00").is_some());
        assert!(parse_date("2026-06-01").is_some());
        assert!(parse_date("next tuesday").is_none());
        assert!(parse_date("2026-13-40").is_none());
    }
}
