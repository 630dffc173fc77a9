//! GraphQL error shaping
//!
//! Repository errors surface through extensions as `{code, details}`.
//! Schema-validation failures expose their per-field list under
//! `BAD_USER_INPUT`; internal errors are logged server-side and reported
//! generically, never with a stack trace.

use async_graphql::ErrorExtensions;
use tracing::error;

use crate::error::ApiError;

impl ErrorExtensions for ApiError {
    fn extend(&self) -> async_graphql::Error {
        match self {
            ApiError::Schema(fields) => {
                let details = async_graphql::Value::from_json(
                    serde_json::to_value(fields).unwrap_or_default(),
                )
                .unwrap_or_default();

                async_graphql::Error::new("Validation error").extend_with(|_, e| {
                    e.set("code", "BAD_USER_INPUT");
                    e.set("details", details.clone());
                })
            }
            ApiError::Database(e) => {
                error!("Database error: {}", e);
                async_graphql::Error::new("Internal server error")
                    .extend_with(|_, e| e.set("code", "INTERNAL_SERVER_ERROR"))
            }
            ApiError::Internal(msg) => {
                error!("Unhandled error: {}", msg);
                async_graphql::Error::new("Internal server error")
                    .extend_with(|_, e| e.set("code", "INTERNAL_SERVER_ERROR"))
            }
            other => {
                let code = match other {
                    ApiError::NotFound(_) => "NOT_FOUND",
                    ApiError::Validation(_) => "BAD_USER_INPUT",
                    ApiError::AlreadyExists(_) => "ALREADY_EXISTS",
                    ApiError::Unauthorized(_) => "UNAUTHENTICATED",
                    ApiError::Forbidden(_) => "FORBIDDEN",
                    _ => "INTERNAL_SERVER_ERROR",
                };

                async_graphql::Error::new(other.to_string())
                    .extend_with(|_, e| e.set("code", code))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FieldError;

    fn extensions_json(err: &async_graphql::Error) -> serde_json::Value {
        serde_json::to_value(err.extensions.as_ref().expect("extensions should be set"))
            .expect("extensions should serialize")
    }

    #[test]
    fn test_schema_errors_carry_field_details() {
        let err = ApiError::Schema(vec![FieldError::new("location", "location is required")])
            .extend();

        assert_eq!(err.message, "Validation error");
        let extensions = extensions_json(&err);
        assert_eq!(extensions["code"], "BAD_USER_INPUT");
        assert_eq!(extensions["details"][0]["path"], "location");
        assert_eq!(extensions["details"][0]["message"], "location is required");
    }

    #[test]
    fn test_internal_errors_hide_detail() {
        let err = ApiError::Internal("secret stack trace".to_string()).extend();
        assert_eq!(err.message, "Internal server error");
        assert_eq!(extensions_json(&err)["code"], "INTERNAL_SERVER_ERROR");
    }

    #[test]
    fn test_kind_codes() {
        let err = ApiError::NotFound("Post with id x not found".to_string()).extend();
        assert_eq!(extensions_json(&err)["code"], "NOT_FOUND");
        assert_eq!(err.message, "Post with id x not found");
    }
}
