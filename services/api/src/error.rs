//! Custom error types for the API service
//!
//! Every handler, middleware and repository failure funnels through
//! [`ApiError`], which owns the kind-to-status translation and renders the
//! uniform error envelope.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::response::ErrorEnvelope;

/// A single failing field in a validated request payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub path: String,
    pub message: String,
}

impl FieldError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Custom error type for the API service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Requested resource does not exist
    #[error("{0}")]
    NotFound(String),

    /// The request is well-formed but semantically invalid
    #[error("{0}")]
    Validation(String),

    /// A uniqueness constraint would be violated
    #[error("{0}")]
    AlreadyExists(String),

    /// A request payload failed schema validation
    #[error("Validation error")]
    Schema(Vec<FieldError>),

    /// Missing or expired credential
    #[error("{0}")]
    Unauthorized(String),

    /// Valid credential but insufficient authorities
    #[error("{0}")]
    Forbidden(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),

    /// Internal server error
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// HTTP status code for this error kind
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) | ApiError::Schema(_) => StatusCode::BAD_REQUEST,
            ApiError::AlreadyExists(_) => StatusCode::CONFLICT,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Database(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Details carried inside the error envelope: either a plain message or the
/// per-field list produced by schema validation
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ErrorDetails {
    Message(String),
    Fields(Vec<FieldError>),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let details = match self {
            ApiError::Schema(fields) => ErrorDetails::Fields(fields),
            ApiError::Database(ref e) => {
                // Server-side detail only; clients get a generic message
                error!("Database error: {}", e);
                ErrorDetails::Message("Internal Server Error".to_string())
            }
            ApiError::Internal(ref msg) => {
                error!("Unhandled error: {}", msg);
                ErrorDetails::Message("Internal Server Error".to_string())
            }
            other => ErrorDetails::Message(other.to_string()),
        };

        let body = ErrorEnvelope::new(status.as_u16(), details);

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        // Unique indexes are the authoritative uniqueness guard; a racing
        // insert that slipped past an application-level pre-check surfaces
        // here as a unique violation.
        if let Some(db_err) = err.as_database_error() {
            if db_err.code().as_deref() == Some("23505") {
                return ApiError::AlreadyExists("Resource already exists".to_string());
            }
        }
        ApiError::Database(err)
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::NotFound("missing".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Validation("bad".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::AlreadyExists("dup".into()).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::Schema(vec![FieldError::new("title", "title is required")]).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Unauthorized("no token".into()).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Forbidden("no authorities".into()).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::Internal("boom".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_details_serialization() {
        let details = ErrorDetails::Fields(vec![FieldError::new("location", "location is required")]);
        let json = serde_json::to_value(&details).unwrap();
        assert_eq!(json[0]["path"], "location");
        assert_eq!(json[0]["message"], "location is required");

        let details = ErrorDetails::Message("Resource not found".to_string());
        let json = serde_json::to_value(&details).unwrap();
        assert_eq!(json, "Resource not found");
    }
}
