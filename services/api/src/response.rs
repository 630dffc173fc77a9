//! Uniform response envelopes for mutation endpoints
//!
//! Successful mutations answer with `{success, message, data, timestamp,
//! version}` where `data` carries the affected resource and the operation
//! timestamp; errors answer with `{success: false, message: "Error", error:
//! {code, details}, timestamp, version}`. Read endpoints return plain
//! resources.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::ErrorDetails;

/// Version stamped onto every envelope
pub const API_VERSION: &str = "1.0.0";

/// Envelope shared by all mutation responses
#[derive(Debug, Serialize)]
pub struct Envelope<D> {
    pub success: bool,
    pub message: String,
    pub data: D,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

/// Payload of a creation response
#[derive(Debug, Serialize)]
pub struct CreationData<T> {
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    pub resource: T,
}

/// Payload of an update response
#[derive(Debug, Serialize)]
pub struct UpdateData<T> {
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
    pub resource: T,
}

/// Payload of a deletion response
#[derive(Debug, Serialize)]
pub struct DeletionData {
    #[serde(rename = "deletedAt")]
    pub deleted_at: DateTime<Utc>,
}

/// Envelope for a freshly created resource
pub fn creation<T: Serialize>(resource: T) -> Envelope<CreationData<T>> {
    Envelope {
        success: true,
        message: "Resource created".to_string(),
        data: CreationData {
            created_at: Utc::now(),
            resource,
        },
        timestamp: Utc::now(),
        version: API_VERSION.to_string(),
    }
}

/// Envelope for an updated resource
pub fn update<T: Serialize>(resource: T) -> Envelope<UpdateData<T>> {
    Envelope {
        success: true,
        message: "Resource updated".to_string(),
        data: UpdateData {
            updated_at: Utc::now(),
            resource,
        },
        timestamp: Utc::now(),
        version: API_VERSION.to_string(),
    }
}

/// Envelope for a deleted resource
pub fn deletion() -> Envelope<DeletionData> {
    Envelope {
        success: true,
        message: "Resource deleted".to_string(),
        data: DeletionData {
            deleted_at: Utc::now(),
        },
        timestamp: Utc::now(),
        version: API_VERSION.to_string(),
    }
}

/// Error body carried by [`ErrorEnvelope`]
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: u16,
    pub details: ErrorDetails,
}

/// Envelope for error responses
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub message: String,
    pub error: ErrorBody,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl ErrorEnvelope {
    pub fn new(code: u16, details: ErrorDetails) -> Self {
        Self {
            success: false,
            message: "Error".to_string(),
            error: ErrorBody { code, details },
            timestamp: Utc::now(),
            version: API_VERSION.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creation_envelope_shape() {
        let envelope = creation(serde_json::json!({"name": "Agora"}));
        let json = serde_json::to_value(&envelope).unwrap();

        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "Resource created");
        assert_eq!(json["version"], "1.0.0");
        assert_eq!(json["data"]["resource"]["name"], "Agora");
        assert!(json["data"]["createdAt"].is_string());
        assert!(json["timestamp"].is_string());
    }

    #[test]
    fn test_update_envelope_shape() {
        let envelope = update(serde_json::json!({"id": 1}));
        let json = serde_json::to_value(&envelope).unwrap();

        assert_eq!(json["message"], "Resource updated");
        assert!(json["data"]["updatedAt"].is_string());
        assert_eq!(json["data"]["resource"]["id"], 1);
    }

    #[test]
    fn test_deletion_envelope_shape() {
        let envelope = deletion();
        let json = serde_json::to_value(&envelope).unwrap();

        assert_eq!(json["message"], "Resource deleted");
        assert!(json["data"]["deletedAt"].is_string());
        assert!(json["data"].get("resource").is_none());
    }

    #[test]
    fn test_error_envelope_shape() {
        let envelope = ErrorEnvelope::new(404, crate::error::ErrorDetails::Message(
            "Resource not found".to_string(),
        ));
        let json = serde_json::to_value(&envelope).unwrap();

        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Error");
        assert_eq!(json["error"]["code"], 404);
        assert_eq!(json["error"]["details"], "Resource not found");
        assert_eq!(json["version"], "1.0.0");
    }
}
