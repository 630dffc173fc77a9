//! Repositories for database operations
//!
//! Each entity repository owns persistence for its entity and holds only a
//! connection pool, so tests can substitute the pool. Existence and
//! uniqueness pre-checks are best-effort; the unique indexes created by the
//! migrations remain the authoritative guard.

use uuid::Uuid;

use crate::error::{ApiError, ApiResult};

pub mod attendee;
pub mod organization;
pub mod post;
pub mod user;

// Re-export for convenience
pub use attendee::AttendeeRepository;
pub use organization::OrganizationRepository;
pub use post::PostRepository;
pub use user::UserRepository;

/// Parse a path-supplied id, rejecting syntactically invalid ones
pub(crate) fn parse_id(raw: &str, entity: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ApiError::Validation(format!("Invalid {entity} ID")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        assert!(parse_id("7e0cf1fe-7e0c-4aa0-a721-3db262b7cbb8", "user").is_ok());

        match parse_id("not-a-uuid", "user") {
            Err(ApiError::Validation(msg)) => assert_eq!(msg, "Invalid user ID"),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
