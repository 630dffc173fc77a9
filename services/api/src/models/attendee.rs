//! Attendee model: a (user, event) enrollment record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::Post;

/// Enrollment of a user into an event post; unique per (user, event) pair
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Attendee {
    pub user_id: Uuid,
    pub event_id: Uuid,
    pub remainders: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An enrollment joined with its event, as returned to the enrolled user
#[derive(Debug, Clone, Serialize)]
pub struct Enrollment {
    pub event: Post,
    pub remainders: bool,
}
