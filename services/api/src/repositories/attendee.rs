//! Attendee repository: event enrollment bookkeeping

use sqlx::{PgPool, Row};
use tracing::info;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::{Attendee, Enrollment, Post, PostRow, User};

/// Attendee repository
#[derive(Clone)]
pub struct AttendeeRepository {
    pool: PgPool,
}

impl AttendeeRepository {
    /// Create a new attendee repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Check whether a user is enrolled in an event
    pub async fn is_enrolled(&self, user_id: Uuid, event_id: Uuid) -> ApiResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM attendees WHERE user_id = $1 AND event_id = $2)",
        )
        .bind(user_id)
        .bind(event_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// Enroll a user into an event; a user enrolls in a given event at most
    /// once
    pub async fn enroll(
        &self,
        user_id: Uuid,
        event_id: Uuid,
        remainders: bool,
    ) -> ApiResult<Attendee> {
        info!("Enrolling user {} into event {}", user_id, event_id);

        if self.is_enrolled(user_id, event_id).await? {
            return Err(ApiError::AlreadyExists(
                "The user is already enrolled into this event".to_string(),
            ));
        }

        let attendee = sqlx::query_as::<_, Attendee>(
            r#"
            INSERT INTO attendees (user_id, event_id, remainders)
            VALUES ($1, $2, $3)
            RETURNING user_id, event_id, remainders, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(event_id)
        .bind(remainders)
        .fetch_one(&self.pool)
        .await?;

        Ok(attendee)
    }

    /// Cancel a user's enrollment in an event
    pub async fn cancel_enrollment(&self, user_id: Uuid, event_id: Uuid) -> ApiResult<()> {
        let result =
            sqlx::query("DELETE FROM attendees WHERE user_id = $1 AND event_id = $2")
                .bind(user_id)
                .bind(event_id)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("Enrollment not found".to_string()));
        }

        Ok(())
    }

    /// All users enrolled in an event
    pub async fn enrolled_users(&self, event_id: Uuid) -> ApiResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT u.id, u.name, u.email, u.password_hash, u.authorities,
                   u.created_at, u.updated_at
            FROM attendees a
            JOIN users u ON u.id = a.user_id
            WHERE a.event_id = $1
            ORDER BY a.created_at
            "#,
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// All events a user is enrolled in, with the remainders flag
    pub async fn enrollments_for_user(&self, user_id: Uuid) -> ApiResult<Vec<Enrollment>> {
        let rows = sqlx::query(
            r#"
            SELECT p.id, p.title, p.description, p.kind, p.attachments, p.images,
                   p.published_by, p.organizer_id, p.cities, p.tags, p.date, p.location,
                   p.registration_link, p.external_link, p.deadline, p.author,
                   p.created_at, p.updated_at,
                   a.remainders
            FROM attendees a
            JOIN posts p ON p.id = a.event_id
            WHERE a.user_id = $1
            ORDER BY a.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                let remainders: bool = row.get("remainders");
                let post = Post::try_from(PostRow {
                    id: row.get("id"),
                    title: row.get("title"),
                    description: row.get("description"),
                    kind: row.get("kind"),
                    attachments: row.get("attachments"),
                    images: row.get("images"),
                    published_by: row.get("published_by"),
                    organizer_id: row.get("organizer_id"),
                    cities: row.get("cities"),
                    tags: row.get("tags"),
                    date: row.get("date"),
                    location: row.get("location"),
                    registration_link: row.get("registration_link"),
                    external_link: row.get("external_link"),
                    deadline: row.get("deadline"),
                    author: row.get("author"),
                    created_at: row.get("created_at"),
                    updated_at: row.get("updated_at"),
                })?;

                Ok(Enrollment {
                    event: post,
                    remainders,
                })
            })
            .collect()
    }
}
