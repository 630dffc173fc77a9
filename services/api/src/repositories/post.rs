//! Post repository for database operations
//!
//! The three post variants share one table; persistence branches on the
//! `type` tag to fill the variant columns and the row mapping branches back.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::{NewPost, Post, PostDetails, PostRow, PostUpdate};
use crate::repositories::parse_id;

const POST_COLUMNS: &str = "id, title, description, kind, attachments, images, published_by, \
     organizer_id, cities, tags, date, location, registration_link, external_link, deadline, \
     author, created_at, updated_at";

/// Post repository
#[derive(Clone)]
pub struct PostRepository {
    pool: PgPool,
}

impl PostRepository {
    /// Create a new post repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new post, assigning the publishing user
    pub async fn create(&self, post: &NewPost, published_by: Uuid) -> ApiResult<Post> {
        info!("Creating {} post: {}", post.details.kind(), post.title);

        // Best-effort publisher check
        let publisher_exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
                .bind(published_by)
                .fetch_one(&self.pool)
                .await?;

        if !publisher_exists {
            return Err(ApiError::Validation(
                "User with that id does not exist".to_string(),
            ));
        }

        let (date, location, registration_link, external_link, deadline, author) =
            variant_columns(&post.details);

        let row = sqlx::query_as::<_, PostRow>(&format!(
            r#"
            INSERT INTO posts (title, description, kind, attachments, images, published_by,
                               organizer_id, cities, tags, date, location, registration_link,
                               external_link, deadline, author)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING {POST_COLUMNS}
            "#
        ))
        .bind(&post.title)
        .bind(&post.description)
        .bind(post.details.kind())
        .bind(&post.attachments)
        .bind(&post.images)
        .bind(published_by)
        .bind(post.organizer_id)
        .bind(&post.cities)
        .bind(&post.tags)
        .bind(date)
        .bind(location)
        .bind(registration_link)
        .bind(external_link)
        .bind(deadline)
        .bind(author)
        .fetch_one(&self.pool)
        .await?;

        Post::try_from(row)
    }

    /// Get all posts, optionally filtered by kind and/or publishing user
    pub async fn find_all(
        &self,
        kind: Option<&str>,
        published_by: Option<Uuid>,
    ) -> ApiResult<Vec<Post>> {
        let rows = sqlx::query_as::<_, PostRow>(&format!(
            r#"
            SELECT {POST_COLUMNS}
            FROM posts
            WHERE ($1::text IS NULL OR kind = $1)
              AND ($2::uuid IS NULL OR published_by = $2)
            ORDER BY created_at DESC
            "#
        ))
        .bind(kind)
        .bind(published_by)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Post::try_from).collect()
    }

    /// Find a post by id
    pub async fn find_by_id(&self, id: &str) -> ApiResult<Post> {
        let id = parse_id(id, "post")?;

        let row = sqlx::query_as::<_, PostRow>(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Post with id {id} not found")))?;

        Post::try_from(row)
    }

    /// Find a post that users can enroll into; only events qualify
    pub async fn get_attendable_by_id(&self, id: &str) -> ApiResult<Post> {
        let post = self.find_by_id(id).await?;

        match post.details {
            PostDetails::Event { .. } => Ok(post),
            _ => Err(ApiError::Validation(
                "Post must be an enrollable event".to_string(),
            )),
        }
    }

    /// Partially update a post and return the fresh row
    pub async fn update_by_id(&self, id: &str, update: &PostUpdate) -> ApiResult<Post> {
        let id = parse_id(id, "post")?;

        let row = sqlx::query_as::<_, PostRow>(&format!(
            r#"
            UPDATE posts
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                kind = COALESCE($4, kind),
                attachments = COALESCE($5, attachments),
                images = COALESCE($6, images),
                cities = COALESCE($7, cities),
                tags = COALESCE($8, tags),
                date = COALESCE($9, date),
                location = COALESCE($10, location),
                registration_link = COALESCE($11, registration_link),
                external_link = COALESCE($12, external_link),
                deadline = COALESCE($13, deadline),
                author = COALESCE($14, author),
                updated_at = now()
            WHERE id = $1
            RETURNING {POST_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&update.title)
        .bind(&update.description)
        .bind(&update.kind)
        .bind(&update.attachments)
        .bind(&update.images)
        .bind(&update.cities)
        .bind(&update.tags)
        .bind(update.date)
        .bind(&update.location)
        .bind(&update.registration_link)
        .bind(&update.external_link)
        .bind(update.deadline)
        .bind(&update.author)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Post with id {id} not found")))?;

        Post::try_from(row)
    }

    /// Delete a post by id
    pub async fn delete_by_id(&self, id: &str) -> ApiResult<()> {
        let id = parse_id(id, "post")?;

        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound(format!("Post with id {id} not found")));
        }

        Ok(())
    }
}

type VariantColumns = (
    Option<DateTime<Utc>>,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<DateTime<Utc>>,
    Option<String>,
);

/// Spread the tagged details over the nullable variant columns
fn variant_columns(details: &PostDetails) -> VariantColumns {
    match details {
        PostDetails::Event {
            date,
            location,
            registration_link,
        } => (
            Some(*date),
            Some(location.clone()),
            Some(registration_link.clone()),
            None,
            None,
            None,
        ),
        PostDetails::Offer {
            external_link,
            deadline,
        } => (None, None, None, Some(external_link.clone()), Some(*deadline), None),
        PostDetails::News { author } => (None, None, None, None, None, Some(author.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_columns_spread() {
        let (date, location, link, external, deadline, author) =
            variant_columns(&PostDetails::News {
                author: "Ana".to_string(),
            });
        assert!(date.is_none() && location.is_none() && link.is_none());
        assert!(external.is_none() && deadline.is_none());
        assert_eq!(author.as_deref(), Some("Ana"));

        let (date, location, link, external, deadline, author) =
            variant_columns(&PostDetails::Event {
                date: "2026-06-01T18:00:00Z".parse().unwrap(),
                location: "Main hall".to_string(),
                registration_link: "https://example.org/r".to_string(),
            });
        assert!(date.is_some() && location.is_some() && link.is_some());
        assert!(external.is_none() && deadline.is_none() && author.is_none());
    }
}
