//! Post model: a tagged union over events, offers and news
//!
//! A post is a set of common fields plus variant-specific fields selected by
//! the `type` tag. Validation and persistence both branch on the tag; the
//! database stores the variants in one table with nullable columns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Variant-specific post fields, keyed by the `type` discriminator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PostDetails {
    Event {
        date: DateTime<Utc>,
        location: String,
        registration_link: String,
    },
    Offer {
        external_link: String,
        deadline: DateTime<Utc>,
    },
    News {
        author: String,
    },
}

impl PostDetails {
    /// Wire value of the `type` discriminator
    pub fn kind(&self) -> &'static str {
        match self {
            PostDetails::Event { .. } => "event",
            PostDetails::Offer { .. } => "offer",
            PostDetails::News { .. } => "news",
        }
    }
}

/// Post entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachments: Option<String>,
    pub images: Vec<String>,
    pub published_by: Uuid,
    pub organizer_id: Uuid,
    pub cities: Vec<String>,
    pub tags: Vec<String>,
    #[serde(flatten)]
    pub details: PostDetails,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New post creation payload; the publishing user is assigned by the
/// repository from the authenticated requester
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPost {
    pub title: String,
    pub description: String,
    pub attachments: Option<String>,
    pub images: Vec<String>,
    pub organizer_id: Uuid,
    pub cities: Vec<String>,
    pub tags: Vec<String>,
    #[serde(flatten)]
    pub details: PostDetails,
}

/// Partial post update; the tag, when present, only has to be a valid
/// discriminator
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PostUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub attachments: Option<String>,
    pub images: Option<Vec<String>>,
    pub cities: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub registration_link: Option<String>,
    pub external_link: Option<String>,
    pub deadline: Option<DateTime<Utc>>,
    pub author: Option<String>,
}

/// Flat database row backing [`Post`]
#[derive(Debug, Clone, FromRow)]
pub struct PostRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub kind: String,
    pub attachments: Option<String>,
    pub images: Vec<String>,
    pub published_by: Uuid,
    pub organizer_id: Uuid,
    pub cities: Vec<String>,
    pub tags: Vec<String>,
    pub date: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub registration_link: Option<String>,
    pub external_link: Option<String>,
    pub deadline: Option<DateTime<Utc>>,
    pub author: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<PostRow> for Post {
    type Error = crate::error::ApiError;

    fn try_from(row: PostRow) -> Result<Self, Self::Error> {
        let inconsistent = || {
            crate::error::ApiError::Internal(format!(
                "Post {} has inconsistent variant columns for type '{}'",
                row.id, row.kind
            ))
        };

        let details = match row.kind.as_str() {
            "event" => PostDetails::Event {
                date: row.date.ok_or_else(inconsistent)?,
                location: row.location.ok_or_else(inconsistent)?,
                registration_link: row.registration_link.ok_or_else(inconsistent)?,
            },
            "offer" => PostDetails::Offer {
                external_link: row.external_link.ok_or_else(inconsistent)?,
                deadline: row.deadline.ok_or_else(inconsistent)?,
            },
            "news" => PostDetails::News {
                author: row.author.ok_or_else(inconsistent)?,
            },
            _ => return Err(inconsistent()),
        };

        Ok(Post {
            id: row.id,
            title: row.title,
            description: row.description,
            attachments: row.attachments,
            images: row.images,
            published_by: row.published_by,
            organizer_id: row.organizer_id,
            cities: row.cities,
            tags: row.tags,
            details,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(kind: &str) -> PostRow {
        PostRow {
            id: Uuid::new_v4(),
            title: "Clean-up day".to_string(),
            description: "Neighbourhood clean-up".to_string(),
            kind: kind.to_string(),
            attachments: None,
            images: vec![],
            published_by: Uuid::new_v4(),
            organizer_id: Uuid::new_v4(),
            cities: vec!["Bogota".to_string()],
            tags: vec!["community".to_string()],
            date: Some(Utc::now()),
            location: Some("Central park".to_string()),
            registration_link: Some("https://example.org/signup".to_string()),
            external_link: Some("https://example.org".to_string()),
            deadline: Some(Utc::now()),
            author: Some("Ana".to_string()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_row_mapping_branches_on_kind() {
        let event = Post::try_from(row("event")).unwrap();
        assert!(matches!(event.details, PostDetails::Event { .. }));
        assert_eq!(event.details.kind(), "event");

        let offer = Post::try_from(row("offer")).unwrap();
        assert!(matches!(offer.details, PostDetails::Offer { .. }));

        let news = Post::try_from(row("news")).unwrap();
        assert!(matches!(news.details, PostDetails::News { .. }));
    }

    #[test]
    fn test_row_with_missing_variant_columns_fails() {
        let mut bad = row("event");
        bad.location = None;
        assert!(Post::try_from(bad).is_err());

        let mut unknown = row("banner");
        unknown.kind = "banner".to_string();
        assert!(Post::try_from(unknown).is_err());
    }

    #[test]
    fn test_post_serializes_with_type_tag() {
        let post = Post::try_from(row("news")).unwrap();
        let json = serde_json::to_value(&post).unwrap();

        assert_eq!(json["type"], "news");
        assert_eq!(json["author"], "Ana");
        assert!(json.get("date").is_none());
        assert!(json.get("password_hash").is_none());
    }

    #[test]
    fn test_details_round_trip_through_serde() {
        let details = PostDetails::Event {
            date: "2026-06-01T18:00:00Z".parse().unwrap(),
            location: "Main hall".to_string(),
            registration_link: "https://example.org/r".to_string(),
        };

        let json = serde_json::to_string(&details).unwrap();
        let back: PostDetails = serde_json::from_str(&json).unwrap();
        assert_eq!(back, details);
    }
}
