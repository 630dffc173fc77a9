//! GraphQL object types
//!
//! Event, Offer and News implement the `Post` interface and together form
//! the `PostResult` union; the concrete type is picked by the domain tag.

use async_graphql::{Context, ID, InputObject, Interface, Object, ResultExt, SimpleObject, Union};
use uuid::Uuid;

use crate::error::{ApiError, FieldError};
use crate::models as domain;
use crate::schemas;
use crate::state::AppState;

/// User as exposed over GraphQL
#[derive(Debug, Clone, SimpleObject)]
#[graphql(name = "User")]
pub struct User {
    pub id: ID,
    pub name: String,
    pub email: String,
    pub authorities: Vec<String>,
}

impl From<domain::User> for User {
    fn from(user: domain::User) -> Self {
        Self {
            id: ID(user.id.to_string()),
            name: user.name,
            email: user.email,
            authorities: user.authorities,
        }
    }
}

/// Authentication result: a session credential plus the user it belongs to
#[derive(Debug, Clone, SimpleObject)]
pub struct AuthPayload {
    pub token: String,
    pub user: User,
}

/// Fields common to every post kind
#[derive(Debug, Clone)]
pub struct PostCommon {
    pub id: ID,
    pub title: String,
    pub description: String,
    pub attachments: Option<String>,
    pub images: Vec<String>,
    pub publisher: Uuid,
    pub organizer_id: ID,
    pub cities: Vec<String>,
    pub tags: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl PostCommon {
    fn from_domain(post: &domain::Post) -> Self {
        Self {
            id: ID(post.id.to_string()),
            title: post.title.clone(),
            description: post.description.clone(),
            attachments: post.attachments.clone(),
            images: post.images.clone(),
            publisher: post.published_by,
            organizer_id: ID(post.organizer_id.to_string()),
            cities: post.cities.clone(),
            tags: post.tags.clone(),
            created_at: post.created_at.to_rfc3339(),
            updated_at: post.updated_at.to_rfc3339(),
        }
    }
}

async fn resolve_publisher(ctx: &Context<'_>, id: Uuid) -> async_graphql::Result<Option<User>> {
    let state = ctx.data_unchecked::<AppState>();
    let user = state.user_repository.find_by_uuid(id).await.extend()?;
    Ok(user.map(Into::into))
}

#[derive(Debug, Clone)]
pub struct Event {
    pub common: PostCommon,
    pub date: String,
    pub location: String,
    pub registration_link: String,
}

#[Object(rename_fields = "snake_case")]
impl Event {
    async fn id(&self) -> ID {
        self.common.id.clone()
    }

    async fn title(&self) -> String {
        self.common.title.clone()
    }

    async fn description(&self) -> String {
        self.common.description.clone()
    }

    #[graphql(name = "type")]
    async fn kind(&self) -> String {
        "event".to_string()
    }

    async fn attachments(&self) -> Option<String> {
        self.common.attachments.clone()
    }

    async fn images(&self) -> Vec<String> {
        self.common.images.clone()
    }

    /// The user who published this event
    async fn published_by(&self, ctx: &Context<'_>) -> async_graphql::Result<Option<User>> {
        resolve_publisher(ctx, self.common.publisher).await
    }

    async fn organizer_id(&self) -> ID {
        self.common.organizer_id.clone()
    }

    async fn cities(&self) -> Vec<String> {
        self.common.cities.clone()
    }

    async fn tags(&self) -> Vec<String> {
        self.common.tags.clone()
    }

    async fn date(&self) -> String {
        self.date.clone()
    }

    async fn location(&self) -> String {
        self.location.clone()
    }

    async fn registration_link(&self) -> String {
        self.registration_link.clone()
    }

    #[graphql(name = "createdAt")]
    async fn created_at(&self) -> String {
        self.common.created_at.clone()
    }

    #[graphql(name = "updatedAt")]
    async fn updated_at(&self) -> String {
        self.common.updated_at.clone()
    }
}

#[derive(Debug, Clone)]
pub struct Offer {
    pub common: PostCommon,
    pub external_link: String,
    pub deadline: String,
}

#[Object(rename_fields = "snake_case")]
impl Offer {
    async fn id(&self) -> ID {
        self.common.id.clone()
    }

    async fn title(&self) -> String {
        self.common.title.clone()
    }

    async fn description(&self) -> String {
        self.common.description.clone()
    }

    #[graphql(name = "type")]
    async fn kind(&self) -> String {
        "offer".to_string()
    }

    async fn attachments(&self) -> Option<String> {
        self.common.attachments.clone()
    }

    async fn images(&self) -> Vec<String> {
        self.common.images.clone()
    }

    /// The user who published this offer
    async fn published_by(&self, ctx: &Context<'_>) -> async_graphql::Result<Option<User>> {
        resolve_publisher(ctx, self.common.publisher).await
    }

    async fn organizer_id(&self) -> ID {
        self.common.organizer_id.clone()
    }

    async fn cities(&self) -> Vec<String> {
        self.common.cities.clone()
    }

    async fn tags(&self) -> Vec<String> {
        self.common.tags.clone()
    }

    async fn external_link(&self) -> String {
        self.external_link.clone()
    }

    async fn deadline(&self) -> String {
        self.deadline.clone()
    }

    #[graphql(name = "createdAt")]
    async fn created_at(&self) -> String {
        self.common.created_at.clone()
    }

    #[graphql(name = "updatedAt")]
    async fn updated_at(&self) -> String {
        self.common.updated_at.clone()
    }
}

#[derive(Debug, Clone)]
pub struct News {
    pub common: PostCommon,
    pub author: String,
}

#[Object(rename_fields = "snake_case")]
impl News {
    async fn id(&self) -> ID {
        self.common.id.clone()
    }

    async fn title(&self) -> String {
        self.common.title.clone()
    }

    async fn description(&self) -> String {
        self.common.description.clone()
    }

    #[graphql(name = "type")]
    async fn kind(&self) -> String {
        "news".to_string()
    }

    async fn attachments(&self) -> Option<String> {
        self.common.attachments.clone()
    }

    async fn images(&self) -> Vec<String> {
        self.common.images.clone()
    }

    /// The user who published this news item
    async fn published_by(&self, ctx: &Context<'_>) -> async_graphql::Result<Option<User>> {
        resolve_publisher(ctx, self.common.publisher).await
    }

    async fn organizer_id(&self) -> ID {
        self.common.organizer_id.clone()
    }

    async fn cities(&self) -> Vec<String> {
        self.common.cities.clone()
    }

    async fn tags(&self) -> Vec<String> {
        self.common.tags.clone()
    }

    async fn author(&self) -> String {
        self.author.clone()
    }

    #[graphql(name = "createdAt")]
    async fn created_at(&self) -> String {
        self.common.created_at.clone()
    }

    #[graphql(name = "updatedAt")]
    async fn updated_at(&self) -> String {
        self.common.updated_at.clone()
    }
}

/// Common shape shared by every post kind
#[derive(Interface)]
#[graphql(
    name = "Post",
    field(name = "id", ty = "ID"),
    field(name = "title", ty = "String"),
    field(name = "description", ty = "String"),
    field(name = "type", ty = "String", method = "kind"),
    field(name = "attachments", ty = "Option<String>"),
    field(name = "images", ty = "Vec<String>"),
    field(name = "organizer_id", ty = "ID"),
    field(name = "cities", ty = "Vec<String>"),
    field(name = "tags", ty = "Vec<String>"),
    field(name = "createdAt", ty = "String", method = "created_at"),
    field(name = "updatedAt", ty = "String", method = "updated_at")
)]
pub enum PostInterface {
    Event(Event),
    Offer(Offer),
    News(News),
}

/// A post of any kind, resolved to its concrete type by the tag
#[derive(Union)]
pub enum PostResult {
    Event(Event),
    Offer(Offer),
    News(News),
}

impl From<domain::Post> for PostResult {
    fn from(post: domain::Post) -> Self {
        let common = PostCommon::from_domain(&post);

        match post.details {
            domain::PostDetails::Event {
                date,
                location,
                registration_link,
            } => PostResult::Event(Event {
                common,
                date: date.to_rfc3339(),
                location,
                registration_link,
            }),
            domain::PostDetails::Offer {
                external_link,
                deadline,
            } => PostResult::Offer(Offer {
                common,
                external_link,
                deadline: deadline.to_rfc3339(),
            }),
            domain::PostDetails::News { author } => PostResult::News(News { common, author }),
        }
    }
}

/// Partial post update; the same union with every field optional
#[derive(Debug, Clone, InputObject)]
#[graphql(rename_fields = "snake_case")]
pub struct UpdatePostInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub attachments: Option<String>,
    pub images: Option<Vec<String>>,
    pub cities: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub date: Option<String>,
    pub location: Option<String>,
    pub registration_link: Option<String>,
    pub external_link: Option<String>,
    pub deadline: Option<String>,
    pub author: Option<String>,
}

impl UpdatePostInput {
    /// Coerce date-like strings and build the repository update payload
    pub fn into_update(self) -> Result<domain::PostUpdate, ApiError> {
        let mut errors = vec![];

        let date = coerce_date(self.date, "date", &mut errors);
        let deadline = coerce_date(self.deadline, "deadline", &mut errors);

        if !errors.is_empty() {
            return Err(ApiError::Schema(errors));
        }

        Ok(domain::PostUpdate {
            title: self.title,
            description: self.description,
            attachments: self.attachments,
            images: self.images,
            cities: self.cities,
            tags: self.tags,
            kind: None,
            date,
            location: self.location,
            registration_link: self.registration_link,
            external_link: self.external_link,
            deadline,
            author: self.author,
        })
    }
}

fn coerce_date(
    raw: Option<String>,
    field: &str,
    errors: &mut Vec<FieldError>,
) -> Option<chrono::DateTime<chrono::Utc>> {
    let raw = raw?;
    match schemas::parse_date(&raw) {
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
    use chrono::Utc;

    fn post(details: domain::PostDetails) -> domain::Post {
        domain::Post {
            id: Uuid::new_v4(),
            title: "T".to_string(),
            description: "D".to_string(),
            attachments: None,
            images: vec![],
            published_by: Uuid::new_v4(),
            organizer_id: Uuid::new_v4(),
            cities: vec!["X".to_string()],
            tags: vec!["y".to_string()],
            details,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_union_resolution_follows_the_tag() {
        let event = PostResult::from(post(domain::PostDetails::Event {
            date: Utc::now(),
            location: "Main hall".to_string(),
            registration_link: "https://example.org/r".to_string(),
        }));
        assert!(matches!(event, PostResult::Event(ref e) if e.location == "Main hall"));

        let news = PostResult::from(post(domain::PostDetails::News {
            author: "A".to_string(),
        }));
        assert!(matches!(news, PostResult::News(ref n) if n.author == "A"));
    }

    #[test]
    fn test_update_input_coerces_dates() {
        let input = UpdatePostInput {
            title: Some("New title".to_string()),
            description: None,
            attachments: None,
            images: None,
            cities: None,
            tags: None,
            date: Some("2026-06-01T18:00:00Z".to_string()),
            location: None,
            registration_link: None,
            external_link: None,
            deadline: None,
            author: None,
        };

        let update = input.into_update().unwrap();
        assert!(update.date.is_some());
        assert_eq!(update.title.as_deref(), Some("New title"));
    }

    #[test]
    fn test_update_input_rejects_bad_dates() {
        let input = UpdatePostInput {
            title: None,
            description: None,
            attachments: None,
            images: None,
            cities: None,
            tags: None,
            date: None,
            location: None,
            registration_link: None,
            external_link: None,
            deadline: Some("soon".to_string()),
            author: None,
        };

        match input.into_update() {
            Err(ApiError::Schema(errors)) => assert_eq!(errors[0].path, "deadline"),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
