//! GraphQL mutations
//!
//! The register/login mutations issue short-lived session credentials, as
//! opposed to the 30-day tokens handed out by the REST login flow.

use async_graphql::{Context, ErrorExtensions, ID, Object, ResultExt};
use uuid::Uuid;

use crate::error::{ApiError, FieldError};
use crate::models as domain;
use crate::schemas;
use crate::state::AppState;

use super::guards;
use super::models::{AuthPayload, Event, News, Offer, PostResult, UpdatePostInput, User};

pub struct Mutation;

#[Object(rename_args = "snake_case")]
impl Mutation {
    /// Register a new account and log it in
    async fn register(
        &self,
        ctx: &Context<'_>,
        name: String,
        email: String,
        password: String,
    ) -> async_graphql::Result<AuthPayload> {
        let state = ctx.data_unchecked::<AppState>();

        let user = state
            .user_repository
            .create(
                &domain::NewUser {
                    name,
                    email,
                    password,
                },
                &[],
            )
            .await
            .extend()?;

        let token = state
            .jwt_service
            .issue_session(user.id, &user.authorities)
            .map_err(|e| ApiError::Internal(e.to_string()).extend())?;

        Ok(AuthPayload {
            token,
            user: user.into(),
        })
    }

    /// Log in and receive a session credential
    async fn login(
        &self,
        ctx: &Context<'_>,
        email: String,
        password: String,
    ) -> async_graphql::Result<AuthPayload> {
        let state = ctx.data_unchecked::<AppState>();

        let user = state
            .user_repository
            .find_by_email(&email)
            .await
            .extend()?
            .ok_or_else(|| {
                ApiError::NotFound("User with that email does not exist".to_string()).extend()
            })?;

        if !state
            .user_repository
            .verify_password(&user, &password)
            .map_err(|e| e.extend())?
        {
            return Err(ApiError::Validation("Incorrect password".to_string()).extend());
        }

        let token = state
            .jwt_service
            .issue_session(user.id, &user.authorities)
            .map_err(|e| ApiError::Internal(e.to_string()).extend())?;

        Ok(AuthPayload {
            token,
            user: user.into(),
        })
    }

    /// Create a user, optionally with authorities; admin only
    async fn create_user(
        &self,
        ctx: &Context<'_>,
        name: String,
        email: String,
        password: String,
        authorities: Option<Vec<String>>,
    ) -> async_graphql::Result<User> {
        guards::require_authority(ctx, &["admin"])?;
        let state = ctx.data_unchecked::<AppState>();

        let user = state
            .user_repository
            .create(
                &domain::NewUser {
                    name,
                    email,
                    password,
                },
                &authorities.unwrap_or_default(),
            )
            .await
            .extend()?;

        Ok(user.into())
    }

    /// Partially update a user; admin only
    async fn update_user(
        &self,
        ctx: &Context<'_>,
        id: ID,
        name: Option<String>,
        email: Option<String>,
        password: Option<String>,
        authorities: Option<Vec<String>>,
    ) -> async_graphql::Result<User> {
        guards::require_authority(ctx, &["admin"])?;
        let state = ctx.data_unchecked::<AppState>();

        let user = state
            .user_repository
            .update(
                id.as_str(),
                &domain::UserUpdate {
                    name,
                    email,
                    password,
                    authorities,
                },
            )
            .await
            .extend()?;

        Ok(user.into())
    }

    /// Delete a user; admin only, self-deletion is rejected
    async fn delete_user(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<bool> {
        let auth = guards::require_authority(ctx, &["admin"])?;
        let state = ctx.data_unchecked::<AppState>();

        state
            .user_repository
            .delete_by_id(auth.id, id.as_str())
            .await
            .extend()?;

        Ok(true)
    }

    /// Create an event post; admin only
    async fn create_event(
        &self,
        ctx: &Context<'_>,
        title: String,
        description: String,
        attachments: Option<String>,
        images: Option<Vec<String>>,
        organizer_id: ID,
        cities: Vec<String>,
        tags: Vec<String>,
        date: String,
        location: String,
        registration_link: String,
    ) -> async_graphql::Result<Event> {
        let auth = guards::require_authority(ctx, &["admin"])?;
        let state = ctx.data_unchecked::<AppState>();

        let date = parse_date_arg(&date, "date")?;
        let organizer_id = parse_organizer_arg(&organizer_id)?;

        let post = state
            .post_repository
            .create(
                &domain::NewPost {
                    title,
                    description,
                    attachments,
                    images: images.unwrap_or_default(),
                    organizer_id,
                    cities,
                    tags,
                    details: domain::PostDetails::Event {
                        date,
                        location,
                        registration_link,
                    },
                },
                auth.id,
            )
            .await
            .extend()?;

        match PostResult::from(post) {
            PostResult::Event(event) => Ok(event),
            _ => Err(ApiError::Internal("Created post is not an event".to_string()).extend()),
        }
    }

    /// Create an offer post; admin only
    async fn create_offer(
        &self,
        ctx: &Context<'_>,
        title: String,
        description: String,
        attachments: Option<String>,
        images: Option<Vec<String>>,
        organizer_id: ID,
        cities: Vec<String>,
        tags: Vec<String>,
        external_link: String,
        deadline: String,
    ) -> async_graphql::Result<Offer> {
        let auth = guards::require_authority(ctx, &["admin"])?;
        let state = ctx.data_unchecked::<AppState>();

        let deadline = parse_date_arg(&deadline, "deadline")?;
        let organizer_id = parse_organizer_arg(&organizer_id)?;

        let post = state
            .post_repository
            .create(
                &domain::NewPost {
                    title,
                    description,
                    attachments,
                    images: images.unwrap_or_default(),
                    organizer_id,
                    cities,
                    tags,
                    details: domain::PostDetails::Offer {
                        external_link,
                        deadline,
                    },
                },
                auth.id,
            )
            .await
            .extend()?;

        match PostResult::from(post) {
            PostResult::Offer(offer) => Ok(offer),
            _ => Err(ApiError::Internal("Created post is not an offer".to_string()).extend()),
        }
    }

    /// Create a news post; admin only
    async fn create_news(
        &self,
        ctx: &Context<'_>,
        title: String,
        description: String,
        attachments: Option<String>,
        images: Option<Vec<String>>,
        organizer_id: ID,
        cities: Vec<String>,
        tags: Vec<String>,
        author: String,
    ) -> async_graphql::Result<News> {
        let auth = guards::require_authority(ctx, &["admin"])?;
        let state = ctx.data_unchecked::<AppState>();

        let organizer_id = parse_organizer_arg(&organizer_id)?;

        let post = state
            .post_repository
            .create(
                &domain::NewPost {
                    title,
                    description,
                    attachments,
                    images: images.unwrap_or_default(),
                    organizer_id,
                    cities,
                    tags,
                    details: domain::PostDetails::News { author },
                },
                auth.id,
            )
            .await
            .extend()?;

        match PostResult::from(post) {
            PostResult::News(news) => Ok(news),
            _ => Err(ApiError::Internal("Created post is not a news item".to_string()).extend()),
        }
    }

    /// Partially update a post; admin only
    async fn update_post(
        &self,
        ctx: &Context<'_>,
        id: ID,
        data: UpdatePostInput,
    ) -> async_graphql::Result<PostResult> {
        guards::require_authority(ctx, &["admin"])?;
        let state = ctx.data_unchecked::<AppState>();

        let update = data.into_update().map_err(|e| e.extend())?;

        let post = state
            .post_repository
            .update_by_id(id.as_str(), &update)
            .await
            .extend()?;

        Ok(post.into())
    }

    /// Delete a post; admin only
    async fn delete_post(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<bool> {
        guards::require_authority(ctx, &["admin"])?;
        let state = ctx.data_unchecked::<AppState>();

        state
            .post_repository
            .delete_by_id(id.as_str())
            .await
            .extend()?;

        Ok(true)
    }
}

fn parse_date_arg(
    raw: &str,
    field: &'static str,
) -> async_graphql::Result<chrono::DateTime<chrono::Utc>> {
    schemas::parse_date(raw).ok_or_else(|| {
        ApiError::Schema(vec![FieldError::new(
            field,
            format!("{field} is not a valid date"),
        )])
        .extend()
    })
}

fn parse_organizer_arg(id: &ID) -> async_graphql::Result<Uuid> {
    Uuid::parse_str(id.as_str()).map_err(|_| {
        ApiError::Schema(vec![FieldError::new(
            "organizer_id",
            "organizer_id is not a valid id",
        )])
        .extend()
    })
}
