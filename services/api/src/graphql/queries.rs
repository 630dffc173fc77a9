//! GraphQL queries

use async_graphql::{Context, ErrorExtensions, ID, Object, ResultExt};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

use super::guards;
use super::models::{PostResult, User};

pub struct Query;

#[Object]
impl Query {
    /// The authenticated requester
    async fn me(&self, ctx: &Context<'_>) -> async_graphql::Result<Option<User>> {
        let auth = guards::require_auth(ctx)?;
        let state = ctx.data_unchecked::<AppState>();

        let user = state.user_repository.find_by_uuid(auth.id).await.extend()?;
        Ok(user.map(Into::into))
    }

    /// All users; admin only
    async fn users(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<User>> {
        guards::require_authority(ctx, &["admin"])?;
        let state = ctx.data_unchecked::<AppState>();

        let users = state.user_repository.find_all().await.extend()?;
        Ok(users.into_iter().map(Into::into).collect())
    }

    /// All posts, optionally filtered by type and/or publishing user
    async fn posts(
        &self,
        ctx: &Context<'_>,
        #[graphql(name = "type")] kind: Option<String>,
        user_id: Option<ID>,
    ) -> async_graphql::Result<Vec<PostResult>> {
        let state = ctx.data_unchecked::<AppState>();

        let published_by = match user_id {
            Some(id) => Some(
                Uuid::parse_str(id.as_str())
                    .map_err(|_| ApiError::Validation("Invalid user ID".to_string()).extend())?,
            ),
            None => None,
        };

        let posts = state
            .post_repository
            .find_all(kind.as_deref(), published_by)
            .await
            .extend()?;

        Ok(posts.into_iter().map(Into::into).collect())
    }

    /// A post by its id
    async fn post(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<PostResult> {
        let state = ctx.data_unchecked::<AppState>();

        let post = state.post_repository.find_by_id(id.as_str()).await.extend()?;
        Ok(post.into())
    }
}
