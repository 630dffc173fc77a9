//! Per-resolver authorization helpers
//!
//! The REST middleware equivalent for resolvers: [`require_auth`] demands a
//! valid credential, [`require_authority`] additionally demands at least one
//! of the given authorities.

use async_graphql::{Context, ErrorExtensions};

use crate::middleware::AuthUser;

/// The requester must be authenticated
pub fn require_auth<'a>(ctx: &'a Context<'_>) -> async_graphql::Result<&'a AuthUser> {
    ctx.data_opt::<AuthUser>().ok_or_else(|| {
        async_graphql::Error::new("Not authenticated")
            .extend_with(|_, e| e.set("code", "UNAUTHENTICATED"))
    })
}

/// The requester must hold at least one of the required authorities
pub fn require_authority<'a>(
    ctx: &'a Context<'_>,
    required: &[&str],
) -> async_graphql::Result<&'a AuthUser> {
    let user = require_auth(ctx)?;

    let has_authority = required
        .iter()
        .any(|required| user.authorities.iter().any(|held| held == required));

    if !has_authority {
        return Err(async_graphql::Error::new("Not authorized")
            .extend_with(|_, e| e.set("code", "FORBIDDEN")));
    }

    Ok(user)
}
