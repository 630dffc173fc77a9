//! Authorization middleware layered on JWT verification
//!
//! Routes opt in with [`authenticate`] (any valid credential) or
//! [`authorize_admin`] (requires the `admin` authority). The decoded
//! credential travels to handlers through request extensions as [`AuthUser`].

use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::Response,
};
use tracing::info;
use uuid::Uuid;

use crate::{
    error::ApiError,
    jwt::{Claims, TokenError},
    state::AppState,
};

/// Authenticated requester attached to the request context
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub authorities: Vec<String>,
}

/// Middleware requiring a valid credential, with no authority check
pub async fn authenticate(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    authorize(state, req, next, &[]).await
}

/// Middleware requiring the `admin` authority
pub async fn authorize_admin(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    authorize(state, req, next, &["admin"]).await
}

/// Verify the bearer credential and check it against the required
/// authorities; holding any one of them is enough.
async fn authorize(
    state: AppState,
    mut req: Request<Body>,
    next: Next,
    required_authorities: &[&str],
) -> Result<Response, ApiError> {
    let token = bearer_token(&req)
        .ok_or_else(|| ApiError::Unauthorized("Access denied. No token provided.".to_string()))?;

    let claims = state.jwt_service.verify(token).map_err(|e| match e {
        TokenError::Expired => {
            ApiError::Unauthorized("Access denied. Token expired.".to_string())
        }
        other => ApiError::Validation(other.to_string()),
    })?;

    let user = check_authorities(&claims, required_authorities)?;

    info!("User authorities: {:?}", user.authorities);

    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}

/// Extract the token from the `Authorization: Bearer <credential>` header
fn bearer_token<B>(req: &Request<B>) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
}

/// Pure authority decision: claims must carry an authority list, and when a
/// non-empty required set is given the two sets must intersect.
fn check_authorities(claims: &Claims, required_authorities: &[&str]) -> Result<AuthUser, ApiError> {
    let Some(authorities) = claims.authorities.clone() else {
        return Err(ApiError::Forbidden(
            "Access denied. No authorities found.".to_string(),
        ));
    };

    if !required_authorities.is_empty() {
        let has_authority = required_authorities
            .iter()
            .any(|required| authorities.iter().any(|held| held == required));

        if !has_authority {
            return Err(ApiError::Forbidden(
                "Access denied. Insufficient authorities.".to_string(),
            ));
        }
    }

    Ok(AuthUser {
        id: claims.sub,
        authorities,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(authorities: Option<Vec<&str>>) -> Claims {
        Claims {
            sub: Uuid::new_v4(),
            authorities: authorities.map(|a| a.into_iter().map(String::from).collect()),
            iat: 0,
            exp: u64::MAX,
        }
    }

    #[test]
    fn test_missing_authorities_is_forbidden() {
        let err = check_authorities(&claims(None), &[]).unwrap_err();
        match err {
            ApiError::Forbidden(msg) => assert_eq!(msg, "Access denied. No authorities found."),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_empty_required_set_passes_any_authority_list() {
        assert!(check_authorities(&claims(Some(vec![])), &[]).is_ok());
        assert!(check_authorities(&claims(Some(vec!["user"])), &[]).is_ok());
    }

    #[test]
    fn test_intersecting_authorities_pass() {
        let user = check_authorities(&claims(Some(vec!["user", "admin"])), &["admin"]).unwrap();
        assert!(user.authorities.contains(&"admin".to_string()));
    }

    #[test]
    fn test_disjoint_authorities_are_forbidden() {
        let err = check_authorities(&claims(Some(vec!["user"])), &["admin"]).unwrap_err();
        match err {
            ApiError::Forbidden(msg) => {
                assert_eq!(msg, "Access denied. Insufficient authorities.")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_any_of_required_authorities_suffices() {
        // Logical OR over the required set, not AND
        let result = check_authorities(&claims(Some(vec!["moderator"])), &["admin", "moderator"]);
        assert!(result.is_ok());
    }
}
