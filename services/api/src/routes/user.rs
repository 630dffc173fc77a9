//! User management routes; every route requires the `admin` authority

use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    http::StatusCode,
    middleware::from_fn_with_state,
    response::IntoResponse,
    routing::{get, post},
};

use crate::{
    error::ApiError,
    middleware::{AuthUser, authorize_admin},
    models::{PublicUser, UserUpdate},
    response,
    schemas::{ValidData, user::CreateUserPayload},
    state::AppState,
};

/// Create the router for user management
pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(get_all_users).post(create_user))
        .route(
            "/:id",
            get(get_user_by_id).put(update_user).delete(delete_user),
        )
        .route("/:id/role/:role", post(add_role).delete(remove_role))
        .route_layer(from_fn_with_state(state, authorize_admin))
}

/// Get all users
pub async fn get_all_users(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let users = state.user_repository.find_all().await?;
    let users: Vec<PublicUser> = users.iter().map(|u| u.to_public()).collect();

    Ok(Json(users))
}

/// Get a user by ID
pub async fn get_user_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .user_repository
        .find_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("User with id {id} not found")))?;

    Ok(Json(user.to_public()))
}

/// Create a user, optionally with authorities
pub async fn create_user(
    State(state): State<AppState>,
    ValidData(payload): ValidData<CreateUserPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .user_repository
        .create(&payload.user, &payload.authorities)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(response::creation(user.to_public())),
    ))
}

/// Partially update a user
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidData(payload): ValidData<UserUpdate>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.user_repository.update(&id, &payload).await?;

    Ok(Json(response::update(user.to_public())))
}

/// Delete a user; self-deletion is rejected
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state.user_repository.delete_by_id(actor.id, &id).await?;

    Ok(Json(response::deletion()))
}

/// Grant a role to a user
pub async fn add_role(
    State(state): State<AppState>,
    Path((id, role)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.user_repository.add_authority(&id, &role).await?;

    Ok(Json(response::update(user.to_public())))
}

/// Revoke a role from a user
pub async fn remove_role(
    State(state): State<AppState>,
    Path((id, role)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.user_repository.remove_authority(&id, &role).await?;

    Ok(Json(response::update(user.to_public())))
}
