//! Post and enrollment routes
//!
//! Reads are public; post mutations require the `admin` authority;
//! enrollment endpoints only require a valid credential.

use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    http::StatusCode,
    middleware::from_fn_with_state,
    response::IntoResponse,
    routing::{get, post, put},
};

use crate::{
    error::ApiError,
    middleware::{AuthUser, authenticate, authorize_admin},
    models::{NewPost, PostUpdate, PublicUser},
    response,
    schemas::{ValidData, attendee::EnrollPayload},
    state::AppState,
};

/// Create the router for posts and event enrollment
pub fn router(state: AppState) -> Router<AppState> {
    let admin = |state: &AppState| from_fn_with_state(state.clone(), authorize_admin);
    let authed = |state: &AppState| from_fn_with_state(state.clone(), authenticate);

    Router::new()
        .route("/", get(get_all_posts))
        .route("/", post(create_post).route_layer(admin(&state)))
        .route("/:id", get(get_post_by_id))
        .route(
            "/:id",
            put(update_post).delete(delete_post).route_layer(admin(&state)),
        )
        .route("/:id/enroll", get(get_enrolled_in).route_layer(admin(&state)))
        .route(
            "/:id/enroll",
            post(enroll)
                .delete(cancel_enrollment)
                .route_layer(authed(&state)),
        )
        .route(
            "/enroll/my-enrollments",
            get(my_enrollments).route_layer(authed(&state)),
        )
}

/// Get all posts
pub async fn get_all_posts(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let posts = state.post_repository.find_all(None, None).await?;

    Ok(Json(posts))
}

/// Get a post by ID
pub async fn get_post_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let post = state.post_repository.find_by_id(&id).await?;

    Ok(Json(post))
}

/// Create a post of any kind; the requester becomes the publishing user
pub async fn create_post(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthUser>,
    ValidData(payload): ValidData<NewPost>,
) -> Result<impl IntoResponse, ApiError> {
    let post = state.post_repository.create(&payload, actor.id).await?;

    Ok((StatusCode::CREATED, Json(response::creation(post))))
}

/// Partially update a post
pub async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidData(payload): ValidData<PostUpdate>,
) -> Result<impl IntoResponse, ApiError> {
    let post = state.post_repository.update_by_id(&id, &payload).await?;

    Ok(Json(response::update(post)))
}

/// Delete a post
pub async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state.post_repository.delete_by_id(&id).await?;

    Ok(Json(response::deletion()))
}

/// Enroll the requester into an event post
pub async fn enroll(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthUser>,
    Path(id): Path<String>,
    ValidData(payload): ValidData<EnrollPayload>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .user_repository
        .find_by_uuid(actor.id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("User with id {} not found", actor.id)))?;

    let event = state.post_repository.get_attendable_by_id(&id).await?;

    let attendee = state
        .attendee_repository
        .enroll(actor.id, event.id, payload.remainders)
        .await?;

    Ok((StatusCode::CREATED, Json(response::creation(attendee))))
}

/// All users enrolled in an event
pub async fn get_enrolled_in(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let event = state.post_repository.get_attendable_by_id(&id).await?;

    let attendees = state.attendee_repository.enrolled_users(event.id).await?;
    let attendees: Vec<PublicUser> = attendees.iter().map(|u| u.to_public()).collect();

    Ok(Json(attendees))
}

/// Cancel the requester's enrollment in an event
pub async fn cancel_enrollment(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let event_id = crate::repositories::parse_id(&id, "post")?;

    state
        .attendee_repository
        .cancel_enrollment(actor.id, event_id)
        .await?;

    Ok(Json(response::deletion()))
}

/// All events the requester is enrolled in
pub async fn my_enrollments(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    let enrollments = state
        .attendee_repository
        .enrollments_for_user(actor.id)
        .await?;

    Ok(Json(enrollments))
}
