//! Organization and membership routes; reads are public, mutations are
//! admin-only

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    middleware::from_fn_with_state,
    response::IntoResponse,
    routing::{get, post, put},
};

use crate::{
    error::ApiError,
    middleware::authorize_admin,
    models::{NewOrganization, OrganizationUpdate, PublicOrganization},
    response,
    schemas::{ValidData, organization::MembershipRole},
    state::AppState,
};

/// Create the router for organization management
pub fn router(state: AppState) -> Router<AppState> {
    let admin = |state: &AppState| from_fn_with_state(state.clone(), authorize_admin);

    Router::new()
        .route("/", get(get_all_organizations))
        .route("/", post(create_organization).route_layer(admin(&state)))
        .route("/:id", get(get_organization_by_id))
        .route(
            "/:id",
            put(update_organization)
                .delete(delete_organization)
                .route_layer(admin(&state)),
        )
        .route(
            "/:id/user/:user_id",
            post(add_member)
                .put(update_member_role)
                .delete(remove_member)
                .route_layer(admin(&state)),
        )
}

/// Get all organizations
pub async fn get_all_organizations(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let organizations = state.organization_repository.find_all().await?;
    let organizations: Vec<PublicOrganization> =
        organizations.iter().map(|o| o.to_public()).collect();

    Ok(Json(organizations))
}

/// Get an organization by ID
pub async fn get_organization_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let organization = state.organization_repository.find_by_id(&id).await?;

    Ok(Json(organization.to_public()))
}

/// Create a new organization
pub async fn create_organization(
    State(state): State<AppState>,
    ValidData(payload): ValidData<NewOrganization>,
) -> Result<impl IntoResponse, ApiError> {
    let organization = state.organization_repository.create(&payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(response::creation(organization.to_public())),
    ))
}

/// Partially update an organization
pub async fn update_organization(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidData(payload): ValidData<OrganizationUpdate>,
) -> Result<impl IntoResponse, ApiError> {
    let organization = state
        .organization_repository
        .update_by_id(&id, &payload)
        .await?;

    Ok(Json(response::update(organization.to_public())))
}

/// Delete an organization
pub async fn delete_organization(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state.organization_repository.delete_by_id(&id).await?;

    Ok(Json(response::deletion()))
}

/// Add a user to an organization with a role
pub async fn add_member(
    State(state): State<AppState>,
    Path((id, user_id)): Path<(String, String)>,
    ValidData(payload): ValidData<MembershipRole>,
) -> Result<impl IntoResponse, ApiError> {
    let membership = state
        .organization_repository
        .add_member(&user_id, &id, &payload.role)
        .await?;

    Ok((StatusCode::CREATED, Json(response::creation(membership))))
}

/// Change a member's role within an organization
pub async fn update_member_role(
    State(state): State<AppState>,
    Path((id, user_id)): Path<(String, String)>,
    ValidData(payload): ValidData<MembershipRole>,
) -> Result<impl IntoResponse, ApiError> {
    let membership = state
        .organization_repository
        .update_member_role(&user_id, &id, &payload.role)
        .await?;

    Ok(Json(response::update(membership)))
}

/// Remove a user from an organization
pub async fn remove_member(
    State(state): State<AppState>,
    Path((id, user_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .organization_repository
        .remove_member(&user_id, &id)
        .await?;

    Ok(Json(response::deletion()))
}
