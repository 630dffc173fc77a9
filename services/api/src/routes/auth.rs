//! Registration and login routes

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use serde::Serialize;
use tracing::info;

use crate::{
    error::ApiError,
    models::NewUser,
    response,
    schemas::{ValidData, auth::LoginPayload},
    state::AppState,
};

/// Response for a successful login
#[derive(Serialize)]
pub struct LoginResponse {
    pub user: LoginUser,
    pub token: String,
    pub message: LoginMessage,
}

#[derive(Serialize)]
pub struct LoginUser {
    pub name: String,
    pub email: String,
}

#[derive(Serialize)]
pub struct LoginMessage {
    pub content: String,
    pub code: u16,
}

/// Create the router for authentication flows
pub fn router(_state: AppState) -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

/// Register a new user; new accounts start with no authorities
pub async fn register(
    State(state): State<AppState>,
    ValidData(payload): ValidData<NewUser>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.user_repository.create(&payload, &[]).await?;

    Ok((
        StatusCode::CREATED,
        Json(response::creation(user.to_public())),
    ))
}

/// Log a user in and hand out a regular credential
pub async fn login(
    State(state): State<AppState>,
    ValidData(payload): ValidData<LoginPayload>,
) -> Result<impl IntoResponse, ApiError> {
    info!("Login attempt for {}", payload.email);

    let user = state
        .user_repository
        .find_by_email(&payload.email)
        .await?
        .ok_or_else(|| ApiError::NotFound("User with that email does not exist".to_string()))?;

    if !state.user_repository.verify_password(&user, &payload.password)? {
        return Err(ApiError::Validation("Incorrect password".to_string()));
    }

    let token = state
        .jwt_service
        .issue(user.id, &user.authorities)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    let body = LoginResponse {
        user: LoginUser {
            name: user.name,
            email: user.email,
        },
        token,
        message: LoginMessage {
            content: "Login successful".to_string(),
            code: StatusCode::OK.as_u16(),
        },
    };

    Ok((StatusCode::OK, Json(body)))
}
