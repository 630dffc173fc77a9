//! REST and GraphQL routing

use axum::{
    Extension, Json, Router,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;

use crate::graphql;
use crate::state::AppState;

pub mod auth;
pub mod organization;
pub mod post;
pub mod user;

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    let schema = graphql::build_schema(state.clone());

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/auth", auth::router(state.clone()))
        .nest("/api/user", user::router(state.clone()))
        .nest("/api/organization", organization::router(state.clone()))
        .nest("/api/post", post::router(state.clone()))
        .route(
            "/graphql",
            post(graphql::graphql_handler).get(graphql::graphiql),
        )
        .layer(Extension(schema))
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "agora-api"
    }))
}
