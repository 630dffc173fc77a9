//! Application state shared across handlers

use sqlx::PgPool;

use crate::jwt::JwtService;
use crate::repositories::{
    AttendeeRepository, OrganizationRepository, PostRepository, UserRepository,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub jwt_service: JwtService,
    pub user_repository: UserRepository,
    pub organization_repository: OrganizationRepository,
    pub post_repository: PostRepository,
    pub attendee_repository: AttendeeRepository,
}
