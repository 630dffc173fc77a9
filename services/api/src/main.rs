use anyhow::Result;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

mod error;
mod graphql;
mod jwt;
mod middleware;
mod models;
mod repositories;
mod response;
mod routes;
mod schemas;
mod state;

use common::database::{DatabaseConfig, init_pool};
use common::error::DatabaseError;

use crate::{
    jwt::{JwtConfig, JwtService},
    repositories::{
        AttendeeRepository, OrganizationRepository, PostRepository, UserRepository,
    },
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting Agora API service");

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    // Check database connectivity
    if common::database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    // Apply pending migrations; the unique indexes they create are the
    // authoritative uniqueness guards for emails, acronyms and enrollments.
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| DatabaseError::Migration(e.to_string()))?;

    // Initialize JWT service
    let jwt_config = JwtConfig::from_env()?;
    let jwt_service = JwtService::new(jwt_config);

    // Initialize repositories
    let user_repository = UserRepository::new(pool.clone());
    let organization_repository = OrganizationRepository::new(pool.clone());
    let post_repository = PostRepository::new(pool.clone());
    let attendee_repository = AttendeeRepository::new(pool.clone());

    let app_state = AppState {
        db_pool: pool,
        jwt_service,
        user_repository,
        organization_repository,
        post_repository,
        attendee_repository,
    };

    info!("Agora API service initialized successfully");

    // Start the web server
    let app = routes::create_router(app_state);

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(3000);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!("Agora API service listening on 0.0.0.0:{}", port);

    axum::serve(listener, app).await?;

    Ok(())
}
