//! Bookrec API
//!
//! A book-recommendation service: genre suggestions, user reviews with
//! ratings, and a live review feed. Reviews are appended atomically to the
//! owning book and broadcast to connected listeners after durable
//! persistence.

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::{AppState, CatalogServiceTrait, UserServiceTrait};
use infrastructure::auth::{JwtConfig, JwtService};
use infrastructure::book::{
    CatalogService, InMemoryBookRepository, PostgresBookRepository,
};
use infrastructure::notify::ReviewFeed;
use infrastructure::user::{
    Argon2Hasher, InMemoryUserRepository, PostgresUserRepository, UserService,
};
use tracing::info;

/// Create the application state with all services initialized
pub async fn create_app_state() -> anyhow::Result<AppState> {
    create_app_state_with_config(&AppConfig::default()).await
}

/// Create the application state with custom configuration
///
/// Selects the storage backend from `storage.backend`: `memory` keeps
/// everything in-process (dev and tests), `postgres` connects to
/// `DATABASE_URL` and runs pending migrations.
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let hasher = Arc::new(Argon2Hasher::new());
    let feed = ReviewFeed::new(config.feed.capacity);

    let jwt_service = Arc::new(JwtService::new(JwtConfig::new(
        &config.auth.jwt_secret,
        config.auth.token_expiration_hours,
    )));

    info!("Storage backend: {}", config.storage.backend);

    let (user_service, catalog_service): (Arc<dyn UserServiceTrait>, Arc<dyn CatalogServiceTrait>) =
        match config.storage.backend.as_str() {
            "postgres" => {
                let database_url = std::env::var("DATABASE_URL")
                    .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

                info!("Connecting to PostgreSQL...");
                let pool = sqlx::PgPool::connect(&database_url)
                    .await
                    .map_err(|e| anyhow::anyhow!("Failed to connect to PostgreSQL: {}", e))?;

                sqlx::migrate!("./migrations")
                    .run(&pool)
                    .await
                    .map_err(|e| anyhow::anyhow!("Failed to run migrations: {}", e))?;
                info!("PostgreSQL connection established");

                let users = Arc::new(PostgresUserRepository::new(pool.clone()));
                let books = Arc::new(PostgresBookRepository::new(pool));

                (
                    Arc::new(UserService::new(Arc::clone(&users), Arc::clone(&hasher))),
                    Arc::new(CatalogService::new(books, users, feed.clone())),
                )
            }
            "memory" => {
                let users = Arc::new(InMemoryUserRepository::new());
                let books = Arc::new(InMemoryBookRepository::new());

                (
                    Arc::new(UserService::new(Arc::clone(&users), Arc::clone(&hasher))),
                    Arc::new(CatalogService::new(books, users, feed.clone())),
                )
            }
            other => {
                anyhow::bail!("Unknown storage backend '{}'. Use 'memory' or 'postgres'.", other)
            }
        };

    Ok(AppState::new(
        user_service,
        catalog_service,
        jwt_service,
        feed,
    ))
}
