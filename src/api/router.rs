use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::auth;
use super::books;
use super::health;
use super::state::AppState;
use super::ws;

/// Create a minimal router without state (for testing/backward compatibility)
/// Note: /ready endpoint is not available without state
pub fn create_router() -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/live", get(health::live_check))
        .layer(TraceLayer::new_for_http())
}

/// Create the full router with application state
pub fn create_router_with_state(state: AppState) -> Router {
    Router::new()
        // Health endpoints
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        // Authentication endpoints (no auth required for register/login)
        .nest("/api/auth", auth::create_auth_router())
        // Book catalog endpoints
        .nest("/api/books", books::create_books_router())
        // Live review feed
        .route("/ws", get(ws::feed_ws))
        // Add state and middleware
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
