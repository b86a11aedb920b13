//! API layer - HTTP endpoints, WebSocket feed, and middleware

pub mod auth;
pub mod books;
pub mod health;
pub mod middleware;
pub mod router;
pub mod state;
pub mod types;
pub mod ws;

pub use middleware::RequireUser;
pub use router::{create_router, create_router_with_state};
pub use state::AppState;
