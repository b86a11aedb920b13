//! API middleware - request extractors

mod user_auth;

pub use user_auth::{extract_jwt_token, RequireUser};
