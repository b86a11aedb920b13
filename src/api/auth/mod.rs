//! Authentication API endpoints
//!
//! Registration, login, and current-user info for JWT-based authentication.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::infrastructure::user::RegisterUserRequest;

/// Create the authentication router
pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(get_current_user))
}

/// Registration request
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

/// Registration response
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub id: String,
    pub username: String,
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

/// User response (safe to expose)
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login_at: Option<String>,
}

impl UserResponse {
    fn from_user(user: &crate::domain::user::User) -> Self {
        Self {
            id: user.id().as_str().to_string(),
            username: user.username().to_string(),
            created_at: user.created_at().to_rfc3339(),
            last_login_at: user.last_login_at().map(|t| t.to_rfc3339()),
        }
    }
}

/// Register a new user
///
/// POST /api/auth/register
///
/// Returns 201 on success, 400 for an invalid or already-taken username.
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let user = state
        .user_service
        .register(RegisterUserRequest {
            username: request.username,
            password: request.password,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            id: user.id().as_str().to_string(),
            username: user.username().to_string(),
        }),
    ))
}

/// Login with username and password
///
/// POST /api/auth/login
///
/// Returns a signed bearer token on success; 404 for an unknown username,
/// 401 for a wrong password.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user = state
        .user_service
        .login(&request.username, &request.password)
        .await?;

    let token = state.jwt_service.generate(&user)?;

    Ok(Json(LoginResponse { token }))
}

/// Get current authenticated user
///
/// GET /api/auth/me
pub async fn get_current_user(
    RequireUser(user): RequireUser,
) -> Result<Json<UserResponse>, ApiError> {
    Ok(Json(UserResponse::from_user(&user)))
}
