//! User service for registration and authentication

use std::sync::Arc;

use crate::domain::user::{validate_password, validate_username, User, UserId, UserRepository};
use crate::domain::DomainError;

use super::password::PasswordHasher;

/// Request for registering a new user
#[derive(Debug, Clone)]
pub struct RegisterUserRequest {
    pub username: String,
    pub password: String,
}

/// User service for registration and login
#[derive(Debug)]
pub struct UserService<R: UserRepository, H: PasswordHasher> {
    repository: Arc<R>,
    hasher: Arc<H>,
}

impl<R: UserRepository, H: PasswordHasher> UserService<R, H> {
    /// Create a new user service
    pub fn new(repository: Arc<R>, hasher: Arc<H>) -> Self {
        Self { repository, hasher }
    }

    /// Register a new user
    ///
    /// Fails with `Conflict` when the username is taken. The raw password is
    /// hashed before it touches the repository; the plaintext is never stored.
    pub async fn register(&self, request: RegisterUserRequest) -> Result<User, DomainError> {
        validate_username(&request.username).map_err(|e| DomainError::validation(e.to_string()))?;
        validate_password(&request.password).map_err(|e| DomainError::validation(e.to_string()))?;

        if self.repository.username_exists(&request.username).await? {
            return Err(DomainError::conflict(format!(
                "Username '{}' already exists",
                request.username
            )));
        }

        let password_hash = self.hasher.hash(&request.password)?;

        let user_id = UserId::new(uuid::Uuid::new_v4().to_string())
            .map_err(|e| DomainError::internal(e.to_string()))?;
        let user = User::new(user_id, &request.username, password_hash);

        self.repository.create(user).await
    }

    /// Authenticate a user with username and password
    ///
    /// Distinguishes an unknown username (`NotFound`, 404 at the boundary)
    /// from a wrong password (`Credential`, 401). Password verification is
    /// constant-time inside the hasher.
    pub async fn login(&self, username: &str, password: &str) -> Result<User, DomainError> {
        let user = self
            .repository
            .get_by_username(username)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("User '{}' not found", username)))?;

        if !self.hasher.verify(password, user.password_hash()) {
            return Err(DomainError::credential("Invalid credentials"));
        }

        self.repository.record_login(user.id()).await?;

        // Re-fetch to pick up last_login_at
        self.repository
            .get(user.id())
            .await?
            .ok_or_else(|| DomainError::internal("User vanished during login"))
    }

    /// Get a user by ID
    pub async fn get(&self, id: &str) -> Result<Option<User>, DomainError> {
        let user_id = UserId::new(id).map_err(|e| DomainError::invalid_id(e.to_string()))?;
        self.repository.get(&user_id).await
    }

    /// Count registered users
    pub async fn count(&self) -> Result<usize, DomainError> {
        self.repository.count().await
    }
}
