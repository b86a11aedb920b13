//! In-memory user repository implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::user::{User, UserId, UserRepository};
use crate::domain::DomainError;

/// In-memory implementation of UserRepository
///
/// Username uniqueness is enforced through a dedicated index held under the
/// same lock discipline as the primary map.
#[derive(Debug)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<String, User>>>,
    /// Index for username -> user ID lookup
    username_index: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryUserRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
            username_index: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users.get(id.as_str()).cloned())
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let username_index = self.username_index.read().await;

        if let Some(user_id) = username_index.get(username) {
            let users = self.users.read().await;
            return Ok(users.get(user_id).cloned());
        }

        Ok(None)
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        let mut users = self.users.write().await;
        let mut username_index = self.username_index.write().await;

        let id = user.id().as_str().to_string();
        let username = user.username().to_string();

        if users.contains_key(&id) {
            return Err(DomainError::conflict(format!(
                "User with ID '{}' already exists",
                id
            )));
        }

        if username_index.contains_key(&username) {
            return Err(DomainError::conflict(format!(
                "Username '{}' already exists",
                username
            )));
        }

        username_index.insert(username, id.clone());
        users.insert(id, user.clone());

        Ok(user)
    }

    async fn record_login(&self, id: &UserId) -> Result<(), DomainError> {
        let mut users = self.users.write().await;

        match users.get_mut(id.as_str()) {
            Some(user) => {
                user.record_login();
                Ok(())
            }
            None => Err(DomainError::not_found(format!(
                "User '{}' not found",
                id.as_str()
            ))),
        }
    }

    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.users.read().await.len())
    }
}
