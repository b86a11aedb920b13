//! User repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{User, UserId};
use crate::domain::DomainError;

/// Repository trait for user storage
#[async_trait]
pub trait UserRepository: Send + Sync + Debug {
    /// Get a user by their ID
    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError>;

    /// Get a user by their username (for login)
    async fn get_by_username(&self, username: &str) -> Result<Option<User>, DomainError>;

    /// Create a new user
    async fn create(&self, user: User) -> Result<User, DomainError>;

    /// Record a login for a user
    async fn record_login(&self, id: &UserId) -> Result<(), DomainError>;

    /// Count stored users
    async fn count(&self) -> Result<usize, DomainError>;

    /// Check if a username exists
    async fn username_exists(&self, username: &str) -> Result<bool, DomainError> {
        Ok(self.get_by_username(username).await?.is_some())
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    /// Mock user repository for testing
    #[derive(Debug, Default)]
    pub struct MockUserRepository {
        users: Arc<RwLock<HashMap<String, User>>>,
        should_fail: Arc<RwLock<bool>>,
    }

    impl MockUserRepository {
        pub fn new() -> Self {
            Self::default()
        }

        /// Set whether operations should fail
        pub async fn set_should_fail(&self, fail: bool) {
            *self.should_fail.write().await = fail;
        }

        async fn check_should_fail(&self) -> Result<(), DomainError> {
            if *self.should_fail.read().await {
                return Err(DomainError::storage("Mock repository configured to fail"));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl UserRepository for MockUserRepository {
        async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError> {
            self.check_should_fail().await?;
            let users = self.users.read().await;
            Ok(users.get(id.as_str()).cloned())
        }

        async fn get_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
            self.check_should_fail().await?;
            let users = self.users.read().await;
            Ok(users.values().find(|u| u.username() == username).cloned())
        }

        async fn create(&self, user: User) -> Result<User, DomainError> {
            self.check_should_fail().await?;
            let mut users = self.users.write().await;

            if users.values().any(|u| u.username() == user.username()) {
                return Err(DomainError::conflict(format!(
                    "Username '{}' already exists",
                    user.username()
                )));
            }

            users.insert(user.id().as_str().to_string(), user.clone());
            Ok(user)
        }

        async fn record_login(&self, id: &UserId) -> Result<(), DomainError> {
            self.check_should_fail().await?;
            let mut users = self.users.write().await;

            if let Some(user) = users.get_mut(id.as_str()) {
                user.record_login();
                Ok(())
            } else {
                Err(DomainError::not_found(format!("User '{}' not found", id)))
            }
        }

        async fn count(&self) -> Result<usize, DomainError> {
            self.check_should_fail().await?;
            Ok(self.users.read().await.len())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn create_test_user(id: &str, username: &str) -> User {
            User::new(UserId::new(id).unwrap(), username, "hashed_password")
        }

        #[tokio::test]
        async fn test_create_and_get() {
            let repo = MockUserRepository::new();
            let user = create_test_user("user-1", "reader");

            repo.create(user.clone()).await.unwrap();

            let retrieved = repo.get(user.id()).await.unwrap();
            assert!(retrieved.is_some());
            assert_eq!(retrieved.unwrap().username(), user.username());
        }

        #[tokio::test]
        async fn test_username_uniqueness() {
            let repo = MockUserRepository::new();

            repo.create(create_test_user("user-1", "reader"))
                .await
                .unwrap();

            let result = repo.create(create_test_user("user-2", "reader")).await;
            assert!(matches!(result, Err(DomainError::Conflict { .. })));
        }

        #[tokio::test]
        async fn test_should_fail() {
            let repo = MockUserRepository::new();
            repo.set_should_fail(true).await;

            let result = repo.get_by_username("reader").await;
            assert!(matches!(result, Err(DomainError::Storage { .. })));
        }
    }
}
