//! Application state for shared services

use std::sync::Arc;

use crate::domain::book::{Book, BookRepository, Review};
use crate::domain::user::{User, UserRepository};
use crate::domain::DomainError;
use crate::infrastructure::auth::JwtGenerator;
use crate::infrastructure::book::{
    AddReviewRequest, CatalogService, NewBook, ReviewView,
};
use crate::infrastructure::notify::ReviewFeed;
use crate::infrastructure::user::{PasswordHasher, RegisterUserRequest, UserService};

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServiceTrait>,
    pub catalog_service: Arc<dyn CatalogServiceTrait>,
    pub jwt_service: Arc<dyn JwtGenerator>,
    pub review_feed: ReviewFeed,
}

/// Trait for user service operations
#[async_trait::async_trait]
pub trait UserServiceTrait: Send + Sync {
    async fn register(&self, request: RegisterUserRequest) -> Result<User, DomainError>;
    async fn login(&self, username: &str, password: &str) -> Result<User, DomainError>;
    async fn get(&self, id: &str) -> Result<Option<User>, DomainError>;
    async fn count(&self) -> Result<usize, DomainError>;
}

/// Trait for catalog service operations
#[async_trait::async_trait]
pub trait CatalogServiceTrait: Send + Sync {
    async fn suggest(&self, genre: &str) -> Result<Vec<Book>, DomainError>;
    async fn add_review(
        &self,
        book_id: &str,
        request: AddReviewRequest,
    ) -> Result<Review, DomainError>;
    async fn reviews(&self, book_id: &str) -> Result<Vec<ReviewView>, DomainError>;
    async fn add_book(&self, request: NewBook) -> Result<Book, DomainError>;
    async fn count(&self) -> Result<usize, DomainError>;
}

// Implement traits for the actual services

#[async_trait::async_trait]
impl<R: UserRepository + 'static, H: PasswordHasher + 'static> UserServiceTrait
    for UserService<R, H>
{
    async fn register(&self, request: RegisterUserRequest) -> Result<User, DomainError> {
        UserService::register(self, request).await
    }

    async fn login(&self, username: &str, password: &str) -> Result<User, DomainError> {
        UserService::login(self, username, password).await
    }

    async fn get(&self, id: &str) -> Result<Option<User>, DomainError> {
        UserService::get(self, id).await
    }

    async fn count(&self) -> Result<usize, DomainError> {
        UserService::count(self).await
    }
}

#[async_trait::async_trait]
impl<B: BookRepository + 'static, U: UserRepository + 'static> CatalogServiceTrait
    for CatalogService<B, U>
{
    async fn suggest(&self, genre: &str) -> Result<Vec<Book>, DomainError> {
        CatalogService::suggest(self, genre).await
    }

    async fn add_review(
        &self,
        book_id: &str,
        request: AddReviewRequest,
    ) -> Result<Review, DomainError> {
        CatalogService::add_review(self, book_id, request).await
    }

    async fn reviews(&self, book_id: &str) -> Result<Vec<ReviewView>, DomainError> {
        CatalogService::reviews(self, book_id).await
    }

    async fn add_book(&self, request: NewBook) -> Result<Book, DomainError> {
        CatalogService::add_book(self, request).await
    }

    async fn count(&self) -> Result<usize, DomainError> {
        CatalogService::count(self).await
    }
}

impl AppState {
    /// Create new application state with provided services
    pub fn new(
        user_service: Arc<dyn UserServiceTrait>,
        catalog_service: Arc<dyn CatalogServiceTrait>,
        jwt_service: Arc<dyn JwtGenerator>,
        review_feed: ReviewFeed,
    ) -> Self {
        Self {
            user_service,
            catalog_service,
            jwt_service,
            review_feed,
        }
    }
}
