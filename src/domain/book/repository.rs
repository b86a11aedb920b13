//! Book repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{Book, BookId, Review};
use crate::domain::DomainError;

/// Repository trait for book storage
///
/// `append_review` is the only mutation after creation. Implementations must
/// make it atomic per book: two concurrent appends to the same book both
/// land, and a concurrent reader never observes a half-appended sequence.
#[async_trait]
pub trait BookRepository: Send + Sync + Debug {
    /// Get a book by its ID
    async fn get(&self, id: &BookId) -> Result<Option<Book>, DomainError>;

    /// Create a new book
    async fn create(&self, book: Book) -> Result<Book, DomainError>;

    /// Find books whose genre equals `genre` exactly (case-sensitive)
    async fn find_by_genre(&self, genre: &str) -> Result<Vec<Book>, DomainError>;

    /// Atomically append a review to a book's sequence
    ///
    /// Returns the appended review, or `NotFound` if no such book exists.
    async fn append_review(&self, id: &BookId, review: Review) -> Result<Review, DomainError>;

    /// Count stored books
    async fn count(&self) -> Result<usize, DomainError>;
}
