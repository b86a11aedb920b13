//! In-memory book repository implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::book::{Book, BookId, BookRepository, Review};
use crate::domain::DomainError;

/// In-memory implementation of BookRepository
///
/// A review append takes the single write lock for the whole read-modify-write,
/// so concurrent appends to the same book cannot lose updates and readers
/// never observe a half-appended sequence.
#[derive(Debug)]
pub struct InMemoryBookRepository {
    books: Arc<RwLock<HashMap<String, Book>>>,
}

impl InMemoryBookRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self {
            books: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryBookRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BookRepository for InMemoryBookRepository {
    async fn get(&self, id: &BookId) -> Result<Option<Book>, DomainError> {
        let books = self.books.read().await;
        Ok(books.get(id.as_str()).cloned())
    }

    async fn create(&self, book: Book) -> Result<Book, DomainError> {
        let mut books = self.books.write().await;

        if books.contains_key(book.id().as_str()) {
            return Err(DomainError::conflict(format!(
                "Book '{}' already exists",
                book.id()
            )));
        }

        books.insert(book.id().as_str().to_string(), book.clone());
        Ok(book)
    }

    async fn find_by_genre(&self, genre: &str) -> Result<Vec<Book>, DomainError> {
        let books = self.books.read().await;

        let mut found: Vec<Book> = books
            .values()
            .filter(|b| b.genre() == genre)
            .cloned()
            .collect();
        found.sort_by(|a, b| a.title().cmp(b.title()));

        Ok(found)
    }

    async fn append_review(&self, id: &BookId, review: Review) -> Result<Review, DomainError> {
        let mut books = self.books.write().await;

        match books.get_mut(id.as_str()) {
            Some(book) => {
                book.push_review(review.clone());
                Ok(review)
            }
            None => Err(DomainError::not_found(format!("Book '{}' not found", id))),
        }
    }

    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.books.read().await.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_book(id: &str, title: &str, genre: &str) -> Book {
        Book::new(
            BookId::new(id).unwrap(),
            title,
            "Author",
            genre,
            None,
            None,
        )
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let repo = InMemoryBookRepository::new();
        let book = test_book("b-1", "Dune", "sci-fi");

        repo.create(book.clone()).await.unwrap();

        let retrieved = repo.get(book.id()).await.unwrap().unwrap();
        assert_eq!(retrieved.title(), "Dune");
        assert!(retrieved.reviews().is_empty());
    }

    #[tokio::test]
    async fn test_create_duplicate() {
        let repo = InMemoryBookRepository::new();

        repo.create(test_book("b-1", "Dune", "sci-fi")).await.unwrap();

        let result = repo.create(test_book("b-1", "Dune", "sci-fi")).await;
        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_find_by_genre_is_case_sensitive() {
        let repo = InMemoryBookRepository::new();

        repo.create(test_book("b-1", "A", "fantasy")).await.unwrap();
        repo.create(test_book("b-2", "B", "Fantasy")).await.unwrap();
        repo.create(test_book("b-3", "C", "sci-fi")).await.unwrap();

        let found = repo.find_by_genre("fantasy").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id().as_str(), "b-1");
    }

    #[tokio::test]
    async fn test_find_by_genre_sorted_by_title() {
        let repo = InMemoryBookRepository::new();

        repo.create(test_book("b-1", "Zebra", "fantasy")).await.unwrap();
        repo.create(test_book("b-2", "Aardvark", "fantasy")).await.unwrap();

        let found = repo.find_by_genre("fantasy").await.unwrap();
        assert_eq!(found[0].title(), "Aardvark");
        assert_eq!(found[1].title(), "Zebra");
    }

    #[tokio::test]
    async fn test_append_review() {
        let repo = InMemoryBookRepository::new();
        let book = test_book("b-1", "Dune", "sci-fi");
        repo.create(book.clone()).await.unwrap();

        let review = Review::new("user-1", "a classic", 5).unwrap();
        let appended = repo.append_review(book.id(), review.clone()).await.unwrap();
        assert_eq!(appended, review);

        let retrieved = repo.get(book.id()).await.unwrap().unwrap();
        assert_eq!(retrieved.reviews(), &[review]);
    }

    #[tokio::test]
    async fn test_append_review_missing_book() {
        let repo = InMemoryBookRepository::new();
        let review = Review::new("user-1", "text", 3).unwrap();

        let result = repo
            .append_review(&BookId::new("ghost").unwrap(), review)
            .await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_concurrent_appends_lose_nothing() {
        let repo = Arc::new(InMemoryBookRepository::new());
        let book = test_book("b-1", "Dune", "sci-fi");
        repo.create(book.clone()).await.unwrap();

        let mut handles = Vec::new();
        for i in 0..50 {
            let repo = Arc::clone(&repo);
            let id = book.id().clone();
            handles.push(tokio::spawn(async move {
                let review = Review::new(format!("user-{}", i), "text", 3).unwrap();
                repo.append_review(&id, review).await
            }));
        }

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let retrieved = repo.get(book.id()).await.unwrap().unwrap();
        assert_eq!(retrieved.reviews().len(), 50);
    }
}
