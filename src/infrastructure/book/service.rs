//! Catalog service - genre suggestions, review appends, review listings

use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::book::{
    validate_book_fields, Book, BookId, BookRepository, Review,
};
use crate::domain::user::{UserId, UserRepository};
use crate::domain::DomainError;
use crate::infrastructure::notify::ReviewFeed;

/// Request for appending a review to a book
#[derive(Debug, Clone)]
pub struct AddReviewRequest {
    pub user_id: String,
    pub text: String,
    pub rating: i32,
}

/// Request for creating a book (out-of-band via the seed command)
#[derive(Debug, Clone)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub genre: String,
    pub summary: Option<String>,
    pub author_bio: Option<String>,
}

/// A review joined with the reviewer's display name
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewView {
    pub username: String,
    #[serde(rename = "review")]
    pub text: String,
    pub rating: i32,
    pub created_at: DateTime<Utc>,
}

/// Catalog service
///
/// Owns the review-append-and-broadcast operation: validate, persist
/// atomically, then notify. The event is published only after the repository
/// confirmed the append, so listeners never hear about a write that failed;
/// a crash in between drops the notification but never the review.
#[derive(Debug)]
pub struct CatalogService<B: BookRepository, U: UserRepository> {
    books: Arc<B>,
    users: Arc<U>,
    feed: ReviewFeed,
}

impl<B: BookRepository, U: UserRepository> CatalogService<B, U> {
    /// Create a new catalog service
    pub fn new(books: Arc<B>, users: Arc<U>, feed: ReviewFeed) -> Self {
        Self { books, users, feed }
    }

    /// Find books whose genre matches `genre` exactly (case-sensitive)
    ///
    /// An empty genre matches no books; the store is not consulted.
    pub async fn suggest(&self, genre: &str) -> Result<Vec<Book>, DomainError> {
        if genre.is_empty() {
            return Ok(Vec::new());
        }

        self.books.find_by_genre(genre).await
    }

    /// Append a review to a book and broadcast it
    ///
    /// Not idempotent: identical calls append two reviews. No retry on
    /// storage failure; the error propagates to the caller unmodified.
    pub async fn add_review(
        &self,
        book_id: &str,
        request: AddReviewRequest,
    ) -> Result<Review, DomainError> {
        let book_id = BookId::new(book_id).map_err(|e| DomainError::invalid_id(e.to_string()))?;

        let review = Review::new(request.user_id, request.text, request.rating)
            .map_err(|e| DomainError::validation(e.to_string()))?;

        let review = self.books.append_review(&book_id, review).await?;

        // Durably persisted; now, and only now, tell the listeners.
        self.feed.publish_review_added(&book_id, &review).await;

        Ok(review)
    }

    /// List a book's reviews with reviewer display names
    ///
    /// Fails with `NotFound` for an unknown book - a book with no reviews
    /// yields an empty list, a missing book never does. Reviewers that no
    /// longer resolve keep their raw id as the display name.
    pub async fn reviews(&self, book_id: &str) -> Result<Vec<ReviewView>, DomainError> {
        let book_id = BookId::new(book_id).map_err(|e| DomainError::invalid_id(e.to_string()))?;

        let book = self
            .books
            .get(&book_id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Book '{}' not found", book_id)))?;

        let mut usernames: HashMap<String, String> = HashMap::new();

        for review in book.reviews() {
            if usernames.contains_key(review.user_id()) {
                continue;
            }

            let resolved = match UserId::new(review.user_id()) {
                Ok(user_id) => self
                    .users
                    .get(&user_id)
                    .await?
                    .map(|u| u.username().to_string()),
                Err(_) => None,
            };

            usernames.insert(
                review.user_id().to_string(),
                resolved.unwrap_or_else(|| review.user_id().to_string()),
            );
        }

        Ok(book
            .reviews()
            .iter()
            .map(|review| ReviewView {
                username: usernames[review.user_id()].clone(),
                text: review.text().to_string(),
                rating: review.rating(),
                created_at: review.created_at(),
            })
            .collect())
    }

    /// Create a book (out-of-band path, no HTTP endpoint)
    pub async fn add_book(&self, request: NewBook) -> Result<Book, DomainError> {
        validate_book_fields(&request.title, &request.author, &request.genre)
            .map_err(|e| DomainError::validation(e.to_string()))?;

        let book_id = BookId::new(uuid::Uuid::new_v4().to_string())
            .map_err(|e| DomainError::internal(e.to_string()))?;

        let book = Book::new(
            book_id,
            request.title,
            request.author,
            request.genre,
            request.summary,
            request.author_bio,
        );

        self.books.create(book).await
    }

    /// Count stored books
    pub async fn count(&self) -> Result<usize, DomainError> {
        self.books.count().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::book::MockBookRepository;
    use crate::domain::user::{MockUserRepository, User};
    use crate::infrastructure::notify::{book_topic, FIREHOSE_TOPIC};

    struct Fixture {
        service: CatalogService<MockBookRepository, MockUserRepository>,
        books: Arc<MockBookRepository>,
        users: Arc<MockUserRepository>,
        feed: ReviewFeed,
    }

    fn fixture() -> Fixture {
        let books = Arc::new(MockBookRepository::new());
        let users = Arc::new(MockUserRepository::new());
        let feed = ReviewFeed::default();

        Fixture {
            service: CatalogService::new(Arc::clone(&books), Arc::clone(&users), feed.clone()),
            books,
            users,
            feed,
        }
    }

    async fn seed_book(fx: &Fixture, id: &str, title: &str, genre: &str) -> BookId {
        let book_id = BookId::new(id).unwrap();
        fx.books
            .create(Book::new(
                book_id.clone(),
                title,
                "Author",
                genre,
                None,
                None,
            ))
            .await
            .unwrap();
        book_id
    }

    fn review_request(user: &str, rating: i32) -> AddReviewRequest {
        AddReviewRequest {
            user_id: user.to_string(),
            text: "worth reading".to_string(),
            rating,
        }
    }

    #[tokio::test]
    async fn test_add_review_all_valid_ratings() {
        let fx = fixture();
        let book_id = seed_book(&fx, "b-1", "Dune", "sci-fi").await;

        for rating in 1..=5 {
            let review = fx
                .service
                .add_review(book_id.as_str(), review_request("user-1", rating))
                .await
                .unwrap();
            assert_eq!(review.rating(), rating);
        }

        let stored = fx.books.get(&book_id).await.unwrap().unwrap();
        assert_eq!(stored.reviews().len(), 5);
        for (i, review) in stored.reviews().iter().enumerate() {
            assert_eq!(review.rating(), i as i32 + 1);
        }
    }

    #[tokio::test]
    async fn test_add_review_invalid_rating_persists_nothing() {
        let fx = fixture();
        let book_id = seed_book(&fx, "b-1", "Dune", "sci-fi").await;
        let mut rx = fx.feed.subscribe(FIREHOSE_TOPIC).await;

        for rating in [0, 6, -3] {
            let result = fx
                .service
                .add_review(book_id.as_str(), review_request("user-1", rating))
                .await;
            assert!(matches!(result, Err(DomainError::Validation { .. })));
        }

        let stored = fx.books.get(&book_id).await.unwrap().unwrap();
        assert!(stored.reviews().is_empty());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_add_review_unknown_book() {
        let fx = fixture();

        let result = fx
            .service
            .add_review("ghost", review_request("user-1", 3))
            .await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_add_review_malformed_book_id() {
        let fx = fixture();

        let result = fx
            .service
            .add_review("not a book id", review_request("user-1", 3))
            .await;
        assert!(matches!(result, Err(DomainError::InvalidId { .. })));
    }

    #[tokio::test]
    async fn test_add_review_broadcasts_after_persist() {
        let fx = fixture();
        let book_id = seed_book(&fx, "b-1", "Dune", "sci-fi").await;

        let mut firehose = fx.feed.subscribe(FIREHOSE_TOPIC).await;
        let mut per_book = fx.feed.subscribe(book_topic(&book_id)).await;

        let review = fx
            .service
            .add_review(book_id.as_str(), review_request("user-1", 4))
            .await
            .unwrap();

        let expected = crate::domain::CatalogEvent::ReviewAdded {
            book_id: book_id.clone(),
            review,
        };
        assert_eq!(firehose.recv().await.unwrap(), expected);
        assert_eq!(per_book.recv().await.unwrap(), expected);
        assert!(firehose.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_add_review_storage_failure_emits_no_event() {
        let fx = fixture();
        let book_id = seed_book(&fx, "b-1", "Dune", "sci-fi").await;
        let mut rx = fx.feed.subscribe(FIREHOSE_TOPIC).await;

        fx.books.set_should_fail(true).await;

        let result = fx
            .service
            .add_review(book_id.as_str(), review_request("user-1", 4))
            .await;
        assert!(matches!(result, Err(DomainError::Storage { .. })));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_add_review_is_not_deduplicated() {
        let fx = fixture();
        let book_id = seed_book(&fx, "b-1", "Dune", "sci-fi").await;

        fx.service
            .add_review(book_id.as_str(), review_request("user-1", 4))
            .await
            .unwrap();
        fx.service
            .add_review(book_id.as_str(), review_request("user-1", 4))
            .await
            .unwrap();

        let stored = fx.books.get(&book_id).await.unwrap().unwrap();
        assert_eq!(stored.reviews().len(), 2);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_concurrent_add_review_no_lost_updates() {
        let fx = fixture();
        let book_id = seed_book(&fx, "b-1", "Dune", "sci-fi").await;

        let service = Arc::new(CatalogService::new(
            Arc::clone(&fx.books),
            Arc::clone(&fx.users),
            fx.feed.clone(),
        ));

        let mut handles = Vec::new();
        for i in 0..50 {
            let service = Arc::clone(&service);
            let id = book_id.as_str().to_string();
            handles.push(tokio::spawn(async move {
                service
                    .add_review(&id, review_request(&format!("user-{}", i), 3))
                    .await
            }));
        }

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let stored = fx.books.get(&book_id).await.unwrap().unwrap();
        assert_eq!(stored.reviews().len(), 50);
    }

    #[tokio::test]
    async fn test_suggest_exact_case_sensitive_match() {
        let fx = fixture();
        seed_book(&fx, "b-1", "A", "fantasy").await;
        seed_book(&fx, "b-2", "B", "Fantasy").await;
        seed_book(&fx, "b-3", "C", "sci-fi").await;

        let found = fx.service.suggest("fantasy").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].genre(), "fantasy");
    }

    #[tokio::test]
    async fn test_suggest_empty_genre_matches_none() {
        let fx = fixture();
        seed_book(&fx, "b-1", "A", "fantasy").await;

        // The store is not even consulted: a failing repository stays silent
        fx.books.set_should_fail(true).await;

        let found = fx.service.suggest("").await.unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn test_suggest_propagates_storage_errors() {
        let fx = fixture();
        fx.books.set_should_fail(true).await;

        let result = fx.service.suggest("fantasy").await;
        assert!(matches!(result, Err(DomainError::Storage { .. })));
    }

    #[tokio::test]
    async fn test_reviews_resolves_usernames() {
        let fx = fixture();
        let book_id = seed_book(&fx, "b-1", "Dune", "sci-fi").await;

        let reader = User::new(UserId::new("user-1").unwrap(), "paul", "hash");
        fx.users.create(reader).await.unwrap();

        fx.service
            .add_review(book_id.as_str(), review_request("user-1", 5))
            .await
            .unwrap();
        fx.service
            .add_review(book_id.as_str(), review_request("user-2", 2))
            .await
            .unwrap();

        let views = fx.service.reviews(book_id.as_str()).await.unwrap();
        assert_eq!(views.len(), 2);
        assert_eq!(views[0].username, "paul");
        // unresolvable reviewer falls back to the raw id
        assert_eq!(views[1].username, "user-2");
        assert_eq!(views[0].rating, 5);
    }

    #[tokio::test]
    async fn test_reviews_unknown_book_is_not_found() {
        let fx = fixture();

        let result = fx.service.reviews("ghost").await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_add_book() {
        let fx = fixture();

        let book = fx
            .service
            .add_book(NewBook {
                title: "Dune".to_string(),
                author: "Frank Herbert".to_string(),
                genre: "sci-fi".to_string(),
                summary: None,
                author_bio: None,
            })
            .await
            .unwrap();

        assert_eq!(fx.service.count().await.unwrap(), 1);
        assert!(fx.books.get(book.id()).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_add_book_rejects_empty_fields() {
        let fx = fixture();

        let result = fx
            .service
            .add_book(NewBook {
                title: String::new(),
                author: "a".to_string(),
                genre: "g".to_string(),
                summary: None,
                author_bio: None,
            })
            .await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_review_view_wire_format() {
        let view = ReviewView {
            username: "paul".to_string(),
            text: "great".to_string(),
            rating: 5,
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["username"], "paul");
        assert_eq!(json["review"], "great");
        assert!(json["createdAt"].is_string());
    }
}
