//! Book entity with its embedded review sequence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::{
    validate_book_id, validate_rating, validate_review_text, BookValidationError,
};

/// Book identifier - alphanumeric + hyphens, max 64 characters
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BookId(String);

impl BookId {
    /// Create a new BookId after validation
    pub fn new(id: impl Into<String>) -> Result<Self, BookValidationError> {
        let id = id.into();
        validate_book_id(&id)?;
        Ok(Self(id))
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for BookId {
    type Error = BookValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<BookId> for String {
    fn from(id: BookId) -> Self {
        id.0
    }
}

impl std::fmt::Display for BookId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single review embedded in a book
///
/// `user_id` is a non-owning reference into the user store. Wire field names
/// are camelCase and the text field serializes as `review`, matching the
/// public API contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    user_id: String,
    #[serde(rename = "review")]
    text: String,
    rating: i32,
    created_at: DateTime<Utc>,
}

impl Review {
    /// Create a review with a server-assigned timestamp
    ///
    /// Rejects ratings outside [1, 5] and oversized text before the review
    /// can reach any store.
    pub fn new(
        user_id: impl Into<String>,
        text: impl Into<String>,
        rating: i32,
    ) -> Result<Self, BookValidationError> {
        let text = text.into();
        validate_rating(rating)?;
        validate_review_text(&text)?;

        Ok(Self {
            user_id: user_id.into(),
            text,
            rating,
            created_at: Utc::now(),
        })
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn rating(&self) -> i32 {
        self.rating
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Book entity
///
/// Owns its review sequence (composition); reviews are only ever appended.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    id: BookId,
    title: String,
    author: String,
    genre: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    author_bio: Option<String>,
    reviews: Vec<Review>,
}

impl Book {
    /// Create a new book with no reviews
    pub fn new(
        id: BookId,
        title: impl Into<String>,
        author: impl Into<String>,
        genre: impl Into<String>,
        summary: Option<String>,
        author_bio: Option<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            author: author.into(),
            genre: genre.into(),
            summary,
            author_bio,
            reviews: Vec::new(),
        }
    }

    /// Rehydrate a book from stored fields. Used by repositories.
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: BookId,
        title: String,
        author: String,
        genre: String,
        summary: Option<String>,
        author_bio: Option<String>,
        reviews: Vec<Review>,
    ) -> Self {
        Self {
            id,
            title,
            author,
            genre,
            summary,
            author_bio,
            reviews,
        }
    }

    pub fn id(&self) -> &BookId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn genre(&self) -> &str {
        &self.genre
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    pub fn author_bio(&self) -> Option<&str> {
        self.author_bio.as_deref()
    }

    /// Reviews in append order
    pub fn reviews(&self) -> &[Review] {
        &self.reviews
    }

    /// Append a review to the book's sequence
    pub fn push_review(&mut self, review: Review) {
        self.reviews.push(review);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_book() -> Book {
        Book::new(
            BookId::new("b-1").unwrap(),
            "The Hobbit",
            "J.R.R. Tolkien",
            "fantasy",
            Some("A hobbit goes on an adventure".to_string()),
            None,
        )
    }

    #[test]
    fn test_book_id_valid() {
        let id = BookId::new("b-1").unwrap();
        assert_eq!(id.as_str(), "b-1");
    }

    #[test]
    fn test_book_id_invalid() {
        assert!(BookId::new("").is_err());
        assert!(BookId::new("b 1").is_err());
    }

    #[test]
    fn test_review_valid_ratings() {
        for rating in 1..=5 {
            let review = Review::new("user-1", "good", rating).unwrap();
            assert_eq!(review.rating(), rating);
        }
    }

    #[test]
    fn test_review_invalid_rating() {
        assert!(matches!(
            Review::new("user-1", "bad", 0),
            Err(BookValidationError::RatingOutOfRange(0))
        ));
        assert!(matches!(
            Review::new("user-1", "bad", 6),
            Err(BookValidationError::RatingOutOfRange(6))
        ));
    }

    #[test]
    fn test_push_review_preserves_order() {
        let mut book = test_book();

        book.push_review(Review::new("user-1", "first", 4).unwrap());
        book.push_review(Review::new("user-2", "second", 5).unwrap());

        assert_eq!(book.reviews().len(), 2);
        assert_eq!(book.reviews()[0].text(), "first");
        assert_eq!(book.reviews()[1].text(), "second");
    }

    #[test]
    fn test_review_wire_format() {
        let review = Review::new("user-1", "loved it", 5).unwrap();
        let json = serde_json::to_value(&review).unwrap();

        assert_eq!(json["userId"], "user-1");
        assert_eq!(json["review"], "loved it");
        assert_eq!(json["rating"], 5);
        assert!(json["createdAt"].is_string());
    }

    #[test]
    fn test_book_wire_format() {
        let book = test_book();
        let json = serde_json::to_value(&book).unwrap();

        assert_eq!(json["title"], "The Hobbit");
        assert_eq!(json["genre"], "fantasy");
        assert!(json["reviews"].as_array().unwrap().is_empty());
        // absent optional fields are omitted
        assert!(json.get("authorBio").is_none());
    }
}
