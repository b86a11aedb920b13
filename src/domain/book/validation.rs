//! Book and review validation utilities

use thiserror::Error;

/// Errors that can occur during book or review validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BookValidationError {
    #[error("Book ID cannot be empty")]
    EmptyId,

    #[error("Book ID exceeds maximum length of {0} characters")]
    IdTooLong(usize),

    #[error("Book ID contains invalid character: '{0}'. Only alphanumeric characters and hyphens are allowed")]
    InvalidIdCharacter(char),

    #[error("Rating must be an integer between 1 and 5, got {0}")]
    RatingOutOfRange(i32),

    #[error("Review text exceeds maximum length of {0} characters")]
    ReviewTooLong(usize),

    #[error("Book title cannot be empty")]
    EmptyTitle,

    #[error("Book author cannot be empty")]
    EmptyAuthor,

    #[error("Book genre cannot be empty")]
    EmptyGenre,
}

const MAX_BOOK_ID_LENGTH: usize = 64;
const MAX_REVIEW_TEXT_LENGTH: usize = 5000;

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

/// Validate a book ID
///
/// Rules:
/// - Cannot be empty
/// - Maximum 64 characters (uuid v4 strings fit comfortably)
/// - Only alphanumeric characters and hyphens
pub fn validate_book_id(id: &str) -> Result<(), BookValidationError> {
    if id.is_empty() {
        return Err(BookValidationError::EmptyId);
    }

    if id.len() > MAX_BOOK_ID_LENGTH {
        return Err(BookValidationError::IdTooLong(MAX_BOOK_ID_LENGTH));
    }

    for c in id.chars() {
        if !c.is_ascii_alphanumeric() && c != '-' {
            return Err(BookValidationError::InvalidIdCharacter(c));
        }
    }

    Ok(())
}

/// Validate a review rating
///
/// The rating must lie in the closed range [1, 5]. Non-integral JSON values
/// never reach this check: the request DTO declares an integer field, so the
/// deserializer rejects them first.
pub fn validate_rating(rating: i32) -> Result<(), BookValidationError> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(BookValidationError::RatingOutOfRange(rating));
    }

    Ok(())
}

/// Validate review text
///
/// Empty text is allowed; the length cap bounds document growth.
pub fn validate_review_text(text: &str) -> Result<(), BookValidationError> {
    if text.len() > MAX_REVIEW_TEXT_LENGTH {
        return Err(BookValidationError::ReviewTooLong(MAX_REVIEW_TEXT_LENGTH));
    }

    Ok(())
}

/// Validate the fields of a new book
pub fn validate_book_fields(
    title: &str,
    author: &str,
    genre: &str,
) -> Result<(), BookValidationError> {
    if title.is_empty() {
        return Err(BookValidationError::EmptyTitle);
    }

    if author.is_empty() {
        return Err(BookValidationError::EmptyAuthor);
    }

    if genre.is_empty() {
        return Err(BookValidationError::EmptyGenre);
    }

    Ok(())
}
