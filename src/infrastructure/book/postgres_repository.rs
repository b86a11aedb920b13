//! PostgreSQL book repository implementation
//!
//! Reviews live in a JSONB array column. Appending goes through a single
//! server-side `reviews || $n` statement, which Postgres applies atomically
//! per row: concurrent appends serialize on the row lock and none is lost.

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::{PgPool, Row};

use crate::domain::book::{Book, BookId, BookRepository, Review};
use crate::domain::DomainError;

/// PostgreSQL implementation of BookRepository
#[derive(Debug, Clone)]
pub struct PostgresBookRepository {
    pool: PgPool,
}

impl PostgresBookRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookRepository for PostgresBookRepository {
    async fn get(&self, id: &BookId) -> Result<Option<Book>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, title, author, genre, summary, author_bio, reviews
            FROM books
            WHERE id = $1
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get book: {}", e)))?;

        match row {
            Some(row) => Ok(Some(row_to_book(&row)?)),
            None => Ok(None),
        }
    }

    async fn create(&self, book: Book) -> Result<Book, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO books (id, title, author, genre, summary, author_bio, reviews)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(book.id().as_str())
        .bind(book.title())
        .bind(book.author())
        .bind(book.genre())
        .bind(book.summary())
        .bind(book.author_bio())
        .bind(Json(book.reviews()))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            let msg = e.to_string();

            if msg.contains("duplicate key") || msg.contains("unique constraint") {
                DomainError::conflict(format!("Book '{}' already exists", book.id()))
            } else {
                DomainError::storage(format!("Failed to create book: {}", e))
            }
        })?;

        Ok(book)
    }

    async fn find_by_genre(&self, genre: &str) -> Result<Vec<Book>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, author, genre, summary, author_bio, reviews
            FROM books
            WHERE genre = $1
            ORDER BY title
            "#,
        )
        .bind(genre)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to find books by genre: {}", e)))?;

        let mut books = Vec::with_capacity(rows.len());

        for row in rows {
            books.push(row_to_book(&row)?);
        }

        Ok(books)
    }

    async fn append_review(&self, id: &BookId, review: Review) -> Result<Review, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE books
            SET reviews = reviews || $2::jsonb
            WHERE id = $1
            "#,
        )
        .bind(id.as_str())
        .bind(Json(&review))
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to append review: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!("Book '{}' not found", id)));
        }

        Ok(review)
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to count books: {}", e)))?;

        Ok(count as usize)
    }
}

fn row_to_book(row: &sqlx::postgres::PgRow) -> Result<Book, DomainError> {
    let id: String = row.get("id");
    let title: String = row.get("title");
    let author: String = row.get("author");
    let genre: String = row.get("genre");
    let summary: Option<String> = row.get("summary");
    let author_bio: Option<String> = row.get("author_bio");
    let Json(reviews): Json<Vec<Review>> = row.get("reviews");

    let book_id = BookId::new(&id)
        .map_err(|e| DomainError::storage(format!("Invalid book ID in database: {}", e)))?;

    Ok(Book::restore(
        book_id, title, author, genre, summary, author_bio, reviews,
    ))
}
