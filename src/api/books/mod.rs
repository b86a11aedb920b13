//! Book API endpoints
//!
//! Genre suggestions, review appends, and review listings.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::book::{Book, Review};
use crate::infrastructure::book::{AddReviewRequest, ReviewView};

/// Create the books router
pub fn create_books_router() -> Router<AppState> {
    Router::new()
        .route("/suggest", get(suggest))
        .route("/{id}/review", post(add_review))
        .route("/{id}/reviews", get(list_reviews))
}

/// Query parameters for genre suggestions
#[derive(Debug, Deserialize)]
pub struct SuggestParams {
    pub genre: Option<String>,
}

/// Review submission body
///
/// The reviewer id travels in the body rather than a token; gating this
/// route behind `RequireUser` is a known follow-up.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddReviewBody {
    pub user_id: String,
    pub review: String,
    pub rating: i32,
}

/// Review submission response
#[derive(Debug, Serialize)]
pub struct AddReviewResponse {
    pub message: String,
    pub review: Review,
}

/// Suggest books by genre
///
/// GET /api/books/suggest?genre=X
///
/// Exact, case-sensitive genre match; a missing or empty genre matches no
/// books.
pub async fn suggest(
    State(state): State<AppState>,
    Query(params): Query<SuggestParams>,
) -> Result<Json<Vec<Book>>, ApiError> {
    let genre = params.genre.unwrap_or_default();
    let books = state.catalog_service.suggest(&genre).await?;

    Ok(Json(books))
}

/// Add a review to a book
///
/// POST /api/books/{id}/review
///
/// Returns 201 with the persisted review; 404 for an unknown book, 400 for
/// a rating outside [1, 5].
pub async fn add_review(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<AddReviewBody>,
) -> Result<(StatusCode, Json<AddReviewResponse>), ApiError> {
    let review = state
        .catalog_service
        .add_review(
            &id,
            AddReviewRequest {
                user_id: body.user_id,
                text: body.review,
                rating: body.rating,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(AddReviewResponse {
            message: "Review added successfully".to_string(),
            review,
        }),
    ))
}

/// List a book's reviews
///
/// GET /api/books/{id}/reviews
///
/// Reviewer ids are resolved to usernames; an unknown book is a 404, never
/// an empty list.
pub async fn list_reviews(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<ReviewView>>, ApiError> {
    let reviews = state.catalog_service.reviews(&id).await?;

    Ok(Json(reviews))
}
