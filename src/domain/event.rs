//! Catalog events pushed over the notification channel
//!
//! A closed set of typed variants rather than an open-ended payload. The
//! serialized `type` tag is the event name clients match on.

use serde::{Deserialize, Serialize};

use super::book::{BookId, Review};

/// Events emitted by the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CatalogEvent {
    /// A review was durably appended to a book
    #[serde(rename = "newReview", rename_all = "camelCase")]
    ReviewAdded { book_id: BookId, review: Review },
}
