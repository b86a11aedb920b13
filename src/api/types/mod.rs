//! Shared API types - error translation and JSON extraction

mod error;
mod json;

pub use error::{ApiError, ApiErrorDetail, ApiErrorResponse, ApiErrorType};
pub use json::Json;
