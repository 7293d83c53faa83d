mod categories;
mod questions;
mod quizzes;

pub use categories::category_router;
pub use questions::questions_router;
pub use quizzes::quizzes_router;

use axum::Json;
use serde::{Deserialize, Serialize};

use super::deserializers::deserialize_page;
use super::error::ApiError;

/// Successful responses carry `"success": true` next to their own fields.
#[derive(Serialize)]
pub struct Success<T> {
    success: bool,
    #[serde(flatten)]
    body: T,
}

pub type ApiResponse<T> = Result<Json<Success<T>>, ApiError>;

fn ok<T: Serialize>(body: T) -> ApiResponse<T> {
    Ok(Json(Success {
        success: true,
        body,
    }))
}

#[derive(Deserialize)]
struct PageParams {
    #[serde(default = "first_page", deserialize_with = "deserialize_page")]
    page: i64,
}

fn first_page() -> i64 {
    1
}
