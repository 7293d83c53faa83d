use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Router,
};
use serde::Serialize;

use crate::db::{Question, TriviaStore};
use crate::server::{app::AppState, extractors::Id};
use crate::trivia;

use super::{ok, ApiResponse, PageParams};

#[derive(Serialize)]
struct CategoriesBody {
    categories: BTreeMap<i64, String>,
    total_categories: usize,
}

#[derive(Serialize)]
struct CategoryQuestionsBody {
    questions: Vec<Question>,
    total_questions: usize,
    current_category: i64,
}

async fn get_categories(
    State(store): State<Arc<dyn TriviaStore>>,
) -> ApiResponse<CategoriesBody> {
    let categories = trivia::list_categories(store.as_ref()).await?;
    ok(CategoriesBody {
        total_categories: categories.len(),
        categories,
    })
}

#[tracing::instrument(skip_all, fields(category = id))]
async fn category_questions(
    State(store): State<Arc<dyn TriviaStore>>,
    Id(id): Id,
    Query(params): Query<PageParams>,
) -> ApiResponse<CategoryQuestionsBody> {
    let page = trivia::list_by_category(store.as_ref(), id, params.page).await?;
    ok(CategoryQuestionsBody {
        questions: page.questions,
        total_questions: page.total,
        current_category: page.category.id,
    })
}

pub fn category_router(state: AppState) -> Router {
    Router::new()
        .route("/categories", get(get_categories))
        .route("/categories/{id}/questions", get(category_questions))
        .with_state(state)
}
