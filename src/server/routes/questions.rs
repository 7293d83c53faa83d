use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::{delete, get, post},
    Router,
};
use serde::{Deserialize, Serialize};

use crate::db::{Question, TriviaStore};
use crate::server::{
    app::AppState,
    extractors::{ApiJson, Id},
};
use crate::telemetry::{QUESTIONS_CREATED, QUESTIONS_DELETED};
use crate::trivia::{self, QuestionDraft};

use super::{ok, ApiResponse, PageParams};

#[derive(Deserialize)]
struct SearchBody {
    #[serde(rename = "searchTerm")]
    search_term: String,
}

#[derive(Serialize)]
struct QuestionsPage {
    questions: Vec<Question>,
    total_questions: usize,
    categories: BTreeMap<i64, String>,
    total_categories: usize,
    current_category: Option<i64>,
}

#[derive(Serialize)]
struct SearchResults {
    questions: Vec<Question>,
    total_questions: usize,
    current_category: Option<i64>,
}

#[derive(Serialize)]
struct Deleted {
    deleted: i64,
    questions: Vec<Question>,
    total_questions: usize,
}

#[derive(Serialize)]
struct Created {
    created: i64,
    questions: Vec<Question>,
    total_questions: usize,
}

async fn get_questions(
    State(store): State<Arc<dyn TriviaStore>>,
    Query(params): Query<PageParams>,
) -> ApiResponse<QuestionsPage> {
    let all = store.questions().await?;
    let questions = trivia::paginate(&all, params.page)?;
    let categories = trivia::category_map(store.categories().await?);
    ok(QuestionsPage {
        questions,
        total_questions: all.len(),
        total_categories: categories.len(),
        categories,
        current_category: None,
    })
}

async fn delete_question(
    State(store): State<Arc<dyn TriviaStore>>,
    Id(id): Id,
) -> ApiResponse<Deleted> {
    let deleted = trivia::delete(store.as_ref(), id).await?;
    QUESTIONS_DELETED.inc();
    tracing::info!(question = deleted, "Question deleted");

    let remaining = store.questions().await?;
    ok(Deleted {
        deleted,
        questions: trivia::first_page(&remaining),
        total_questions: remaining.len(),
    })
}

async fn create_question(
    State(store): State<Arc<dyn TriviaStore>>,
    ApiJson(draft): ApiJson<QuestionDraft>,
) -> ApiResponse<Created> {
    let created = trivia::create(store.as_ref(), draft).await?;
    QUESTIONS_CREATED.inc();
    tracing::info!(question = created, "Question created");

    let all = store.questions().await?;
    ok(Created {
        created,
        questions: trivia::first_page(&all),
        total_questions: all.len(),
    })
}

async fn search_questions(
    State(store): State<Arc<dyn TriviaStore>>,
    ApiJson(body): ApiJson<SearchBody>,
) -> ApiResponse<SearchResults> {
    let questions = trivia::search(store.as_ref(), &body.search_term).await?;
    ok(SearchResults {
        total_questions: questions.len(),
        questions,
        current_category: None,
    })
}

pub fn questions_router(state: AppState) -> Router {
    Router::new()
        .route("/questions", get(get_questions).post(create_question))
        .route("/questions/search", post(search_questions))
        .route("/questions/{id}", delete(delete_question))
        .with_state(state)
}
