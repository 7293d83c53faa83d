use std::sync::Arc;

use axum::{extract::State, routing::post, Router};
use serde::{Deserialize, Serialize};

use crate::db::{Question, TriviaStore};
use crate::server::{app::AppState, deserializers::QuizCategory, extractors::ApiJson};
use crate::telemetry::QUIZ_QUESTIONS_SERVED;
use crate::trivia;

use super::{ok, ApiResponse};

#[derive(Default, Deserialize)]
struct QuizRequest {
    #[serde(default)]
    previous_questions: Option<Vec<i64>>,
    #[serde(default)]
    quiz_category: Option<QuizCategory>,
}

#[derive(Serialize)]
struct QuizQuestion {
    question: Option<Question>,
}

#[tracing::instrument(skip_all)]
async fn next_question(
    State(store): State<Arc<dyn TriviaStore>>,
    request: Option<ApiJson<QuizRequest>>,
) -> ApiResponse<QuizQuestion> {
    let request = request.map(|ApiJson(r)| r).unwrap_or_default();
    let category = request.quiz_category.as_ref().and_then(QuizCategory::filter);
    let previous = request.previous_questions.unwrap_or_default();

    let candidates = trivia::quiz_candidates(store.as_ref(), category).await?;
    let question = trivia::pick_quiz_question(candidates, &previous, &mut rand::thread_rng());

    match &question {
        Some(q) => {
            let label = category.map_or_else(|| "all".to_string(), |id| id.to_string());
            QUIZ_QUESTIONS_SERVED.with_label_values(&[label.as_str()]).inc();
            tracing::debug!(question = q.id, seen = previous.len(), "Quiz question picked");
        }
        None => tracing::debug!(seen = previous.len(), "Quiz exhausted"),
    }

    ok(QuizQuestion { question })
}

pub fn quizzes_router(state: AppState) -> Router {
    Router::new()
        .route("/quizzes", post(next_question))
        .with_state(state)
}
