use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use trivia_api::configuration::DatabaseSettings;
use trivia_api::db::{establish_connection, run_migrations, NewQuestion, SqliteStore, TriviaStore};
use trivia_api::server::app;

struct TestApp {
    router: Router,
    store: Arc<SqliteStore>,
}

impl TestApp {
    async fn new() -> Self {
        let settings = DatabaseSettings {
            url: "sqlite::memory:".to_string().into(),
            max_connections: 1,
        };
        let pool = establish_connection(&settings).await.unwrap();
        run_migrations(&pool).await.unwrap();
        let store = Arc::new(SqliteStore::new(pool));
        Self {
            router: app(store.clone()),
            store,
        }
    }

    /// `count` questions spread round-robin over the six seeded categories.
    async fn with_questions(count: i64) -> Self {
        let app = Self::new().await;
        for n in 1..=count {
            app.store
                .create_question(&NewQuestion {
                    question: format!("Question number {n}?"),
                    answer: format!("Answer {n}"),
                    category: (n - 1) % 6 + 1,
                    difficulty: n % 5 + 1,
                })
                .await
                .unwrap();
        }
        app
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .method("DELETE")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }
}

fn ids(questions: &Value) -> Vec<i64> {
    questions
        .as_array()
        .unwrap()
        .iter()
        .map(|q| q["id"].as_i64().unwrap())
        .collect()
}

#[tokio::test]
async fn get_categories() {
    let app = TestApp::new().await;
    let (status, data) = app.get("/categories").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(data["success"], true);
    assert_eq!(data["total_categories"], 6);
    assert_eq!(data["categories"]["1"], "Science");
    assert_eq!(data["categories"]["6"], "Sports");
}

#[tokio::test]
async fn get_questions_first_page() {
    let app = TestApp::with_questions(23).await;
    let (status, data) = app.get("/questions").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(data["success"], true);
    assert_eq!(data["total_questions"], 23);
    assert_eq!(data["questions"].as_array().unwrap().len(), 10);
    assert_eq!(data["total_categories"], 6);
    assert_eq!(data["categories"]["2"], "Art");
    assert!(data["current_category"].is_null());

    let question = &data["questions"][0];
    assert_eq!(question["question"], "Question number 1?");
    assert_eq!(question["answer"], "Answer 1");
    assert_eq!(question["category"], 1);
}

#[tokio::test]
async fn get_questions_last_page_is_partial() {
    let app = TestApp::with_questions(23).await;
    let (status, data) = app.get("/questions?page=3").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(data["questions"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn non_numeric_page_means_first_page() {
    let app = TestApp::with_questions(12).await;
    let (status, data) = app.get("/questions?page=abc").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&data["questions"]), (1..=10).collect::<Vec<_>>());
}

#[tokio::test]
async fn page_out_of_range_is_404() {
    let app = TestApp::with_questions(5).await;
    let (status, data) = app.get("/questions?page=10000").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(data["success"], false);
    assert_eq!(data["error"], 404);
    assert_eq!(data["message"], "resource not found");
}

#[tokio::test]
async fn empty_bank_has_no_questions_page() {
    let app = TestApp::new().await;
    let (status, _) = app.get("/questions").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_question() {
    let app = TestApp::with_questions(5).await;
    let (status, data) = app.delete("/questions/5").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(data["success"], true);
    assert_eq!(data["deleted"], 5);
    assert_eq!(data["total_questions"], 4);
    assert_eq!(ids(&data["questions"]), vec![1, 2, 3, 4]);

    let (status, data) = app.delete("/questions/5").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(data["message"], "resource not found");
}

#[tokio::test]
async fn delete_unknown_question_is_404() {
    let app = TestApp::with_questions(3).await;
    let (status, data) = app.delete("/questions/10220").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(data["success"], false);
}

#[tokio::test]
async fn delete_with_non_numeric_id_is_404() {
    let app = TestApp::with_questions(3).await;
    let (status, data) = app.delete("/questions/abc").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(data["success"], false);
}

#[tokio::test]
async fn post_question() {
    let app = TestApp::with_questions(2).await;
    let (status, data) = app
        .post(
            "/questions",
            json!({"question": "the question", "answer": "the answer", "category": 1, "difficulty": 1}),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(data["success"], true);
    assert_eq!(data["created"], 3);
    assert_eq!(data["total_questions"], 3);
    assert_eq!(data["questions"].as_array().unwrap().len(), 3);

    let (_, data) = app.post("/questions/search", json!({"searchTerm": "the question"})).await;
    assert_eq!(ids(&data["questions"]), vec![3]);
}

#[tokio::test]
async fn post_question_accepts_string_category() {
    let app = TestApp::new().await;
    let (status, data) = app
        .post(
            "/questions",
            json!({"question": "q", "answer": "a", "category": "4", "difficulty": 2}),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(data["questions"][0]["category"], 4);
}

#[tokio::test]
async fn bad_post_question_request_is_400() {
    let app = TestApp::new().await;
    let (status, data) = app
        .post(
            "/questions",
            json!({"question": 55, "answer": "the answer", "category": "Art", "difficulty": 1}),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(data["success"], false);
    assert_eq!(data["message"], "bad_request");
}

#[tokio::test]
async fn blank_or_missing_fields_are_400() {
    let app = TestApp::new().await;

    let (status, _) = app
        .post(
            "/questions",
            json!({"question": "  ", "answer": "a", "category": 1, "difficulty": 1}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post("/questions", json!({"question": "q", "category": 1, "difficulty": 1}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .send(
            Request::builder()
                .method("POST")
                .uri("/questions")
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_category_or_difficulty_is_422() {
    let app = TestApp::new().await;

    let (status, data) = app
        .post(
            "/questions",
            json!({"question": "q", "answer": "a", "category": 99, "difficulty": 1}),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(data["message"], "unprocessable");

    let (status, _) = app
        .post(
            "/questions",
            json!({"question": "q", "answer": "a", "category": 1, "difficulty": 6}),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(app.store.questions().await.unwrap().is_empty());
}

#[tokio::test]
async fn search_is_case_insensitive_substring() {
    let app = TestApp::new().await;
    for text in ["What is the Title of the book?", "Whose title is this?", "Unrelated"] {
        app.post(
            "/questions",
            json!({"question": text, "answer": "a", "category": 2, "difficulty": 1}),
        )
        .await;
    }

    let (status, data) = app.post("/questions/search", json!({"searchTerm": "title"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(data["success"], true);
    assert_eq!(data["total_questions"], 2);
    assert_eq!(ids(&data["questions"]), vec![1, 2]);
    assert!(data["current_category"].is_null());
}

#[tokio::test]
async fn search_folds_accented_letters() {
    let app = TestApp::new().await;
    for text in ["Which city has the Musée d'Orsay?", "Who painted Guernica?"] {
        app.post(
            "/questions",
            json!({"question": text, "answer": "a", "category": 2, "difficulty": 1}),
        )
        .await;
    }

    let (status, data) = app.post("/questions/search", json!({"searchTerm": "MUSÉE"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(data["total_questions"], 1);
    assert_eq!(ids(&data["questions"]), vec![1]);
}

#[tokio::test]
async fn search_without_matches_is_empty_not_404() {
    let app = TestApp::with_questions(3).await;
    let (status, data) = app.post("/questions/search", json!({"searchTerm": "zebra"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(data["total_questions"], 0);
    assert!(data["questions"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn search_without_term_is_400() {
    let app = TestApp::new().await;
    let (status, _) = app.post("/questions/search", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn get_questions_by_category() {
    let app = TestApp::with_questions(12).await;
    let (status, data) = app.get("/categories/1/questions").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(data["success"], true);
    assert_eq!(data["total_questions"], 2);
    assert_eq!(data["current_category"], 1);
    assert_eq!(ids(&data["questions"]), vec![1, 7]);
}

#[tokio::test]
async fn questions_of_unknown_or_empty_category_are_404() {
    let app = TestApp::with_questions(3).await;

    let (status, _) = app.get("/categories/99/questions").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.get("/categories/6/questions").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn quiz_excludes_previous_questions() {
    let app = TestApp::with_questions(12).await;
    let (status, data) = app
        .post(
            "/quizzes",
            json!({"previous_questions": [1], "quiz_category": {"type": "Science", "id": "1"}}),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(data["success"], true);
    assert_eq!(data["question"]["id"], 7);
    assert_eq!(data["question"]["category"], 1);
}

#[tokio::test]
async fn quiz_returns_null_when_exhausted() {
    let app = TestApp::with_questions(12).await;
    let (status, data) = app
        .post("/quizzes", json!({"previous_questions": [1, 7], "quiz_category": 1}))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(data["success"], true);
    assert!(data["question"].is_null());
}

#[tokio::test]
async fn quiz_over_all_categories_visits_every_question() {
    let app = TestApp::with_questions(8).await;
    let mut previous: Vec<i64> = vec![];

    loop {
        let (status, data) = app
            .post(
                "/quizzes",
                json!({"previous_questions": previous, "quiz_category": {"type": "click", "id": 0}}),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        let Some(id) = data["question"]["id"].as_i64() else {
            break;
        };
        assert!(!previous.contains(&id));
        previous.push(id);
    }

    previous.sort_unstable();
    assert_eq!(previous, (1..=8).collect::<Vec<_>>());
}

#[tokio::test]
async fn quiz_with_empty_body_draws_from_everything() {
    let app = TestApp::with_questions(1).await;
    let (status, data) = app.post("/quizzes", json!({})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(data["question"]["id"], 1);
}

#[tokio::test]
async fn quiz_without_body_draws_from_everything() {
    let app = TestApp::with_questions(1).await;
    let (status, data) = app
        .send(
            Request::builder()
                .method("POST")
                .uri("/quizzes")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(data["success"], true);
    assert_eq!(data["question"]["id"], 1);
}

#[tokio::test]
async fn quiz_with_declared_but_broken_body_is_400() {
    let app = TestApp::with_questions(1).await;
    let (status, data) = app
        .send(
            Request::builder()
                .method("POST")
                .uri("/quizzes")
                .header("content-type", "application/json")
                .body(Body::from("{\"previous_questions\": ["))
                .unwrap(),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(data["success"], false);
}

#[tokio::test]
async fn quiz_in_unknown_category_is_404() {
    let app = TestApp::with_questions(3).await;
    let (status, _) = app
        .post("/quizzes", json!({"previous_questions": [], "quiz_category": 42}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_route_uses_json_error() {
    let app = TestApp::new().await;
    let (status, data) = app.get("/nope").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(data["success"], false);
    assert_eq!(data["message"], "resource not found");

    let (status, data) = app.delete("/nope/1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(data["error"], 404);
}

#[tokio::test]
async fn wrong_method_uses_json_error() {
    let app = TestApp::new().await;
    let (status, data) = app.get("/quizzes").await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(data["success"], false);
    assert_eq!(data["error"], 405);
}

#[tokio::test]
async fn metrics_are_exposed() {
    let app = TestApp::with_questions(1).await;
    app.post("/quizzes", json!({})).await;

    let response = app
        .router
        .clone()
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("trivia_quiz_questions_served_total"));
}
