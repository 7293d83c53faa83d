//! Repository interface the HTTP layer talks to.

use async_trait::async_trait;
use sqlx::SqlitePool;

use super::queries::{categories, questions};
use super::{Category, NewQuestion, Question};

#[async_trait]
pub trait TriviaStore: Send + Sync + 'static {
    async fn categories(&self) -> sqlx::Result<Vec<Category>>;

    async fn category(&self, id: i64) -> sqlx::Result<Option<Category>>;

    /// All questions, ascending by id.
    async fn questions(&self) -> sqlx::Result<Vec<Question>>;

    async fn questions_in_category(&self, category: i64) -> sqlx::Result<Vec<Question>>;

    /// Case-insensitive substring match on the question text.
    async fn search_questions(&self, term: &str) -> sqlx::Result<Vec<Question>>;

    async fn create_question(&self, question: &NewQuestion) -> sqlx::Result<i64>;

    /// Returns whether a question with this id existed.
    async fn delete_question(&self, id: i64) -> sqlx::Result<bool>;
}

#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TriviaStore for SqliteStore {
    async fn categories(&self) -> sqlx::Result<Vec<Category>> {
        categories::get_all_categories(&self.pool).await
    }

    async fn category(&self, id: i64) -> sqlx::Result<Option<Category>> {
        categories::get_category(&self.pool, id).await
    }

    async fn questions(&self) -> sqlx::Result<Vec<Question>> {
        questions::get_all_questions(&self.pool).await
    }

    async fn questions_in_category(&self, category: i64) -> sqlx::Result<Vec<Question>> {
        questions::get_questions_by_category(&self.pool, category).await
    }

    async fn search_questions(&self, term: &str) -> sqlx::Result<Vec<Question>> {
        questions::search_questions(&self.pool, term).await
    }

    async fn create_question(&self, question: &NewQuestion) -> sqlx::Result<i64> {
        questions::create_question(&self.pool, question).await
    }

    async fn delete_question(&self, id: i64) -> sqlx::Result<bool> {
        questions::delete_question(&self.pool, id).await
    }
}
