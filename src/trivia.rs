//! Question retrieval and quiz selection on top of a [`TriviaStore`].
//!
//! Listings are fetched whole and sliced into fixed pages of
//! [`QUESTIONS_PER_PAGE`]; an empty slice is reported as not found so that
//! clients can stop paging.

use std::collections::{BTreeMap, HashSet};

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;

use crate::db::{Category, NewQuestion, Question, TriviaStore};

pub const QUESTIONS_PER_PAGE: usize = 10;

pub const MIN_DIFFICULTY: i64 = 1;
pub const MAX_DIFFICULTY: i64 = 5;

#[derive(Debug, thiserror::Error)]
pub enum TriviaError {
    #[error("{0} not found")]
    NotFound(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("store error: {0}")]
    Store(#[from] sqlx::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
        value: i64,
    },

    #[error("category {0} does not exist")]
    UnknownCategory(i64),
}

impl ValidationError {
    /// Malformed input as opposed to well-formed input that makes no sense.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Empty { .. })
    }
}

/// Question fields as submitted by a client. `category` and `difficulty`
/// may arrive as numbers or numeric strings.
#[derive(Debug, Clone, Deserialize)]
pub struct QuestionDraft {
    pub question: String,
    pub answer: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub category: i64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub difficulty: i64,
}

impl QuestionDraft {
    pub fn validate(self) -> Result<NewQuestion, ValidationError> {
        let question = non_empty("question", &self.question)?;
        let answer = non_empty("answer", &self.answer)?;
        if !(MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(&self.difficulty) {
            return Err(ValidationError::OutOfRange {
                field: "difficulty",
                min: MIN_DIFFICULTY,
                max: MAX_DIFFICULTY,
                value: self.difficulty,
            });
        }
        Ok(NewQuestion {
            question,
            answer,
            category: self.category,
            difficulty: self.difficulty,
        })
    }
}

fn non_empty(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    Ok(trimmed.to_string())
}

/// One page of `items`. Pages start at 1.
pub fn paginate<T: Clone>(items: &[T], page: i64) -> Result<Vec<T>, TriviaError> {
    let not_found = || TriviaError::NotFound(format!("page {page}"));
    if page < 1 {
        return Err(not_found());
    }
    let start = usize::try_from(page - 1)
        .ok()
        .and_then(|p| p.checked_mul(QUESTIONS_PER_PAGE))
        .ok_or_else(not_found)?;
    let slice: Vec<T> = items
        .iter()
        .skip(start)
        .take(QUESTIONS_PER_PAGE)
        .cloned()
        .collect();
    if slice.is_empty() {
        return Err(not_found());
    }
    Ok(slice)
}

/// The first page without the emptiness check, used after mutations.
pub fn first_page<T: Clone>(items: &[T]) -> Vec<T> {
    items.iter().take(QUESTIONS_PER_PAGE).cloned().collect()
}

pub fn category_map(categories: Vec<Category>) -> BTreeMap<i64, String> {
    categories.into_iter().map(|c| (c.id, c.kind)).collect()
}

pub async fn list_categories(
    store: &dyn TriviaStore,
) -> Result<BTreeMap<i64, String>, TriviaError> {
    let categories = store.categories().await?;
    if categories.is_empty() {
        return Err(TriviaError::NotFound("categories".to_string()));
    }
    Ok(category_map(categories))
}

pub async fn search(store: &dyn TriviaStore, term: &str) -> Result<Vec<Question>, TriviaError> {
    Ok(store.search_questions(term).await?)
}

pub struct CategoryPage {
    pub category: Category,
    pub questions: Vec<Question>,
    pub total: usize,
}

pub async fn list_by_category(
    store: &dyn TriviaStore,
    category_id: i64,
    page: i64,
) -> Result<CategoryPage, TriviaError> {
    let category = require_category(store, category_id).await?;
    let all = store.questions_in_category(category_id).await?;
    let questions = paginate(&all, page)?;
    Ok(CategoryPage {
        category,
        questions,
        total: all.len(),
    })
}

pub async fn delete(store: &dyn TriviaStore, question_id: i64) -> Result<i64, TriviaError> {
    if !store.delete_question(question_id).await? {
        return Err(TriviaError::NotFound(format!("question {question_id}")));
    }
    Ok(question_id)
}

pub async fn create(store: &dyn TriviaStore, draft: QuestionDraft) -> Result<i64, TriviaError> {
    let question = draft.validate()?;
    if store.category(question.category).await?.is_none() {
        return Err(ValidationError::UnknownCategory(question.category).into());
    }
    Ok(store.create_question(&question).await?)
}

/// Questions a quiz may draw from: one category, or every question when
/// `category_id` is `None`.
pub async fn quiz_candidates(
    store: &dyn TriviaStore,
    category_id: Option<i64>,
) -> Result<Vec<Question>, TriviaError> {
    match category_id {
        Some(id) => {
            require_category(store, id).await?;
            Ok(store.questions_in_category(id).await?)
        }
        None => Ok(store.questions().await?),
    }
}

/// Picks uniformly among `candidates` not listed in `previous`. `None`
/// means the quiz is over.
pub fn pick_quiz_question<R: Rng + ?Sized>(
    candidates: Vec<Question>,
    previous: &[i64],
    rng: &mut R,
) -> Option<Question> {
    let seen: HashSet<i64> = previous.iter().copied().collect();
    let remaining: Vec<Question> = candidates
        .into_iter()
        .filter(|q| !seen.contains(&q.id))
        .collect();
    remaining.choose(rng).cloned()
}

async fn require_category(store: &dyn TriviaStore, id: i64) -> Result<Category, TriviaError> {
    store
        .category(id)
        .await?
        .ok_or_else(|| TriviaError::NotFound(format!("category {id}")))
}
