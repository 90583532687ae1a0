use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use rand::Rng;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;

use super::{lenient_int, QuestionResponse};
use crate::error::TriviaResult;
use fyyur_db::entities::question;
use fyyur_db::AppState;

/// Category id meaning "any category".
pub const ALL_CATEGORIES: i32 = 0;

#[derive(Debug, Default, Deserialize)]
pub struct QuizCategory {
    #[serde(default)]
    pub id: Value,
}

#[derive(Debug, Default, Deserialize)]
pub struct QuizRequest {
    #[serde(default)]
    pub previous_questions: Vec<i32>,
    #[serde(default)]
    pub quiz_category: Option<QuizCategory>,
}

impl QuizRequest {
    pub fn category(&self) -> i32 {
        self.quiz_category
            .as_ref()
            .and_then(|c| lenient_int(&c.id))
            .unwrap_or(ALL_CATEGORIES)
    }
}

#[derive(Debug, Serialize)]
pub struct QuizResponse {
    pub question: Option<QuestionResponse>,
}

/// Uniformly random candidate whose id is not in `previous`.
pub fn pick_question<R: Rng + ?Sized>(
    candidates: Vec<question::Model>,
    previous: &[i32],
    rng: &mut R,
) -> Option<question::Model> {
    let previous: HashSet<i32> = previous.iter().copied().collect();
    let mut pool: Vec<question::Model> = candidates
        .into_iter()
        .filter(|q| !previous.contains(&q.id))
        .collect();

    if pool.is_empty() {
        return None;
    }
    let idx = rng.random_range(0..pool.len());
    Some(pool.swap_remove(idx))
}

/// POST /quizzes
pub async fn next_question(
    State(state): State<Arc<AppState>>,
    body: Result<Json<QuizRequest>, JsonRejection>,
) -> TriviaResult<Json<QuizResponse>> {
    let Json(req) = body?;
    let category = req.category();

    let mut query = question::Entity::find();
    if category > ALL_CATEGORIES {
        query = query.filter(question::Column::Category.eq(category));
    }
    if !req.previous_questions.is_empty() {
        query = query.filter(question::Column::Id.is_not_in(req.previous_questions.clone()));
    }
    let candidates = query
        .order_by_asc(question::Column::Id)
        .all(&state.db)
        .await?;

    let picked = pick_question(candidates, &req.previous_questions, &mut rand::rng());
    if picked.is_none() {
        tracing::debug!(category, asked = req.previous_questions.len(), "quiz exhausted");
    }

    Ok(Json(QuizResponse {
        question: picked.map(QuestionResponse::from),
    }))
}
