use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use super::{category_map, lenient_int, CategoryMap, Outcome, QuestionResponse};
use crate::error::TriviaResult;
use fyyur_db::entities::question;
use fyyur_db::AppState;

pub const QUESTIONS_PER_PAGE: u64 = 10;

#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<String>,
}

/// 1-based page number. Anything unparseable or below 1 means page 1.
pub fn page_number(raw: Option<&str>) -> u64 {
    raw.and_then(|p| p.trim().parse::<i64>().ok())
        .filter(|p| *p >= 1)
        .map(|p| p as u64)
        .unwrap_or(1)
}

/// Row offset of a page, capped at the largest OFFSET Postgres accepts.
pub fn page_offset(page: u64) -> u64 {
    page.saturating_sub(1)
        .saturating_mul(QUESTIONS_PER_PAGE)
        .min(i64::MAX as u64)
}

#[derive(Debug, Serialize)]
pub struct QuestionsPage {
    pub total_questions: u64,
    pub questions: Vec<QuestionResponse>,
    pub categories: CategoryMap,
    pub current_category: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct QuestionList {
    pub total_questions: u64,
    pub questions: Vec<QuestionResponse>,
    pub current_category: Option<i32>,
}

/// GET /questions?page=N
pub async fn list_questions(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PageParams>,
) -> TriviaResult<Json<QuestionsPage>> {
    let page = page_number(params.page.as_deref());

    let offset = page_offset(page);

    let total_questions = question::Entity::find().count(&state.db).await?;
    let questions = if offset >= total_questions {
        Vec::new()
    } else {
        question::Entity::find()
            .order_by_asc(question::Column::Id)
            .offset(offset)
            .limit(QUESTIONS_PER_PAGE)
            .all(&state.db)
            .await?
    };

    Ok(Json(QuestionsPage {
        total_questions,
        questions: questions.into_iter().map(QuestionResponse::from).collect(),
        categories: category_map(&state.db).await?,
        current_category: None,
    }))
}

/// DELETE /questions/:id
///
/// A missing question is a handled outcome (404 with `{error: true}`). A
/// non-numeric id never matches the route and gets the plain 404 page.
pub async fn delete_question(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i32>, PathRejection>,
) -> TriviaResult<(StatusCode, Json<Outcome>)> {
    let Path(id) = id?;

    let Some(existing) = question::Entity::find_by_id(id).one(&state.db).await? else {
        return Ok((
            StatusCode::NOT_FOUND,
            Json(Outcome::failed("Question not found")),
        ));
    };

    existing.delete(&state.db).await?;
    tracing::info!(question_id = id, "question deleted");

    Ok((StatusCode::CREATED, Json(Outcome::ok())))
}

/// A question submission that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuestion {
    pub question: String,
    pub answer: String,
    pub category: i32,
    pub difficulty: i32,
}

impl NewQuestion {
    /// Question longer than 5 characters, answer longer than 1, category and
    /// difficulty integers (or numeric strings).
    pub fn from_json(body: &Value) -> Option<Self> {
        let question = body.get("question")?.as_str()?;
        let answer = body.get("answer")?.as_str()?;
        let category = lenient_int(body.get("category")?)?;
        let difficulty = lenient_int(body.get("difficulty")?)?;

        if question.chars().count() <= 5 || answer.chars().count() <= 1 {
            return None;
        }

        Some(Self {
            question: question.to_string(),
            answer: answer.to_string(),
            category,
            difficulty,
        })
    }
}

/// POST /questions/create
pub async fn create_question(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> (StatusCode, Json<Outcome>) {
    let failed = (
        StatusCode::BAD_REQUEST,
        Json(Outcome::failed("Failed to add question")),
    );

    let Some(submitted) = body.ok().and_then(|Json(v)| NewQuestion::from_json(&v)) else {
        return failed;
    };

    let model = question::ActiveModel {
        question: Set(submitted.question),
        answer: Set(submitted.answer),
        category: Set(submitted.category),
        difficulty: Set(submitted.difficulty),
        ..Default::default()
    };

    match model.insert(&state.db).await {
        Ok(created) => {
            tracing::info!(question_id = created.id, "question added");
            (StatusCode::CREATED, Json(Outcome::ok()))
        }
        Err(e) => {
            tracing::error!("failed to insert question: {e}");
            failed
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchBody {
    #[serde(rename = "searchTerm", default)]
    pub search_term: Option<String>,
}

/// Lowercase `%term%` with LIKE wildcards escaped. A missing term matches
/// every question.
pub fn search_pattern(term: Option<&str>) -> String {
    let escaped = term
        .unwrap_or_default()
        .trim()
        .to_lowercase()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

/// POST /questions/search
pub async fn search_questions(
    State(state): State<Arc<AppState>>,
    body: Result<Json<SearchBody>, JsonRejection>,
) -> TriviaResult<Json<QuestionList>> {
    let Json(body) = body?;
    let pattern = search_pattern(body.search_term.as_deref());

    let total_questions = question::Entity::find().count(&state.db).await?;
    let questions = question::Entity::find()
        .filter(Expr::expr(Func::lower(Expr::col(question::Column::Question))).like(pattern))
        .order_by_asc(question::Column::Id)
        .all(&state.db)
        .await?;

    Ok(Json(QuestionList {
        total_questions,
        questions: questions.into_iter().map(QuestionResponse::from).collect(),
        current_category: None,
    }))
}

/// GET /categories/:id/questions
pub async fn questions_by_category(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i32>, PathRejection>,
) -> TriviaResult<Json<QuestionList>> {
    let Path(category_id) = id?;

    let total_questions = question::Entity::find().count(&state.db).await?;
    let questions = question::Entity::find()
        .filter(question::Column::Category.eq(category_id))
        .order_by_asc(question::Column::Id)
        .all(&state.db)
        .await?;

    Ok(Json(QuestionList {
        total_questions,
        questions: questions.into_iter().map(QuestionResponse::from).collect(),
        current_category: None,
    }))
}
