pub mod categories;
pub mod questions;
pub mod quizzes;

use fyyur_db::entities::{category, question};
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::error::TriviaResult;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct QuestionResponse {
    pub id: i32,
    pub question: String,
    pub answer: String,
    pub category: i32,
    pub difficulty: i32,
}

impl From<question::Model> for QuestionResponse {
    fn from(q: question::Model) -> Self {
        Self {
            id: q.id,
            question: q.question,
            answer: q.answer,
            category: q.category,
            difficulty: q.difficulty,
        }
    }
}

/// `{error: false}` on success, `{error: true, msg}` on a handled failure.
#[derive(Debug, Serialize)]
pub struct Outcome {
    pub error: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg: Option<&'static str>,
}

impl Outcome {
    pub fn ok() -> Self {
        Self {
            error: false,
            msg: None,
        }
    }

    pub fn failed(msg: &'static str) -> Self {
        Self {
            error: true,
            msg: Some(msg),
        }
    }
}

/// Category id to category name.
pub type CategoryMap = BTreeMap<i32, String>;

pub async fn category_map(db: &DatabaseConnection) -> TriviaResult<CategoryMap> {
    Ok(category::Entity::find()
        .order_by_asc(category::Column::Id)
        .all(db)
        .await?
        .into_iter()
        .map(|c| (c.id, c.kind))
        .collect())
}

/// Integers arrive either as JSON numbers or as numeric strings.
pub fn lenient_int(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => n.as_i64().and_then(|v| i32::try_from(v).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
