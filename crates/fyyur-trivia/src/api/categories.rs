use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use super::{category_map, CategoryMap};
use crate::error::TriviaResult;
use fyyur_db::AppState;

#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
    pub categories: CategoryMap,
}

/// GET /categories
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> TriviaResult<Json<CategoriesResponse>> {
    Ok(Json(CategoriesResponse {
        categories: category_map(&state.db).await?,
    }))
}
