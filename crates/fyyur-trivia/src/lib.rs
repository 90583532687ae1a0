//! Trivia question bank API: categories, paginated questions, search and a
//! random quiz draw.

pub mod api;
pub mod error;

use axum::{
    http::Method,
    routing::{delete, get, post},
    Router,
};
use fyyur_db::AppState;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use error::TriviaError;

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any);

    Router::new()
        .route("/categories", get(api::categories::list_categories))
        .route(
            "/categories/{id}/questions",
            get(api::questions::questions_by_category),
        )
        .route("/questions", get(api::questions::list_questions))
        .route("/questions/{id}", delete(api::questions::delete_question))
        .route("/questions/create", post(api::questions::create_question))
        .route("/questions/search", post(api::questions::search_questions))
        .route("/quizzes", post(api::quizzes::next_question))
        .fallback(|| async { TriviaError::NotFound })
        .method_not_allowed_fallback(|| async { TriviaError::MethodNotAllowed })
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
