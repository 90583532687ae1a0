//! JSON error bodies for the trivia API.

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TriviaError {
    #[error("Invalid Data")]
    BadRequest,

    /// No trivia route requires credentials. Kept so every status the
    /// trivia frontend handles has a matching JSON body.
    #[error("Unauthorized request")]
    Unauthorized,

    #[error("Page Not Found")]
    NotFound,

    #[error("Method Not Allowed")]
    MethodNotAllowed,

    #[error("Unprocessable Entity")]
    Unprocessable,

    #[error("Something went wrong !")]
    Internal,
}

impl TriviaError {
    pub fn status(self) -> StatusCode {
        match self {
            TriviaError::BadRequest => StatusCode::BAD_REQUEST,
            TriviaError::Unauthorized => StatusCode::UNAUTHORIZED,
            TriviaError::NotFound => StatusCode::NOT_FOUND,
            TriviaError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            TriviaError::Unprocessable => StatusCode::UNPROCESSABLE_ENTITY,
            TriviaError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for TriviaError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({
            "code": status.as_u16(),
            "error": true,
            "msg": self.to_string(),
        }));
        (status, body).into_response()
    }
}

impl From<sea_orm::DbErr> for TriviaError {
    fn from(e: sea_orm::DbErr) -> Self {
        tracing::error!("database error: {e}");
        TriviaError::Internal
    }
}

impl From<JsonRejection> for TriviaError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!("rejected request body: {rejection}");
        match rejection.status() {
            StatusCode::UNPROCESSABLE_ENTITY => TriviaError::Unprocessable,
            _ => TriviaError::BadRequest,
        }
    }
}

/// Non-integer ids never match a route.
impl From<PathRejection> for TriviaError {
    fn from(_: PathRejection) -> Self {
        TriviaError::NotFound
    }
}

pub type TriviaResult<T> = Result<T, TriviaError>;
