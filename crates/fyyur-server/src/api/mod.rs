pub mod artists;
pub mod forms;
pub mod home;
pub mod shows;
pub mod venues;

use axum::http::StatusCode;
use axum::Json;
use fyyur_core::ListingError;
use sea_orm::DbErr;
use serde::{Deserialize, Serialize};

/// One-shot user-facing message, returned where the browser app would flash.
#[derive(Debug, Serialize)]
pub struct FlashMessage {
    pub message: String,
    pub category: &'static str,
}

impl FlashMessage {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            category: "info",
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            category: "error",
        }
    }
}

pub type FlashError = (StatusCode, Json<FlashMessage>);

#[derive(Debug, Default, Deserialize)]
pub struct SearchRequest {
    pub search_term: Option<String>,
}

impl SearchRequest {
    /// `%term%` for a lowercase LIKE, or `None` when there is nothing to search.
    pub fn like_pattern(&self) -> Option<String> {
        let term = self.search_term.as_deref()?.trim();
        if term.is_empty() {
            return None;
        }
        // SECURITY: user input must not carry its own LIKE wildcards
        let escaped = term
            .to_lowercase()
            .replace('\\', "\\\\")
            .replace('%', "\\%")
            .replace('_', "\\_");
        Some(format!("%{escaped}%"))
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct SearchHit {
    pub id: i32,
    pub name: String,
    pub num_upcoming_shows: u64,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub count: usize,
    pub data: Vec<SearchHit>,
}

impl From<Vec<SearchHit>> for SearchResponse {
    fn from(data: Vec<SearchHit>) -> Self {
        Self {
            count: data.len(),
            data,
        }
    }
}

/// `id` and `name` only, for plain listings.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct NamedRef {
    pub id: i32,
    pub name: String,
}

pub fn db_error(e: DbErr) -> (StatusCode, String) {
    tracing::error!("database error: {e}");
    (StatusCode::INTERNAL_SERVER_ERROR, format!("DB error: {e}"))
}

pub fn listing_error(e: ListingError) -> (StatusCode, String) {
    match e {
        ListingError::NotFound { entity, .. } => {
            let mut entity = entity.to_string();
            if let Some(first) = entity.get_mut(0..1) {
                first.make_ascii_uppercase();
            }
            (StatusCode::NOT_FOUND, format!("{entity} not found"))
        }
        other => {
            tracing::error!("listing failed: {other}");
            (StatusCode::INTERNAL_SERVER_ERROR, other.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_wraps_and_lowercases() {
        let req = SearchRequest {
            search_term: Some("  Band ".into()),
        };
        assert_eq!(req.like_pattern().as_deref(), Some("%band%"));
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        let req = SearchRequest {
            search_term: Some("100%_off".into()),
        };
        assert_eq!(req.like_pattern().as_deref(), Some("%100\\%\\_off%"));
    }

    #[test]
    fn test_like_pattern_blank_or_missing() {
        assert!(SearchRequest::default().like_pattern().is_none());
        let blank = SearchRequest {
            search_term: Some("   ".into()),
        };
        assert!(blank.like_pattern().is_none());
    }

    #[test]
    fn test_search_response_counts_hits() {
        let resp = SearchResponse::from(vec![SearchHit {
            id: 4,
            name: "Guns N Petals".into(),
            num_upcoming_shows: 0,
        }]);
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["count"], 1);
        assert_eq!(json["data"][0]["name"], "Guns N Petals");
        assert_eq!(json["data"][0]["num_upcoming_shows"], 0);
    }

    #[test]
    fn test_listing_error_not_found_is_404() {
        let (status, msg) = listing_error(ListingError::NotFound {
            entity: "venue",
            id: 3,
        });
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(msg, "Venue not found");
    }

    #[test]
    fn test_listing_error_storage_is_500() {
        let (status, _) = listing_error(ListingError::Storage("down".into()));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_flash_message_serialization() {
        let json = serde_json::to_value(FlashMessage::error("nope")).unwrap();
        assert_eq!(json["message"], "nope");
        assert_eq!(json["category"], "error");
    }
}
