//! Listing error types.

use thiserror::Error;

use crate::instant::ReferenceInstant;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ListingError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: i32 },

    #[error("upcoming count computed at {found} does not match reference instant {expected}")]
    ClockInconsistency {
        expected: ReferenceInstant,
        found: ReferenceInstant,
    },

    #[error("storage error: {0}")]
    Storage(String),
}

impl ListingError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ListingError::NotFound { .. })
    }
}
