//! Read-side listing logic for Fyyur: venues grouped by locale and shows
//! split into past and upcoming relative to a single reference instant.

pub mod classify;
pub mod error;
pub mod gateway;
pub mod instant;
pub mod locale;
pub mod memory;

pub use classify::{classify_shows, count_upcoming, is_upcoming, Scheduled, ShowClassification};
pub use error::ListingError;
pub use gateway::{group_venues_by_locale, shows_for, ShowGateway, ShowOwner, ShowRow};
pub use instant::ReferenceInstant;
pub use locale::{group_venues, Locale, LocaleGroup, UpcomingShows, VenueListing, VenueRow};
pub use memory::MemoryGateway;
