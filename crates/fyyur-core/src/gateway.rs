//! The read seam between the listing logic and a store, plus the two
//! operations composed on top of it.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::classify::{classify_shows, Scheduled, ShowClassification};
use crate::error::ListingError;
use crate::instant::ReferenceInstant;
use crate::locale::{group_venues, LocaleGroup, VenueRow};

/// The venue or artist a set of shows belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShowOwner {
    Venue(i32),
    Artist(i32),
}

impl ShowOwner {
    pub fn entity(&self) -> &'static str {
        match self {
            ShowOwner::Venue(_) => "venue",
            ShowOwner::Artist(_) => "artist",
        }
    }

    pub fn id(&self) -> i32 {
        match self {
            ShowOwner::Venue(id) | ShowOwner::Artist(id) => *id,
        }
    }

    pub fn not_found(&self) -> ListingError {
        ListingError::NotFound {
            entity: self.entity(),
            id: self.id(),
        }
    }
}

/// A show joined with the display fields of its venue and artist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowRow {
    pub id: i32,
    pub venue_id: i32,
    pub venue_name: Option<String>,
    pub venue_image_link: Option<String>,
    pub artist_id: i32,
    pub artist_name: Option<String>,
    pub artist_image_link: Option<String>,
    pub start_time: NaiveDateTime,
}

impl Scheduled for ShowRow {
    fn start_time(&self) -> NaiveDateTime {
        self.start_time
    }
}

/// Read access to venues and shows.
#[async_trait]
pub trait ShowGateway: Send + Sync {
    /// Every venue, each carrying the start instants of its shows.
    async fn fetch_all_venues(&self) -> Result<Vec<VenueRow>, ListingError>;

    /// Every venue with its upcoming count pre-aggregated against `now`.
    ///
    /// Stores that cannot aggregate fall back to [`Self::fetch_all_venues`].
    async fn fetch_venue_counts(
        &self,
        _now: ReferenceInstant,
    ) -> Result<Vec<VenueRow>, ListingError> {
        self.fetch_all_venues().await
    }

    /// Shows of one venue or artist, `NotFound` if the owner is absent.
    async fn fetch_shows_for(&self, owner: ShowOwner) -> Result<Vec<ShowRow>, ListingError>;
}

/// Venue listing for the `/venues` page.
pub async fn group_venues_by_locale<G>(
    gateway: &G,
    now: ReferenceInstant,
) -> Result<Vec<LocaleGroup>, ListingError>
where
    G: ShowGateway + ?Sized,
{
    let venues = gateway.fetch_venue_counts(now).await?;
    group_venues(venues, now)
}

/// Past/upcoming shows for a venue or artist detail page.
pub async fn shows_for<G>(
    gateway: &G,
    owner: ShowOwner,
    now: ReferenceInstant,
) -> Result<ShowClassification<ShowRow>, ListingError>
where
    G: ShowGateway + ?Sized,
{
    let shows = gateway.fetch_shows_for(owner).await?;
    Ok(classify_shows(shows, now))
}
