//! [`ShowGateway`] backed by the sea-orm connection pool.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use fyyur_core::{
    ListingError, Locale, ReferenceInstant, ShowGateway, ShowOwner, ShowRow, UpcomingShows,
    VenueRow,
};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, FromQueryResult, QueryFilter,
    QueryOrder, QuerySelect,
};
use std::collections::{HashMap, HashSet};

use crate::entities::{artist, show, venue};

pub struct SeaOrmGateway<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> SeaOrmGateway<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }
}

fn storage(e: DbErr) -> ListingError {
    ListingError::Storage(e.to_string())
}

#[derive(Debug, FromQueryResult)]
struct StartRow {
    venue_id: i32,
    start_time: NaiveDateTime,
}

#[derive(Debug, FromQueryResult)]
struct UpcomingCountRow {
    owner_id: i32,
    upcoming: i64,
}

fn venue_row(v: venue::Model, upcoming: UpcomingShows) -> VenueRow {
    VenueRow {
        id: v.id,
        name: v.name,
        locale: Locale::new(v.city, v.state),
        upcoming,
    }
}

impl SeaOrmGateway<'_> {
    async fn venues_in_order(&self) -> Result<Vec<venue::Model>, ListingError> {
        venue::Entity::find()
            .order_by_asc(venue::Column::Id)
            .all(self.db)
            .await
            .map_err(storage)
    }

    async fn owner_exists(&self, owner: ShowOwner) -> Result<bool, ListingError> {
        let found = match owner {
            ShowOwner::Venue(id) => venue::Entity::find_by_id(id)
                .one(self.db)
                .await
                .map_err(storage)?
                .is_some(),
            ShowOwner::Artist(id) => artist::Entity::find_by_id(id)
                .one(self.db)
                .await
                .map_err(storage)?
                .is_some(),
        };
        Ok(found)
    }

    /// Upcoming show counts keyed by `owner` (`VenueId` or `ArtistId`),
    /// aggregated by the database. Owners without upcoming shows are absent.
    pub async fn upcoming_counts(
        &self,
        owner: show::Column,
        now: ReferenceInstant,
        only: Option<Vec<i32>>,
    ) -> Result<HashMap<i32, u64>, ListingError> {
        let mut query = show::Entity::find()
            .select_only()
            .column_as(owner, "owner_id")
            .column_as(Expr::col(show::Column::Id).count(), "upcoming")
            .filter(show::Column::StartTime.gte(now.as_naive()));
        if let Some(ids) = only {
            if ids.is_empty() {
                return Ok(HashMap::new());
            }
            query = query.filter(owner.is_in(ids));
        }

        Ok(query
            .group_by(owner)
            .into_model::<UpcomingCountRow>()
            .all(self.db)
            .await
            .map_err(storage)?
            .into_iter()
            .map(|row| (row.owner_id, row.upcoming.max(0) as u64))
            .collect())
    }

    /// Every show, earliest first, for the `/shows` listing.
    pub async fn fetch_all_shows(&self) -> Result<Vec<ShowRow>, ListingError> {
        let shows = show::Entity::find()
            .order_by_asc(show::Column::StartTime)
            .order_by_asc(show::Column::Id)
            .all(self.db)
            .await
            .map_err(storage)?;

        self.join_display_fields(shows).await
    }

    async fn join_display_fields(
        &self,
        shows: Vec<show::Model>,
    ) -> Result<Vec<ShowRow>, ListingError> {
        if shows.is_empty() {
            return Ok(Vec::new());
        }

        // Names and images come from the owning rows, the copies on the show
        // are only a fallback.
        let venue_ids: Vec<i32> = shows
            .iter()
            .map(|s| s.venue_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let artist_ids: Vec<i32> = shows
            .iter()
            .map(|s| s.artist_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        let venues: HashMap<i32, venue::Model> = venue::Entity::find()
            .filter(venue::Column::Id.is_in(venue_ids))
            .all(self.db)
            .await
            .map_err(storage)?
            .into_iter()
            .map(|v| (v.id, v))
            .collect();

        let artists: HashMap<i32, artist::Model> = artist::Entity::find()
            .filter(artist::Column::Id.is_in(artist_ids))
            .all(self.db)
            .await
            .map_err(storage)?
            .into_iter()
            .map(|a| (a.id, a))
            .collect();

        Ok(shows
            .into_iter()
            .map(|s| show_row(s, &venues, &artists))
            .collect())
    }
}

#[async_trait]
impl ShowGateway for SeaOrmGateway<'_> {
    async fn fetch_all_venues(&self) -> Result<Vec<VenueRow>, ListingError> {
        let venues = self.venues_in_order().await?;

        // Only (venue_id, start_time) is pulled, never whole show rows
        let starts = show::Entity::find()
            .select_only()
            .column(show::Column::VenueId)
            .column(show::Column::StartTime)
            .into_model::<StartRow>()
            .all(self.db)
            .await
            .map_err(storage)?;

        let mut by_venue: HashMap<i32, Vec<NaiveDateTime>> = HashMap::new();
        for row in starts {
            by_venue.entry(row.venue_id).or_default().push(row.start_time);
        }

        Ok(venues
            .into_iter()
            .map(|v| {
                let starts = by_venue.remove(&v.id).unwrap_or_default();
                venue_row(v, UpcomingShows::Starts(starts))
            })
            .collect())
    }

    async fn fetch_venue_counts(
        &self,
        now: ReferenceInstant,
    ) -> Result<Vec<VenueRow>, ListingError> {
        let venues = self.venues_in_order().await?;

        let counts = self
            .upcoming_counts(show::Column::VenueId, now, None)
            .await?;

        tracing::debug!(venues = venues.len(), with_upcoming = counts.len(), %now, "counted upcoming shows");

        Ok(venues
            .into_iter()
            .map(|v| {
                let count = counts.get(&v.id).copied().unwrap_or(0);
                venue_row(v, UpcomingShows::Counted { count, as_of: now })
            })
            .collect())
    }

    async fn fetch_shows_for(&self, owner: ShowOwner) -> Result<Vec<ShowRow>, ListingError> {
        if !self.owner_exists(owner).await? {
            return Err(owner.not_found());
        }
        self.fetch_owned_shows(owner).await
    }
}

impl SeaOrmGateway<'_> {
    /// Shows of an owner the caller has already loaded, earliest first.
    /// No existence check: an absent owner simply has no shows.
    pub async fn fetch_owned_shows(&self, owner: ShowOwner) -> Result<Vec<ShowRow>, ListingError> {
        let filter = match owner {
            ShowOwner::Venue(id) => show::Column::VenueId.eq(id),
            ShowOwner::Artist(id) => show::Column::ArtistId.eq(id),
        };

        let shows = show::Entity::find()
            .filter(filter)
            .order_by_asc(show::Column::StartTime)
            .order_by_asc(show::Column::Id)
            .all(self.db)
            .await
            .map_err(storage)?;

        self.join_display_fields(shows).await
    }
}

fn show_row(
    s: show::Model,
    venues: &HashMap<i32, venue::Model>,
    artists: &HashMap<i32, artist::Model>,
) -> ShowRow {
    let venue = venues.get(&s.venue_id);
    let artist = artists.get(&s.artist_id);
    ShowRow {
        id: s.id,
        venue_id: s.venue_id,
        venue_name: venue.map(|v| v.name.clone()).or(s.venue_name),
        venue_image_link: venue.and_then(|v| v.image_link.clone()),
        artist_id: s.artist_id,
        artist_name: artist.map(|a| a.name.clone()).or(s.artist_name),
        artist_image_link: artist
            .and_then(|a| a.image_link.clone())
            .or(s.artist_image_link),
        start_time: s.start_time,
    }
}
