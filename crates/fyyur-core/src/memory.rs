//! In-memory [`ShowGateway`], handy for tests and demos.

use async_trait::async_trait;

use crate::error::ListingError;
use crate::gateway::{ShowGateway, ShowOwner, ShowRow};
use crate::locale::{Locale, UpcomingShows, VenueRow};

#[derive(Debug, Clone)]
struct StoredVenue {
    id: i32,
    name: String,
    locale: Locale,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryGateway {
    venues: Vec<StoredVenue>,
    artists: Vec<i32>,
    shows: Vec<ShowRow>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_venue(mut self, id: i32, name: &str, city: &str, state: &str) -> Self {
        self.venues.push(StoredVenue {
            id,
            name: name.to_string(),
            locale: Locale::new(city, state),
        });
        self
    }

    pub fn with_artist(mut self, id: i32) -> Self {
        self.artists.push(id);
        self
    }

    pub fn with_show(mut self, show: ShowRow) -> Self {
        self.shows.push(show);
        self
    }

    fn owner_exists(&self, owner: ShowOwner) -> bool {
        match owner {
            ShowOwner::Venue(id) => self.venues.iter().any(|v| v.id == id),
            ShowOwner::Artist(id) => self.artists.contains(&id),
        }
    }
}

#[async_trait]
impl ShowGateway for MemoryGateway {
    async fn fetch_all_venues(&self) -> Result<Vec<VenueRow>, ListingError> {
        Ok(self
            .venues
            .iter()
            .map(|v| VenueRow {
                id: v.id,
                name: v.name.clone(),
                locale: v.locale.clone(),
                upcoming: UpcomingShows::Starts(
                    self.shows
                        .iter()
                        .filter(|s| s.venue_id == v.id)
                        .map(|s| s.start_time)
                        .collect(),
                ),
            })
            .collect())
    }

    async fn fetch_shows_for(&self, owner: ShowOwner) -> Result<Vec<ShowRow>, ListingError> {
        if !self.owner_exists(owner) {
            return Err(owner.not_found());
        }

        Ok(self
            .shows
            .iter()
            .filter(|s| match owner {
                ShowOwner::Venue(id) => s.venue_id == id,
                ShowOwner::Artist(id) => s.artist_id == id,
            })
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn show(id: i32, venue_id: i32, artist_id: i32, year: i32) -> ShowRow {
        ShowRow {
            id,
            venue_id,
            venue_name: None,
            venue_image_link: None,
            artist_id,
            artist_name: None,
            artist_image_link: None,
            start_time: NaiveDate::from_ymd_opt(year, 6, 15)
                .unwrap()
                .and_hms_opt(20, 0, 0)
                .unwrap(),
        }
    }

    #[tokio::test]
    async fn test_fetch_all_venues_carries_starts() {
        let gateway = MemoryGateway::new()
            .with_venue(1, "The Musical Hop", "San Francisco", "CA")
            .with_venue(2, "Park Square Live Music & Coffee", "San Francisco", "CA")
            .with_artist(4)
            .with_show(show(1, 1, 4, 2019))
            .with_show(show(2, 1, 4, 2035));

        let venues = gateway.fetch_all_venues().await.unwrap();
        assert_eq!(venues.len(), 2);
        match &venues[0].upcoming {
            UpcomingShows::Starts(starts) => assert_eq!(starts.len(), 2),
            other => panic!("unexpected {other:?}"),
        }
        match &venues[1].upcoming {
            UpcomingShows::Starts(starts) => assert!(starts.is_empty()),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_shows_for_filters_by_owner() {
        let gateway = MemoryGateway::new()
            .with_venue(1, "The Musical Hop", "San Francisco", "CA")
            .with_venue(3, "Park Square Live Music & Coffee", "San Francisco", "CA")
            .with_artist(4)
            .with_artist(5)
            .with_show(show(1, 1, 4, 2019))
            .with_show(show(2, 3, 5, 2019))
            .with_show(show(3, 3, 4, 2035));

        let venue_shows = gateway.fetch_shows_for(ShowOwner::Venue(3)).await.unwrap();
        assert_eq!(venue_shows.iter().map(|s| s.id).collect::<Vec<_>>(), vec![2, 3]);

        let artist_shows = gateway.fetch_shows_for(ShowOwner::Artist(4)).await.unwrap();
        assert_eq!(artist_shows.iter().map(|s| s.id).collect::<Vec<_>>(), vec![1, 3]);
    }

    #[tokio::test]
    async fn test_fetch_shows_for_missing_owner() {
        let gateway = MemoryGateway::new().with_venue(1, "The Musical Hop", "San Francisco", "CA");
        let err = gateway.fetch_shows_for(ShowOwner::Artist(1)).await.unwrap_err();
        assert_eq!(
            err,
            ListingError::NotFound {
                entity: "artist",
                id: 1
            }
        );
    }
}
