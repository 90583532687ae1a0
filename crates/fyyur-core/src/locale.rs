//! Venues grouped by `(city, state)` with a live upcoming-show count.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::classify::count_upcoming;
use crate::error::ListingError;
use crate::instant::ReferenceInstant;

/// City and state, compared exactly (case-sensitive, no trimming).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locale {
    pub city: String,
    pub state: String,
}

impl Locale {
    pub fn new(city: impl Into<String>, state: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            state: state.into(),
        }
    }
}

/// What the store handed back about a venue's upcoming shows.
#[derive(Debug, Clone, PartialEq)]
pub enum UpcomingShows {
    /// Start instants of every show at the venue.
    Starts(Vec<NaiveDateTime>),
    /// Count already aggregated by the store against `as_of`.
    Counted { count: u64, as_of: ReferenceInstant },
}

impl UpcomingShows {
    fn count(&self, now: ReferenceInstant) -> Result<u64, ListingError> {
        match self {
            UpcomingShows::Starts(starts) => Ok(count_upcoming(starts, now)),
            UpcomingShows::Counted { count, as_of } if *as_of == now => Ok(*count),
            UpcomingShows::Counted { as_of, .. } => Err(ListingError::ClockInconsistency {
                expected: now,
                found: *as_of,
            }),
        }
    }
}

/// A venue as retrieved for the locale listing.
#[derive(Debug, Clone, PartialEq)]
pub struct VenueRow {
    pub id: i32,
    pub name: String,
    pub locale: Locale,
    pub upcoming: UpcomingShows,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VenueListing {
    pub id: i32,
    pub name: String,
    pub num_upcoming_shows: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocaleGroup {
    pub city: String,
    pub state: String,
    pub venues: Vec<VenueListing>,
}

/// Group venues by locale in a single pass.
///
/// Groups come out in order of first appearance and venues keep their
/// retrieval order inside a group. Every count is taken against the same
/// `now`.
pub fn group_venues<I>(venues: I, now: ReferenceInstant) -> Result<Vec<LocaleGroup>, ListingError>
where
    I: IntoIterator<Item = VenueRow>,
{
    let mut groups: Vec<LocaleGroup> = Vec::new();
    let mut slots: HashMap<Locale, usize> = HashMap::new();

    for venue in venues {
        let VenueRow {
            id,
            name,
            locale,
            upcoming,
        } = venue;

        let listing = VenueListing {
            id,
            name,
            num_upcoming_shows: upcoming.count(now)?,
        };

        match slots.get(&locale) {
            Some(&slot) => groups[slot].venues.push(listing),
            None => {
                slots.insert(locale.clone(), groups.len());
                groups.push(LocaleGroup {
                    city: locale.city,
                    state: locale.state,
                    venues: vec![listing],
                });
            }
        }
    }

    Ok(groups)
}
