//! Past/upcoming split for the shows of one venue or one artist.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::instant::ReferenceInstant;

/// Anything with a start instant.
pub trait Scheduled {
    fn start_time(&self) -> NaiveDateTime;
}

impl Scheduled for NaiveDateTime {
    fn start_time(&self) -> NaiveDateTime {
        *self
    }
}

impl<T: Scheduled + ?Sized> Scheduled for &T {
    fn start_time(&self) -> NaiveDateTime {
        (**self).start_time()
    }
}

/// A show starting exactly at `now` is upcoming.
pub fn is_upcoming(start: NaiveDateTime, now: ReferenceInstant) -> bool {
    start >= now.as_naive()
}

/// Number of start instants that are upcoming relative to `now`.
pub fn count_upcoming<S: Scheduled>(shows: &[S], now: ReferenceInstant) -> u64 {
    shows
        .iter()
        .filter(|s| is_upcoming(s.start_time(), now))
        .count() as u64
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShowClassification<S> {
    pub past_shows: Vec<S>,
    pub upcoming_shows: Vec<S>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

impl<S> ShowClassification<S> {
    /// Convert every show while keeping the split and the counts.
    pub fn map<T, F>(self, mut f: F) -> ShowClassification<T>
    where
        F: FnMut(S) -> T,
    {
        ShowClassification {
            past_shows: self.past_shows.into_iter().map(&mut f).collect(),
            upcoming_shows: self.upcoming_shows.into_iter().map(&mut f).collect(),
            past_shows_count: self.past_shows_count,
            upcoming_shows_count: self.upcoming_shows_count,
        }
    }
}

/// Split `shows` into past and upcoming in one pass, preserving input order
/// inside each half.
pub fn classify_shows<S, I>(shows: I, now: ReferenceInstant) -> ShowClassification<S>
where
    S: Scheduled,
    I: IntoIterator<Item = S>,
{
    let mut past_shows = Vec::new();
    let mut upcoming_shows = Vec::new();

    for show in shows {
        if is_upcoming(show.start_time(), now) {
            upcoming_shows.push(show);
        } else {
            past_shows.push(show);
        }
    }

    ShowClassification {
        past_shows_count: past_shows.len(),
        upcoming_shows_count: upcoming_shows.len(),
        past_shows,
        upcoming_shows,
    }
}
