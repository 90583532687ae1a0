use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The wall-clock moment a request measures "past" and "upcoming" against.
///
/// Show start times are stored without a timezone and read as local time,
/// so the reference instant is naive local time as well. Capture it once per
/// request and pass it down; never re-read the clock mid-computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReferenceInstant(NaiveDateTime);

impl ReferenceInstant {
    /// Sample the local wall clock.
    pub fn now() -> Self {
        Self(Local::now().naive_local())
    }

    pub fn at(instant: NaiveDateTime) -> Self {
        Self(instant)
    }

    pub fn as_naive(&self) -> NaiveDateTime {
        self.0
    }
}

impl From<NaiveDateTime> for ReferenceInstant {
    fn from(instant: NaiveDateTime) -> Self {
        Self(instant)
    }
}

impl fmt::Display for ReferenceInstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
