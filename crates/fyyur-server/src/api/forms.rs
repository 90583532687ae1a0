//! Request bodies for creating and editing venues, artists and shows, with
//! the light validation the booking forms need.

use chrono::{DateTime, NaiveDateTime};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct VenueForm {
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    #[serde(default)]
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
}

impl VenueForm {
    pub fn validate(&self) -> Result<(), String> {
        required("name", &self.name)?;
        required("city", &self.city)?;
        required("state", &self.state)?;
        required("address", &self.address)?;
        phone(self.phone.as_deref())?;
        link("image_link", self.image_link.as_deref())?;
        link("facebook_link", self.facebook_link.as_deref())?;
        link("website", self.website.as_deref())
    }
}

#[derive(Debug, Deserialize)]
pub struct ArtistForm {
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    #[serde(default)]
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
}

impl ArtistForm {
    pub fn validate(&self) -> Result<(), String> {
        required("name", &self.name)?;
        required("city", &self.city)?;
        required("state", &self.state)?;
        phone(self.phone.as_deref())?;
        link("image_link", self.image_link.as_deref())?;
        link("facebook_link", self.facebook_link.as_deref())?;
        link("website", self.website.as_deref())
    }
}

#[derive(Debug, Deserialize)]
pub struct ShowForm {
    pub venue_id: i32,
    pub artist_id: i32,
    pub start_time: String,
}

impl ShowForm {
    pub fn start_time(&self) -> Result<NaiveDateTime, String> {
        parse_start_time(&self.start_time)
            .ok_or_else(|| format!("start_time: unrecognized date/time {:?}", self.start_time))
    }
}

fn required(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{field}: this field is required"));
    }
    Ok(())
}

fn phone(value: Option<&str>) -> Result<(), String> {
    match value.map(str::trim) {
        Some(p) if !p.is_empty() => {
            let ok = p.chars().any(|c| c.is_ascii_digit())
                && p
                    .chars()
                    .all(|c| c.is_ascii_digit() || matches!(c, '-' | ' ' | '(' | ')' | '+' | '.'));
            if ok {
                Ok(())
            } else {
                Err(format!("phone: invalid phone number {p:?}"))
            }
        }
        _ => Ok(()),
    }
}

fn link(field: &str, value: Option<&str>) -> Result<(), String> {
    match value.map(str::trim) {
        Some(url) if !url.is_empty() => {
            if url.starts_with("http://") || url.starts_with("https://") {
                Ok(())
            } else {
                Err(format!("{field}: must be an http(s) URL"))
            }
        }
        _ => Ok(()),
    }
}

/// Blank strings become `None`.
pub fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Genres are stored comma-joined.
pub fn join_genres(genres: &[String]) -> Option<String> {
    let joined = genres
        .iter()
        .map(|g| g.trim())
        .filter(|g| !g.is_empty())
        .collect::<Vec<_>>()
        .join(",");
    if joined.is_empty() {
        None
    } else {
        Some(joined)
    }
}

pub fn split_genres(stored: Option<&str>) -> Vec<String> {
    stored
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .map(String::from)
        .collect()
}

/// Accepts `2019-05-21T21:30:00.000Z`, `2019-05-21 21:30:00`, `2019-05-21T21:30`
/// and RFC 3339 with an offset. The result is the wall-clock time as written.
pub fn parse_start_time(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    let raw = raw.strip_suffix('Z').unwrap_or(raw);
    [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ]
    .iter()
    .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}
