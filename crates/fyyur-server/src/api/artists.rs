use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDateTime;
use fyyur_core::{classify_shows, ReferenceInstant, ShowClassification, ShowOwner, ShowRow};
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{ActiveModelTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set};
use serde::Serialize;
use std::sync::Arc;

use super::forms::{join_genres, optional, split_genres, ArtistForm};
use super::{
    db_error, listing_error, FlashError, FlashMessage, NamedRef, SearchHit, SearchRequest,
    SearchResponse,
};
use fyyur_db::entities::{artist, show};
use fyyur_db::AppState;

#[derive(Debug, Serialize)]
pub struct ArtistResponse {
    pub id: i32,
    pub name: String,
    pub genres: Vec<String>,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub facebook_link: Option<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
    pub image_link: Option<String>,
}

impl From<artist::Model> for ArtistResponse {
    fn from(a: artist::Model) -> Self {
        Self {
            id: a.id,
            genres: split_genres(a.genres.as_deref()),
            name: a.name,
            city: a.city,
            state: a.state,
            phone: a.phone,
            website: a.website,
            facebook_link: a.facebook_link,
            seeking_venue: a.seeking_venue,
            seeking_description: a.seeking_description,
            image_link: a.image_link,
        }
    }
}

/// A show as listed on an artist page: where, and when.
#[derive(Debug, Serialize)]
pub struct ArtistShow {
    pub venue_id: i32,
    pub venue_name: Option<String>,
    pub venue_image_link: Option<String>,
    pub start_time: NaiveDateTime,
}

impl From<ShowRow> for ArtistShow {
    fn from(s: ShowRow) -> Self {
        Self {
            venue_id: s.venue_id,
            venue_name: s.venue_name,
            venue_image_link: s.venue_image_link,
            start_time: s.start_time,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ArtistDetailResponse {
    #[serde(flatten)]
    pub artist: ArtistResponse,
    #[serde(flatten)]
    pub shows: ShowClassification<ArtistShow>,
}

#[derive(Debug, Serialize)]
pub struct ArtistSaved {
    #[serde(flatten)]
    pub flash: FlashMessage,
    pub artist: ArtistResponse,
}

/// GET /api/artists
pub async fn list_artists(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<NamedRef>>, (StatusCode, String)> {
    let artists = artist::Entity::find()
        .order_by_asc(artist::Column::Id)
        .all(&state.db)
        .await
        .map_err(db_error)?;

    Ok(Json(
        artists
            .into_iter()
            .map(|a| NamedRef {
                id: a.id,
                name: a.name,
            })
            .collect(),
    ))
}

/// POST /api/artists/search
pub async fn search_artists(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, (StatusCode, String)> {
    let Some(pattern) = body.like_pattern() else {
        return Ok(Json(SearchResponse::from(Vec::new())));
    };

    let artists = artist::Entity::find()
        .select_only()
        .columns([artist::Column::Id, artist::Column::Name])
        .filter(Expr::expr(Func::lower(Expr::col(artist::Column::Name))).like(pattern))
        .order_by_asc(artist::Column::Name)
        .into_tuple::<(i32, String)>()
        .all(&state.db)
        .await
        .map_err(db_error)?;

    let now = ReferenceInstant::now();
    let counts = state
        .gateway()
        .upcoming_counts(
            show::Column::ArtistId,
            now,
            Some(artists.iter().map(|(id, _)| *id).collect()),
        )
        .await
        .map_err(listing_error)?;

    let hits = artists
        .into_iter()
        .map(|(id, name)| SearchHit {
            id,
            name,
            num_upcoming_shows: counts.get(&id).copied().unwrap_or(0),
        })
        .collect::<Vec<_>>();

    Ok(Json(SearchResponse::from(hits)))
}

/// GET /api/artists/:id
pub async fn get_artist(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ArtistDetailResponse>, (StatusCode, String)> {
    let artist_model = artist::Entity::find_by_id(id)
        .one(&state.db)
        .await
        .map_err(db_error)?
        .ok_or((StatusCode::NOT_FOUND, "Artist not found".to_string()))?;

    let now = ReferenceInstant::now();
    let shows = state
        .gateway()
        .fetch_owned_shows(ShowOwner::Artist(id))
        .await
        .map_err(listing_error)?;
    let shows = classify_shows(shows, now);

    Ok(Json(ArtistDetailResponse {
        artist: ArtistResponse::from(artist_model),
        shows: shows.map(ArtistShow::from),
    }))
}

fn apply_form(model: &mut artist::ActiveModel, form: ArtistForm) {
    model.name = Set(form.name.trim().to_string());
    model.city = Set(form.city.trim().to_string());
    model.state = Set(form.state.trim().to_string());
    model.phone = Set(optional(form.phone));
    model.genres = Set(join_genres(&form.genres));
    model.image_link = Set(optional(form.image_link));
    model.facebook_link = Set(optional(form.facebook_link));
    model.website = Set(optional(form.website));
    model.seeking_venue = Set(form.seeking_venue);
    model.seeking_description = Set(optional(form.seeking_description));
}

/// POST /api/artists
pub async fn create_artist(
    State(state): State<Arc<AppState>>,
    Json(form): Json<ArtistForm>,
) -> Result<(StatusCode, Json<ArtistSaved>), FlashError> {
    let failed = || FlashMessage::error(format!("An error occurred. Artist {} could not be listed.", form.name));

    if let Err(reason) = form.validate() {
        tracing::info!(%reason, "rejected artist submission");
        return Err((StatusCode::BAD_REQUEST, Json(failed())));
    }

    let flash = FlashMessage::info(format!("Artist {} was successfully listed!", form.name));
    let failure = failed();

    let mut new_artist = artist::ActiveModel {
        ..Default::default()
    };
    apply_form(&mut new_artist, form);

    let created = new_artist.insert(&state.db).await.map_err(|e| {
        tracing::error!("failed to insert artist: {e}");
        (StatusCode::INTERNAL_SERVER_ERROR, Json(failure))
    })?;

    Ok((
        StatusCode::CREATED,
        Json(ArtistSaved {
            flash,
            artist: ArtistResponse::from(created),
        }),
    ))
}

/// PUT /api/artists/:id
pub async fn update_artist(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(form): Json<ArtistForm>,
) -> Result<Json<ArtistSaved>, FlashError> {
    let failed = || FlashMessage::error(format!("An error occurred. Artist {} could not be updated.", form.name));

    let existing = artist::Entity::find_by_id(id)
        .one(&state.db)
        .await
        .map_err(|e| {
            tracing::error!("failed to load artist {id}: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, Json(failed()))
        })?
        .ok_or_else(|| {
            (
                StatusCode::NOT_FOUND,
                Json(FlashMessage::error("Artist not found")),
            )
        })?;

    if let Err(reason) = form.validate() {
        tracing::info!(%reason, artist_id = id, "rejected artist edit");
        return Err((StatusCode::BAD_REQUEST, Json(failed())));
    }

    let flash = FlashMessage::info(format!("Artist {} was successfully updated!", form.name));
    let failure = failed();

    let mut update: artist::ActiveModel = existing.into();
    apply_form(&mut update, form);

    let updated = update.update(&state.db).await.map_err(|e| {
        tracing::error!("failed to update artist {id}: {e}");
        (StatusCode::INTERNAL_SERVER_ERROR, Json(failure))
    })?;

    Ok(Json(ArtistSaved {
        flash,
        artist: ArtistResponse::from(updated),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use fyyur_core::classify_shows;

    fn make_artist_model() -> artist::Model {
        artist::Model {
            id: 4,
            name: "Guns N Petals".into(),
            city: "San Francisco".into(),
            state: "CA".into(),
            phone: Some("326-123-5000".into()),
            genres: Some("Rock n Roll".into()),
            image_link: Some("https://img.example.com/gnp.jpg".into()),
            facebook_link: Some("https://www.facebook.com/GunsNPetals".into()),
            website: Some("https://www.gunsnpetalsband.com".into()),
            seeking_venue: true,
            seeking_description: Some("Looking for shows to perform at in the San Francisco Bay Area!".into()),
        }
    }

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(20, 0, 0)
            .unwrap()
    }

    fn make_show_row(id: i32, start_time: NaiveDateTime) -> ShowRow {
        ShowRow {
            id,
            venue_id: 1,
            venue_name: Some("The Musical Hop".into()),
            venue_image_link: Some("https://img.example.com/hop.jpg".into()),
            artist_id: 4,
            artist_name: Some("Guns N Petals".into()),
            artist_image_link: None,
            start_time,
        }
    }

    #[test]
    fn test_artist_response_from_model() {
        let resp = ArtistResponse::from(make_artist_model());
        assert_eq!(resp.id, 4);
        assert_eq!(resp.genres, vec!["Rock n Roll"]);
        assert!(resp.seeking_venue);
    }

    #[test]
    fn test_artist_response_without_genres() {
        let mut model = make_artist_model();
        model.genres = None;
        let resp = ArtistResponse::from(model);
        assert!(resp.genres.is_empty());
    }

    #[test]
    fn test_artist_detail_serialization() {
        let now = ReferenceInstant::at(at(2020, 1, 1));
        let detail = ArtistDetailResponse {
            artist: ArtistResponse::from(make_artist_model()),
            shows: classify_shows(
                vec![make_show_row(1, at(2019, 5, 21)), make_show_row(2, at(2035, 4, 1))],
                now,
            )
            .map(ArtistShow::from),
        };

        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["name"], "Guns N Petals");
        assert_eq!(json["past_shows_count"], 1);
        assert_eq!(json["upcoming_shows_count"], 1);
        assert_eq!(json["upcoming_shows"][0]["venue_name"], "The Musical Hop");
        assert_eq!(
            json["upcoming_shows"][0]["venue_image_link"],
            "https://img.example.com/hop.jpg"
        );
        assert!(json["upcoming_shows"][0].get("artist_id").is_none());
    }

    #[test]
    fn test_apply_form_sets_booking_flag() {
        let form: ArtistForm = serde_json::from_str(
            r#"{"name": "The Wild Sax Band", "city": "San Francisco", "state": "CA",
                "genres": ["Jazz", "Classical"], "seeking_venue": false}"#,
        )
        .unwrap();
        let mut model = artist::ActiveModel {
            ..Default::default()
        };
        apply_form(&mut model, form);
        assert_eq!(model.seeking_venue, Set(false));
        assert_eq!(model.genres, Set(Some("Jazz,Classical".to_string())));
        assert_eq!(model.phone, Set(None));
    }
}
