use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDateTime;
use fyyur_core::{
    classify_shows, group_venues_by_locale, LocaleGroup, ReferenceInstant, ShowOwner, ShowRow,
};
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{ActiveModelTrait, EntityTrait, ModelTrait, QueryFilter, QueryOrder, Set};
use serde::Serialize;
use std::sync::Arc;

use super::forms::{join_genres, optional, split_genres, VenueForm};
use super::{
    db_error, listing_error, FlashError, FlashMessage, SearchHit, SearchRequest, SearchResponse,
};
use fyyur_db::entities::{show, venue};
use fyyur_db::AppState;

#[derive(Debug, Serialize)]
pub struct VenueResponse {
    pub id: i32,
    pub name: String,
    pub genres: Vec<String>,
    pub address: String,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub facebook_link: Option<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
    pub image_link: Option<String>,
}

impl From<venue::Model> for VenueResponse {
    fn from(v: venue::Model) -> Self {
        Self {
            id: v.id,
            genres: split_genres(v.genres.as_deref()),
            name: v.name,
            address: v.address,
            city: v.city,
            state: v.state,
            phone: v.phone,
            website: v.website,
            facebook_link: v.facebook_link,
            seeking_talent: v.seeking_talent,
            seeking_description: v.seeking_description,
            image_link: v.image_link,
        }
    }
}

/// A show as listed on a venue page: who plays, and when.
#[derive(Debug, Serialize)]
pub struct VenueShow {
    pub artist_id: i32,
    pub artist_name: Option<String>,
    pub artist_image_link: Option<String>,
    pub start_time: NaiveDateTime,
}

impl From<ShowRow> for VenueShow {
    fn from(s: ShowRow) -> Self {
        Self {
            artist_id: s.artist_id,
            artist_name: s.artist_name,
            artist_image_link: s.artist_image_link,
            start_time: s.start_time,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct VenueDetailResponse {
    #[serde(flatten)]
    pub venue: VenueResponse,
    #[serde(flatten)]
    pub shows: fyyur_core::ShowClassification<VenueShow>,
}

#[derive(Debug, Serialize)]
pub struct VenueAreasResponse {
    pub areas: Vec<LocaleGroup>,
}

#[derive(Debug, Serialize)]
pub struct VenueSaved {
    #[serde(flatten)]
    pub flash: FlashMessage,
    pub venue: VenueResponse,
}

/// GET /api/venues
pub async fn list_venues(
    State(state): State<Arc<AppState>>,
) -> Result<Json<VenueAreasResponse>, (StatusCode, String)> {
    let now = ReferenceInstant::now();
    let areas = group_venues_by_locale(&state.gateway(), now)
        .await
        .map_err(listing_error)?;

    Ok(Json(VenueAreasResponse { areas }))
}

/// POST /api/venues/search
pub async fn search_venues(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, (StatusCode, String)> {
    let Some(pattern) = body.like_pattern() else {
        return Ok(Json(SearchResponse::from(Vec::new())));
    };

    let venues = venue::Entity::find()
        .filter(Expr::expr(Func::lower(Expr::col(venue::Column::Name))).like(pattern))
        .order_by_asc(venue::Column::Name)
        .all(&state.db)
        .await
        .map_err(db_error)?;

    let now = ReferenceInstant::now();
    let counts = state
        .gateway()
        .upcoming_counts(
            show::Column::VenueId,
            now,
            Some(venues.iter().map(|v| v.id).collect()),
        )
        .await
        .map_err(listing_error)?;

    let hits = venues
        .into_iter()
        .map(|v| SearchHit {
            num_upcoming_shows: counts.get(&v.id).copied().unwrap_or(0),
            id: v.id,
            name: v.name,
        })
        .collect::<Vec<_>>();

    Ok(Json(SearchResponse::from(hits)))
}

/// GET /api/venues/:id
pub async fn get_venue(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<VenueDetailResponse>, (StatusCode, String)> {
    let venue_model = venue::Entity::find_by_id(id)
        .one(&state.db)
        .await
        .map_err(db_error)?
        .ok_or((StatusCode::NOT_FOUND, "Venue not found".to_string()))?;

    let now = ReferenceInstant::now();
    let shows = state
        .gateway()
        .fetch_owned_shows(ShowOwner::Venue(id))
        .await
        .map_err(listing_error)?;
    let shows = classify_shows(shows, now);

    Ok(Json(VenueDetailResponse {
        venue: VenueResponse::from(venue_model),
        shows: shows.map(VenueShow::from),
    }))
}

fn apply_form(model: &mut venue::ActiveModel, form: VenueForm) {
    model.name = Set(form.name.trim().to_string());
    model.city = Set(form.city.trim().to_string());
    model.state = Set(form.state.trim().to_string());
    model.address = Set(form.address.trim().to_string());
    model.phone = Set(optional(form.phone));
    model.genres = Set(join_genres(&form.genres));
    model.image_link = Set(optional(form.image_link));
    model.facebook_link = Set(optional(form.facebook_link));
    model.website = Set(optional(form.website));
    model.seeking_talent = Set(form.seeking_talent);
    model.seeking_description = Set(optional(form.seeking_description));
}

/// POST /api/venues
pub async fn create_venue(
    State(state): State<Arc<AppState>>,
    Json(form): Json<VenueForm>,
) -> Result<(StatusCode, Json<VenueSaved>), FlashError> {
    let failed = || FlashMessage::error(format!("An error occurred. Venue {} could not be listed.", form.name));

    if let Err(reason) = form.validate() {
        tracing::info!(%reason, "rejected venue submission");
        return Err((StatusCode::BAD_REQUEST, Json(failed())));
    }

    let flash = FlashMessage::info(format!("Venue {} was successfully listed!", form.name));
    let failure = failed();

    let mut new_venue = venue::ActiveModel {
        ..Default::default()
    };
    apply_form(&mut new_venue, form);

    let created = new_venue.insert(&state.db).await.map_err(|e| {
        tracing::error!("failed to insert venue: {e}");
        (StatusCode::INTERNAL_SERVER_ERROR, Json(failure))
    })?;

    Ok((
        StatusCode::CREATED,
        Json(VenueSaved {
            flash,
            venue: VenueResponse::from(created),
        }),
    ))
}

/// PUT /api/venues/:id
pub async fn update_venue(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(form): Json<VenueForm>,
) -> Result<Json<VenueSaved>, FlashError> {
    let failed = || FlashMessage::error(format!("An error occurred. Venue {} could not be updated.", form.name));

    let existing = venue::Entity::find_by_id(id)
        .one(&state.db)
        .await
        .map_err(|e| {
            tracing::error!("failed to load venue {id}: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, Json(failed()))
        })?
        .ok_or_else(|| {
            (
                StatusCode::NOT_FOUND,
                Json(FlashMessage::error("Venue not found")),
            )
        })?;

    if let Err(reason) = form.validate() {
        tracing::info!(%reason, venue_id = id, "rejected venue edit");
        return Err((StatusCode::BAD_REQUEST, Json(failed())));
    }

    let flash = FlashMessage::info(format!("Venue {} was successfully updated!", form.name));
    let failure = failed();

    let mut update: venue::ActiveModel = existing.into();
    apply_form(&mut update, form);

    let updated = update.update(&state.db).await.map_err(|e| {
        tracing::error!("failed to update venue {id}: {e}");
        (StatusCode::INTERNAL_SERVER_ERROR, Json(failure))
    })?;

    Ok(Json(VenueSaved {
        flash,
        venue: VenueResponse::from(updated),
    }))
}

/// DELETE /api/venues/:id (shows go with it)
pub async fn delete_venue(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<(StatusCode, Json<FlashMessage>), FlashError> {
    let failed = || {
        (
            StatusCode::BAD_REQUEST,
            Json(FlashMessage::error(format!(
                "An error occurred. Venue ID {id} could not be deleted."
            ))),
        )
    };

    let existing = venue::Entity::find_by_id(id)
        .one(&state.db)
        .await
        .map_err(|e| {
            tracing::error!("failed to load venue {id}: {e}");
            failed()
        })?
        .ok_or_else(|| {
            (
                StatusCode::NOT_FOUND,
                Json(FlashMessage::error("Venue not found")),
            )
        })?;

    existing.delete(&state.db).await.map_err(|e| {
        tracing::error!("failed to delete venue {id}: {e}");
        failed()
    })?;

    Ok((
        StatusCode::ACCEPTED,
        Json(FlashMessage::info(format!("Venue ID {id} deleted successfully."))),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use fyyur_core::classify_shows;

    fn make_venue_model() -> venue::Model {
        venue::Model {
            id: 1,
            name: "The Musical Hop".into(),
            city: "San Francisco".into(),
            state: "CA".into(),
            address: "1015 Folsom Street".into(),
            phone: Some("123-123-1234".into()),
            genres: Some("Jazz,Reggae,Swing,Classical,Folk".into()),
            image_link: None,
            facebook_link: Some("https://www.facebook.com/TheMusicalHop".into()),
            website: Some("https://www.themusicalhop.com".into()),
            seeking_talent: true,
            seeking_description: Some("We are on the lookout for a local artist.".into()),
        }
    }

    fn make_show_row(id: i32, start_time: NaiveDateTime) -> ShowRow {
        ShowRow {
            id,
            venue_id: 1,
            venue_name: Some("The Musical Hop".into()),
            venue_image_link: None,
            artist_id: 4,
            artist_name: Some("Guns N Petals".into()),
            artist_image_link: Some("https://img.example.com/gnp.jpg".into()),
            start_time,
        }
    }

    #[test]
    fn test_venue_response_splits_genres() {
        let resp = VenueResponse::from(make_venue_model());
        assert_eq!(resp.genres, vec!["Jazz", "Reggae", "Swing", "Classical", "Folk"]);
        assert!(resp.seeking_talent);
    }

    #[test]
    fn test_venue_detail_serialization() {
        let now = ReferenceInstant::at(
            NaiveDate::from_ymd_opt(2020, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        );
        let past = NaiveDate::from_ymd_opt(2019, 5, 21)
            .unwrap()
            .and_hms_opt(21, 30, 0)
            .unwrap();
        let detail = VenueDetailResponse {
            venue: VenueResponse::from(make_venue_model()),
            shows: classify_shows(vec![make_show_row(1, past)], now).map(VenueShow::from),
        };

        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["name"], "The Musical Hop");
        assert_eq!(json["past_shows_count"], 1);
        assert_eq!(json["upcoming_shows_count"], 0);
        assert_eq!(json["past_shows"][0]["artist_id"], 4);
        assert_eq!(json["past_shows"][0]["artist_name"], "Guns N Petals");
        assert_eq!(json["past_shows"][0]["start_time"], "2019-05-21T21:30:00");
        assert!(json["past_shows"][0].get("venue_id").is_none());
    }

    #[test]
    fn test_venue_saved_flattens_flash() {
        let saved = VenueSaved {
            flash: FlashMessage::info("Venue The Musical Hop was successfully listed!"),
            venue: VenueResponse::from(make_venue_model()),
        };
        let json = serde_json::to_value(&saved).unwrap();
        assert_eq!(json["message"], "Venue The Musical Hop was successfully listed!");
        assert_eq!(json["category"], "info");
        assert_eq!(json["venue"]["id"], 1);
    }

    #[test]
    fn test_apply_form_trims_and_joins() {
        let form: VenueForm = serde_json::from_str(
            r#"{"name": " The Musical Hop ", "city": "San Francisco", "state": "CA",
                "address": "1015 Folsom Street", "genres": ["Jazz", "Swing"], "website": " "}"#,
        )
        .unwrap();
        let mut model = venue::ActiveModel {
            ..Default::default()
        };
        apply_form(&mut model, form);
        assert_eq!(model.name, Set("The Musical Hop".to_string()));
        assert_eq!(model.genres, Set(Some("Jazz,Swing".to_string())));
        assert_eq!(model.website, Set(None));
    }
}
