use axum::{extract::State, http::StatusCode, Json};
use chrono::NaiveDateTime;
use fyyur_core::ShowRow;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use serde::Serialize;
use std::sync::Arc;

use super::forms::ShowForm;
use super::{listing_error, FlashError, FlashMessage};
use fyyur_db::entities::{artist, show, venue};
use fyyur_db::AppState;

#[derive(Debug, Serialize)]
pub struct ShowResponse {
    pub id: i32,
    pub venue_id: i32,
    pub venue_name: Option<String>,
    pub artist_id: i32,
    pub artist_name: Option<String>,
    pub artist_image_link: Option<String>,
    pub start_time: NaiveDateTime,
}

impl From<ShowRow> for ShowResponse {
    fn from(s: ShowRow) -> Self {
        Self {
            id: s.id,
            venue_id: s.venue_id,
            venue_name: s.venue_name,
            artist_id: s.artist_id,
            artist_name: s.artist_name,
            artist_image_link: s.artist_image_link,
            start_time: s.start_time,
        }
    }
}

impl From<show::Model> for ShowResponse {
    fn from(s: show::Model) -> Self {
        Self {
            id: s.id,
            venue_id: s.venue_id,
            venue_name: s.venue_name,
            artist_id: s.artist_id,
            artist_name: s.artist_name,
            artist_image_link: s.artist_image_link,
            start_time: s.start_time,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ShowSaved {
    #[serde(flatten)]
    pub flash: FlashMessage,
    pub show: ShowResponse,
}

/// GET /api/shows
pub async fn list_shows(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ShowResponse>>, (StatusCode, String)> {
    let shows = state
        .gateway()
        .fetch_all_shows()
        .await
        .map_err(listing_error)?;

    Ok(Json(shows.into_iter().map(ShowResponse::from).collect()))
}

fn show_failed() -> Json<FlashMessage> {
    Json(FlashMessage::error(
        "An error occurred. Show could not be listed.",
    ))
}

/// POST /api/shows
///
/// The venue and artist must both exist. Their names (and the artist image)
/// are copied onto the show row at booking time.
pub async fn create_show(
    State(state): State<Arc<AppState>>,
    Json(form): Json<ShowForm>,
) -> Result<(StatusCode, Json<ShowSaved>), FlashError> {
    let start_time = form.start_time().map_err(|reason| {
        tracing::info!(%reason, "rejected show submission");
        (StatusCode::BAD_REQUEST, show_failed())
    })?;

    let internal = |e: sea_orm::DbErr| {
        tracing::error!("failed to book show: {e}");
        (StatusCode::INTERNAL_SERVER_ERROR, show_failed())
    };

    let venue_model = venue::Entity::find_by_id(form.venue_id)
        .one(&state.db)
        .await
        .map_err(internal)?;
    let artist_model = artist::Entity::find_by_id(form.artist_id)
        .one(&state.db)
        .await
        .map_err(internal)?;

    let (Some(venue_model), Some(artist_model)) = (venue_model, artist_model) else {
        tracing::info!(
            venue_id = form.venue_id,
            artist_id = form.artist_id,
            "show references a missing venue or artist"
        );
        return Err((StatusCode::BAD_REQUEST, show_failed()));
    };

    let new_show = show::ActiveModel {
        venue_id: Set(venue_model.id),
        artist_id: Set(artist_model.id),
        venue_name: Set(Some(venue_model.name)),
        artist_name: Set(Some(artist_model.name)),
        artist_image_link: Set(artist_model.image_link),
        start_time: Set(start_time),
        ..Default::default()
    };

    let created = new_show.insert(&state.db).await.map_err(internal)?;

    Ok((
        StatusCode::CREATED,
        Json(ShowSaved {
            flash: FlashMessage::info("Show was successfully listed!"),
            show: ShowResponse::from(created),
        }),
    ))
}
