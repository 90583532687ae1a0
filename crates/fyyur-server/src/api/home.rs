use axum::{extract::State, http::StatusCode, Json};
use sea_orm::{EntityTrait, QueryOrder, QuerySelect};
use serde::Serialize;
use std::sync::Arc;

use super::{db_error, NamedRef};
use fyyur_db::entities::{artist, venue};
use fyyur_db::AppState;

const RECENT_LIMIT: u64 = 10;

#[derive(Debug, Serialize)]
pub struct HomeResponse {
    pub recent_venues: Vec<NamedRef>,
    pub recent_artists: Vec<NamedRef>,
}

/// GET /api/home: most recently listed venues and artists
pub async fn home(
    State(state): State<Arc<AppState>>,
) -> Result<Json<HomeResponse>, (StatusCode, String)> {
    let recent_venues = venue::Entity::find()
        .select_only()
        .columns([venue::Column::Id, venue::Column::Name])
        .order_by_desc(venue::Column::Id)
        .limit(RECENT_LIMIT)
        .into_tuple::<(i32, String)>()
        .all(&state.db)
        .await
        .map_err(db_error)?;

    let recent_artists = artist::Entity::find()
        .select_only()
        .columns([artist::Column::Id, artist::Column::Name])
        .order_by_desc(artist::Column::Id)
        .limit(RECENT_LIMIT)
        .into_tuple::<(i32, String)>()
        .all(&state.db)
        .await
        .map_err(db_error)?;

    Ok(Json(HomeResponse {
        recent_venues: named(recent_venues),
        recent_artists: named(recent_artists),
    }))
}

fn named(rows: Vec<(i32, String)>) -> Vec<NamedRef> {
    rows.into_iter()
        .map(|(id, name)| NamedRef { id, name })
        .collect()
}
