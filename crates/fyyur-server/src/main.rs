use axum::{
    http::{HeaderValue, Method, StatusCode},
    routing::{get, post},
    Json, Router,
};
use fyyur_db::AppState;
use sea_orm_migration::MigratorTrait;
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod api;

#[derive(Serialize)]
struct ApiStatus {
    status: &'static str,
    version: &'static str,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter().into()),
        )
        .init();

    // Database connection
    let db_config = fyyur_db::DatabaseConfig::from_env("fyyur");
    tracing::info!("connecting to database...");
    let db = fyyur_db::connect(&db_config)
        .await
        .expect("failed to connect to database");

    // Run migrations
    tracing::info!("running database migrations...");
    fyyur_migration::Migrator::up(&db, None)
        .await
        .expect("failed to run migrations");
    tracing::info!("migrations complete");

    let state = Arc::new(AppState { db });

    let app = router(state, cors_from_env());

    let port = std::env::var("FYYUR_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(5000);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!(%addr, "server started");

    axum::serve(
        tokio::net::TcpListener::bind(addr)
            .await
            .expect("failed to bind listener"),
        app,
    )
    .await
    .expect("server error");
}

/// `FYYUR_DEBUG=true` turns on debug logging when `RUST_LOG` is unset.
fn default_filter() -> &'static str {
    let debug = std::env::var("FYYUR_DEBUG")
        .unwrap_or_default()
        .eq_ignore_ascii_case("true");
    if debug {
        "fyyur_server=debug,fyyur_db=debug,tower_http=debug,info"
    } else {
        "info"
    }
}

fn cors_from_env() -> CorsLayer {
    let allowed_origins_str = std::env::var("CORS_ORIGINS").unwrap_or_default();
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any);

    if allowed_origins_str.is_empty() {
        tracing::info!("CORS_ORIGINS not set, allowing any origin");
        cors.allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = allowed_origins_str
            .split(',')
            .filter_map(|s| HeaderValue::from_str(s.trim()).ok())
            .collect();
        tracing::info!("CORS allowed origins: {:?}", origins);
        cors.allow_origin(origins)
    }
}

fn router(state: Arc<AppState>, cors: CorsLayer) -> Router {
    let api_routes = Router::new()
        .route("/home", get(api::home::home))
        .route(
            "/venues",
            get(api::venues::list_venues).post(api::venues::create_venue),
        )
        .route("/venues/search", post(api::venues::search_venues))
        .route(
            "/venues/{id}",
            get(api::venues::get_venue)
                .put(api::venues::update_venue)
                .delete(api::venues::delete_venue),
        )
        .route(
            "/artists",
            get(api::artists::list_artists).post(api::artists::create_artist),
        )
        .route("/artists/search", post(api::artists::search_artists))
        .route(
            "/artists/{id}",
            get(api::artists::get_artist).put(api::artists::update_artist),
        )
        .route(
            "/shows",
            get(api::shows::list_shows).post(api::shows::create_show),
        );

    Router::new()
        .route("/healthz", get(healthz))
        .nest("/api", api_routes)
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            axum::http::header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            axum::http::header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .with_state(state)
}

async fn healthz() -> Json<ApiStatus> {
    Json(ApiStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not found")
}
