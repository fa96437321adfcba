//! tracklist-ui library - web service for cataloguing DJ performance sets
//!
//! Exposes the set catalogue over HTTP: a listing of all sets, a per-set
//! detail view with the ordered tracklist, and a submission endpoint that
//! materializes a set plus its reference data (artists, venue, songs).

use axum::Router;
use sqlx::SqlitePool;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod api;
pub mod db;
pub mod error;
pub mod ingest;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/api/sets", get(api::list_sets).post(api::create_set))
        .route("/api/sets/:id", get(api::get_set))
        .merge(api::health_routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
