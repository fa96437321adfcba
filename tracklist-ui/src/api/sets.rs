//! Set catalogue endpoints: listing, detail, and submission
//!
//! The create endpoint answers with a redirect to the listing, matching
//! the post-then-list flow of the submission form. Missing or malformed
//! required fields never reach the ingestion routine: the JSON extractor
//! rejects them before any write occurs.

use axum::{
    extract::{Path, State},
    response::Redirect,
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::db::sets::{self, SetDetail, SetSummary};
use crate::error::{Error, Result};
use crate::ingest::{self, NewSetSubmission};
use crate::AppState;

/// Listing response wrapper
#[derive(Debug, Serialize)]
pub struct SetListResponse {
    pub sets: Vec<SetSummary>,
}

/// GET /api/sets
///
/// All sets with artist, venue, and analytics attached, newest first.
pub async fn list_sets(State(state): State<AppState>) -> Result<Json<SetListResponse>> {
    let sets = sets::list_sets(&state.db).await?;
    Ok(Json(SetListResponse { sets }))
}

/// GET /api/sets/:id
///
/// One set with the full ordered tracklist. 404 when the identity does
/// not resolve.
pub async fn get_set(
    State(state): State<AppState>,
    Path(set_id): Path<Uuid>,
) -> Result<Json<SetDetail>> {
    sets::find_set_detail(&state.db, set_id)
        .await?
        .map(Json)
        .ok_or_else(|| Error::SetNotFound(set_id.to_string()))
}

/// POST /api/sets
///
/// Ingest a submitted set and redirect to the listing.
pub async fn create_set(
    State(state): State<AppState>,
    Json(submission): Json<NewSetSubmission>,
) -> Result<Redirect> {
    ingest::ingest_set(&state.db, submission).await?;
    Ok(Redirect::to("/api/sets"))
}
