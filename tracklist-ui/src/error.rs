//! Error types for tracklist-ui
//!
//! Defines service-specific error types using thiserror, with an axum
//! response mapping so handlers can return them directly.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Main error type for the tracklist-ui service
#[derive(Error, Debug)]
pub enum Error {
    /// Database connection or query errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Malformed identifier stored in the database
    #[error("Invalid identifier: {0}")]
    InvalidId(#[from] uuid::Error),

    /// Errors surfaced from the common library
    #[error(transparent)]
    Common(#[from] tracklist_common::Error),

    /// Requested set does not exist
    #[error("Set not found: {0}")]
    SetNotFound(String),

    /// Invalid request
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Other errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience Result type using tracklist-ui Error
pub type Result<T> = std::result::Result<T, Error>;

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Error::SetNotFound(id) => (StatusCode::NOT_FOUND, format!("Set not found: {}", id)),
            Error::BadRequest(msg) => (StatusCode::BAD_REQUEST, format!("Bad request: {}", msg)),
            _ => {
                // Persistence failures mid-sequence surface as generic
                // server errors, with whatever partial writes already
                // committed left in place.
                error!("Request failed: {}", self);
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
