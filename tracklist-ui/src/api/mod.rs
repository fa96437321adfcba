//! HTTP API handlers for tracklist-ui

pub mod health;
pub mod sets;

pub use health::health_routes;
pub use sets::{create_set, get_set, list_sets};
