//! Venue database operations

use crate::error::Result;
use sqlx::{Row, SqlitePool};
use tracklist_common::db::models::Venue;
use uuid::Uuid;

/// Find a venue whose name exactly matches (case-sensitive)
pub async fn find_venue_by_name(pool: &SqlitePool, name: &str) -> Result<Option<Venue>> {
    let row = sqlx::query(
        r#"
        SELECT guid, name, capacity, address
        FROM venues
        WHERE name = ?
        LIMIT 1
        "#,
    )
    .bind(name)
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => {
            let guid_str: String = row.get("guid");

            Ok(Some(Venue {
                guid: Uuid::parse_str(&guid_str)?,
                name: row.get("name"),
                capacity: row.get("capacity"),
                address: row.get("address"),
            }))
        }
        None => Ok(None),
    }
}

/// Save a new venue to the database
pub async fn insert_venue(pool: &SqlitePool, venue: &Venue) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO venues (guid, name, capacity, address, created_at, updated_at)
        VALUES (?, ?, ?, ?, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)
        "#,
    )
    .bind(venue.guid.to_string())
    .bind(&venue.name)
    .bind(venue.capacity)
    .bind(&venue.address)
    .execute(pool)
    .await?;

    Ok(())
}
