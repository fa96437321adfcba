//! Artist database operations

use crate::error::Result;
use sqlx::{Row, SqlitePool};
use tracklist_common::db::models::Artist;
use uuid::Uuid;

/// Find an artist whose display name exactly matches (case-sensitive)
///
/// Returns the first match; the store does not enforce name uniqueness.
pub async fn find_artist_by_name(pool: &SqlitePool, display_name: &str) -> Result<Option<Artist>> {
    let row = sqlx::query(
        r#"
        SELECT guid, display_name, country
        FROM artists
        WHERE display_name = ?
        LIMIT 1
        "#,
    )
    .bind(display_name)
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => {
            let guid_str: String = row.get("guid");

            Ok(Some(Artist {
                guid: Uuid::parse_str(&guid_str)?,
                display_name: row.get("display_name"),
                country: row.get("country"),
            }))
        }
        None => Ok(None),
    }
}

/// Save a new artist to the database
pub async fn insert_artist(pool: &SqlitePool, artist: &Artist) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO artists (guid, display_name, country, created_at, updated_at)
        VALUES (?, ?, ?, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)
        "#,
    )
    .bind(artist.guid.to_string())
    .bind(&artist.display_name)
    .bind(&artist.country)
    .execute(pool)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup_test_db() -> SqlitePool {
        let pool = SqlitePool::connect("sqlite::memory:")
            .await
            .expect("Failed to create in-memory database");
        tracklist_common::db::init::initialize_schema(&pool)
            .await
            .expect("Schema initialization failed");
        pool
    }

    #[tokio::test]
    async fn test_insert_and_find_artist() {
        let pool = setup_test_db().await;

        let artist = Artist::new("Nina Kraviz".to_string());
        insert_artist(&pool, &artist).await.expect("Failed to save artist");

        let loaded = find_artist_by_name(&pool, "Nina Kraviz")
            .await
            .expect("Lookup failed")
            .expect("Artist not found");

        assert_eq!(loaded.guid, artist.guid);
        assert_eq!(loaded.display_name, "Nina Kraviz");
        assert_eq!(loaded.country, None);
    }

    #[tokio::test]
    async fn test_find_artist_match_is_case_sensitive() {
        let pool = setup_test_db().await;

        let artist = Artist::new("Carl Cox".to_string());
        insert_artist(&pool, &artist).await.unwrap();

        let miss = find_artist_by_name(&pool, "carl cox").await.unwrap();
        assert!(miss.is_none(), "Lookup must be case-sensitive exact match");
    }
}
