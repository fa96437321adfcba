//! Song database operations, including contributor links

use crate::error::Result;
use sqlx::{Row, SqlitePool};
use tracklist_common::db::models::{Artist, Song, SongArtist};
use uuid::Uuid;

/// Find a song whose title exactly matches (case-sensitive)
pub async fn find_song_by_title(pool: &SqlitePool, title: &str) -> Result<Option<Song>> {
    let row = sqlx::query(
        r#"
        SELECT guid, title
        FROM songs
        WHERE title = ?
        LIMIT 1
        "#,
    )
    .bind(title)
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => {
            let guid_str: String = row.get("guid");

            Ok(Some(Song {
                guid: Uuid::parse_str(&guid_str)?,
                title: row.get("title"),
            }))
        }
        None => Ok(None),
    }
}

/// Save a new song to the database
pub async fn insert_song(pool: &SqlitePool, song: &Song) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO songs (guid, title, created_at, updated_at)
        VALUES (?, ?, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)
        "#,
    )
    .bind(song.guid.to_string())
    .bind(&song.title)
    .execute(pool)
    .await?;

    Ok(())
}

/// Check for an existing contributor link by its composite key
pub async fn contributor_link_exists(
    pool: &SqlitePool,
    song_id: Uuid,
    artist_id: Uuid,
) -> Result<bool> {
    let exists: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM song_artists WHERE song_id = ? AND artist_id = ?)",
    )
    .bind(song_id.to_string())
    .bind(artist_id.to_string())
    .fetch_one(pool)
    .await?;

    Ok(exists)
}

/// Link an artist to a song as a contributor
pub async fn insert_contributor_link(pool: &SqlitePool, link: &SongArtist) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO song_artists (song_id, artist_id, created_at)
        VALUES (?, ?, CURRENT_TIMESTAMP)
        "#,
    )
    .bind(link.song_id.to_string())
    .bind(link.artist_id.to_string())
    .execute(pool)
    .await?;

    Ok(())
}

/// List the contributing artists of a song
pub async fn list_song_contributors(pool: &SqlitePool, song_id: Uuid) -> Result<Vec<Artist>> {
    let rows = sqlx::query(
        r#"
        SELECT a.guid, a.display_name, a.country
        FROM song_artists sa
        JOIN artists a ON sa.artist_id = a.guid
        WHERE sa.song_id = ?
        ORDER BY a.display_name
        "#,
    )
    .bind(song_id.to_string())
    .fetch_all(pool)
    .await?;

    let mut contributors = Vec::with_capacity(rows.len());
    for row in rows {
        let guid_str: String = row.get("guid");
        contributors.push(Artist {
            guid: Uuid::parse_str(&guid_str)?,
            display_name: row.get("display_name"),
            country: row.get("country"),
        });
    }

    Ok(contributors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::artists::insert_artist;

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
    async fn test_insert_and_find_song() {
        let pool = setup_test_db().await;

        let song = Song::new("I Want You (Forever)".to_string());
        insert_song(&pool, &song).await.expect("Failed to save song");

        let loaded = find_song_by_title(&pool, "I Want You (Forever)")
            .await
            .expect("Lookup failed")
            .expect("Song not found");
        assert_eq!(loaded.guid, song.guid);
    }

    #[tokio::test]
    async fn test_contributor_link_roundtrip() {
        let pool = setup_test_db().await;

        let song = Song::new("Sanctuary".to_string());
        insert_song(&pool, &song).await.unwrap();
        let artist = Artist::new("Carl Cox".to_string());
        insert_artist(&pool, &artist).await.unwrap();

        assert!(!contributor_link_exists(&pool, song.guid, artist.guid).await.unwrap());

        let link = SongArtist {
            song_id: song.guid,
            artist_id: artist.guid,
        };
        insert_contributor_link(&pool, &link).await.unwrap();

        assert!(contributor_link_exists(&pool, song.guid, artist.guid).await.unwrap());

        let contributors = list_song_contributors(&pool, song.guid).await.unwrap();
        assert_eq!(contributors.len(), 1);
        assert_eq!(contributors[0].display_name, "Carl Cox");
    }
}
