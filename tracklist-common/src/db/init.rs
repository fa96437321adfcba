//! Database initialization
//!
//! Creates the SQLite database on first run and brings up the full table
//! schema. Safe to call repeatedly: every statement is CREATE IF NOT EXISTS.

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Use sqlite options to create database if it doesn't exist
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    initialize_schema(&pool).await?;

    Ok(pool)
}

/// Apply connection pragmas and create all tables (idempotent)
///
/// Split out from [`init_database`] so tests can run against an
/// in-memory pool.
pub async fn initialize_schema(pool: &SqlitePool) -> Result<()> {
    // Foreign keys must be enabled per connection for the cascade,
    // restrict, and set-null delete rules to take effect
    sqlx::query("PRAGMA foreign_keys = ON").execute(pool).await?;

    // WAL allows concurrent readers with one writer
    sqlx::query("PRAGMA journal_mode = WAL").execute(pool).await?;

    sqlx::query("PRAGMA busy_timeout = 5000").execute(pool).await?;

    // Reference tables
    create_artists_table(pool).await?;
    create_venues_table(pool).await?;
    create_songs_table(pool).await?;

    // Sets and their one-to-one analytics
    create_dj_sets_table(pool).await?;
    create_set_analytics_table(pool).await?;

    // Linking tables
    create_song_artists_table(pool).await?;
    create_set_songs_table(pool).await?;

    Ok(())
}

/// Create the artists table
///
/// display_name is the ingestion lookup key but carries NO uniqueness
/// constraint: concurrent submissions with the same new name can produce
/// duplicate rows. That is accepted behavior, not a defect.
async fn create_artists_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS artists (
            guid TEXT PRIMARY KEY,
            display_name TEXT NOT NULL,
            country TEXT,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_artists_display_name ON artists(display_name)")
        .execute(pool)
        .await?;

    Ok(())
}

/// Create the venues table
async fn create_venues_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS venues (
            guid TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            capacity INTEGER,
            address TEXT,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            CHECK (capacity IS NULL OR capacity >= 0)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_venues_name ON venues(name)")
        .execute(pool)
        .await?;

    Ok(())
}

/// Create the songs table
async fn create_songs_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS songs (
            guid TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_songs_title ON songs(title)")
        .execute(pool)
        .await?;

    Ok(())
}

/// Create the dj_sets table
///
/// Deleting an artist with sets is rejected (RESTRICT); deleting a venue
/// nulls the set's venue reference. Both rules are part of the observable
/// contract.
async fn create_dj_sets_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS dj_sets (
            guid TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            set_datetime TIMESTAMP NOT NULL,
            duration_minutes INTEGER,
            artist_id TEXT NOT NULL REFERENCES artists(guid) ON DELETE RESTRICT,
            venue_id TEXT REFERENCES venues(guid) ON DELETE SET NULL,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            CHECK (duration_minutes IS NULL OR duration_minutes > 0)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_dj_sets_artist ON dj_sets(artist_id)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_dj_sets_venue ON dj_sets(venue_id)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_dj_sets_datetime ON dj_sets(set_datetime)")
        .execute(pool)
        .await?;

    Ok(())
}

/// Create the set_analytics table (one-to-one with dj_sets)
async fn create_set_analytics_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS set_analytics (
            set_id TEXT PRIMARY KEY REFERENCES dj_sets(guid) ON DELETE CASCADE,
            tickets_sold INTEGER NOT NULL DEFAULT 0,
            attendance_count INTEGER NOT NULL DEFAULT 0,
            stream_count INTEGER NOT NULL DEFAULT 0,
            like_count INTEGER NOT NULL DEFAULT 0,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            CHECK (tickets_sold >= 0),
            CHECK (attendance_count >= 0),
            CHECK (stream_count >= 0),
            CHECK (like_count >= 0)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Create the song_artists linking table (song contributors, many-to-many)
async fn create_song_artists_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS song_artists (
            song_id TEXT NOT NULL REFERENCES songs(guid) ON DELETE CASCADE,
            artist_id TEXT NOT NULL REFERENCES artists(guid) ON DELETE CASCADE,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            PRIMARY KEY (song_id, artist_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_song_artists_song ON song_artists(song_id)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_song_artists_artist ON song_artists(artist_id)")
        .execute(pool)
        .await?;

    Ok(())
}

/// Create the set_songs linking table (a set's tracklist)
///
/// position is the explicit tracklist sequence, 0-based over the
/// non-skipped entries. The same song may appear at two positions.
async fn create_set_songs_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS set_songs (
            set_id TEXT NOT NULL REFERENCES dj_sets(guid) ON DELETE CASCADE,
            song_id TEXT NOT NULL REFERENCES songs(guid) ON DELETE CASCADE,
            position INTEGER NOT NULL,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            PRIMARY KEY (set_id, position),
            CHECK (position >= 0)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_set_songs_song ON set_songs(song_id)")
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
        initialize_schema(&pool)
            .await
            .expect("Schema initialization failed");
        pool
    }

    #[tokio::test]
    async fn test_all_tables_created() {
        let pool = setup_test_db().await;

        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name",
        )
        .fetch_all(&pool)
        .await
        .unwrap();

        for expected in [
            "artists",
            "dj_sets",
            "set_analytics",
            "set_songs",
            "song_artists",
            "songs",
            "venues",
        ] {
            assert!(
                tables.iter().any(|t| t == expected),
                "Missing table '{}', got {:?}",
                expected,
                tables
            );
        }
    }

    #[tokio::test]
    async fn test_initialize_schema_is_idempotent() {
        let pool = setup_test_db().await;

        initialize_schema(&pool)
            .await
            .expect("Second initialization should succeed");
    }

    #[tokio::test]
    async fn test_artist_name_is_not_unique() {
        // Name-based dedup happens in the ingestion path only; the store
        // itself accepts duplicate display names.
        let pool = setup_test_db().await;

        for guid in ["a-1", "a-2"] {
            sqlx::query("INSERT INTO artists (guid, display_name) VALUES (?, ?)")
                .bind(guid)
                .bind("Same Name")
                .execute(&pool)
                .await
                .expect("Duplicate display_name must be accepted");
        }

        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM artists WHERE display_name = 'Same Name'")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(count, 2);
    }
}
