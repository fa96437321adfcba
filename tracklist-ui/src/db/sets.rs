//! DJ set database operations: inserts and the two read projections
//!
//! The listing attaches artist, venue, and analytics in one joined query
//! ordered by performance datetime descending. The detail view additionally
//! resolves the tracklist (ordered by position) and each song's
//! contributing artists.

use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use tracklist_common::db::models::{Artist, DjSet, SetAnalytics, SetSong, Song, Venue};
use uuid::Uuid;

/// A set with its artist, venue, and analytics attached (listing projection)
#[derive(Debug, Clone, Serialize)]
pub struct SetSummary {
    pub set: DjSet,
    pub artist: Artist,
    pub venue: Option<Venue>,
    pub analytics: Option<SetAnalytics>,
}

/// One tracklist entry of the detail projection
#[derive(Debug, Clone, Serialize)]
pub struct TracklistItem {
    pub position: i64,
    pub song: Song,
    pub contributors: Vec<Artist>,
}

/// Full detail projection of a single set
#[derive(Debug, Clone, Serialize)]
pub struct SetDetail {
    pub set: DjSet,
    pub artist: Artist,
    pub venue: Option<Venue>,
    pub analytics: Option<SetAnalytics>,
    pub tracklist: Vec<TracklistItem>,
}

/// Save a new set to the database
pub async fn insert_set(pool: &SqlitePool, set: &DjSet) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO dj_sets (
            guid, title, set_datetime, duration_minutes, artist_id, venue_id,
            created_at, updated_at
        ) VALUES (?, ?, ?, ?, ?, ?, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)
        "#,
    )
    .bind(set.guid.to_string())
    .bind(&set.title)
    .bind(set.set_datetime)
    .bind(set.duration_minutes)
    .bind(set.artist_id.to_string())
    .bind(set.venue_id.map(|v| v.to_string()))
    .execute(pool)
    .await?;

    Ok(())
}

/// Link a song into a set's tracklist at an explicit position
pub async fn insert_tracklist_link(pool: &SqlitePool, link: &SetSong) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO set_songs (set_id, song_id, position, created_at)
        VALUES (?, ?, ?, CURRENT_TIMESTAMP)
        "#,
    )
    .bind(link.set_id.to_string())
    .bind(link.song_id.to_string())
    .bind(link.position)
    .execute(pool)
    .await?;

    Ok(())
}

const SUMMARY_SELECT: &str = r#"
    SELECT s.guid, s.title, s.set_datetime, s.duration_minutes, s.artist_id, s.venue_id,
           a.display_name AS artist_display_name, a.country AS artist_country,
           v.name AS venue_name, v.capacity AS venue_capacity, v.address AS venue_address,
           an.set_id AS analytics_set_id, an.tickets_sold, an.attendance_count,
           an.stream_count, an.like_count
    FROM dj_sets s
    JOIN artists a ON s.artist_id = a.guid
    LEFT JOIN venues v ON s.venue_id = v.guid
    LEFT JOIN set_analytics an ON an.set_id = s.guid
"#;

/// List all sets with artist, venue, and analytics attached,
/// ordered by performance datetime descending
pub async fn list_sets(pool: &SqlitePool) -> Result<Vec<SetSummary>> {
    let sql = format!("{} ORDER BY s.set_datetime DESC", SUMMARY_SELECT);
    let rows = sqlx::query(&sql).fetch_all(pool).await?;

    let mut sets = Vec::with_capacity(rows.len());
    for row in rows {
        sets.push(summary_from_row(&row)?);
    }

    Ok(sets)
}

/// Fetch one set by identity with the full tracklist attached
///
/// Returns None when the identity does not resolve.
pub async fn find_set_detail(pool: &SqlitePool, set_id: Uuid) -> Result<Option<SetDetail>> {
    let sql = format!("{} WHERE s.guid = ?", SUMMARY_SELECT);
    let row = sqlx::query(&sql)
        .bind(set_id.to_string())
        .fetch_optional(pool)
        .await?;

    let summary = match row {
        Some(row) => summary_from_row(&row)?,
        None => return Ok(None),
    };

    let tracklist = load_tracklist(pool, set_id).await?;

    Ok(Some(SetDetail {
        set: summary.set,
        artist: summary.artist,
        venue: summary.venue,
        analytics: summary.analytics,
        tracklist,
    }))
}

/// Load a set's tracklist ordered by position, with contributing artists
async fn load_tracklist(pool: &SqlitePool, set_id: Uuid) -> Result<Vec<TracklistItem>> {
    let rows = sqlx::query(
        r#"
        SELECT ss.position, sg.guid AS song_guid, sg.title AS song_title
        FROM set_songs ss
        JOIN songs sg ON ss.song_id = sg.guid
        WHERE ss.set_id = ?
        ORDER BY ss.position
        "#,
    )
    .bind(set_id.to_string())
    .fetch_all(pool)
    .await?;

    let mut tracklist = Vec::with_capacity(rows.len());
    for row in rows {
        let song_guid_str: String = row.get("song_guid");
        let song = Song {
            guid: Uuid::parse_str(&song_guid_str)?,
            title: row.get("song_title"),
        };
        let contributors = super::songs::list_song_contributors(pool, song.guid).await?;

        tracklist.push(TracklistItem {
            position: row.get("position"),
            song,
            contributors,
        });
    }

    Ok(tracklist)
}

/// Build a SetSummary from one joined row
fn summary_from_row(row: &SqliteRow) -> Result<SetSummary> {
    let guid_str: String = row.get("guid");
    let artist_id_str: String = row.get("artist_id");
    let venue_id_str: Option<String> = row.get("venue_id");
    let set_datetime: DateTime<Utc> = row.get("set_datetime");

    let artist_id = Uuid::parse_str(&artist_id_str)?;
    let venue_id = venue_id_str.as_deref().map(Uuid::parse_str).transpose()?;

    let set = DjSet {
        guid: Uuid::parse_str(&guid_str)?,
        title: row.get("title"),
        set_datetime,
        duration_minutes: row.get("duration_minutes"),
        artist_id,
        venue_id,
    };

    let artist = Artist {
        guid: artist_id,
        display_name: row.get("artist_display_name"),
        country: row.get("artist_country"),
    };

    let venue = venue_id.map(|guid| Venue {
        guid,
        name: row.get("venue_name"),
        capacity: row.get("venue_capacity"),
        address: row.get("venue_address"),
    });

    let analytics_set_id: Option<String> = row.get("analytics_set_id");
    let analytics = match analytics_set_id {
        Some(id_str) => Some(SetAnalytics {
            set_id: Uuid::parse_str(&id_str)?,
            tickets_sold: row.get("tickets_sold"),
            attendance_count: row.get("attendance_count"),
            stream_count: row.get("stream_count"),
            like_count: row.get("like_count"),
        }),
        None => None,
    };

    Ok(SetSummary {
        set,
        artist,
        venue,
        analytics,
    })
}
