//! Set ingestion: materialize a submitted set plus its reference data
//!
//! The sequence below is NOT wrapped in a transaction. Every
//! lookup-or-create step commits on its own, and the analytics and
//! linking rows are queued and written in a trailing batch. A failure
//! after the set row commits therefore leaves an orphaned set without
//! analytics and/or with a partial tracklist. This partial-write behavior
//! is documented and preserved, not hardened.
//!
//! Name-based deduplication (artist display name, venue name, song title)
//! is a case-sensitive exact match with no uniqueness constraint behind
//! it, so concurrent submissions with the same new name can race and
//! produce duplicate reference rows.

use crate::db::{analytics, artists, sets, songs, venues};
use crate::error::Result;
use chrono::{DateTime, FixedOffset, Utc};
use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::{debug, info};
use tracklist_common::db::models::{Artist, DjSet, SetAnalytics, SetSong, Song, SongArtist, Venue};
use uuid::Uuid;

/// A submitted set, as posted by the create form
#[derive(Debug, Clone, Deserialize)]
pub struct NewSetSubmission {
    pub title: String,
    pub artist_name: String,
    pub venue_name: String,
    /// Performance start; any offset is accepted and normalized to UTC
    pub set_datetime: DateTime<FixedOffset>,
    pub tickets_sold: u32,
    #[serde(default)]
    pub tracklist: Vec<TracklistEntry>,
}

/// One submitted tracklist row: a song title and an optional performer
#[derive(Debug, Clone, Deserialize)]
pub struct TracklistEntry {
    pub song_title: String,
    #[serde(default)]
    pub artist_name: Option<String>,
}

/// Ingest a submitted set, creating missing reference rows on demand
///
/// Returns the new set's identity.
pub async fn ingest_set(pool: &SqlitePool, submission: NewSetSubmission) -> Result<Uuid> {
    // 1. Resolve the primary artist by exact display name
    let artist = find_or_create_artist(pool, &submission.artist_name).await?;

    // 2. Resolve the venue by exact name
    let venue = match venues::find_venue_by_name(pool, &submission.venue_name).await? {
        Some(venue) => venue,
        None => {
            let venue = Venue::new(submission.venue_name.clone());
            venues::insert_venue(pool, &venue).await?;
            debug!("Created venue '{}'", venue.name);
            venue
        }
    };

    // 3. The set row commits immediately so the rows below can reference it
    let set = DjSet::new(
        submission.title.clone(),
        submission.set_datetime.with_timezone(&Utc),
        artist.guid,
        Some(venue.guid),
    );
    sets::insert_set(pool, &set).await?;

    // 4. Analytics queued; tickets sold from the submission, counters zero
    let set_analytics = SetAnalytics::new(set.guid, i64::from(submission.tickets_sold));

    // 5. Resolve the tracklist. Songs and performers commit as they are
    //    found-or-created; the links themselves are queued.
    let mut pending_contributors: Vec<SongArtist> = Vec::new();
    let mut pending_tracklist: Vec<SetSong> = Vec::new();

    for entry in &submission.tracklist {
        // Blank song titles are skipped entirely: no row, no error
        if entry.song_title.trim().is_empty() {
            continue;
        }

        let song = match songs::find_song_by_title(pool, &entry.song_title).await? {
            Some(song) => song,
            None => {
                let song = Song::new(entry.song_title.clone());
                songs::insert_song(pool, &song).await?;
                song
            }
        };

        if let Some(performer_name) = entry.artist_name.as_deref() {
            if !performer_name.trim().is_empty() {
                let performer = find_or_create_artist(pool, performer_name).await?;

                let link = SongArtist {
                    song_id: song.guid,
                    artist_id: performer.guid,
                };
                // The composite-key lookup must also see links queued by
                // earlier entries of this same submission
                let already_linked =
                    songs::contributor_link_exists(pool, link.song_id, link.artist_id).await?
                        || pending_contributors.contains(&link);
                if !already_linked {
                    pending_contributors.push(link);
                }
            }
        }

        pending_tracklist.push(SetSong {
            set_id: set.guid,
            song_id: song.guid,
            position: pending_tracklist.len() as i64,
        });
    }

    // 6. Write the queued rows in one batch of inserts
    analytics::insert_analytics(pool, &set_analytics).await?;
    for link in &pending_contributors {
        songs::insert_contributor_link(pool, link).await?;
    }
    for link in &pending_tracklist {
        sets::insert_tracklist_link(pool, link).await?;
    }

    info!(
        "Ingested set '{}' ({}) with {} tracklist entries",
        set.title,
        set.guid,
        pending_tracklist.len()
    );

    Ok(set.guid)
}

/// Look up an artist by exact display name, creating one (name only,
/// no country) when absent
async fn find_or_create_artist(pool: &SqlitePool, display_name: &str) -> Result<Artist> {
    match artists::find_artist_by_name(pool, display_name).await? {
        Some(artist) => Ok(artist),
        None => {
            let artist = Artist::new(display_name.to_string());
            artists::insert_artist(pool, &artist).await?;
            debug!("Created artist '{}'", artist.display_name);
            Ok(artist)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    async fn setup_test_db() -> SqlitePool {
        let pool = SqlitePool::connect("sqlite::memory:")
            .await
            .expect("Failed to create in-memory database");
        tracklist_common::db::init::initialize_schema(&pool)
            .await
            .expect("Schema initialization failed");
        pool
    }

    fn submission(title: &str, artist: &str, venue: &str) -> NewSetSubmission {
        NewSetSubmission {
            title: title.to_string(),
            artist_name: artist.to_string(),
            venue_name: venue.to_string(),
            set_datetime: Utc
                .with_ymd_and_hms(2015, 8, 15, 22, 0, 0)
                .unwrap()
                .fixed_offset(),
            tickets_sold: 500,
            tracklist: Vec::new(),
        }
    }

    fn entry(song: &str, performer: Option<&str>) -> TracklistEntry {
        TracklistEntry {
            song_title: song.to_string(),
            artist_name: performer.map(str::to_string),
        }
    }

    async fn count(pool: &SqlitePool, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_new_names_create_one_artist_one_venue_one_set() {
        let pool = setup_test_db().await;

        let set_id = ingest_set(&pool, submission("Space Ibiza 2015", "Carl Cox", "Printworks London"))
            .await
            .unwrap();

        assert_eq!(count(&pool, "artists").await, 1);
        assert_eq!(count(&pool, "venues").await, 1);
        assert_eq!(count(&pool, "dj_sets").await, 1);

        let detail = sets::find_set_detail(&pool, set_id).await.unwrap().unwrap();
        assert_eq!(detail.artist.display_name, "Carl Cox");
        assert_eq!(detail.artist.country, None);
        assert_eq!(detail.venue.unwrap().name, "Printworks London");
        assert_eq!(detail.analytics.unwrap().tickets_sold, 500);
    }

    #[tokio::test]
    async fn test_second_set_reuses_existing_artist() {
        let pool = setup_test_db().await;

        let first = ingest_set(&pool, submission("Set One", "Carl Cox", "Venue One"))
            .await
            .unwrap();
        let second = ingest_set(&pool, submission("Set Two", "Carl Cox", "Venue Two"))
            .await
            .unwrap();

        assert_eq!(count(&pool, "artists").await, 1, "No duplicate artist row");

        let first_detail = sets::find_set_detail(&pool, first).await.unwrap().unwrap();
        let second_detail = sets::find_set_detail(&pool, second).await.unwrap().unwrap();
        assert_eq!(first_detail.artist.guid, second_detail.artist.guid);
    }

    #[tokio::test]
    async fn test_blank_song_titles_are_skipped() {
        let pool = setup_test_db().await;

        let mut sub = submission("Set", "Artist", "Venue");
        sub.tracklist = vec![
            entry("Real Song", None),
            entry("", None),
            entry("   ", None),
            entry("Another Song", None),
        ];
        let set_id = ingest_set(&pool, sub).await.unwrap();

        assert_eq!(count(&pool, "songs").await, 2);
        assert_eq!(count(&pool, "set_songs").await, 2);

        // Positions count only the non-skipped entries
        let detail = sets::find_set_detail(&pool, set_id).await.unwrap().unwrap();
        assert_eq!(detail.tracklist[0].position, 0);
        assert_eq!(detail.tracklist[0].song.title, "Real Song");
        assert_eq!(detail.tracklist[1].position, 1);
        assert_eq!(detail.tracklist[1].song.title, "Another Song");
    }

    #[tokio::test]
    async fn test_existing_song_title_is_reused() {
        let pool = setup_test_db().await;

        let mut first = submission("Set One", "Artist A", "Venue");
        first.tracklist = vec![entry("Shared Song", None)];
        ingest_set(&pool, first).await.unwrap();

        let mut second = submission("Set Two", "Artist B", "Venue");
        second.tracklist = vec![entry("Shared Song", None)];
        ingest_set(&pool, second).await.unwrap();

        assert_eq!(count(&pool, "songs").await, 1, "No duplicate song row");
        assert_eq!(count(&pool, "set_songs").await, 2, "Each set links the shared song");
    }

    #[tokio::test]
    async fn test_same_song_performer_pair_links_once() {
        let pool = setup_test_db().await;

        let mut sub = submission("Set", "Artist", "Venue");
        sub.tracklist = vec![
            entry("Encore Song", Some("Green Velvet")),
            entry("Encore Song", Some("Green Velvet")),
        ];
        ingest_set(&pool, sub).await.unwrap();

        assert_eq!(count(&pool, "song_artists").await, 1, "Exactly one contributor link");
        // The song still appears twice in the tracklist
        assert_eq!(count(&pool, "set_songs").await, 2);
    }

    #[tokio::test]
    async fn test_performer_without_name_creates_no_link() {
        let pool = setup_test_db().await;

        let mut sub = submission("Set", "Artist", "Venue");
        sub.tracklist = vec![entry("Instrumental", None), entry("Also Instrumental", Some("  "))];
        ingest_set(&pool, sub).await.unwrap();

        assert_eq!(count(&pool, "song_artists").await, 0);
        // Only the primary artist exists; blank performer names create nothing
        assert_eq!(count(&pool, "artists").await, 1);
    }

    #[tokio::test]
    async fn test_performer_reuses_primary_artist_row() {
        let pool = setup_test_db().await;

        let mut sub = submission("Set", "Carl Cox", "Venue");
        sub.tracklist = vec![entry("Own Production", Some("Carl Cox"))];
        ingest_set(&pool, sub).await.unwrap();

        assert_eq!(count(&pool, "artists").await, 1);
        assert_eq!(count(&pool, "song_artists").await, 1);
    }

    #[tokio::test]
    async fn test_datetime_is_normalized_to_utc() {
        let pool = setup_test_db().await;

        let mut sub = submission("Offset Set", "Artist", "Venue");
        // 22:00 at +02:00 is 20:00 UTC
        sub.set_datetime = DateTime::parse_from_rfc3339("2015-08-15T22:00:00+02:00").unwrap();
        let set_id = ingest_set(&pool, sub).await.unwrap();

        let detail = sets::find_set_detail(&pool, set_id).await.unwrap().unwrap();
        assert_eq!(
            detail.set.set_datetime,
            Utc.with_ymd_and_hms(2015, 8, 15, 20, 0, 0).unwrap()
        );
    }
}
