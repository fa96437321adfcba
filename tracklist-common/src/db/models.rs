//! Database row models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Artist record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artist {
    pub guid: Uuid,
    pub display_name: String,
    pub country: Option<String>,
}

impl Artist {
    /// Create a new artist with only the display name populated
    pub fn new(display_name: String) -> Self {
        Self {
            guid: Uuid::new_v4(),
            display_name,
            country: None,
        }
    }
}

/// Venue record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Venue {
    pub guid: Uuid,
    pub name: String,
    pub capacity: Option<i64>,
    pub address: Option<String>,
}

impl Venue {
    /// Create a new venue with only the name populated
    pub fn new(name: String) -> Self {
        Self {
            guid: Uuid::new_v4(),
            name,
            capacity: None,
            address: None,
        }
    }
}

/// DJ set record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DjSet {
    pub guid: Uuid,
    pub title: String,
    /// Performance start, always stored as UTC
    pub set_datetime: DateTime<Utc>,
    pub duration_minutes: Option<i64>,
    pub artist_id: Uuid,
    pub venue_id: Option<Uuid>,
}

impl DjSet {
    pub fn new(
        title: String,
        set_datetime: DateTime<Utc>,
        artist_id: Uuid,
        venue_id: Option<Uuid>,
    ) -> Self {
        Self {
            guid: Uuid::new_v4(),
            title,
            set_datetime,
            duration_minutes: None,
            artist_id,
            venue_id,
        }
    }
}

/// Song record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Song {
    pub guid: Uuid,
    pub title: String,
}

impl Song {
    pub fn new(title: String) -> Self {
        Self {
            guid: Uuid::new_v4(),
            title,
        }
    }
}

/// Song contributor link (composite key: song + artist)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongArtist {
    pub song_id: Uuid,
    pub artist_id: Uuid,
}

/// Tracklist link between a set and a song, with its explicit sequence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetSong {
    pub set_id: Uuid,
    pub song_id: Uuid,
    pub position: i64,
}

/// Per-set analytics record (one-to-one with a set)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetAnalytics {
    pub set_id: Uuid,
    pub tickets_sold: i64,
    pub attendance_count: i64,
    pub stream_count: i64,
    pub like_count: i64,
}

impl SetAnalytics {
    /// Create an analytics record for a set with tickets sold from the
    /// submission; remaining counters start at zero
    pub fn new(set_id: Uuid, tickets_sold: i64) -> Self {
        Self {
            set_id,
            tickets_sold,
            attendance_count: 0,
            stream_count: 0,
            like_count: 0,
        }
    }
}
