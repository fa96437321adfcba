//! Database layer: schema initialization and row models

pub mod init;
pub mod models;

pub use init::{init_database, initialize_schema};
pub use models::{Artist, DjSet, SetAnalytics, SetSong, Song, SongArtist, Venue};
