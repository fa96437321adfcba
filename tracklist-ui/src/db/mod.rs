//! Database operations for the set catalogue
//!
//! One module per entity, mirroring the table layout. All lookups used by
//! ingestion match on the natural key (name or title) with case-sensitive
//! exact comparison.

pub mod analytics;
pub mod artists;
pub mod sets;
pub mod songs;
pub mod venues;
