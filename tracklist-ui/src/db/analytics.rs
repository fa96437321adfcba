//! Set analytics database operations (one row per set)

use crate::error::Result;
use sqlx::{Row, SqlitePool};
use tracklist_common::db::models::SetAnalytics;
use uuid::Uuid;

/// Save an analytics record for a set
pub async fn insert_analytics(pool: &SqlitePool, analytics: &SetAnalytics) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO set_analytics (
            set_id, tickets_sold, attendance_count, stream_count, like_count,
            created_at, updated_at
        ) VALUES (?, ?, ?, ?, ?, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)
        "#,
    )
    .bind(analytics.set_id.to_string())
    .bind(analytics.tickets_sold)
    .bind(analytics.attendance_count)
    .bind(analytics.stream_count)
    .bind(analytics.like_count)
    .execute(pool)
    .await?;

    Ok(())
}

/// Load the analytics record of a set, if one exists
pub async fn find_analytics_for_set(
    pool: &SqlitePool,
    set_id: Uuid,
) -> Result<Option<SetAnalytics>> {
    let row = sqlx::query(
        r#"
        SELECT set_id, tickets_sold, attendance_count, stream_count, like_count
        FROM set_analytics
        WHERE set_id = ?
        "#,
    )
    .bind(set_id.to_string())
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => {
            let set_id_str: String = row.get("set_id");

            Ok(Some(SetAnalytics {
                set_id: Uuid::parse_str(&set_id_str)?,
                tickets_sold: row.get("tickets_sold"),
                attendance_count: row.get("attendance_count"),
                stream_count: row.get("stream_count"),
                like_count: row.get("like_count"),
            }))
        }
        None => Ok(None),
    }
}
