//! Database operations for `sync_cursors`.
//!
//! One cursor per crawl partition. Cursors are created lazily on first save,
//! updated after every completed page, and never deleted. Last-write-wins is
//! fine here: a partition is only ever driven by one orchestrator at a time.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use reelsync_core::ContentKind;

use crate::DbError;

/// Partition key for the global top-by-vote-count movie crawl.
pub const TOP_VOTE_COUNT_CURSOR_KEY: &str = "top:vote_count:movie";

/// Partition key for one year of the year-partitioned crawl. The ranking
/// dimension is deliberately absent: a year's progress is shared across
/// sort orders.
#[must_use]
pub fn year_cursor_key(kind: ContentKind, year: i32) -> String {
    format!("years:{kind}:{year}")
}

/// A row from the `sync_cursors` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SyncCursor {
    pub key: String,
    /// Last page fully processed; 0 means the partition was never crawled.
    pub page: i32,
    pub inserted: i64,
    pub updated: i64,
    pub updated_at: DateTime<Utc>,
}

impl SyncCursor {
    /// A zero-valued cursor for a partition that was never touched.
    #[must_use]
    pub fn empty(key: &str) -> Self {
        Self {
            key: key.to_owned(),
            page: 0,
            inserted: 0,
            updated: 0,
            updated_at: Utc::now(),
        }
    }
}

/// Fetches the cursor for a partition, zero-valued when absent.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_cursor(pool: &PgPool, key: &str) -> Result<SyncCursor, DbError> {
    let row = sqlx::query_as::<_, SyncCursor>(
        "SELECT key, page, inserted, updated, updated_at \
         FROM sync_cursors \
         WHERE key = $1",
    )
    .bind(key)
    .fetch_optional(pool)
    .await?;

    Ok(row.unwrap_or_else(|| SyncCursor::empty(key)))
}

/// Upserts a partition cursor, stamping `updated_at = NOW()`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn save_cursor(
    pool: &PgPool,
    key: &str,
    page: i32,
    inserted: i64,
    updated: i64,
) -> Result<(), DbError> {
    sqlx::query(
        "INSERT INTO sync_cursors (key, page, inserted, updated) \
         VALUES ($1, $2, $3, $4) \
         ON CONFLICT (key) DO UPDATE SET \
             page       = EXCLUDED.page, \
             inserted   = EXCLUDED.inserted, \
             updated    = EXCLUDED.updated, \
             updated_at = NOW()",
    )
    .bind(key)
    .bind(page)
    .bind(inserted)
    .bind(updated)
    .execute(pool)
    .await?;

    Ok(())
}

/// Returns one cursor per year in `from..=to` for the given kind, in year
/// order, zero-valued for years never crawled.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_year_cursors(
    pool: &PgPool,
    kind: ContentKind,
    from: i32,
    to: i32,
) -> Result<Vec<SyncCursor>, DbError> {
    let (from, to) = if from <= to { (from, to) } else { (to, from) };
    let keys: Vec<String> = (from..=to).map(|y| year_cursor_key(kind, y)).collect();

    let rows = sqlx::query_as::<_, SyncCursor>(
        "SELECT key, page, inserted, updated, updated_at \
         FROM sync_cursors \
         WHERE key = ANY($1)",
    )
    .bind(&keys)
    .fetch_all(pool)
    .await?;

    let cursors = keys
        .iter()
        .map(|key| {
            rows.iter()
                .find(|r| &r.key == key)
                .cloned()
                .unwrap_or_else(|| SyncCursor::empty(key))
        })
        .collect();

    Ok(cursors)
}

/// Returns every persisted year cursor for the given kind, in key order
/// (which is year order for four-digit years).
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_cursors_by_kind(
    pool: &PgPool,
    kind: ContentKind,
) -> Result<Vec<SyncCursor>, DbError> {
    let prefix = format!("years:{kind}:%");
    let rows = sqlx::query_as::<_, SyncCursor>(
        "SELECT key, page, inserted, updated, updated_at \
         FROM sync_cursors \
         WHERE key LIKE $1 \
         ORDER BY key",
    )
    .bind(&prefix)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_cursor_key_format() {
        assert_eq!(year_cursor_key(ContentKind::Movie, 1999), "years:movie:1999");
        assert_eq!(year_cursor_key(ContentKind::Tv, 2010), "years:tv:2010");
    }

    #[test]
    fn empty_cursor_is_zero_valued() {
        let c = SyncCursor::empty("years:movie:1984");
        assert_eq!(c.page, 0);
        assert_eq!(c.inserted, 0);
        assert_eq!(c.updated, 0);
    }
}
