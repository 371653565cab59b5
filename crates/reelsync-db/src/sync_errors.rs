//! The append-only sync-error journal.
//!
//! Every classified upstream failure and every unexpected per-item failure
//! lands here, one row per incident. The journal is write-only from the
//! sync engine's perspective; observability tooling reads it.

use sqlx::PgPool;

use crate::DbError;

/// A journal entry about one failure.
#[derive(Debug, Clone, Default)]
pub struct NewSyncError {
    /// Endpoint identifier, e.g. `"discover/movie"` or `"upsert_title"`.
    pub endpoint: String,
    /// Request URL with credentials stripped, when the failure was HTTP.
    pub url: Option<String>,
    /// HTTP status code, when the upstream produced one.
    pub status_code: Option<i32>,
    /// Request parameters relevant to the failure (page, year, ...).
    pub params: Option<serde_json::Value>,
    /// Error description for non-HTTP and unexpected failures.
    pub detail: Option<String>,
    /// TMDB id of the record being processed, if known.
    pub tmdb_id: Option<i64>,
}

/// Journal counts for status reporting.
#[derive(Debug, Clone, Copy, sqlx::FromRow)]
pub struct ErrorCounts {
    pub last_hour: i64,
    pub last_24h: i64,
    pub total: i64,
}

/// Appends one entry to the journal.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn record_sync_error(pool: &PgPool, entry: &NewSyncError) -> Result<(), DbError> {
    sqlx::query(
        "INSERT INTO sync_errors (endpoint, url, status_code, params, detail, tmdb_id) \
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(&entry.endpoint)
    .bind(entry.url.as_deref())
    .bind(entry.status_code)
    .bind(entry.params.as_ref())
    .bind(entry.detail.as_deref())
    .bind(entry.tmdb_id)
    .execute(pool)
    .await?;

    Ok(())
}

/// Returns journal counts for the last hour, last 24 hours, and all time.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn count_errors(pool: &PgPool) -> Result<ErrorCounts, DbError> {
    let counts = sqlx::query_as::<_, ErrorCounts>(
        "SELECT COUNT(*) FILTER (WHERE created_at >= NOW() - INTERVAL '1 hour')  AS last_hour, \
                COUNT(*) FILTER (WHERE created_at >= NOW() - INTERVAL '24 hours') AS last_24h, \
                COUNT(*) AS total \
         FROM sync_errors",
    )
    .fetch_one(pool)
    .await?;

    Ok(counts)
}
