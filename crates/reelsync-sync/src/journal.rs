//! Error-journal plumbing for the orchestrators.
//!
//! Maps a classified [`TmdbError`] or a store failure onto a journal row.
//! Journal writes are best-effort: if the journal itself is unreachable the
//! incident is logged and the crawl keeps going.

use sqlx::PgPool;

use reelsync_db::NewSyncError;
use reelsync_tmdb::TmdbError;

/// Records an upstream fetch failure (terminal, or transient after the
/// retry ceiling).
pub(crate) async fn journal_fetch_failure(
    pool: &PgPool,
    endpoint: &str,
    err: &TmdbError,
    tmdb_id: Option<i64>,
    params: serde_json::Value,
) {
    let entry = NewSyncError {
        endpoint: endpoint.to_owned(),
        url: err.url().map(str::to_owned),
        status_code: err.status_code().map(i32::from),
        params: Some(params),
        detail: Some(err.to_string()),
        tmdb_id,
    };
    write_entry(pool, &entry).await;
}

/// Records a store-write failure for one item.
pub(crate) async fn journal_upsert_failure(
    pool: &PgPool,
    err: &reelsync_db::DbError,
    tmdb_id: i64,
) {
    let entry = NewSyncError {
        endpoint: "upsert_title".to_owned(),
        detail: Some(err.to_string()),
        tmdb_id: Some(tmdb_id),
        ..NewSyncError::default()
    };
    write_entry(pool, &entry).await;
}

async fn write_entry(pool: &PgPool, entry: &NewSyncError) {
    if let Err(journal_err) = reelsync_db::record_sync_error(pool, entry).await {
        tracing::error!(
            endpoint = %entry.endpoint,
            error = %journal_err,
            "failed to write sync-error journal entry"
        );
    }
}
