//! The global top-by-vote-count crawl.
//!
//! Walks `discover/movie` ordered by vote count, page by page, until the
//! saved-record limit is reached, the upstream runs out of results, or a
//! page fetch fails outright. The cursor for the single
//! `top:vote_count:movie` partition is persisted after every page.

use sqlx::PgPool;

use reelsync_core::{AppConfig, ContentKind, RankingDimension};
use reelsync_db::{get_cursor, save_cursor, DbError, UpsertOutcome, TOP_VOTE_COUNT_CURSOR_KEY};
use reelsync_tmdb::{DiscoverQuery, TmdbClient};

use crate::item::{process_item, ItemSkip};
use crate::outcome::{SyncStatus, TopSyncOutcome};
use crate::{journal, resolve_start_page};

/// Caller knobs for [`sync_top`].
#[derive(Debug, Clone, Copy)]
pub struct TopSyncOptions {
    /// Stop once this many records were successfully saved.
    pub limit: u64,
    /// Continue from the persisted cursor instead of page 1.
    pub resume: bool,
    /// Explicit first page; overrides both `resume` and the cursor.
    pub start_page: Option<u32>,
}

impl Default for TopSyncOptions {
    fn default() -> Self {
        Self {
            limit: 10_000,
            resume: true,
            start_page: None,
        }
    }
}

/// Runs the global top-by-vote-count crawl for movies.
///
/// Per-item failures are journaled and skipped; a page-level fetch failure
/// ends the crawl with `status: done` and whatever progress is already
/// persisted. Cumulative cursor counts build on the values persisted before
/// this run started.
///
/// # Errors
///
/// Returns [`DbError`] only for cursor persistence failures; upstream
/// trouble never surfaces as an error.
pub async fn sync_top(
    pool: &PgPool,
    client: &TmdbClient,
    config: &AppConfig,
    opts: TopSyncOptions,
) -> Result<TopSyncOutcome, DbError> {
    let kind = ContentKind::Movie;
    let dimension = RankingDimension::VoteCount;

    let baseline = get_cursor(pool, TOP_VOTE_COUNT_CURSOR_KEY).await?;
    let mut page = resolve_start_page(opts.start_page, opts.resume, baseline.page);

    let mut attempted: u64 = 0;
    let mut inserted: u64 = 0;
    let mut updated: u64 = 0;
    let mut skipped_fetch: u64 = 0;
    let mut skipped_upsert: u64 = 0;

    let status = loop {
        let query = DiscoverQuery {
            kind,
            sort: dimension,
            year: None,
            page,
        };
        let data = match client.discover(&query).await {
            Ok(d) => d,
            Err(e) => {
                tracing::error!(page, error = %e, "discover page fetch failed, ending crawl");
                journal::journal_fetch_failure(
                    pool,
                    "discover/movie",
                    &e,
                    None,
                    serde_json::json!({ "sort_by": dimension.as_sort_param(), "page": page }),
                )
                .await;
                break SyncStatus::Done;
            }
        };

        if data.results.is_empty() {
            break SyncStatus::Done;
        }

        for entry in &data.results {
            if inserted + updated >= opts.limit {
                save_progress(pool, &baseline, page, inserted, updated).await?;
                return Ok(TopSyncOutcome {
                    status: SyncStatus::Ok,
                    page,
                    attempted,
                    inserted,
                    updated,
                    skipped_fetch,
                    skipped_upsert,
                });
            }

            attempted += 1;
            match process_item(pool, client, entry, kind, dimension, &config.tmdb_locale).await {
                Ok(UpsertOutcome::Inserted) => inserted += 1,
                Ok(UpsertOutcome::Updated) => updated += 1,
                Err(ItemSkip::Fetch) => skipped_fetch += 1,
                Err(ItemSkip::Upsert) => skipped_upsert += 1,
            }
        }

        save_progress(pool, &baseline, page, inserted, updated).await?;
        if inserted + updated >= opts.limit {
            break SyncStatus::Ok;
        }
        page += 1;
    };

    Ok(TopSyncOutcome {
        status,
        page,
        attempted,
        inserted,
        updated,
        skipped_fetch,
        skipped_upsert,
    })
}

async fn save_progress(
    pool: &PgPool,
    baseline: &reelsync_db::SyncCursor,
    page: u32,
    inserted: u64,
    updated: u64,
) -> Result<(), DbError> {
    save_cursor(
        pool,
        TOP_VOTE_COUNT_CURSOR_KEY,
        i32::try_from(page).unwrap_or(i32::MAX),
        baseline.inserted.saturating_add_unsigned(inserted),
        baseline.updated.saturating_add_unsigned(updated),
    )
    .await
}
