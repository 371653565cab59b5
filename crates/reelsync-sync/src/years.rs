//! The year-partitioned crawl.
//!
//! Walks a year interval one year at a time so no partition runs into the
//! upstream's pagination ceiling. Each `(kind, year)` pair has its own
//! cursor; the ranking dimension only selects the upstream sort order and
//! the per-record sync stamp. A page-fetch failure abandons the current
//! year's partition and moves on to the next year.

use sqlx::PgPool;

use reelsync_core::{AppConfig, ContentKind, RankingDimension};
use reelsync_db::{get_cursor, save_cursor, year_cursor_key, DbError, UpsertOutcome};
use reelsync_tmdb::{DiscoverQuery, TmdbClient};

use crate::item::{process_item, ItemSkip};
use crate::outcome::{SyncStatus, YearsSyncOutcome};
use crate::{journal, resolve_start_page};

/// Caller knobs for [`sync_years`].
#[derive(Debug, Clone, Copy)]
pub struct YearsSyncOptions {
    pub start_year: i32,
    /// Defaults to `start_year` (single-year crawl).
    pub end_year: Option<i32>,
    /// Stop once this many records were successfully saved across the whole
    /// interval.
    pub limit: u64,
    /// Continue each year from its persisted cursor instead of page 1.
    pub resume: bool,
    pub kind: ContentKind,
    /// Upstream sort order; also selects which sync timestamp gets stamped.
    pub sort: RankingDimension,
}

/// Runs the year-partitioned crawl.
///
/// The interval is normalized so start ≤ end. Every year keeps its own
/// resume cursor, saved once per completed page. The crawl ends when the
/// interval is exhausted or the global saved-record limit is reached.
///
/// # Errors
///
/// Returns [`DbError`] only for cursor persistence failures; upstream
/// trouble never surfaces as an error.
pub async fn sync_years(
    pool: &PgPool,
    client: &TmdbClient,
    config: &AppConfig,
    opts: YearsSyncOptions,
) -> Result<YearsSyncOutcome, DbError> {
    let end_year = opts.end_year.unwrap_or(opts.start_year);
    let (start_year, end_year) = if end_year < opts.start_year {
        (end_year, opts.start_year)
    } else {
        (opts.start_year, end_year)
    };

    let max_pages = config.sync_max_pages;

    let mut attempted: u64 = 0;
    let mut inserted_total: u64 = 0;
    let mut updated_total: u64 = 0;
    let mut skipped_fetch: u64 = 0;
    let mut skipped_upsert: u64 = 0;
    let mut last_year = start_year;
    let mut status = SyncStatus::Done;

    'years: for year in start_year..=end_year {
        if inserted_total + updated_total >= opts.limit {
            status = SyncStatus::Ok;
            break;
        }
        last_year = year;

        let key = year_cursor_key(opts.kind, year);
        let baseline = get_cursor(pool, &key).await?;
        let mut page = resolve_start_page(None, opts.resume, baseline.page);
        let mut inserted_year: u64 = 0;
        let mut updated_year: u64 = 0;

        while page <= max_pages && inserted_total + updated_total < opts.limit {
            let query = DiscoverQuery {
                kind: opts.kind,
                sort: opts.sort,
                year: Some(year),
                page,
            };
            let data = match client.discover(&query).await {
                Ok(d) => d,
                Err(e) => {
                    tracing::error!(year, page, error = %e, "discover page fetch failed, abandoning year");
                    journal::journal_fetch_failure(
                        pool,
                        &format!("discover/{}", opts.kind),
                        &e,
                        None,
                        serde_json::json!({
                            "sort_by": opts.sort.as_sort_param(),
                            "year": year,
                            "page": page,
                        }),
                    )
                    .await;
                    // Abort only this year's partition; later years still run.
                    continue 'years;
                }
            };

            if data.results.is_empty() {
                break;
            }

            let mut limit_hit = false;
            for entry in &data.results {
                if inserted_total + updated_total >= opts.limit {
                    limit_hit = true;
                    break;
                }

                attempted += 1;
                match process_item(pool, client, entry, opts.kind, opts.sort, &config.tmdb_locale)
                    .await
                {
                    Ok(UpsertOutcome::Inserted) => {
                        inserted_year += 1;
                        inserted_total += 1;
                    }
                    Ok(UpsertOutcome::Updated) => {
                        updated_year += 1;
                        updated_total += 1;
                    }
                    Err(ItemSkip::Fetch) => skipped_fetch += 1,
                    Err(ItemSkip::Upsert) => skipped_upsert += 1,
                }
            }

            save_cursor(
                pool,
                &key,
                i32::try_from(page).unwrap_or(i32::MAX),
                baseline.inserted.saturating_add_unsigned(inserted_year),
                baseline.updated.saturating_add_unsigned(updated_year),
            )
            .await?;

            if limit_hit {
                status = SyncStatus::Ok;
                break 'years;
            }
            page += 1;
        }
    }

    if inserted_total + updated_total >= opts.limit {
        status = SyncStatus::Ok;
    }

    Ok(YearsSyncOutcome {
        status,
        start_year,
        end_year,
        last_year,
        attempted,
        inserted: inserted_total,
        updated: updated_total,
        skipped_fetch,
        skipped_upsert,
    })
}
