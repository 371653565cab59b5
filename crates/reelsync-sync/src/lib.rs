//! Crawl orchestration for the reelsync catalog.
//!
//! Two orchestrators share one per-item pipeline: the global
//! top-by-vote-count crawl and the year-partitioned crawl. Both page through
//! the upstream, enrich and upsert each item, and persist a resume cursor
//! once per completed page, so an abrupt crash loses at most one page of
//! progress. Item processing is strictly sequential: the merge-upsert's
//! read-then-write is only safe without concurrent writers on the same
//! `(tmdb_id, kind)`.

mod item;
mod journal;
mod outcome;
mod top;
mod years;

pub use outcome::{SyncStatus, TopSyncOutcome, YearsSyncOutcome};
pub use top::{sync_top, TopSyncOptions};
pub use years::{sync_years, YearsSyncOptions};

/// Resolves the first page to fetch for a partition.
///
/// An explicit override wins; otherwise a resumed crawl continues one past
/// the last fully processed page, and a fresh crawl starts at page 1
/// regardless of cursor state.
#[must_use]
fn resolve_start_page(start_page: Option<u32>, resume: bool, cursor_page: i32) -> u32 {
    if let Some(page) = start_page {
        return page.max(1);
    }
    if resume && cursor_page > 0 {
        return u32::try_from(cursor_page).unwrap_or(0) + 1;
    }
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resumed_crawl_continues_past_cursor() {
        assert_eq!(resolve_start_page(None, true, 3), 4);
    }

    #[test]
    fn fresh_crawl_ignores_cursor() {
        assert_eq!(resolve_start_page(None, false, 3), 1);
    }

    #[test]
    fn untouched_partition_starts_at_one_even_when_resuming() {
        assert_eq!(resolve_start_page(None, true, 0), 1);
    }

    #[test]
    fn explicit_override_wins_over_resume() {
        assert_eq!(resolve_start_page(Some(7), true, 3), 7);
    }

    #[test]
    fn override_of_zero_is_clamped_to_first_page() {
        assert_eq!(resolve_start_page(Some(0), false, 0), 1);
    }
}
