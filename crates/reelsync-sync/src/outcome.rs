//! Structured results returned by the orchestrators.
//!
//! A sync never raises for upstream trouble: the outcome plus the cursor
//! and error-journal rows are the record of what happened.

use serde::Serialize;

/// How a crawl ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    /// The saved-record limit was reached; progress is persisted.
    Ok,
    /// The partition was exhausted or a page fetch failed after retries.
    Done,
}

/// Result of the global top-by-vote-count crawl.
#[derive(Debug, Clone, Serialize)]
pub struct TopSyncOutcome {
    pub status: SyncStatus,
    /// Last page fetched (or attempted).
    pub page: u32,
    /// Items pulled from pages and handed to the pipeline.
    pub attempted: u64,
    pub inserted: u64,
    pub updated: u64,
    /// Items dropped because a detail/backdrop fetch failed.
    pub skipped_fetch: u64,
    /// Items dropped because the store write failed.
    pub skipped_upsert: u64,
}

/// Result of the year-partitioned crawl.
#[derive(Debug, Clone, Serialize)]
pub struct YearsSyncOutcome {
    pub status: SyncStatus,
    pub start_year: i32,
    pub end_year: i32,
    /// The last year whose partition was entered.
    pub last_year: i32,
    pub attempted: u64,
    pub inserted: u64,
    pub updated: u64,
    pub skipped_fetch: u64,
    pub skipped_upsert: u64,
}
