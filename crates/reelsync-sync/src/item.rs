//! The per-item pipeline shared by both orchestrators.
//!
//! Each list entry goes through detail fetch → localized title → backdrop
//! fetch → normalization → merge-upsert. Every failure is journaled and
//! converted into an explicit skip; nothing here aborts the page.

use sqlx::PgPool;

use reelsync_core::{ContentKind, RankingDimension};
use reelsync_db::{upsert_title, UpsertOutcome};
use reelsync_tmdb::{normalize_title, ListItem, TmdbClient};

use crate::journal;

/// Why an item was skipped, by failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ItemSkip {
    /// A detail or backdrop fetch failed after the client's own retries.
    Fetch,
    /// The merge-upsert failed.
    Upsert,
}

/// Fetches, enriches, and upserts one list entry.
///
/// A localized-title failure is journaled but not fatal to the item; the
/// title simply stays unlocalized until the next sync.
pub(crate) async fn process_item(
    pool: &PgPool,
    client: &TmdbClient,
    item: &ListItem,
    kind: ContentKind,
    dimension: RankingDimension,
    locale: &str,
) -> Result<UpsertOutcome, ItemSkip> {
    let detail = match client.details(item.id, kind).await {
        Ok(d) => d,
        Err(e) => {
            tracing::warn!(tmdb_id = item.id, error = %e, "skipping item, detail fetch failed");
            journal::journal_fetch_failure(
                pool,
                &format!("{kind}/details"),
                &e,
                Some(item.id),
                serde_json::json!({ "kind": kind.as_str() }),
            )
            .await;
            return Err(ItemSkip::Fetch);
        }
    };

    let title_localized = match client.localized_title(item.id, kind, locale).await {
        Ok(t) => t,
        Err(e) => {
            tracing::warn!(tmdb_id = item.id, error = %e, "localized title fetch failed");
            journal::journal_fetch_failure(
                pool,
                &format!("{kind}/localized"),
                &e,
                Some(item.id),
                serde_json::json!({ "kind": kind.as_str(), "locale": locale }),
            )
            .await;
            None
        }
    };

    let raw_frames = match client.backdrops(item.id, kind).await {
        Ok(f) => f,
        Err(e) => {
            tracing::warn!(tmdb_id = item.id, error = %e, "skipping item, backdrop fetch failed");
            journal::journal_fetch_failure(
                pool,
                &format!("{kind}/images"),
                &e,
                Some(item.id),
                serde_json::json!({ "kind": kind.as_str() }),
            )
            .await;
            return Err(ItemSkip::Fetch);
        }
    };

    let doc = normalize_title(item, kind, &detail, title_localized, raw_frames);

    match upsert_title(pool, &doc, Some(dimension)).await {
        Ok(outcome) => Ok(outcome),
        Err(e) => {
            tracing::warn!(tmdb_id = item.id, error = %e, "skipping item, upsert failed");
            journal::journal_upsert_failure(pool, &e, item.id).await;
            Err(ItemSkip::Upsert)
        }
    }
}
