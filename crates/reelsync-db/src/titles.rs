//! Database operations for the `titles` catalog.
//!
//! The merge-upsert is the one write path syncs go through. It is safe to
//! repeat with identical input: everything converges except the sync
//! timestamps, which always advance. Operator exclusion marks are never
//! written by a sync; the conflict clause leaves `excluded_frames` alone,
//! and `created_at` is stamped on first insert only.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use reelsync_core::{
    select_representative, CatalogTitle, ContentKind, FrameCandidate, RankingDimension,
};

use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `titles` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TitleRow {
    pub id: i64,
    pub public_id: Uuid,
    pub tmdb_id: i64,
    pub kind: String,
    pub title: String,
    pub title_localized: Option<String>,
    pub release_date: Option<String>,
    pub popularity: f64,
    pub vote_count: i64,
    pub vote_average: f64,
    pub genre_ids: Vec<i32>,
    pub country_codes: Vec<String>,
    pub year: Option<i32>,
    pub is_animated: bool,
    pub frames: Json<Vec<FrameCandidate>>,
    pub backdrop_path: Option<String>,
    pub excluded_frames: Vec<String>,
    pub last_popularity_sync_at: Option<DateTime<Utc>>,
    pub last_vote_count_sync_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub synced_at: DateTime<Utc>,
}

/// The frames projection of a title: candidates, operator exclusions, and
/// the current representative frame.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TitleFrames {
    pub frames: Json<Vec<FrameCandidate>>,
    pub excluded_frames: Vec<String>,
    pub backdrop_path: Option<String>,
}

/// Whether an upsert created the row or refreshed an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
}

// ---------------------------------------------------------------------------
// Merge-upsert
// ---------------------------------------------------------------------------

/// Upserts a normalized title document, keyed by `(tmdb_id, kind)`.
///
/// The stored exclusion set is read first and carried into representative
/// selection, so a frame an operator excluded since the last sync can never
/// be picked again. The write itself is a single atomic
/// `INSERT ... ON CONFLICT DO UPDATE` whose conflict clause does not touch
/// `excluded_frames` or `created_at`. `synced_at` advances on every call;
/// the per-dimension stamp advances only when `dimension` names it.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the read or the upsert fails.
pub async fn upsert_title(
    pool: &PgPool,
    doc: &CatalogTitle,
    dimension: Option<RankingDimension>,
) -> Result<UpsertOutcome, DbError> {
    let existing = sqlx::query_as::<_, TitleFrames>(
        "SELECT frames, excluded_frames, backdrop_path \
         FROM titles \
         WHERE tmdb_id = $1 AND kind = $2",
    )
    .bind(doc.tmdb_id)
    .bind(doc.kind.as_str())
    .fetch_optional(pool)
    .await?;

    let outcome = if existing.is_some() {
        UpsertOutcome::Updated
    } else {
        UpsertOutcome::Inserted
    };

    let excluded: HashSet<String> = existing
        .map(|e| e.excluded_frames.into_iter().collect())
        .unwrap_or_default();

    // Selection always wins over whatever was stored before, including
    // selecting nothing when every candidate is excluded.
    let backdrop_path = select_representative(&doc.frames, &excluded);

    let stamp_popularity = dimension == Some(RankingDimension::Popularity);
    let stamp_vote_count = dimension == Some(RankingDimension::VoteCount);

    let public_id = Uuid::new_v4();

    sqlx::query(
        "INSERT INTO titles \
             (public_id, tmdb_id, kind, title, title_localized, release_date, \
              popularity, vote_count, vote_average, genre_ids, country_codes, \
              year, is_animated, frames, backdrop_path, \
              last_popularity_sync_at, last_vote_count_sync_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, \
                 CASE WHEN $16 THEN NOW() ELSE NULL END, \
                 CASE WHEN $17 THEN NOW() ELSE NULL END) \
         ON CONFLICT (tmdb_id, kind) DO UPDATE SET \
             title            = EXCLUDED.title, \
             title_localized  = EXCLUDED.title_localized, \
             release_date     = EXCLUDED.release_date, \
             popularity       = EXCLUDED.popularity, \
             vote_count       = EXCLUDED.vote_count, \
             vote_average     = EXCLUDED.vote_average, \
             genre_ids        = EXCLUDED.genre_ids, \
             country_codes    = EXCLUDED.country_codes, \
             year             = EXCLUDED.year, \
             is_animated      = EXCLUDED.is_animated, \
             frames           = EXCLUDED.frames, \
             backdrop_path    = EXCLUDED.backdrop_path, \
             last_popularity_sync_at = CASE WHEN $16 THEN NOW() \
                                            ELSE titles.last_popularity_sync_at END, \
             last_vote_count_sync_at = CASE WHEN $17 THEN NOW() \
                                            ELSE titles.last_vote_count_sync_at END, \
             synced_at        = NOW()",
    )
    .bind(public_id)
    .bind(doc.tmdb_id)
    .bind(doc.kind.as_str())
    .bind(&doc.title)
    .bind(doc.title_localized.as_deref())
    .bind(doc.release_date.as_deref())
    .bind(doc.popularity)
    .bind(doc.vote_count)
    .bind(doc.vote_average)
    .bind(&doc.genre_ids)
    .bind(&doc.country_codes)
    .bind(doc.year)
    .bind(doc.is_animated)
    .bind(Json(&doc.frames))
    .bind(backdrop_path.as_deref())
    .bind(stamp_popularity)
    .bind(stamp_vote_count)
    .execute(pool)
    .await?;

    Ok(outcome)
}

// ---------------------------------------------------------------------------
// Operator exclusion marks
// ---------------------------------------------------------------------------

/// Adds paths to a title's exclusion set and recomputes the representative
/// frame immediately. Idempotent: already-excluded paths are not duplicated.
///
/// Returns the new `backdrop_path` (possibly `None` when every candidate is
/// now excluded).
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if the title does not exist, or
/// [`DbError::Sqlx`] if a query fails.
pub async fn mark_frames_excluded(
    pool: &PgPool,
    tmdb_id: i64,
    kind: ContentKind,
    paths: &[String],
) -> Result<Option<String>, DbError> {
    let current = get_title_frames(pool, tmdb_id, kind)
        .await?
        .ok_or(DbError::NotFound)?;

    let mut excluded = current.excluded_frames;
    for path in paths {
        if !excluded.contains(path) {
            excluded.push(path.clone());
        }
    }

    write_exclusions(pool, tmdb_id, kind, &current.frames.0, excluded).await
}

/// Removes paths from a title's exclusion set and recomputes the
/// representative frame immediately.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if the title does not exist, or
/// [`DbError::Sqlx`] if a query fails.
pub async fn unmark_frames_excluded(
    pool: &PgPool,
    tmdb_id: i64,
    kind: ContentKind,
    paths: &[String],
) -> Result<Option<String>, DbError> {
    let current = get_title_frames(pool, tmdb_id, kind)
        .await?
        .ok_or(DbError::NotFound)?;

    let mut excluded = current.excluded_frames;
    excluded.retain(|p| !paths.contains(p));

    write_exclusions(pool, tmdb_id, kind, &current.frames.0, excluded).await
}

async fn write_exclusions(
    pool: &PgPool,
    tmdb_id: i64,
    kind: ContentKind,
    frames: &[FrameCandidate],
    excluded: Vec<String>,
) -> Result<Option<String>, DbError> {
    let excluded_set: HashSet<String> = excluded.iter().cloned().collect();
    let backdrop_path = select_representative(frames, &excluded_set);

    sqlx::query(
        "UPDATE titles \
         SET excluded_frames = $3, backdrop_path = $4 \
         WHERE tmdb_id = $1 AND kind = $2",
    )
    .bind(tmdb_id)
    .bind(kind.as_str())
    .bind(&excluded)
    .bind(backdrop_path.as_deref())
    .execute(pool)
    .await?;

    Ok(backdrop_path)
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// Returns the full title row for `(tmdb_id, kind)`, or `None`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_title(
    pool: &PgPool,
    tmdb_id: i64,
    kind: ContentKind,
) -> Result<Option<TitleRow>, DbError> {
    let row = sqlx::query_as::<_, TitleRow>(
        "SELECT id, public_id, tmdb_id, kind, title, title_localized, release_date, \
                popularity, vote_count, vote_average, genre_ids, country_codes, \
                year, is_animated, frames, backdrop_path, excluded_frames, \
                last_popularity_sync_at, last_vote_count_sync_at, created_at, synced_at \
         FROM titles \
         WHERE tmdb_id = $1 AND kind = $2",
    )
    .bind(tmdb_id)
    .bind(kind.as_str())
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Returns only the frames projection for `(tmdb_id, kind)`, or `None`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_title_frames(
    pool: &PgPool,
    tmdb_id: i64,
    kind: ContentKind,
) -> Result<Option<TitleFrames>, DbError> {
    let row = sqlx::query_as::<_, TitleFrames>(
        "SELECT frames, excluded_frames, backdrop_path \
         FROM titles \
         WHERE tmdb_id = $1 AND kind = $2",
    )
    .bind(tmdb_id)
    .bind(kind.as_str())
    .fetch_optional(pool)
    .await?;

    Ok(row)
}
