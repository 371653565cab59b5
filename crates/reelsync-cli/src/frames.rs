//! Operator curation of a title's frames.
//!
//! Excluding a path takes effect immediately for the stored representative
//! frame and permanently for every future sync of that title: the
//! merge-upsert re-reads the exclusion set on each write.

use sqlx::PgPool;

use reelsync_core::ContentKind;
use reelsync_db::{get_title, mark_frames_excluded, unmark_frames_excluded, DbError};

/// Adds paths to the exclusion set and reports the recomputed backdrop.
pub(crate) async fn exclude(
    pool: &PgPool,
    tmdb_id: i64,
    kind: ContentKind,
    paths: Vec<String>,
) -> anyhow::Result<()> {
    match mark_frames_excluded(pool, tmdb_id, kind, &paths).await {
        Ok(backdrop) => {
            println!(
                "excluded {} paths for {kind} {tmdb_id}; backdrop is now {}",
                paths.len(),
                backdrop.as_deref().unwrap_or("(none)")
            );
            Ok(())
        }
        Err(DbError::NotFound) => anyhow::bail!("{kind} {tmdb_id} not found"),
        Err(e) => Err(e.into()),
    }
}

/// Removes paths from the exclusion set and reports the recomputed backdrop.
pub(crate) async fn include(
    pool: &PgPool,
    tmdb_id: i64,
    kind: ContentKind,
    paths: Vec<String>,
) -> anyhow::Result<()> {
    match unmark_frames_excluded(pool, tmdb_id, kind, &paths).await {
        Ok(backdrop) => {
            println!(
                "unmarked {} paths for {kind} {tmdb_id}; backdrop is now {}",
                paths.len(),
                backdrop.as_deref().unwrap_or("(none)")
            );
            Ok(())
        }
        Err(DbError::NotFound) => anyhow::bail!("{kind} {tmdb_id} not found"),
        Err(e) => Err(e.into()),
    }
}

/// Prints a title's candidate frames, exclusions, and current backdrop.
pub(crate) async fn show(pool: &PgPool, tmdb_id: i64, kind: ContentKind) -> anyhow::Result<()> {
    let Some(row) = get_title(pool, tmdb_id, kind).await? else {
        anyhow::bail!("{kind} {tmdb_id} not found");
    };

    println!(
        "{} ({}) backdrop: {}",
        row.title,
        row.year.map_or_else(|| "?".to_string(), |y| y.to_string()),
        row.backdrop_path.as_deref().unwrap_or("(none)")
    );
    for frame in &row.frames.0 {
        let marker = if row.excluded_frames.contains(&frame.path) {
            " [excluded]"
        } else {
            ""
        };
        println!(
            "{} vote_average={} width={}{marker}",
            frame.path, frame.vote_average, frame.width
        );
    }

    Ok(())
}
