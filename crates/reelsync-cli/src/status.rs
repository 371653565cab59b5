//! Status subcommand handlers: cursor state and error-journal counts.

use sqlx::PgPool;

use reelsync_core::ContentKind;
use reelsync_db::{
    count_errors, get_cursor, list_cursors_by_kind, list_year_cursors, year_cursor_key, SyncCursor,
    TOP_VOTE_COUNT_CURSOR_KEY,
};

/// Prints the global top-crawl cursor plus journal counts.
pub(crate) async fn print_top_status(pool: &PgPool) -> anyhow::Result<()> {
    let cursor = get_cursor(pool, TOP_VOTE_COUNT_CURSOR_KEY).await?;
    print_cursor(&cursor);

    let errors = count_errors(pool).await?;
    println!(
        "errors: {} last hour, {} last 24h, {} total",
        errors.last_hour, errors.last_24h, errors.total
    );

    Ok(())
}

/// Prints year cursors: a single year, a zero-filled range, or every
/// persisted year for the kind.
pub(crate) async fn print_years_status(
    pool: &PgPool,
    kind: ContentKind,
    from: Option<i32>,
    to: Option<i32>,
) -> anyhow::Result<()> {
    let cursors: Vec<SyncCursor> = match (from, to) {
        (Some(year), None) => vec![get_cursor(pool, &year_cursor_key(kind, year)).await?],
        (Some(from), Some(to)) => list_year_cursors(pool, kind, from, to).await?,
        (None, _) => list_cursors_by_kind(pool, kind).await?,
    };

    if cursors.is_empty() {
        println!("no cursors persisted for kind {kind}");
        return Ok(());
    }

    for cursor in &cursors {
        print_cursor(cursor);
    }

    Ok(())
}

fn print_cursor(cursor: &SyncCursor) {
    println!(
        "{}: page {}, inserted {}, updated {}, touched {}",
        cursor.key, cursor.page, cursor.inserted, cursor.updated, cursor.updated_at
    );
}
