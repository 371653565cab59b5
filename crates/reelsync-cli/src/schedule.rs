//! Recurring sync jobs.
//!
//! Registers the two standing crawls on a [`JobScheduler`] and keeps the
//! process alive until interrupted. Job bodies log their outcome and never
//! abort the scheduler on failure.

use std::sync::Arc;

use chrono::{Datelike, Utc};
use sqlx::PgPool;
use tokio_cron_scheduler::{Job, JobScheduler};

use reelsync_core::{AppConfig, ContentKind, RankingDimension};
use reelsync_sync::{sync_top, sync_years, TopSyncOptions, YearsSyncOptions};
use reelsync_tmdb::TmdbClient;

/// Builds the scheduler, registers jobs, and blocks until Ctrl-C.
pub(crate) async fn run_scheduler(
    pool: PgPool,
    config: AppConfig,
    client: TmdbClient,
) -> anyhow::Result<()> {
    let pool = Arc::new(pool);
    let config = Arc::new(config);
    let client = Arc::new(client);

    let mut scheduler = JobScheduler::new().await?;

    register_current_year_job(
        &scheduler,
        Arc::clone(&pool),
        Arc::clone(&config),
        Arc::clone(&client),
    )
    .await?;
    register_top_votes_job(&scheduler, pool, config, client).await?;

    scheduler.start().await?;
    tracing::info!("scheduler started; press Ctrl-C to stop");

    tokio::signal::ctrl_c().await?;
    scheduler.shutdown().await?;
    Ok(())
}

/// Register the nightly current-year refresh.
///
/// Runs every day at 04:00 UTC (`0 0 4 * * *`), crawling the current year
/// by popularity so fresh releases keep flowing in.
async fn register_current_year_job(
    scheduler: &JobScheduler,
    pool: Arc<PgPool>,
    config: Arc<AppConfig>,
    client: Arc<TmdbClient>,
) -> anyhow::Result<()> {
    let job = Job::new_async("0 0 4 * * *", move |_uuid, _lock| {
        let pool = Arc::clone(&pool);
        let config = Arc::clone(&config);
        let client = Arc::clone(&client);

        Box::pin(async move {
            let year = Utc::now().year();
            tracing::info!(year, "scheduler: starting nightly current-year sync");
            let opts = YearsSyncOptions {
                start_year: year,
                end_year: None,
                limit: 5_000,
                resume: true,
                kind: ContentKind::Movie,
                sort: RankingDimension::Popularity,
            };
            match sync_years(&pool, &client, &config, opts).await {
                Ok(outcome) => tracing::info!(?outcome, "scheduler: current-year sync finished"),
                Err(e) => tracing::error!(error = %e, "scheduler: current-year sync failed"),
            }
        })
    })?;

    scheduler.add(job).await?;
    Ok(())
}

/// Register the weekly top-up of the global vote-count crawl.
///
/// Runs every Sunday at 02:00 UTC (`0 0 2 * * SUN`), resuming from the
/// persisted cursor.
async fn register_top_votes_job(
    scheduler: &JobScheduler,
    pool: Arc<PgPool>,
    config: Arc<AppConfig>,
    client: Arc<TmdbClient>,
) -> anyhow::Result<()> {
    let job = Job::new_async("0 0 2 * * SUN", move |_uuid, _lock| {
        let pool = Arc::clone(&pool);
        let config = Arc::clone(&config);
        let client = Arc::clone(&client);

        Box::pin(async move {
            tracing::info!("scheduler: starting weekly top-by-votes sync");
            let opts = TopSyncOptions {
                limit: 10_000,
                resume: true,
                start_page: None,
            };
            match sync_top(&pool, &client, &config, opts).await {
                Ok(outcome) => tracing::info!(?outcome, "scheduler: top-by-votes sync finished"),
                Err(e) => tracing::error!(error = %e, "scheduler: top-by-votes sync failed"),
            }
        })
    })?;

    scheduler.add(job).await?;
    Ok(())
}
