mod frames;
mod schedule;
mod status;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use reelsync_core::{AppConfig, ContentKind, RankingDimension};
use reelsync_sync::{TopSyncOptions, YearsSyncOptions};
use reelsync_tmdb::TmdbClient;

#[derive(Debug, Parser)]
#[command(name = "reelsync")]
#[command(about = "reelsync catalog sync command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run pending database migrations
    Migrate,
    /// Crawl the upstream catalog into the local store
    #[command(subcommand)]
    Sync(SyncCommands),
    /// Inspect sync cursors and error-journal counts
    #[command(subcommand)]
    Status(StatusCommands),
    /// Curate a title's frames (exclusions drive representative selection)
    #[command(subcommand)]
    Frames(FramesCommands),
    /// Run recurring sync jobs until interrupted
    Schedule,
}

#[derive(Debug, Subcommand)]
enum FramesCommands {
    /// Mark frame paths as excluded and recompute the backdrop
    Exclude {
        /// TMDB id of the title
        #[arg(long)]
        id: i64,

        /// Content kind: movie or tv
        #[arg(long, default_value = "movie")]
        kind: String,

        /// Frame paths to exclude, e.g. /abc.jpg
        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// Remove frame paths from the exclusion set and recompute the backdrop
    Include {
        #[arg(long)]
        id: i64,

        #[arg(long, default_value = "movie")]
        kind: String,

        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// Show a title's frames, exclusions, and current backdrop
    Show {
        #[arg(long)]
        id: i64,

        #[arg(long, default_value = "movie")]
        kind: String,
    },
}

#[derive(Debug, Subcommand)]
enum SyncCommands {
    /// Global top-by-vote-count movie crawl
    Top {
        /// Stop after this many successfully saved records
        #[arg(long, default_value_t = 10_000)]
        limit: u64,

        /// Start from page 1 instead of the persisted cursor
        #[arg(long)]
        no_resume: bool,

        /// Explicit first page; overrides the cursor
        #[arg(long)]
        start_page: Option<u32>,
    },
    /// Year-partitioned crawl with an independent cursor per year
    Years {
        /// First year of the interval
        #[arg(long)]
        from: i32,

        /// Last year of the interval (defaults to --from)
        #[arg(long)]
        to: Option<i32>,

        /// Stop after this many successfully saved records across all years
        #[arg(long, default_value_t = 5_000)]
        limit: u64,

        /// Content kind: movie or tv
        #[arg(long, default_value = "movie")]
        kind: String,

        /// Ranking dimension: popularity or vote_count
        #[arg(long, default_value = "popularity")]
        sort: String,

        /// Start each year from page 1 instead of its persisted cursor
        #[arg(long)]
        no_resume: bool,
    },
}

#[derive(Debug, Subcommand)]
enum StatusCommands {
    /// Cursor and error counts for the global top crawl
    Top,
    /// Year cursors: one year, a range, or every persisted year
    Years {
        #[arg(long)]
        from: Option<i32>,

        #[arg(long)]
        to: Option<i32>,

        /// Content kind: movie or tv
        #[arg(long, default_value = "movie")]
        kind: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = reelsync_core::load_app_config_from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone())),
        )
        .init();

    let cli = Cli::parse();

    let pool = reelsync_db::connect_pool(
        &config.database_url,
        reelsync_db::PoolConfig::from_app_config(&config),
    )
    .await?;

    match cli.command {
        Commands::Migrate => {
            let applied = reelsync_db::run_migrations(&pool).await?;
            println!("applied {applied} migrations");
        }
        Commands::Sync(SyncCommands::Top {
            limit,
            no_resume,
            start_page,
        }) => {
            let client = build_client(&config)?;
            let outcome = reelsync_sync::sync_top(
                &pool,
                &client,
                &config,
                TopSyncOptions {
                    limit,
                    resume: !no_resume,
                    start_page,
                },
            )
            .await?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        Commands::Sync(SyncCommands::Years {
            from,
            to,
            limit,
            kind,
            sort,
            no_resume,
        }) => {
            let kind: ContentKind = kind.parse().map_err(anyhow::Error::msg)?;
            let sort: RankingDimension = sort.parse().map_err(anyhow::Error::msg)?;
            let client = build_client(&config)?;
            let outcome = reelsync_sync::sync_years(
                &pool,
                &client,
                &config,
                YearsSyncOptions {
                    start_year: from,
                    end_year: to,
                    limit,
                    resume: !no_resume,
                    kind,
                    sort,
                },
            )
            .await?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        Commands::Status(StatusCommands::Top) => {
            status::print_top_status(&pool).await?;
        }
        Commands::Status(StatusCommands::Years { from, to, kind }) => {
            let kind: ContentKind = kind.parse().map_err(anyhow::Error::msg)?;
            status::print_years_status(&pool, kind, from, to).await?;
        }
        Commands::Frames(FramesCommands::Exclude { id, kind, paths }) => {
            let kind: ContentKind = kind.parse().map_err(anyhow::Error::msg)?;
            frames::exclude(&pool, id, kind, paths).await?;
        }
        Commands::Frames(FramesCommands::Include { id, kind, paths }) => {
            let kind: ContentKind = kind.parse().map_err(anyhow::Error::msg)?;
            frames::include(&pool, id, kind, paths).await?;
        }
        Commands::Frames(FramesCommands::Show { id, kind }) => {
            let kind: ContentKind = kind.parse().map_err(anyhow::Error::msg)?;
            frames::show(&pool, id, kind).await?;
        }
        Commands::Schedule => {
            let client = build_client(&config)?;
            schedule::run_scheduler(pool.clone(), config.clone(), client).await?;
        }
    }

    Ok(())
}

/// Builds the one process-wide TMDB client from config.
fn build_client(config: &AppConfig) -> anyhow::Result<TmdbClient> {
    let api_key = config
        .tmdb_api_key
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("REELSYNC_TMDB_API_KEY is not set; cannot sync"))?;

    TmdbClient::new(
        api_key,
        config.tmdb_timeout_secs,
        config.tmdb_max_retries,
        config.tmdb_retry_base_ms,
    )
    .map_err(|e| anyhow::anyhow!("failed to build TMDB client: {e}"))
}
