//! Offline unit tests for reelsync-db pool configuration and row types.
//! These tests do not require a live database connection.

use chrono::Utc;
use reelsync_core::{AppConfig, Environment, FrameCandidate};
use reelsync_db::{PoolConfig, SyncCursor, TitleRow, UpsertOutcome};
use sqlx::types::Json;
use uuid::Uuid;

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let app_config = AppConfig {
        database_url: "postgres://example".to_string(),
        env: Environment::Test,
        log_level: "info".to_string(),
        tmdb_api_key: None,
        tmdb_locale: "ru-RU".to_string(),
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
        tmdb_timeout_secs: 30,
        tmdb_max_retries: 3,
        tmdb_retry_base_ms: 1000,
        sync_max_pages: 500,
    };

    let pool_config = PoolConfig::from_app_config(&app_config);
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

/// Compile-time smoke test: confirm that [`TitleRow`] has all expected
/// fields with the correct types. No database required.
#[test]
fn title_row_has_expected_fields() {
    let row = TitleRow {
        id: 1_i64,
        public_id: Uuid::new_v4(),
        tmdb_id: 27205_i64,
        kind: "movie".to_string(),
        title: "Inception".to_string(),
        title_localized: Some("Начало".to_string()),
        release_date: Some("2010-07-16".to_string()),
        popularity: 90.5_f64,
        vote_count: 34000_i64,
        vote_average: 8.3_f64,
        genre_ids: vec![28, 878],
        country_codes: vec!["US".to_string(), "GB".to_string()],
        year: Some(2010),
        is_animated: false,
        frames: Json(vec![FrameCandidate {
            path: "/a.jpg".to_string(),
            aspect_ratio: 1.78,
            vote_average: 7.5,
            width: 1920,
        }]),
        backdrop_path: Some("/a.jpg".to_string()),
        excluded_frames: vec![],
        last_popularity_sync_at: None,
        last_vote_count_sync_at: Some(Utc::now()),
        created_at: Utc::now(),
        synced_at: Utc::now(),
    };

    assert_eq!(row.tmdb_id, 27205);
    assert_eq!(row.kind, "movie");
    assert_eq!(row.year, Some(2010));
    assert_eq!(row.frames.0.len(), 1);
    assert_eq!(row.backdrop_path.as_deref(), Some("/a.jpg"));
    assert!(row.excluded_frames.is_empty());
    assert!(row.last_popularity_sync_at.is_none());
}

/// The stored representative frame must always satisfy the record invariant:
/// present in `frames`, absent from `excluded_frames`.
#[test]
fn title_row_invariant_holds_for_sample() {
    let frames = vec![
        FrameCandidate {
            path: "/a.jpg".to_string(),
            aspect_ratio: 1.78,
            vote_average: 7.5,
            width: 1920,
        },
        FrameCandidate {
            path: "/b.jpg".to_string(),
            aspect_ratio: 1.78,
            vote_average: 8.0,
            width: 1280,
        },
    ];
    let excluded = vec!["/b.jpg".to_string()];

    let excluded_set = excluded.iter().cloned().collect();
    let backdrop = reelsync_core::select_representative(&frames, &excluded_set);

    assert_eq!(backdrop.as_deref(), Some("/a.jpg"));
    let backdrop = backdrop.unwrap();
    assert!(frames.iter().any(|f| f.path == backdrop));
    assert!(!excluded.contains(&backdrop));
}

#[test]
fn sync_cursor_zero_default() {
    let c = SyncCursor::empty("top:vote_count:movie");
    assert_eq!(c.key, "top:vote_count:movie");
    assert_eq!(c.page, 0);
    assert_eq!(c.inserted, 0);
    assert_eq!(c.updated, 0);
}

#[test]
fn upsert_outcome_distinguishes_insert_from_update() {
    assert_ne!(UpsertOutcome::Inserted, UpsertOutcome::Updated);
}
