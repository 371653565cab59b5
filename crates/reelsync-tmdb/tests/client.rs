//! Integration tests for `TmdbClient` using wiremock HTTP mocks.

use reelsync_core::{ContentKind, RankingDimension};
use reelsync_tmdb::{DiscoverQuery, TmdbClient, TmdbError};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> TmdbClient {
    TmdbClient::with_base_url("test-key", 30, 0, 0, base_url)
        .expect("client construction should not fail")
}

#[tokio::test]
async fn discover_sends_sort_page_and_year_filter() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "page": 2,
        "results": [
            {
                "id": 27205,
                "title": "Inception",
                "release_date": "2010-07-16",
                "popularity": 90.5,
                "vote_count": 34000,
                "vote_average": 8.3,
                "genre_ids": [28, 878]
            }
        ],
        "total_pages": 120,
        "total_results": 2400
    });

    Mock::given(method("GET"))
        .and(path("/discover/movie"))
        .and(query_param("api_key", "test-key"))
        .and(query_param("sort_by", "popularity.desc"))
        .and(query_param("page", "2"))
        .and(query_param("include_adult", "false"))
        .and(query_param("primary_release_date.gte", "2010-01-01"))
        .and(query_param("primary_release_date.lte", "2010-12-31"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let page = client
        .discover(&DiscoverQuery {
            kind: ContentKind::Movie,
            sort: RankingDimension::Popularity,
            year: Some(2010),
            page: 2,
        })
        .await
        .expect("should parse discover page");

    assert_eq!(page.page, 2);
    assert_eq!(page.results.len(), 1);
    assert_eq!(page.results[0].id, 27205);
    assert_eq!(page.results[0].title.as_deref(), Some("Inception"));
    assert_eq!(page.results[0].vote_count, 34000);
}

#[tokio::test]
async fn discover_tv_uses_first_air_date_filter_and_name_field() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "page": 1,
        "results": [
            {
                "id": 1396,
                "name": "Breaking Bad",
                "first_air_date": "2008-01-20",
                "popularity": 300.0,
                "vote_count": 12000,
                "vote_average": 8.9,
                "genre_ids": [18, 80]
            }
        ]
    });

    Mock::given(method("GET"))
        .and(path("/discover/tv"))
        .and(query_param("sort_by", "vote_count.desc"))
        .and(query_param("first_air_date.gte", "2008-01-01"))
        .and(query_param("first_air_date.lte", "2008-12-31"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let page = client
        .discover(&DiscoverQuery {
            kind: ContentKind::Tv,
            sort: RankingDimension::VoteCount,
            year: Some(2008),
            page: 1,
        })
        .await
        .expect("should parse tv discover page");

    assert_eq!(page.results[0].title.as_deref(), Some("Breaking Bad"));
    assert_eq!(
        page.results[0].release_date.as_deref(),
        Some("2008-01-20"),
        "first_air_date should fold into release_date"
    );
}

#[tokio::test]
async fn discover_empty_results_signals_exhaustion() {
    let server = MockServer::start().await;

    let body = serde_json::json!({ "page": 600, "results": [] });

    Mock::given(method("GET"))
        .and(path("/discover/movie"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let page = client
        .discover(&DiscoverQuery {
            kind: ContentKind::Movie,
            sort: RankingDimension::VoteCount,
            year: None,
            page: 600,
        })
        .await
        .expect("empty page should still parse");

    assert!(page.results.is_empty());
}

#[tokio::test]
async fn details_returns_production_countries() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "id": 27205,
        "title": "Inception",
        "production_countries": [
            { "iso_3166_1": "US", "name": "United States of America" },
            { "iso_3166_1": "GB", "name": "United Kingdom" }
        ]
    });

    Mock::given(method("GET"))
        .and(path("/movie/27205"))
        .and(query_param("language", "en-US"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let detail = client
        .details(27205, ContentKind::Movie)
        .await
        .expect("should parse details");

    let codes: Vec<_> = detail
        .production_countries
        .iter()
        .filter_map(|c| c.iso_3166_1.as_deref())
        .collect();
    assert_eq!(codes, vec!["US", "GB"]);
}

#[tokio::test]
async fn backdrops_parses_file_path_entries() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "backdrops": [
            { "file_path": "/a.jpg", "aspect_ratio": 1.778, "vote_average": 7.5, "width": 1920 },
            { "file_path": "/b.jpg", "aspect_ratio": 1.778, "vote_average": 8.0, "width": 1280 }
        ],
        "posters": []
    });

    Mock::given(method("GET"))
        .and(path("/movie/27205/images"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let frames = client
        .backdrops(27205, ContentKind::Movie)
        .await
        .expect("should parse images");

    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0].path.as_deref(), Some("/a.jpg"));
    assert_eq!(frames[1].width, 1280);
}

#[tokio::test]
async fn localized_title_falls_back_to_name() {
    let server = MockServer::start().await;

    let body = serde_json::json!({ "id": 1396, "name": "Во все тяжкие" });

    Mock::given(method("GET"))
        .and(path("/tv/1396"))
        .and(query_param("language", "ru-RU"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let title = client
        .localized_title(1396, ContentKind::Tv, "ru-RU")
        .await
        .expect("should parse localized detail");

    assert_eq!(title.as_deref(), Some("Во все тяжкие"));
}

#[tokio::test]
async fn definitive_status_is_surfaced_without_retry() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/movie/404"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    // Even with retries configured, a 404 must hit the server exactly once.
    let client = TmdbClient::with_base_url("test-key", 30, 3, 0, &server.uri())
        .expect("client construction should not fail");
    let result = client.details(404, ContentKind::Movie).await;

    match result {
        Err(TmdbError::Status { status, ref url }) => {
            assert_eq!(status, 404);
            assert!(!url.contains("test-key"), "api key leaked into error: {url}");
        }
        other => panic!("expected Status error, got: {other:?}"),
    }
}

#[tokio::test]
async fn server_error_is_terminal_too() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/discover/movie"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let client = TmdbClient::with_base_url("test-key", 30, 3, 0, &server.uri())
        .expect("client construction should not fail");
    let result = client
        .discover(&DiscoverQuery {
            kind: ContentKind::Movie,
            sort: RankingDimension::VoteCount,
            year: None,
            page: 1,
        })
        .await;

    assert!(matches!(result, Err(TmdbError::Status { status: 503, .. })));
}

#[tokio::test]
async fn malformed_body_is_a_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/movie/1/images"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.backdrops(1, ContentKind::Movie).await;

    assert!(matches!(result, Err(TmdbError::Deserialize { .. })));
}
