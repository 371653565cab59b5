//! HTTP client for the TMDB REST API.
//!
//! Wraps `reqwest` with failure classification and bounded retry. Connection
//! failures and timeouts are retried with a linearly increasing delay; a
//! definitive 4xx/5xx from the upstream is surfaced immediately as
//! [`TmdbError::Status`]. The underlying `reqwest::Client` keeps one shared
//! connection pool for the life of the process; construct the client once
//! and pass it down.

use std::time::Duration;

use reqwest::{Client, Url};

use reelsync_core::{ContentKind, RankingDimension};

use crate::error::TmdbError;
use crate::retry::retry_with_backoff;
use crate::types::{DiscoverPage, ImagesResponse, LocalizedDetail, RawFrame, TitleDetail};

const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3/";

/// Parameters for one `discover` page fetch.
#[derive(Debug, Clone, Copy)]
pub struct DiscoverQuery {
    pub kind: ContentKind,
    pub sort: RankingDimension,
    /// Restrict results to titles released in this year. `None` crawls the
    /// whole catalog in sort order.
    pub year: Option<i32>,
    pub page: u32,
}

/// Client for the TMDB REST API.
///
/// Use [`TmdbClient::new`] for production or [`TmdbClient::with_base_url`]
/// to point at a mock server in tests.
pub struct TmdbClient {
    client: Client,
    api_key: String,
    base_url: Url,
    max_retries: u32,
    retry_base_ms: u64,
}

impl TmdbClient {
    /// Creates a new client pointed at the production TMDB API.
    ///
    /// `max_retries` is the number of additional attempts after the first
    /// failure for transient errors; the sleep before retry *k* is
    /// `retry_base_ms × k`.
    ///
    /// # Errors
    ///
    /// Returns [`TmdbError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        api_key: &str,
        timeout_secs: u64,
        max_retries: u32,
        retry_base_ms: u64,
    ) -> Result<Self, TmdbError> {
        Self::with_base_url(api_key, timeout_secs, max_retries, retry_base_ms, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`TmdbError::Http`] if the underlying `reqwest::Client` cannot
    /// be constructed, or [`TmdbError::Deserialize`] if `base_url` is not a
    /// valid URL.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        max_retries: u32,
        retry_base_ms: u64,
        base_url: &str,
    ) -> Result<Self, TmdbError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("reelsync/0.1 (catalog-sync)")
            .build()?;

        // Normalise: a trailing slash makes Url::join treat the last segment
        // as a directory instead of replacing it.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| TmdbError::BaseUrl(format!("'{base_url}': {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
            max_retries,
            retry_base_ms,
        })
    }

    /// Fetches one discover page in the requested sort order.
    ///
    /// An empty `results` array means the partition is exhausted; callers
    /// stop paging on it rather than on `total_pages`.
    ///
    /// # Errors
    ///
    /// - [`TmdbError::Status`] on a definitive 4xx/5xx.
    /// - [`TmdbError::Http`] on network failure after retries.
    /// - [`TmdbError::Deserialize`] if the body does not match the schema.
    pub async fn discover(&self, query: &DiscoverQuery) -> Result<DiscoverPage, TmdbError> {
        let page = query.page.to_string();
        let mut params = vec![
            ("language", "en-US"),
            ("include_adult", "false"),
            ("include_video", "false"),
            ("sort_by", query.sort.as_sort_param()),
            ("page", page.as_str()),
        ];

        // Movies filter on primary_release_date, TV on first_air_date.
        let (gte, lte);
        if let Some(year) = query.year {
            gte = format!("{year}-01-01");
            lte = format!("{year}-12-31");
            match query.kind {
                ContentKind::Movie => {
                    params.push(("primary_release_date.gte", gte.as_str()));
                    params.push(("primary_release_date.lte", lte.as_str()));
                }
                ContentKind::Tv => {
                    params.push(("first_air_date.gte", gte.as_str()));
                    params.push(("first_air_date.lte", lte.as_str()));
                }
            }
        }

        let url = self.build_url(&format!("discover/{}", query.kind), &params);
        let body = self.request_json_with_retry(&url).await?;
        serde_json::from_value(body).map_err(|e| TmdbError::Deserialize {
            context: format!("discover({}, page={})", query.kind, query.page),
            source: e,
        })
    }

    /// Fetches the detail payload for a title (production countries et al.).
    ///
    /// # Errors
    ///
    /// Same classification as [`TmdbClient::discover`].
    pub async fn details(&self, tmdb_id: i64, kind: ContentKind) -> Result<TitleDetail, TmdbError> {
        let url = self.build_url(&format!("{kind}/{tmdb_id}"), &[("language", "en-US")]);
        let body = self.request_json_with_retry(&url).await?;
        serde_json::from_value(body).map_err(|e| TmdbError::Deserialize {
            context: format!("details({kind}/{tmdb_id})"),
            source: e,
        })
    }

    /// Fetches the full backdrop candidate list for a title.
    ///
    /// # Errors
    ///
    /// Same classification as [`TmdbClient::discover`].
    pub async fn backdrops(
        &self,
        tmdb_id: i64,
        kind: ContentKind,
    ) -> Result<Vec<RawFrame>, TmdbError> {
        let url = self.build_url(&format!("{kind}/{tmdb_id}/images"), &[]);
        let body = self.request_json_with_retry(&url).await?;
        let images: ImagesResponse =
            serde_json::from_value(body).map_err(|e| TmdbError::Deserialize {
                context: format!("images({kind}/{tmdb_id})"),
                source: e,
            })?;
        Ok(images.backdrops)
    }

    /// Fetches the display title in the given locale (`title` for movies,
    /// `name` for TV). Returns `None` when the locale has neither.
    ///
    /// # Errors
    ///
    /// Same classification as [`TmdbClient::discover`].
    pub async fn localized_title(
        &self,
        tmdb_id: i64,
        kind: ContentKind,
        locale: &str,
    ) -> Result<Option<String>, TmdbError> {
        let url = self.build_url(&format!("{kind}/{tmdb_id}"), &[("language", locale)]);
        let body = self.request_json_with_retry(&url).await?;
        let detail: LocalizedDetail =
            serde_json::from_value(body).map_err(|e| TmdbError::Deserialize {
                context: format!("localized({kind}/{tmdb_id}, {locale})"),
                source: e,
            })?;
        Ok(detail.display_title())
    }

    /// Builds the full request URL with percent-encoded query parameters and
    /// the API key appended.
    fn build_url(&self, path: &str, extra: &[(&str, &str)]) -> Url {
        let mut url = self
            .base_url
            .join(path)
            .unwrap_or_else(|_| self.base_url.clone());
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("api_key", &self.api_key);
            for (k, v) in extra {
                pairs.append_pair(k, v);
            }
        }
        url
    }

    /// Sends a GET request through the retry wrapper.
    async fn request_json_with_retry(&self, url: &Url) -> Result<serde_json::Value, TmdbError> {
        retry_with_backoff(self.max_retries, self.retry_base_ms, || {
            self.request_json(url)
        })
        .await
    }

    /// Sends a GET request, classifies non-2xx statuses, and parses the body
    /// as JSON. The URL recorded in errors has the API key stripped.
    async fn request_json(&self, url: &Url) -> Result<serde_json::Value, TmdbError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(TmdbError::Status {
                status: status.as_u16(),
                url: redacted(url),
            });
        }
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| TmdbError::Deserialize {
            context: redacted(url),
            source: e,
        })
    }
}

/// The URL with the `api_key` query parameter removed, for logs and the
/// error journal.
fn redacted(url: &Url) -> String {
    let mut clean = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != "api_key")
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    if pairs.is_empty() {
        clean.set_query(None);
    } else {
        clean.query_pairs_mut().clear().extend_pairs(pairs);
    }
    clean.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(base_url: &str) -> TmdbClient {
        TmdbClient::with_base_url("test-key", 30, 0, 0, base_url)
            .expect("client construction should not fail")
    }

    #[test]
    fn build_url_appends_api_key_and_params() {
        let client = test_client("https://api.themoviedb.org/3");
        let url = client.build_url("discover/movie", &[("page", "2")]);
        assert_eq!(
            url.as_str(),
            "https://api.themoviedb.org/3/discover/movie?api_key=test-key&page=2"
        );
    }

    #[test]
    fn build_url_strips_trailing_slash() {
        let client = test_client("https://api.themoviedb.org/3/");
        let url = client.build_url("movie/42/images", &[]);
        assert_eq!(
            url.as_str(),
            "https://api.themoviedb.org/3/movie/42/images?api_key=test-key"
        );
    }

    #[test]
    fn redacted_url_drops_the_api_key() {
        let client = test_client("https://api.themoviedb.org/3");
        let url = client.build_url("discover/movie", &[("page", "7")]);
        let clean = redacted(&url);
        assert!(!clean.contains("test-key"), "api key leaked: {clean}");
        assert!(clean.contains("page=7"));
    }
}
