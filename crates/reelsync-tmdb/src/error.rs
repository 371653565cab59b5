use thiserror::Error;

/// Errors returned by the TMDB API client.
#[derive(Debug, Error)]
pub enum TmdbError {
    /// Network or TLS failure from the underlying HTTP client. Timeouts and
    /// connection failures in this variant are transient and retried.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// TMDB answered with a non-2xx status. Definitive; never retried.
    #[error("TMDB returned {status} for {url}")]
    Status { status: u16, url: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The configured base URL could not be parsed.
    #[error("invalid base URL: {0}")]
    BaseUrl(String),
}

impl TmdbError {
    /// The HTTP status code, when the upstream produced one.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            TmdbError::Status { status, .. } => Some(*status),
            TmdbError::Http(e) => e.status().map(|s| s.as_u16()),
            TmdbError::Deserialize { .. } | TmdbError::BaseUrl(_) => None,
        }
    }

    /// The request URL associated with the failure, when known.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        match self {
            TmdbError::Status { url, .. } => Some(url),
            TmdbError::Http(e) => e.url().map(reqwest::Url::as_str),
            TmdbError::Deserialize { .. } | TmdbError::BaseUrl(_) => None,
        }
    }
}
