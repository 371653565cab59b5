//! Retry with linear back-off for the TMDB client.
//!
//! [`retry_with_backoff`] wraps any fallible async operation and retries on
//! transient errors (connection failures, timeouts). A definitive upstream
//! status (any 4xx/5xx) and malformed responses are returned immediately
//! without retry.

use std::future::Future;
use std::time::Duration;

use crate::error::TmdbError;

/// Returns `true` for errors that are worth retrying after a back-off delay.
///
/// **Retriable:**
/// - Network-level failures: timeout, connection reset/refused.
///
/// **Not retriable (hard stop):**
/// - [`TmdbError::Status`]: the upstream answered; retrying won't change it.
/// - [`TmdbError::Deserialize`]: malformed response; retrying won't fix it.
pub(crate) fn is_retriable(err: &TmdbError) -> bool {
    match err {
        TmdbError::Http(e) => e.is_timeout() || e.is_connect(),
        TmdbError::Status { .. } | TmdbError::Deserialize { .. } | TmdbError::BaseUrl(_) => false,
    }
}

/// Runs `operation` with up to `max_retries` additional attempts on transient
/// errors.
///
/// The delay ramps linearly: the sleep before retry *k* is `base_ms × k`.
/// With `base_ms = 1_000` and `max_retries = 3` that is 1 s, 2 s, 3 s.
/// Non-retriable errors are returned immediately; after the ceiling the last
/// error is returned to the caller.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    base_ms: u64,
    mut operation: F,
) -> Result<T, TmdbError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, TmdbError>>,
{
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                attempt += 1;
                let delay_ms = base_ms.saturating_mul(u64::from(attempt));
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms,
                    error = %err,
                    "TMDB transient error, retrying after back-off"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}
