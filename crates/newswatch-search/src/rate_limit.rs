//! Retry with exponential back-off and jitter for search-provider calls.
//!
//! Search providers answer bursts of paged queries with 429s and the odd 5xx.
//! [`retry_with_backoff`] retries those; everything else (bad credentials,
//! malformed JSON, API-level errors) is returned immediately.

use std::future::Future;
use std::time::Duration;

use crate::error::SearchError;

/// Returns `true` for errors that are worth retrying after a back-off delay.
///
/// **Retriable:** network timeouts and connection failures, HTTP 429, HTTP 5xx.
///
/// **Not retriable:** 4xx other than 429, [`SearchError::Api`],
/// [`SearchError::Deserialize`], and configuration errors.
pub(crate) fn is_retriable(err: &SearchError) -> bool {
    match err {
        SearchError::Http(e) => e.is_timeout() || e.is_connect(),
        SearchError::RateLimited { .. } => true,
        SearchError::UnexpectedStatus { status, .. } => *status >= 500,
        SearchError::Deserialize { .. }
        | SearchError::Api { .. }
        | SearchError::InvalidBaseUrl { .. }
        | SearchError::EmptyQueryList
        | SearchError::NoProviders => false,
    }
}

/// Runs `operation` with up to `max_retries` additional attempts on transient errors.
///
/// Back-off schedule with `backoff_base_ms = 1_000`:
///
/// | Attempt | Sleep before next attempt        |
/// |---------|----------------------------------|
/// | 1       | 1 000 ms × 2⁰ ± 25 % jitter     |
/// | 2       | 1 000 ms × 2¹ ± 25 % jitter     |
/// | 3       | 1 000 ms × 2² ± 25 % jitter     |
///
/// Delay is capped at 30 s. A 429 carrying `Retry-After` waits at least that long.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, SearchError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, SearchError>>,
{
    const MAX_DELAY_MS: u64 = 30_000;
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                attempt += 1;
                let computed = backoff_base_ms.saturating_mul(1u64 << (attempt - 1).min(10));
                let capped = computed.min(MAX_DELAY_MS);
                #[allow(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    clippy::cast_precision_loss
                )]
                let jittered = (capped as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;
                let delay_ms = match &err {
                    SearchError::RateLimited {
                        retry_after_secs, ..
                    } => jittered.max(retry_after_secs.saturating_mul(1_000).min(MAX_DELAY_MS)),
                    _ => jittered,
                };
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms,
                    error = %err,
                    "transient search provider error, retrying after back-off"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}
