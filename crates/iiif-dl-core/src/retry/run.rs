//! Retry loop: run a closure until success, a final error, or cancellation.

use super::classify::classify;
use super::policy::{RetryDecision, RetryPolicy};
use crate::control::CancelToken;
use crate::error::FetchError;
use crate::fetcher::Fetcher;

/// Runs `f` until it succeeds or the policy says to stop. Backoff sleeps are
/// cut short by `cancel`, in which case the last error is returned.
pub fn run_with_retry<T, F>(policy: &RetryPolicy, cancel: &CancelToken, mut f: F) -> Result<T, FetchError>
where
    F: FnMut() -> Result<T, FetchError>,
{
    let mut attempt = 1u32;
    loop {
        let err = match f() {
            Ok(v) => return Ok(v),
            Err(e) => e,
        };
        match policy.decide(attempt, classify(&err)) {
            RetryDecision::NoRetry => return Err(err),
            RetryDecision::RetryAfter(delay) => {
                tracing::debug!(attempt, ?delay, error = %err, "retrying");
                if !cancel.sleep(delay) {
                    return Err(err);
                }
                attempt += 1;
            }
        }
    }
}

/// `fetcher.fetch(url)` under `policy`.
pub fn fetch_with_retry(
    fetcher: &dyn Fetcher,
    url: &str,
    policy: &RetryPolicy,
    cancel: &CancelToken,
) -> Result<Vec<u8>, FetchError> {
    run_with_retry(policy, cancel, || fetcher.fetch(url, cancel))
}
