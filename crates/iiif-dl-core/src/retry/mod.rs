//! Retry and backoff for image and manifest GETs.
//!
//! Transient failures (timeouts, dropped connections, throttling, 5xx) are
//! retried with capped exponential backoff. Client errors such as 404 are
//! final on the first attempt.

mod classify;
mod policy;
mod run;

pub use classify::{classify, classify_curl_error, classify_http_status};
pub use policy::{ErrorKind, RetryDecision, RetryPolicy};
pub use run::{fetch_with_retry, run_with_retry};
