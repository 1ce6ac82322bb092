//! Retry and backoff policy.
//!
//! This module encapsulates error classification (timeouts, throttling,
//! connection failures) and linear backoff decisions so that the prober and
//! the icon fetcher share a consistent policy.

mod classify;
mod error;
mod policy;
mod run;

pub use classify::{classify_curl_error, classify_http_status, Classify};
pub use error::{AttemptError, TransportError};
pub use policy::{ErrorKind, RetryDecision, RetryPolicy};
pub use run::run_with_retry;
