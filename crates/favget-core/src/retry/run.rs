//! Retry loop: run an async attempt until success or policy says stop.

use std::future::Future;

use super::classify::Classify;
use super::policy::{RetryDecision, RetryPolicy};

/// Runs `f` until it succeeds or the retry policy says to stop.
/// `f` receives the 1-based attempt number. On retryable failure, sleeps for
/// the backoff duration then tries again. Every failed attempt is logged with
/// `stage` and `url` so the fallback chain can be reconstructed from logs.
pub async fn run_with_retry<T, E, F, Fut>(
    policy: &RetryPolicy,
    stage: &str,
    url: &str,
    mut f: F,
) -> Result<T, E>
where
    E: Classify + std::fmt::Display,
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt = 1u32;
    loop {
        match f(attempt).await {
            Ok(v) => return Ok(v),
            Err(e) => {
                let kind = e.kind();
                match policy.decide(attempt, kind) {
                    RetryDecision::NoRetry => {
                        tracing::warn!(stage, url, attempt, ?kind, "attempt failed: {}", e);
                        return Err(e);
                    }
                    RetryDecision::RetryAfter(d) => {
                        tracing::info!(
                            stage,
                            url,
                            attempt,
                            ?kind,
                            "attempt failed, retrying in {:?}: {}",
                            d,
                            e
                        );
                        tokio::time::sleep(d).await;
                        attempt += 1;
                    }
                }
            }
        }
    }
}
