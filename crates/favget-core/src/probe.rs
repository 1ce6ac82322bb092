//! Reachability probing.
//!
//! A probe is a GET with the resolver timeout. Transport failures (timeout,
//! DNS, refused, reset) are retried with linear backoff; any HTTP response,
//! whatever its status or body size, ends the probe.

use std::sync::Arc;

use crate::error::{FavgetError, Result};
use crate::http::{self, RequestOptions, Transport};
use crate::retry::{run_with_retry, RetryPolicy, TransportError};

/// Probes only need status and content-type; the body is cut short here.
const PROBE_BODY_LIMIT: usize = 64 * 1024;

/// What a probe learned from the response it got.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutcome {
    pub status: u32,
    pub content_type: Option<String>,
}

impl ProbeOutcome {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_image(&self) -> bool {
        self.is_success() && http::is_image_content_type(self.content_type.as_deref())
    }
}

#[derive(Clone)]
pub struct Prober {
    transport: Arc<dyn Transport>,
    opts: RequestOptions,
    policy: RetryPolicy,
}

impl Prober {
    pub fn new(transport: Arc<dyn Transport>, opts: RequestOptions, policy: RetryPolicy) -> Self {
        Self {
            transport,
            opts: RequestOptions {
                max_body_bytes: opts.max_body_bytes.min(PROBE_BODY_LIMIT),
                ..opts
            },
            policy,
        }
    }

    /// Probes `url`. `Err` means no response arrived after all attempts;
    /// callers use that to tell "down" apart from "answered badly".
    pub async fn probe(
        &self,
        stage: &str,
        url: &str,
    ) -> std::result::Result<ProbeOutcome, TransportError> {
        run_with_retry(&self.policy, stage, url, |attempt| async move {
            tracing::debug!(stage, url, attempt, "probing");
            http::fetch(&self.transport, url, self.opts)
                .await
                .map(|r| ProbeOutcome {
                    status: r.status,
                    content_type: r.content_type,
                })
        })
        .await
    }

    /// `Ok` if `url` answered with a 2xx status, otherwise `Unreachable`
    /// with the transport error or the status as the reason.
    pub async fn ensure_reachable(&self, stage: &str, url: &str) -> Result<()> {
        let reason = match self.probe(stage, url).await {
            Ok(outcome) if outcome.is_success() => return Ok(()),
            Ok(outcome) => format!("HTTP {}", outcome.status),
            Err(e) => e.to_string(),
        };
        tracing::debug!(stage, url, "not reachable: {}", reason);
        Err(FavgetError::Unreachable {
            url: url.to_string(),
            reason,
        })
    }

    /// True if `url` answered with a 2xx status.
    pub async fn is_reachable(&self, stage: &str, url: &str) -> bool {
        self.ensure_reachable(stage, url).await.is_ok()
    }

    /// True if `url` answered with a 2xx status and an `image/*` content-type.
    pub async fn is_image(&self, stage: &str, url: &str) -> bool {
        match self.probe(stage, url).await {
            Ok(outcome) => {
                tracing::debug!(
                    stage,
                    url,
                    status = outcome.status,
                    content_type = outcome.content_type.as_deref().unwrap_or(""),
                    "probe answered"
                );
                outcome.is_image()
            }
            Err(_) => false,
        }
    }
}
