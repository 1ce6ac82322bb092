//! Icon byte fetcher.
//!
//! Tries an ordered list of strategies (direct URL, then the favicon service
//! for the icon's domain) and stops at the first one that returns image
//! bytes. Failures are collected into a [`FetchTrail`] so the final error
//! shows every stage that was tried, not just the last one.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use url::Url;

use crate::config::FavgetConfig;
use crate::error::{FavgetError, Result};
use crate::http::{self, FetchResult, RequestOptions, Transport};
use crate::retry::{run_with_retry, AttemptError, RetryPolicy, TransportError};
use crate::url_model;

/// One way of getting icon bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// GET the icon URL itself.
    Direct,
    /// GET the favicon-by-domain service for the icon's host.
    FaviconService,
}

impl Strategy {
    pub fn label(self) -> &'static str {
        match self {
            Strategy::Direct => "direct fetch",
            Strategy::FaviconService => "favicon service",
        }
    }
}

/// Timeout, attempts and target URL for one strategy.
#[derive(Debug, Clone)]
struct Plan {
    strategy: Strategy,
    url: String,
    opts: RequestOptions,
    policy: RetryPolicy,
}

/// Ordered stage failures.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchTrail {
    entries: Vec<(Strategy, String)>,
}

impl FetchTrail {
    pub fn push(&mut self, strategy: Strategy, message: impl Into<String>) {
        self.entries.push((strategy, message.into()));
    }

    pub fn entries(&self) -> &[(Strategy, String)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for FetchTrail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (strategy, message)) in self.entries.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{} failed: {}", strategy.label(), message)?;
        }
        Ok(())
    }
}

/// Image bytes plus which strategy produced them.
#[derive(Debug, Clone)]
pub struct FetchedIcon {
    pub strategy: Strategy,
    pub url: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Clone)]
pub struct IconFetcher {
    transport: Arc<dyn Transport>,
    direct_opts: RequestOptions,
    direct_policy: RetryPolicy,
    service_opts: RequestOptions,
    service_policy: RetryPolicy,
    service_base: String,
    service_size: u32,
}

impl IconFetcher {
    pub fn new(transport: Arc<dyn Transport>, cfg: &FavgetConfig) -> Self {
        let f = &cfg.fetch;
        let backoff = f.backoff();
        Self {
            transport,
            direct_opts: RequestOptions::new(
                Duration::from_secs(f.direct_timeout_secs),
                f.max_icon_bytes,
            ),
            direct_policy: RetryPolicy::linear(f.direct_attempts, backoff),
            service_opts: RequestOptions::new(
                Duration::from_secs(f.service_timeout_secs),
                f.max_icon_bytes,
            ),
            service_policy: RetryPolicy::linear(f.service_attempts, backoff),
            service_base: cfg.service.base_url.clone(),
            service_size: cfg.service.size,
        }
    }

    fn plans(&self, icon: &Url) -> Vec<Plan> {
        // A service URL is asked about its `domain`, not about the service host.
        let domain = url_model::service_domain(icon, &self.service_base)
            .unwrap_or_else(|| url_model::host_of(icon).to_string());
        let service_url =
            url_model::fallback_service_url(&self.service_base, &domain, self.service_size);

        let mut plans = Vec::with_capacity(2);
        // When the icon already is the service URL, only the service plan runs.
        if icon.as_str() != service_url {
            plans.push(Plan {
                strategy: Strategy::Direct,
                url: icon.to_string(),
                opts: self.direct_opts,
                policy: self.direct_policy,
            });
        }
        plans.push(Plan {
            strategy: Strategy::FaviconService,
            url: service_url,
            opts: self.service_opts,
            policy: self.service_policy,
        });
        plans
    }

    /// Fetches image bytes for an already-normalized icon URL.
    pub async fn fetch(&self, icon: &Url) -> Result<FetchedIcon> {
        let mut trail = FetchTrail::default();

        for plan in self.plans(icon) {
            let stage = plan.strategy.label();
            match self.run_plan(&plan).await {
                Ok(res) => {
                    tracing::info!(stage, url = %plan.url, bytes = res.body.len(), "icon fetched");
                    return Ok(FetchedIcon {
                        strategy: plan.strategy,
                        url: plan.url,
                        content_type: res.content_type,
                        bytes: res.body,
                    });
                }
                Err(e) => {
                    tracing::warn!(stage, url = %plan.url, "stage failed: {}", e);
                    trail.push(plan.strategy, format!("{} ({})", e, plan.url));
                }
            }
        }

        Err(FavgetError::FetchFailed {
            trail: trail.to_string(),
        })
    }

    async fn run_plan(&self, plan: &Plan) -> std::result::Result<FetchResult, AttemptError> {
        let stage = plan.strategy.label();
        run_with_retry(&plan.policy, stage, &plan.url, |attempt| async move {
            tracing::debug!(stage, url = %plan.url, attempt, "fetching icon");
            let res = http::fetch(&self.transport, &plan.url, plan.opts).await?;
            if !res.is_success() {
                return Err(AttemptError::Http(res.status));
            }
            if !res.is_image() {
                return Err(AttemptError::NotImage(res.content_type));
            }
            if res.truncated {
                return Err(TransportError::BodyTooLarge {
                    limit: plan.opts.max_body_bytes,
                }
                .into());
            }
            Ok(res)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::testing::{Canned, StaticTransport};

    const SERVICE: &str = "https://www.google.com/s2/favicons?domain=a.test&sz=64";

    fn fetcher(t: &Arc<StaticTransport>) -> IconFetcher {
        let mut cfg = FavgetConfig::default();
        cfg.fetch.backoff_secs = 0.001;
        let transport: Arc<dyn Transport> = t.clone();
        IconFetcher::new(transport, &cfg)
    }

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[tokio::test]
    async fn direct_success_skips_service() {
        let t = Arc::new(StaticTransport::new().ok("https://a.test/favicon.ico", "image/x-icon", b"ico"));
        let icon = fetcher(&t).fetch(&url("https://a.test/favicon.ico")).await.unwrap();
        assert_eq!(icon.strategy, Strategy::Direct);
        assert_eq!(icon.bytes, b"ico");
        assert_eq!(icon.content_type.as_deref(), Some("image/x-icon"));
        assert_eq!(t.count(SERVICE), 0);
    }

    #[tokio::test]
    async fn non_image_direct_falls_back_to_service() {
        let t = Arc::new(
            StaticTransport::new()
                .ok("https://a.test/favicon.ico", "text/html", b"<html>")
                .ok(SERVICE, "image/png", b"png"),
        );
        let icon = fetcher(&t).fetch(&url("https://a.test/favicon.ico")).await.unwrap();
        assert_eq!(icon.strategy, Strategy::FaviconService);
        assert_eq!(icon.url, SERVICE);
        assert_eq!(t.count("https://a.test/favicon.ico"), 1);
    }

    #[tokio::test]
    async fn all_paths_failing_keeps_whole_trail() {
        let t = Arc::new(
            StaticTransport::new()
                .status("https://a.test/favicon.ico", 404)
                .with(SERVICE, Canned::Timeout),
        );
        let err = fetcher(&t)
            .fetch(&url("https://a.test/favicon.ico"))
            .await
            .unwrap_err();
        let msg = err.to_string();
        assert!(matches!(err, FavgetError::FetchFailed { .. }));
        assert!(msg.contains("direct fetch failed: HTTP 404"), "{}", msg);
        assert!(msg.contains("favicon service failed: timed out"), "{}", msg);
        // Direct: one attempt. Service: timeout retried once.
        assert_eq!(t.count("https://a.test/favicon.ico"), 1);
        assert_eq!(t.count(SERVICE), 2);
    }

    #[tokio::test]
    async fn oversized_icon_is_a_stage_failure() {
        let big = vec![0u8; 64];
        let t = Arc::new(
            StaticTransport::new()
                .ok("https://a.test/favicon.ico", "image/x-icon", &big)
                .ok(SERVICE, "image/png", b"png"),
        );
        let mut cfg = FavgetConfig::default();
        cfg.fetch.backoff_secs = 0.001;
        cfg.fetch.max_icon_bytes = 16;
        let transport: Arc<dyn Transport> = t.clone();
        let icon = IconFetcher::new(transport, &cfg)
            .fetch(&url("https://a.test/favicon.ico"))
            .await
            .unwrap();
        assert_eq!(icon.strategy, Strategy::FaviconService);
        assert_eq!(icon.bytes, b"png");
    }

    #[tokio::test]
    async fn service_url_input_asks_about_original_domain() {
        let t = Arc::new(StaticTransport::new().ok(SERVICE, "image/png", b"png"));
        let icon = fetcher(&t).fetch(&url(SERVICE)).await.unwrap();
        assert_eq!(icon.strategy, Strategy::FaviconService);
        assert_eq!(icon.url, SERVICE);
        assert_eq!(t.count(SERVICE), 1);
    }

    #[tokio::test]
    async fn service_url_input_is_not_requested_twice_per_attempt() {
        let t = Arc::new(StaticTransport::new());
        let err = fetcher(&t).fetch(&url(SERVICE)).await.unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("domain=a.test"), "{}", msg);
        assert!(!msg.contains("direct fetch failed"), "{}", msg);
        // Only the service plan runs, with its two attempts.
        assert_eq!(t.requests(), vec![SERVICE, SERVICE]);
    }

    #[tokio::test]
    async fn service_url_with_other_size_keeps_both_stages() {
        let other = "https://www.google.com/s2/favicons?domain=a.test&sz=32";
        let t = Arc::new(StaticTransport::new().ok(SERVICE, "image/png", b"png"));
        let icon = fetcher(&t).fetch(&url(other)).await.unwrap();
        assert_eq!(icon.strategy, Strategy::FaviconService);
        assert_eq!(t.count(other), 1);
        assert_eq!(t.count(SERVICE), 1);
    }

    #[test]
    fn trail_renders_one_line_per_stage() {
        let mut trail = FetchTrail::default();
        trail.push(Strategy::Direct, "HTTP 404");
        trail.push(Strategy::FaviconService, "timed out");
        assert_eq!(
            trail.to_string(),
            "direct fetch failed: HTTP 404\nfavicon service failed: timed out"
        );
        assert_eq!(trail.entries().len(), 2);
    }
}
