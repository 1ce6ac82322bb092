//! Icon resolver: turn a site reference into the best icon URL.
//!
//! Order of business:
//! 1. normalize the reference (the only step that can fail);
//! 2. probe the site root; if it is down, answer with the favicon service;
//! 3. build candidates: conventional root paths, then `<link rel="icon">`
//!    hrefs from the page in document order;
//! 4. probe candidates one at a time, first image response wins;
//! 5. otherwise answer with the favicon service.

mod candidates;
mod html;

pub use candidates::{CandidateList, IconCandidate, IconSource, CONVENTIONAL_PATHS};
pub use html::extract_icon_links;

use std::sync::Arc;

use url::Url;

use crate::config::FavgetConfig;
use crate::error::Result;
use crate::http::{self, RequestOptions, Transport};
use crate::probe::Prober;
use crate::url_model;

/// Outcome of resolution. Always carries a well-formed URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIcon {
    pub icon_url: String,
    pub source: IconSource,
}

#[derive(Clone)]
pub struct IconResolver {
    transport: Arc<dyn Transport>,
    prober: Prober,
    page_opts: RequestOptions,
    service_base: String,
    service_size: u32,
}

impl IconResolver {
    pub fn new(transport: Arc<dyn Transport>, cfg: &FavgetConfig) -> Self {
        let page_opts = RequestOptions::new(cfg.resolver.timeout(), cfg.resolver.max_html_bytes);
        let prober = Prober::new(
            Arc::clone(&transport),
            page_opts,
            cfg.resolver.retry_policy(),
        );
        Self {
            transport,
            prober,
            page_opts,
            service_base: cfg.service.base_url.clone(),
            service_size: cfg.service.size,
        }
    }

    /// Resolves `raw` to an icon URL. Fails only with `InvalidInput` when the
    /// reference cannot be normalized; every later failure degrades to the
    /// favicon service.
    pub async fn resolve(&self, raw: &str) -> Result<ResolvedIcon> {
        let site = url_model::normalize_site_url(raw)?;
        let site_str = site.as_str();

        if let Err(e) = self.prober.ensure_reachable("site", site_str).await {
            tracing::warn!(site = site_str, "{}, using favicon service", e);
            return Ok(self.fallback(&site));
        }

        let candidates = self.discover(&site).await;
        tracing::debug!(site = site_str, candidates = ?candidates.urls(), "icon candidates");

        for candidate in candidates.iter() {
            if self.prober.is_image("candidate", &candidate.url).await {
                tracing::info!(site = site_str, icon = %candidate.url, "icon found");
                return Ok(ResolvedIcon {
                    icon_url: candidate.url.clone(),
                    source: candidate.source,
                });
            }
        }

        tracing::info!(site = site_str, "no candidate answered with an image, using favicon service");
        Ok(self.fallback(&site))
    }

    /// Conventional root paths plus icon links declared by the page.
    /// A page that cannot be fetched just contributes no links.
    async fn discover(&self, site: &Url) -> CandidateList {
        let mut list = CandidateList::conventional(site);

        match http::fetch(&self.transport, site.as_str(), self.page_opts).await {
            Ok(page) if page.is_success() => {
                if page.truncated {
                    tracing::debug!(
                        stage = "page",
                        url = site.as_str(),
                        scanned = page.body.len(),
                        "page larger than scan limit, scanning its head only"
                    );
                }
                let base = Url::parse(&page.effective_url).unwrap_or_else(|_| site.clone());
                let html = String::from_utf8_lossy(&page.body);
                let hrefs = extract_icon_links(&html);
                list.extend_declared(&base, &hrefs);
            }
            Ok(page) => {
                tracing::warn!(stage = "page", url = site.as_str(), status = page.status, "page fetch returned error status")
            }
            Err(e) => tracing::warn!(stage = "page", url = site.as_str(), "page fetch failed: {}", e),
        }

        list
    }

    fn fallback(&self, site: &Url) -> ResolvedIcon {
        ResolvedIcon {
            icon_url: url_model::fallback_service_url(
                &self.service_base,
                url_model::host_of(site),
                self.service_size,
            ),
            source: IconSource::FallbackService,
        }
    }
}
