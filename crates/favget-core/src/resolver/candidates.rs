//! Ordered, exact-string deduplicated icon candidate list.

use url::Url;

/// Conventional icon locations at the site root, in probing order.
pub const CONVENTIONAL_PATHS: [&str; 4] = [
    "/favicon.ico",
    "/favicon.png",
    "/apple-touch-icon.png",
    "/apple-touch-icon-precomposed.png",
];

/// Where a candidate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconSource {
    /// One of [`CONVENTIONAL_PATHS`].
    Conventional,
    /// A `<link rel="icon">` in the page HTML.
    Declared,
    /// The favicon-by-domain service.
    FallbackService,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconCandidate {
    pub url: String,
    pub source: IconSource,
}

#[derive(Debug, Default)]
pub struct CandidateList {
    items: Vec<IconCandidate>,
}

impl CandidateList {
    /// Starts the list with the conventional root paths of `site`.
    pub fn conventional(site: &Url) -> Self {
        let mut list = Self::default();
        for path in CONVENTIONAL_PATHS {
            if let Ok(url) = site.join(path) {
                list.push(url.into(), IconSource::Conventional);
            }
        }
        list
    }

    /// Appends `url` unless the exact same string is already present.
    /// Returns whether it was added.
    pub fn push(&mut self, url: String, source: IconSource) -> bool {
        if self.items.iter().any(|c| c.url == url) {
            return false;
        }
        self.items.push(IconCandidate { url, source });
        true
    }

    /// Resolves each raw `href` against `page` and appends it. Hrefs that do
    /// not resolve to an http(s) URL are skipped and logged.
    pub fn extend_declared(&mut self, page: &Url, hrefs: &[String]) {
        for href in hrefs {
            match page.join(href) {
                Ok(url) if matches!(url.scheme(), "http" | "https") => {
                    self.push(url.into(), IconSource::Declared);
                }
                Ok(url) => {
                    tracing::debug!(href = %href, scheme = url.scheme(), "skipping non-http icon link")
                }
                Err(e) => tracing::warn!(href = %href, "invalid icon link: {}", e),
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &IconCandidate> {
        self.items.iter()
    }

    pub fn urls(&self) -> Vec<&str> {
        self.items.iter().map(|c| c.url.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
