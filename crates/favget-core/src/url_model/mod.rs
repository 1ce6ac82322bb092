//! URL modeling: site reference normalization, favicon service URLs and
//! download naming.
//!
//! Normalization is the gate in front of every network call; anything that
//! does not come out of it as an absolute http(s) URL with a host is rejected.

mod content_disposition;
mod service;

pub use content_disposition::{attachment_disposition, extension_for_content_type};
pub use service::{fallback_service_url, service_domain};

use url::Url;

use crate::error::{FavgetError, Result};

/// Normalizes a user-supplied site reference into an absolute URL.
///
/// Trims whitespace and prepends `https://` when no http(s) scheme is present.
/// Other schemes are rejected rather than silently rewritten.
///
/// # Examples
///
/// - `normalize_site_url("example.com")` → `https://example.com/`
/// - `normalize_site_url("http://example.com/blog")` → unchanged
pub fn normalize_site_url(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(FavgetError::invalid_input("URL is required"));
    }

    let lower = trimmed.to_ascii_lowercase();
    let candidate = if lower.starts_with("http://") || lower.starts_with("https://") {
        trimmed.to_string()
    } else if let Some((scheme, _)) = trimmed.split_once("://") {
        return Err(FavgetError::invalid_input(format!(
            "unsupported URL scheme: {}",
            scheme
        )));
    } else {
        format!("https://{}", trimmed)
    };

    let url = Url::parse(&candidate)
        .map_err(|e| FavgetError::invalid_input(format!("invalid URL {:?}: {}", trimmed, e)))?;
    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err(FavgetError::invalid_input(format!(
            "URL has no host: {:?}",
            trimmed
        ))),
    }
}

/// Host name of an already-normalized URL (empty string if none).
pub fn host_of(url: &Url) -> &str {
    url.host_str().unwrap_or("")
}
