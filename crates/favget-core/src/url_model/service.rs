//! Favicon-by-domain lookup service URLs.

use url::Url;

/// Builds `<base>?domain=<host>&sz=<size>`.
///
/// Always yields a well-formed string for a well-formed `base`; if `base`
/// itself does not parse, the query is appended textually.
pub fn fallback_service_url(base: &str, host: &str, size: u32) -> String {
    let size = size.to_string();
    match Url::parse_with_params(base, &[("domain", host), ("sz", size.as_str())]) {
        Ok(url) => url.into(),
        Err(_) => format!("{}?domain={}&sz={}", base, host, size),
    }
}

/// If `url` already points at the favicon service at `base`, returns the
/// `domain` it was asked about.
pub fn service_domain(url: &Url, base: &str) -> Option<String> {
    let base = Url::parse(base).ok()?;
    if url.host_str() != base.host_str() || url.path() != base.path() {
        return None;
    }
    url.query_pairs()
        .find(|(k, _)| k == "domain")
        .map(|(_, v)| v.into_owned())
        .filter(|v| !v.is_empty())
}
