//! Parse HTTP response header lines into ResponseHeaders.

/// Headers of the final response in a redirect chain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseHeaders {
    /// `Content-Type` value, if present (parameters such as charset kept).
    pub content_type: Option<String>,
}

/// Parse collected header lines into ResponseHeaders.
///
/// Curl reports the headers of every response when following redirects; a
/// status line (`HTTP/...`) starts a new block, so only the last block counts.
pub(crate) fn parse_headers(lines: &[String]) -> ResponseHeaders {
    let mut out = ResponseHeaders::default();

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with("HTTP/") {
            out = ResponseHeaders::default();
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim();
            let value = value.trim();
            if name.eq_ignore_ascii_case("content-type") && !value.is_empty() {
                out.content_type = Some(value.to_string());
            }
        }
    }

    out
}

/// True if a content-type denotes an image (`image/*`), ignoring case and parameters.
pub fn is_image_content_type(content_type: Option<&str>) -> bool {
    content_type
        .map(|ct| ct.trim().to_ascii_lowercase().starts_with("image/"))
        .unwrap_or(false)
}
