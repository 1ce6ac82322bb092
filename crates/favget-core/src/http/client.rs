//! libcurl-backed transport.

use std::str;
use std::time::Duration;

use super::parse::parse_headers;
use super::{FetchResult, RequestOptions, Transport};
use crate::retry::TransportError;

/// Connect phase gets at most this much of the total timeout.
const MAX_CONNECT_TIMEOUT: Duration = Duration::from_secs(3);

/// GET via a fresh `curl::easy::Easy` per request. Follows redirects and
/// sends a browser `User-Agent`. Blocks the current thread; use
/// [`super::fetch`] from async code.
#[derive(Debug, Clone)]
pub struct CurlTransport {
    user_agent: String,
}

impl CurlTransport {
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
        }
    }
}

impl Transport for CurlTransport {
    fn get(&self, url: &str, opts: &RequestOptions) -> Result<FetchResult, TransportError> {
        let mut headers: Vec<String> = Vec::new();
        let mut body: Vec<u8> = Vec::new();
        let mut truncated = false;
        let limit = opts.max_body_bytes;

        let mut easy = curl::easy::Easy::new();
        easy.url(url)?;
        easy.get(true)?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        easy.useragent(&self.user_agent)?;
        easy.accept_encoding("")?;
        easy.connect_timeout(opts.timeout.min(MAX_CONNECT_TIMEOUT))?;
        easy.timeout(opts.timeout)?;

        let perform = {
            let mut transfer = easy.transfer();
            transfer.header_function(|data| {
                if let Ok(s) = str::from_utf8(data) {
                    headers.push(s.trim_end().to_string());
                }
                true
            })?;
            transfer.write_function(|data| {
                if body.len() + data.len() > limit {
                    // Keep the prefix and abort; status and headers are already in.
                    let room = limit - body.len();
                    body.extend_from_slice(&data[..room]);
                    truncated = true;
                    return Ok(0);
                }
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()
        };
        // An aborted write is expected once the body hits the cap.
        if !truncated {
            perform?;
        }

        let status = easy.response_code()?;
        let effective_url = easy
            .effective_url()?
            .map(str::to_string)
            .unwrap_or_else(|| url.to_string());
        let parsed = parse_headers(&headers);

        Ok(FetchResult {
            status,
            content_type: parsed.content_type,
            effective_url,
            body,
            truncated,
        })
    }
}
