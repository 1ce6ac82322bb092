//! Outbound HTTP: the `Transport` seam, its libcurl implementation and the
//! async wrapper that moves blocking transfers onto tokio's blocking pool.

mod client;
mod parse;
#[cfg(test)]
pub(crate) mod testing;

pub use client::CurlTransport;
pub use parse::is_image_content_type;

use std::sync::Arc;
use std::time::Duration;

use crate::retry::TransportError;

/// Per-request limits.
#[derive(Debug, Clone, Copy)]
pub struct RequestOptions {
    /// Deadline for the whole transfer (connect + headers + body).
    pub timeout: Duration,
    /// Stop reading the body after this many bytes. The response is still
    /// returned, with [`FetchResult::truncated`] set.
    pub max_body_bytes: usize,
}

impl RequestOptions {
    pub fn new(timeout: Duration, max_body_bytes: usize) -> Self {
        Self {
            timeout,
            max_body_bytes,
        }
    }
}

/// One completed HTTP exchange. Any status counts as a response; callers
/// decide what a non-2xx means for them.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub status: u32,
    pub content_type: Option<String>,
    /// URL after following redirects.
    pub effective_url: String,
    pub body: Vec<u8>,
    /// The body hit `max_body_bytes`; `body` holds only its first bytes.
    pub truncated: bool,
}

impl FetchResult {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_image(&self) -> bool {
        is_image_content_type(self.content_type.as_deref())
    }
}

/// Blocking HTTP GET. Implementations must honour `opts.timeout` and return
/// `Err` only when no response was obtained. A body longer than
/// `opts.max_body_bytes` is cut at the limit, not reported as an error.
pub trait Transport: Send + Sync + 'static {
    fn get(&self, url: &str, opts: &RequestOptions) -> Result<FetchResult, TransportError>;
}

/// Runs `transport.get` on the blocking pool so the calling task only
/// suspends for the duration of the transfer.
pub async fn fetch(
    transport: &Arc<dyn Transport>,
    url: &str,
    opts: RequestOptions,
) -> Result<FetchResult, TransportError> {
    let transport = Arc::clone(transport);
    let url = url.to_string();
    tokio::task::spawn_blocking(move || transport.get(&url, &opts))
        .await
        .map_err(|e| TransportError::Worker(e.to_string()))?
}
