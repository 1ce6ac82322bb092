//! In-memory transport for unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use super::{FetchResult, RequestOptions, Transport};
use crate::retry::TransportError;

#[derive(Debug, Clone)]
pub(crate) enum Canned {
    Response {
        status: u32,
        content_type: Option<String>,
        body: Vec<u8>,
    },
    Timeout,
    Refused,
}

/// Maps exact URLs to canned outcomes; unknown URLs are refused. Records
/// every requested URL in order.
#[derive(Default)]
pub(crate) struct StaticTransport {
    routes: HashMap<String, Canned>,
    requests: Mutex<Vec<String>>,
}

impl StaticTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, url: &str, canned: Canned) -> Self {
        self.routes.insert(url.to_string(), canned);
        self
    }

    pub fn ok(self, url: &str, content_type: &str, body: &[u8]) -> Self {
        self.with(
            url,
            Canned::Response {
                status: 200,
                content_type: Some(content_type.to_string()),
                body: body.to_vec(),
            },
        )
    }

    pub fn status(self, url: &str, status: u32) -> Self {
        self.with(
            url,
            Canned::Response {
                status,
                content_type: Some("text/html".to_string()),
                body: Vec::new(),
            },
        )
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count(&self, url: &str) -> usize {
        self.requests().iter().filter(|u| *u == url).count()
    }
}

impl Transport for StaticTransport {
    fn get(&self, url: &str, opts: &RequestOptions) -> Result<FetchResult, TransportError> {
        self.requests.lock().unwrap().push(url.to_string());
        match self.routes.get(url) {
            Some(Canned::Response {
                status,
                content_type,
                body,
            }) => {
                let truncated = body.len() > opts.max_body_bytes;
                let keep = body.len().min(opts.max_body_bytes);
                Ok(FetchResult {
                    status: *status,
                    content_type: content_type.clone(),
                    effective_url: url.to_string(),
                    body: body[..keep].to_vec(),
                    truncated,
                })
            }
            Some(Canned::Timeout) => Err(TransportError::Timeout(url.to_string())),
            Some(Canned::Refused) | None => Err(TransportError::Connection(format!(
                "connection refused: {}",
                url
            ))),
        }
    }
}
