//! Minimal HTTP/1.1 request reader and response writer.
//!
//! One request per connection: the server always answers with
//! `Connection: close`. Only `Content-Length` bodies are accepted.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Cap on request line plus headers.
pub const MAX_HEAD_BYTES: usize = 16 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireError {
    /// Peer closed before sending anything.
    Closed,
    Malformed(String),
    HeadTooLarge,
    BodyTooLarge { limit: usize },
    /// The full request did not arrive in time.
    TimedOut,
    Io(String),
}

impl fmt::Display for WireError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireError::Closed => write!(f, "connection closed"),
            WireError::Malformed(m) => write!(f, "malformed request: {}", m),
            WireError::HeadTooLarge => {
                write!(f, "request head exceeds {} bytes", MAX_HEAD_BYTES)
            }
            WireError::BodyTooLarge { limit } => {
                write!(f, "request body exceeds {} bytes", limit)
            }
            WireError::TimedOut => write!(f, "request read timed out"),
            WireError::Io(m) => write!(f, "i/o error: {}", m),
        }
    }
}

impl std::error::Error for WireError {}

#[derive(Debug, Clone)]
pub struct Request {
    pub method: String,
    pub path: String,
    /// Decoded query parameters; the first occurrence of a name wins.
    pub query: HashMap<String, String>,
    /// Header names lowercased.
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl Request {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }
}

fn find_head_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}

/// [`read_request`] bounded by `deadline` for head and body together.
pub async fn read_request_within<R>(
    stream: &mut R,
    max_body: usize,
    deadline: Duration,
) -> Result<Request, WireError>
where
    R: AsyncRead + Unpin,
{
    tokio::time::timeout(deadline, read_request(stream, max_body))
        .await
        .unwrap_or(Err(WireError::TimedOut))
}

/// Reads one request. Bodies longer than `max_body` are rejected from the
/// declared `Content-Length` without reading them.
pub async fn read_request<R>(stream: &mut R, max_body: usize) -> Result<Request, WireError>
where
    R: AsyncRead + Unpin,
{
    let mut buf = Vec::with_capacity(1024);
    let mut chunk = [0u8; 4096];

    let head_end = loop {
        if let Some(pos) = find_head_end(&buf) {
            break pos;
        }
        if buf.len() > MAX_HEAD_BYTES {
            return Err(WireError::HeadTooLarge);
        }
        let n = stream
            .read(&mut chunk)
            .await
            .map_err(|e| WireError::Io(e.to_string()))?;
        if n == 0 {
            return Err(if buf.is_empty() {
                WireError::Closed
            } else {
                WireError::Malformed("truncated request head".to_string())
            });
        }
        buf.extend_from_slice(&chunk[..n]);
    };
    if head_end > MAX_HEAD_BYTES {
        return Err(WireError::HeadTooLarge);
    }

    let head = std::str::from_utf8(&buf[..head_end])
        .map_err(|_| WireError::Malformed("request head is not UTF-8".to_string()))?;
    let mut lines = head.split("\r\n");
    let request_line = lines.next().unwrap_or("");
    let (method, target) = parse_request_line(request_line)?;

    let mut headers = HashMap::new();
    for line in lines {
        let (name, value) = line
            .split_once(':')
            .ok_or_else(|| WireError::Malformed(format!("bad header line {:?}", line)))?;
        headers
            .entry(name.trim().to_ascii_lowercase())
            .or_insert_with(|| value.trim().to_string());
    }

    if headers.contains_key("transfer-encoding") {
        return Err(WireError::Malformed(
            "chunked bodies are not supported".to_string(),
        ));
    }
    let content_length = match headers.get("content-length") {
        Some(v) => v
            .parse::<usize>()
            .map_err(|_| WireError::Malformed(format!("bad content-length {:?}", v)))?,
        None => 0,
    };
    if content_length > max_body {
        return Err(WireError::BodyTooLarge { limit: max_body });
    }

    let mut body = buf[head_end + 4..].to_vec();
    if body.len() > content_length {
        body.truncate(content_length);
    }
    while body.len() < content_length {
        let n = stream
            .read(&mut chunk)
            .await
            .map_err(|e| WireError::Io(e.to_string()))?;
        if n == 0 {
            return Err(WireError::Malformed("truncated request body".to_string()));
        }
        let take = n.min(content_length - body.len());
        body.extend_from_slice(&chunk[..take]);
    }

    let (path, query) = split_target(target);
    Ok(Request {
        method: method.to_string(),
        path,
        query,
        headers,
        body,
    })
}

fn parse_request_line(line: &str) -> Result<(&str, &str), WireError> {
    let mut parts = line.split_whitespace();
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(method), Some(target), Some(version), None) if version.starts_with("HTTP/1.") => {
            Ok((method, target))
        }
        _ => Err(WireError::Malformed(format!("bad request line {:?}", line))),
    }
}

fn split_target(target: &str) -> (String, HashMap<String, String>) {
    let (path, query) = match target.split_once('?') {
        Some((p, q)) => (p, q),
        None => (target, ""),
    };
    let mut params = HashMap::new();
    for (k, v) in url::form_urlencoded::parse(query.as_bytes()) {
        params.entry(k.into_owned()).or_insert_with(|| v.into_owned());
    }
    (path.to_string(), params)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub content_type: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Response {
    pub fn json(status: u16, value: &serde_json::Value) -> Self {
        Self {
            status,
            content_type: "application/json".to_string(),
            headers: Vec::new(),
            body: value.to_string().into_bytes(),
        }
    }

    pub fn bytes(status: u16, content_type: impl Into<String>, body: Vec<u8>) -> Self {
        Self {
            status,
            content_type: content_type.into(),
            headers: Vec::new(),
            body,
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn json_body(&self) -> Option<serde_json::Value> {
        serde_json::from_slice(&self.body).ok()
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut head = format!(
            "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n",
            self.status,
            reason_phrase(self.status),
            self.content_type,
            self.body.len()
        );
        for (name, value) in &self.headers {
            head.push_str(name);
            head.push_str(": ");
            head.push_str(value);
            head.push_str("\r\n");
        }
        head.push_str("\r\n");
        let mut out = head.into_bytes();
        out.extend_from_slice(&self.body);
        out
    }

    pub async fn write_to<W>(&self, stream: &mut W) -> std::io::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        stream.write_all(&self.to_bytes()).await?;
        stream.flush().await
    }
}

fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        408 => "Request Timeout",
        413 => "Payload Too Large",
        431 => "Request Header Fields Too Large",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}
