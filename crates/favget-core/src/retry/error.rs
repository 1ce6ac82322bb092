//! Error types for single HTTP attempts.

use std::fmt;

/// Failure to obtain any HTTP response (curl failure, timeout, oversized body).
#[derive(Debug)]
pub enum TransportError {
    /// Curl reported an error (timeout, connection, etc.).
    Curl(curl::Error),
    /// Attempt exceeded its deadline (non-curl transports).
    Timeout(String),
    /// Could not connect or the connection dropped (non-curl transports).
    Connection(String),
    /// Response body exceeded the configured limit where the whole body is needed.
    BodyTooLarge { limit: usize },
    /// The blocking worker running the transfer panicked or was cancelled.
    Worker(String),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Curl(e) => write!(f, "{}", e),
            TransportError::Timeout(msg) => write!(f, "timed out: {}", msg),
            TransportError::Connection(msg) => write!(f, "connection failed: {}", msg),
            TransportError::BodyTooLarge { limit } => {
                write!(f, "response body larger than {} bytes", limit)
            }
            TransportError::Worker(msg) => write!(f, "transfer worker failed: {}", msg),
        }
    }
}

impl std::error::Error for TransportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TransportError::Curl(e) => Some(e),
            _ => None,
        }
    }
}

impl From<curl::Error> for TransportError {
    fn from(e: curl::Error) -> Self {
        TransportError::Curl(e)
    }
}

/// Error returned by one icon download attempt: no response, a bad status,
/// or a response that is not an image.
#[derive(Debug)]
pub enum AttemptError {
    Transport(TransportError),
    /// HTTP response had a non-2xx status.
    Http(u32),
    /// Success status but the content-type is missing or not `image/*`.
    NotImage(Option<String>),
}

impl fmt::Display for AttemptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttemptError::Transport(e) => write!(f, "{}", e),
            AttemptError::Http(code) => write!(f, "HTTP {}", code),
            AttemptError::NotImage(Some(ct)) => {
                write!(f, "response is not an image (content-type: {})", ct)
            }
            AttemptError::NotImage(None) => write!(f, "response is not an image (no content-type)"),
        }
    }
}

impl std::error::Error for AttemptError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AttemptError::Transport(e) => Some(e),
            AttemptError::Http(_) | AttemptError::NotImage(_) => None,
        }
    }
}

impl From<TransportError> for AttemptError {
    fn from(e: TransportError) -> Self {
        AttemptError::Transport(e)
    }
}
