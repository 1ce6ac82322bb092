//! Classify HTTP status, curl errors and attempt errors into retry policy error kinds.

use super::error::{AttemptError, TransportError};
use super::policy::ErrorKind;

/// Errors that the retry loop can classify.
pub trait Classify {
    fn kind(&self) -> ErrorKind;
}

/// Classify an HTTP status code for retry decisions.
pub fn classify_http_status(code: u32) -> ErrorKind {
    match code {
        429 | 503 => ErrorKind::Throttled,
        500..=599 => ErrorKind::Http5xx(code as u16),
        _ => ErrorKind::Other,
    }
}

/// Classify a curl error for retry decisions.
pub fn classify_curl_error(e: &curl::Error) -> ErrorKind {
    if e.is_operation_timedout() {
        return ErrorKind::Timeout;
    }
    if e.is_couldnt_connect()
        || e.is_couldnt_resolve_host()
        || e.is_couldnt_resolve_proxy()
        || e.is_read_error()
        || e.is_recv_error()
        || e.is_send_error()
        || e.is_got_nothing()
        || e.is_ssl_connect_error()
    {
        return ErrorKind::Connection;
    }
    ErrorKind::Other
}

impl Classify for TransportError {
    fn kind(&self) -> ErrorKind {
        match self {
            TransportError::Curl(e) => classify_curl_error(e),
            TransportError::Timeout(_) => ErrorKind::Timeout,
            TransportError::Connection(_) => ErrorKind::Connection,
            TransportError::BodyTooLarge { .. } | TransportError::Worker(_) => ErrorKind::Other,
        }
    }
}

impl Classify for AttemptError {
    fn kind(&self) -> ErrorKind {
        match self {
            AttemptError::Transport(e) => e.kind(),
            AttemptError::Http(code) => classify_http_status(*code),
            AttemptError::NotImage(_) => ErrorKind::Other,
        }
    }
}
