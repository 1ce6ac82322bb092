//! Error taxonomy shared by the resolver and converter pipelines.
//!
//! Only `InvalidInput` and `FetchFailed` normally reach a client. The other
//! kinds have a local fallback (favicon service, passthrough bytes) and are
//! absorbed where they occur; they exist so that each stage can report what
//! went wrong before the fallback kicks in.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FavgetError {
    /// Malformed URL or missing/invalid request field. User-correctable.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The target site never answered with a success status.
    #[error("{url} is not reachable: {reason}")]
    Unreachable { url: String, reason: String },

    /// Every byte-retrieval path failed. `trail` holds one line per stage.
    #[error("could not fetch icon:\n{trail}")]
    FetchFailed { trail: String },

    /// Neither the icon container nor a generic raster decoder accepted the bytes.
    #[error("decode failed: {0}")]
    DecodeFailed(String),

    /// Resize or encode step failed.
    #[error("encoding failed: {0}")]
    EncodingFailed(String),
}

impl FavgetError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// HTTP status used when this error is surfaced by the API.
    pub fn http_status(&self) -> u16 {
        match self {
            FavgetError::InvalidInput(_) => 400,
            _ => 500,
        }
    }
}

pub type Result<T> = std::result::Result<T, FavgetError>;
