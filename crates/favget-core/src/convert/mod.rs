//! Conversion pipeline: fetch icon bytes, decode them, re-encode to the
//! requested format and size.
//!
//! Decoding and encoding failures never fail a conversion. The original
//! bytes come back as [`ConversionOutcome::Passthrough`] instead; only input
//! validation and byte fetching produce errors.

mod encode;
mod ico;

#[cfg(test)]
pub(crate) mod fixtures;

pub use encode::{fit_and_pad, flatten_onto_white, EncodeParams};
pub use ico::{decode_largest, is_icon_container};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::config::{ConvertConfig, FavgetConfig};
use crate::error::{FavgetError, Result};
use crate::fetcher::{FetchedIcon, IconFetcher};
use crate::http::Transport;
use crate::url_model;

/// Content-type reported for passthrough bytes when the server sent none.
pub const PASSTHROUGH_CONTENT_TYPE: &str = "image/x-icon";

/// Output encodings. `ico` and unrecognised names are treated as PNG.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetFormat {
    #[serde(rename = "png", alias = "ico")]
    Png,
    #[serde(rename = "jpg", alias = "jpeg")]
    Jpeg,
    #[serde(rename = "webp")]
    WebP,
}

impl TargetFormat {
    /// Lenient parse used for request fields.
    pub fn parse_lossy(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => TargetFormat::Jpeg,
            "webp" => TargetFormat::WebP,
            "png" | "ico" => TargetFormat::Png,
            other => {
                tracing::debug!(format = other, "unknown target format, using png");
                TargetFormat::Png
            }
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            TargetFormat::Png => "image/png",
            TargetFormat::Jpeg => "image/jpeg",
            TargetFormat::WebP => "image/webp",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            TargetFormat::Png => "png",
            TargetFormat::Jpeg => "jpg",
            TargetFormat::WebP => "webp",
        }
    }
}

impl fmt::Display for TargetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    pub source_url: String,
    /// Square edge in pixels. `None` keeps the decoded dimensions.
    pub size: Option<u32>,
    pub format: TargetFormat,
    pub transparent: bool,
}

impl ConversionRequest {
    /// Builds a request, filling absent fields from `defaults`.
    /// A size of 0 means "keep the source size".
    pub fn from_parts(
        source_url: impl Into<String>,
        size: Option<u32>,
        format: Option<&str>,
        transparent: Option<bool>,
        defaults: &ConvertConfig,
    ) -> Self {
        Self {
            source_url: source_url.into(),
            size: size.filter(|&s| s > 0),
            format: format
                .map(TargetFormat::parse_lossy)
                .unwrap_or(defaults.default_format),
            transparent: transparent.unwrap_or(defaults.transparent),
        }
    }
}

/// Encoded (or passed-through) bytes ready to hand to a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionResult {
    pub bytes: Vec<u8>,
    pub content_type: String,
    pub extension: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionOutcome {
    Encoded(ConversionResult),
    /// Original bytes; `reason` says why they were not converted.
    Passthrough {
        result: ConversionResult,
        reason: String,
    },
}

impl ConversionOutcome {
    pub fn result(&self) -> &ConversionResult {
        match self {
            ConversionOutcome::Encoded(r) => r,
            ConversionOutcome::Passthrough { result, .. } => result,
        }
    }

    pub fn into_result(self) -> ConversionResult {
        match self {
            ConversionOutcome::Encoded(r) => r,
            ConversionOutcome::Passthrough { result, .. } => result,
        }
    }

    pub fn is_passthrough(&self) -> bool {
        matches!(self, ConversionOutcome::Passthrough { .. })
    }
}

/// Decodes icon bytes to RGBA. ICO containers yield their widest entry;
/// anything else goes through the generic raster decoder.
pub fn decode(content_type: Option<&str>, bytes: &[u8]) -> Result<image::RgbaImage> {
    if is_icon_container(content_type, bytes) {
        if let Some(img) = decode_largest(bytes) {
            return Ok(img);
        }
        tracing::debug!("icon container decode failed, trying generic decoder");
    }
    image::load_from_memory(bytes)
        .map(|img| img.to_rgba8())
        .map_err(|e| FavgetError::DecodeFailed(e.to_string()))
}

/// Synchronous decode + re-encode. Same input and parameters always give the
/// same output bytes.
pub fn transcode(
    content_type: Option<&str>,
    bytes: &[u8],
    params: &EncodeParams,
) -> ConversionOutcome {
    let encoded = decode(content_type, bytes).and_then(|img| encode::encode(img, params));
    match encoded {
        Ok(result) => ConversionOutcome::Encoded(result),
        Err(e) => {
            tracing::warn!(format = %params.format, "conversion failed, passing bytes through: {}", e);
            ConversionOutcome::Passthrough {
                result: passthrough(content_type, bytes),
                reason: e.to_string(),
            }
        }
    }
}

fn passthrough(content_type: Option<&str>, bytes: &[u8]) -> ConversionResult {
    let content_type = content_type
        .filter(|ct| !ct.trim().is_empty())
        .unwrap_or(PASSTHROUGH_CONTENT_TYPE);
    ConversionResult {
        bytes: bytes.to_vec(),
        content_type: content_type.to_string(),
        extension: url_model::extension_for_content_type(Some(content_type)),
    }
}

#[derive(Clone)]
pub struct Converter {
    fetcher: IconFetcher,
    defaults: ConvertConfig,
}

impl Converter {
    pub fn new(transport: Arc<dyn Transport>, cfg: &FavgetConfig) -> Self {
        Self {
            fetcher: IconFetcher::new(transport, cfg),
            defaults: cfg.convert.clone(),
        }
    }

    pub fn defaults(&self) -> &ConvertConfig {
        &self.defaults
    }

    /// Fetches the icon named by `req` and converts it.
    pub async fn convert(&self, req: &ConversionRequest) -> Result<ConversionOutcome> {
        if let Some(size) = req.size {
            if size > self.defaults.max_size {
                return Err(FavgetError::invalid_input(format!(
                    "size {} exceeds maximum of {}",
                    size, self.defaults.max_size
                )));
            }
        }
        let source = url_model::normalize_site_url(&req.source_url)?;
        let FetchedIcon {
            strategy,
            content_type,
            bytes,
            ..
        } = self.fetcher.fetch(&source).await?;
        tracing::debug!(
            source = source.as_str(),
            stage = strategy.label(),
            bytes = bytes.len(),
            format = %req.format,
            size = ?req.size,
            "converting icon"
        );

        let params = EncodeParams {
            format: req.format,
            size: req.size,
            transparent: req.transparent,
            quality: self.defaults.quality,
        };
        let bytes = Arc::new(bytes);
        let worker_bytes = Arc::clone(&bytes);
        let worker_type = content_type.clone();
        let outcome = tokio::task::spawn_blocking(move || {
            transcode(worker_type.as_deref(), &worker_bytes, &params)
        })
        .await;
        Ok(match outcome {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!(format = %req.format, "conversion worker failed, passing bytes through: {}", e);
                ConversionOutcome::Passthrough {
                    result: passthrough(content_type.as_deref(), &bytes),
                    reason: format!("conversion worker failed: {}", e),
                }
            }
        })
    }
}
