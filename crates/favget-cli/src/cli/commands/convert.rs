//! `favget convert <url>` – fetch, convert and write an icon to disk.

use anyhow::{Context, Result};
use favget_core::config::FavgetConfig;
use favget_core::convert::{ConversionOutcome, ConversionRequest, Converter};
use favget_core::http::{CurlTransport, Transport};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct ConvertArgs {
    pub url: String,
    pub size: Option<u32>,
    pub format: Option<String>,
    pub opaque: bool,
    pub output: Option<PathBuf>,
}

pub async fn run_convert(cfg: &FavgetConfig, args: ConvertArgs) -> Result<()> {
    let transport: Arc<dyn Transport> = Arc::new(CurlTransport::new(&cfg.user_agent));
    let converter = Converter::new(transport, cfg);
    // --opaque only ever turns transparency off; otherwise the config default applies.
    let transparent = if args.opaque { Some(false) } else { None };
    let request = ConversionRequest::from_parts(
        args.url,
        args.size,
        args.format.as_deref(),
        transparent,
        &cfg.convert,
    );

    let outcome = converter.convert(&request).await?;
    if let ConversionOutcome::Passthrough { reason, .. } = &outcome {
        eprintln!("warning: could not convert, writing original bytes ({})", reason);
    }
    let result = outcome.into_result();

    let path = args
        .output
        .unwrap_or_else(|| PathBuf::from(format!("icon.{}", result.extension)));
    tokio::fs::write(&path, &result.bytes)
        .await
        .with_context(|| format!("write {}", path.display()))?;
    println!(
        "{} ({}, {} bytes)",
        path.display(),
        result.content_type,
        result.bytes.len()
    );
    Ok(())
}
