//! `favget resolve <site>` – print the resolved icon URL.

use anyhow::Result;
use favget_core::config::FavgetConfig;
use favget_core::http::{CurlTransport, Transport};
use favget_core::resolver::IconResolver;
use std::sync::Arc;

pub async fn run_resolve(cfg: &FavgetConfig, site: &str) -> Result<()> {
    let transport: Arc<dyn Transport> = Arc::new(CurlTransport::new(&cfg.user_agent));
    let resolver = IconResolver::new(transport, cfg);
    let icon = resolver.resolve(site).await?;
    tracing::debug!(source = ?icon.source, "resolved {}", icon.icon_url);
    println!("{}", icon.icon_url);
    Ok(())
}
