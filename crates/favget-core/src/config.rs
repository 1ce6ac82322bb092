use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::convert::TargetFormat;
use crate::retry::RetryPolicy;

/// Desktop browser identification sent with every outbound request.
/// Some sites refuse or redirect requests without one.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// HTTP API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the API listens on.
    pub bind: String,
    /// Largest accepted request body in bytes.
    pub max_body_bytes: usize,
    /// A client must deliver its whole request within this many seconds.
    pub read_timeout_secs: u64,
    /// Connections handled at once; further clients wait in the accept queue.
    pub max_connections: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_string(),
            max_body_bytes: 64 * 1024,
            read_timeout_secs: 10,
            max_connections: 256,
        }
    }
}

/// Icon resolver settings. One timeout covers the reachability probe, the
/// page fetch and each candidate probe.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    pub timeout_secs: u64,
    /// Attempts per probe (including the first). Only transport failures are retried.
    pub attempts: u32,
    /// Backoff unit; attempt `n` waits `n * backoff_secs` before retrying.
    pub backoff_secs: f64,
    /// Only this many leading bytes of the page are scanned for `<link>` tags.
    pub max_html_bytes: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 5,
            attempts: 2,
            backoff_secs: 1.0,
            max_html_bytes: 2 * 1024 * 1024,
        }
    }
}

impl ResolverConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::linear(self.attempts, secs_f64(self.backoff_secs))
    }
}

/// Icon byte fetcher settings: direct path first, then the favicon service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub direct_timeout_secs: u64,
    pub direct_attempts: u32,
    pub service_timeout_secs: u64,
    pub service_attempts: u32,
    pub backoff_secs: f64,
    /// Icons larger than this are rejected by the transport.
    pub max_icon_bytes: usize,
}

impl FetchConfig {
    pub fn backoff(&self) -> Duration {
        secs_f64(self.backoff_secs)
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            direct_timeout_secs: 5,
            direct_attempts: 1,
            service_timeout_secs: 8,
            service_attempts: 2,
            backoff_secs: 1.0,
            max_icon_bytes: 5 * 1024 * 1024,
        }
    }
}

/// Third-party favicon-by-domain lookup service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Endpoint; `?domain=<host>&sz=<size>` is appended.
    pub base_url: String,
    pub size: u32,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.google.com/s2/favicons".to_string(),
            size: 64,
        }
    }
}

/// Conversion defaults applied when a request leaves a field out.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    pub default_format: TargetFormat,
    pub transparent: bool,
    /// Lossy quality for JPEG and WebP (1-100).
    pub quality: u8,
    /// Largest accepted target size in pixels.
    pub max_size: u32,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            default_format: TargetFormat::Png,
            transparent: true,
            quality: 90,
            max_size: 1024,
        }
    }
}

/// Global configuration loaded from `~/.config/favget/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FavgetConfig {
    pub user_agent: String,
    pub server: ServerConfig,
    pub resolver: ResolverConfig,
    pub fetch: FetchConfig,
    pub service: ServiceConfig,
    pub convert: ConvertConfig,
}

impl Default for FavgetConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            server: ServerConfig::default(),
            resolver: ResolverConfig::default(),
            fetch: FetchConfig::default(),
            service: ServiceConfig::default(),
            convert: ConvertConfig::default(),
        }
    }
}

fn secs_f64(secs: f64) -> Duration {
    if secs.is_finite() && secs > 0.0 {
        Duration::from_secs_f64(secs)
    } else {
        Duration::ZERO
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("favget")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from an explicit file.
pub fn load_from(path: &Path) -> Result<FavgetConfig> {
    let data =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    let cfg: FavgetConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<FavgetConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = FavgetConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    load_from(&path)
}
