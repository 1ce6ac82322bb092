//! CLI for favget: run the HTTP API or drive the pipelines from a terminal.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use favget_core::config::{self, FavgetConfig};
use std::path::{Path, PathBuf};

use commands::{run_convert, run_resolve, run_serve, ConvertArgs};

#[derive(Debug, Parser)]
#[command(name = "favget")]
#[command(about = "favget: website icon resolver and converter", long_about = None)]
pub struct Cli {
    /// Load configuration from this file instead of the XDG config path.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Serve the HTTP API.
    Serve {
        /// Listen address (overrides `server.bind`).
        #[arg(long, value_name = "ADDR")]
        bind: Option<String>,
    },

    /// Print the best icon URL for a site.
    Resolve {
        /// Site domain or URL, e.g. `example.com`.
        site: String,
    },

    /// Fetch an icon and convert it.
    Convert {
        /// Icon URL.
        url: String,
        /// Square output size in pixels; 0 keeps the source size.
        #[arg(long, value_name = "N")]
        size: Option<u32>,
        /// Output format: png, jpg, webp or ico (written as png).
        #[arg(long, value_name = "FORMAT")]
        format: Option<String>,
        /// Flatten onto a white background.
        #[arg(long)]
        opaque: bool,
        /// Output file. Defaults to `icon.<ext>` in the current directory.
        #[arg(long, short, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

fn load_config(path: Option<&Path>) -> Result<FavgetConfig> {
    match path {
        Some(p) => config::load_from(p),
        None => config::load_or_init(),
    }
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = load_config(cli.config.as_deref())?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Serve { bind } => run_serve(&cfg, bind.as_deref()).await?,
            CliCommand::Resolve { site } => run_resolve(&cfg, &site).await?,
            CliCommand::Convert {
                url,
                size,
                format,
                opaque,
                output,
            } => {
                let args = ConvertArgs {
                    url,
                    size,
                    format,
                    opaque,
                    output,
                };
                run_convert(&cfg, args).await?
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
