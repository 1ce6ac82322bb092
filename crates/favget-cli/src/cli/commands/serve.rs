//! `favget serve` – run the HTTP API until interrupted.

use anyhow::{Context, Result};
use favget_core::api::{self, ApiState};
use favget_core::config::FavgetConfig;

pub async fn run_serve(cfg: &FavgetConfig, bind: Option<&str>) -> Result<()> {
    let addr = bind.unwrap_or(&cfg.server.bind).to_string();
    let state = ApiState::from_config(cfg);
    println!("favget listening on http://{}", addr);

    tokio::select! {
        res = api::bind_and_serve(&addr, state) => res,
        res = tokio::signal::ctrl_c() => {
            res.context("wait for ctrl-c")?;
            tracing::info!("shutting down");
            Ok(())
        }
    }
}
