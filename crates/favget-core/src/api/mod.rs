//! HTTP API: `GET /api/extract`, `POST /api/convert`, `GET /healthz`.
//!
//! Accept loop on a tokio `TcpListener`, one task per connection, one
//! request per connection. At most `server.max_connections` are served at
//! once and each must finish sending its request within
//! `server.read_timeout_secs`.

mod routes;
pub mod wire;

pub use routes::{dispatch, error_response, pipeline_error};

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Semaphore;

use crate::config::FavgetConfig;
use crate::convert::Converter;
use crate::http::{CurlTransport, Transport};
use crate::resolver::IconResolver;

/// Everything a request handler needs. Cheap to clone.
#[derive(Clone)]
pub struct ApiState {
    pub resolver: IconResolver,
    pub converter: Converter,
    pub max_body_bytes: usize,
    pub read_timeout: Duration,
    pub max_connections: usize,
}

impl ApiState {
    pub fn new(transport: Arc<dyn Transport>, cfg: &FavgetConfig) -> Self {
        Self {
            resolver: IconResolver::new(Arc::clone(&transport), cfg),
            converter: Converter::new(transport, cfg),
            max_body_bytes: cfg.server.max_body_bytes,
            read_timeout: Duration::from_secs(cfg.server.read_timeout_secs.max(1)),
            max_connections: cfg.server.max_connections.max(1),
        }
    }

    /// State backed by the real libcurl transport.
    pub fn from_config(cfg: &FavgetConfig) -> Self {
        let transport: Arc<dyn Transport> = Arc::new(CurlTransport::new(&cfg.user_agent));
        Self::new(transport, cfg)
    }
}

/// Binds `addr` and serves until the task is dropped or the listener fails.
pub async fn bind_and_serve(addr: &str, state: ApiState) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind {}", addr))?;
    let local = listener.local_addr().context("listener address")?;
    tracing::info!("favget API listening on http://{}", local);
    serve(listener, state).await
}

/// Accept loop over an already-bound listener.
pub async fn serve(listener: TcpListener, state: ApiState) -> Result<()> {
    let slots = Arc::new(Semaphore::new(state.max_connections));
    let state = Arc::new(state);
    loop {
        let permit = Arc::clone(&slots)
            .acquire_owned()
            .await
            .context("connection limiter closed")?;
        let (stream, peer) = match listener.accept().await {
            Ok(conn) => conn,
            Err(e) => {
                tracing::warn!("accept failed: {}", e);
                continue;
            }
        };
        let state = Arc::clone(&state);
        tokio::spawn(async move {
            handle_connection(stream, peer, &state).await;
            drop(permit);
        });
    }
}

async fn handle_connection(mut stream: TcpStream, peer: SocketAddr, state: &ApiState) {
    let read = wire::read_request_within(&mut stream, state.max_body_bytes, state.read_timeout);
    let response = match read.await {
        Ok(req) => {
            tracing::debug!(%peer, method = %req.method, path = %req.path, "request");
            dispatch(state, req).await
        }
        Err(wire::WireError::Closed) => return,
        Err(e) => {
            tracing::debug!(%peer, "bad request: {}", e);
            routes::wire_error(&e)
        }
    };
    tracing::debug!(%peer, status = response.status, bytes = response.body.len(), "response");
    if let Err(e) = response.write_to(&mut stream).await {
        tracing::debug!(%peer, "write failed: {}", e);
    }
}
