use serde::Deserialize;
use serde_json::{json, Value};

use super::wire::{Request, Response, WireError};
use super::ApiState;
use crate::convert::{ConversionOutcome, ConversionRequest};
use crate::error::FavgetError;
use crate::url_model;

/// `{"success": false, "error": ...}` with the given status.
pub fn error_response(status: u16, error: &str) -> Response {
    Response::json(status, &json!({ "success": false, "error": error }))
}

/// Maps a pipeline error to its HTTP response. Fetch failures carry the
/// whole trail in `error`; other internal failures go in `details`.
pub fn pipeline_error(e: &FavgetError) -> Response {
    let status = e.http_status();
    match e {
        FavgetError::InvalidInput(msg) => error_response(status, msg),
        FavgetError::FetchFailed { .. } => error_response(status, &e.to_string()),
        other => Response::json(
            status,
            &json!({
                "success": false,
                "error": "internal error",
                "details": other.to_string(),
            }),
        ),
    }
}

/// Response for a request that could not be read off the wire.
pub fn wire_error(e: &WireError) -> Response {
    let status = match e {
        WireError::BodyTooLarge { .. } => 413,
        WireError::HeadTooLarge => 431,
        WireError::TimedOut => 408,
        _ => 400,
    };
    error_response(status, &e.to_string())
}

pub async fn dispatch(state: &ApiState, req: Request) -> Response {
    let allowed = match req.path.as_str() {
        "/api/extract" | "/healthz" => "GET",
        "/api/convert" => "POST",
        _ => return error_response(404, &format!("no route for {}", req.path)),
    };
    if req.method != allowed {
        return error_response(405, &format!("{} requires {}", req.path, allowed))
            .with_header("Allow", allowed);
    }

    match req.path.as_str() {
        "/api/extract" => extract(state, &req).await,
        "/api/convert" => convert(state, &req).await,
        _ => Response::json(200, &json!({ "success": true })),
    }
}

async fn extract(state: &ApiState, req: &Request) -> Response {
    let site = match req.query_param("url").map(str::trim) {
        Some(s) if !s.is_empty() => s,
        _ => return error_response(400, "URL is required"),
    };
    match state.resolver.resolve(site).await {
        Ok(icon) => {
            tracing::info!(site, icon = %icon.icon_url, source = ?icon.source, "extract");
            Response::json(200, &json!({ "success": true, "iconUrl": icon.icon_url }))
        }
        Err(e) => {
            tracing::warn!(site, "extract failed: {}", e);
            pipeline_error(&e)
        }
    }
}

#[derive(Debug, Deserialize)]
struct ConvertBody {
    url: Option<String>,
    #[serde(default)]
    size: Value,
    format: Option<String>,
    transparent: Option<bool>,
}

/// Absent or null size means "keep"; anything else must be a
/// non-negative integer.
fn parse_size(v: &Value) -> Result<Option<u32>, String> {
    match v {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_u64()
            .and_then(|s| u32::try_from(s).ok())
            .map(Some)
            .ok_or_else(|| format!("invalid size: {}", n)),
        other => Err(format!("invalid size: {}", other)),
    }
}

async fn convert(state: &ApiState, req: &Request) -> Response {
    let body: ConvertBody = match serde_json::from_slice(&req.body) {
        Ok(b) => b,
        Err(e) => return error_response(400, &format!("invalid JSON body: {}", e)),
    };
    let url = match body.url.as_deref().map(str::trim) {
        Some(u) if !u.is_empty() => u.to_string(),
        _ => return error_response(400, "icon URL is required"),
    };
    let size = match parse_size(&body.size) {
        Ok(s) => s,
        Err(msg) => return error_response(400, &msg),
    };

    let request = ConversionRequest::from_parts(
        url,
        size,
        body.format.as_deref(),
        body.transparent,
        state.converter.defaults(),
    );

    match state.converter.convert(&request).await {
        Ok(outcome) => {
            if let ConversionOutcome::Passthrough { reason, .. } = &outcome {
                tracing::warn!(url = %request.source_url, "returning original bytes: {}", reason);
            }
            let result = outcome.into_result();
            let disposition = url_model::attachment_disposition(&result.extension);
            Response::bytes(200, result.content_type, result.bytes)
                .with_header("Content-Disposition", disposition)
        }
        Err(e) => {
            tracing::warn!(url = %request.source_url, "convert failed: {}", e);
            pipeline_error(&e)
        }
    }
}
