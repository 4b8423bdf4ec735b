//! HTTP request handlers
//!
//! Audio-server failures stay HTTP 200 with `success: false` or
//! `status: "error"` payloads; only malformed client input produces a 400.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use axum::Json;
use serde::Serialize;
use serde_json::Value;

use crate::api::server::AppContext;
use crate::controller::VolumeReading;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: String,
    module: String,
    version: String,
}

/// Result of a mutating operation plus a fresh reading
#[derive(Debug, Serialize)]
pub struct CommandResponse {
    success: bool,
    volume: u8,
    is_muted: bool,
}

#[derive(Debug, Serialize)]
pub struct InvalidInputResponse {
    success: bool,
    error: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET / - embedded control page
pub async fn index() -> Html<&'static str> {
    Html(include_str!("control_ui.html"))
}

/// GET /health - health check endpoint
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        module: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /api/volume - current volume and mute state of the default sink
pub async fn get_volume(State(ctx): State<AppContext>) -> Json<VolumeReading> {
    Json(ctx.controller.current_volume().await)
}

/// POST /api/volume/up - raise volume by one step
pub async fn volume_up(State(ctx): State<AppContext>) -> Json<CommandResponse> {
    let success = ctx.controller.volume_up().await;
    Json(command_response(&ctx, success).await)
}

/// POST /api/volume/down - lower volume by one step
pub async fn volume_down(State(ctx): State<AppContext>) -> Json<CommandResponse> {
    let success = ctx.controller.volume_down().await;
    Json(command_response(&ctx, success).await)
}

/// POST /api/volume/mute - toggle mute
pub async fn toggle_mute(State(ctx): State<AppContext>) -> Json<CommandResponse> {
    let success = ctx.controller.toggle_mute().await;
    Json(command_response(&ctx, success).await)
}

/// POST /api/volume/set - set absolute volume from `{"volume": <int>}`
///
/// Missing or non-numeric input is a client error (400), distinct from
/// audio-server failures which are reported as `success: false` with 200.
pub async fn set_volume(
    State(ctx): State<AppContext>,
    Json(body): Json<Value>,
) -> Result<Json<CommandResponse>, (StatusCode, Json<InvalidInputResponse>)> {
    let target = parse_target(&body)?;
    let success = ctx.controller.set_volume(target).await;
    Ok(Json(command_response(&ctx, success).await))
}

/// Extract the requested volume. Accepts integers, floats (truncated) and
/// numeric strings.
fn parse_target(body: &Value) -> Result<i64, (StatusCode, Json<InvalidInputResponse>)> {
    let Some(raw) = body.get("volume") else {
        return Err(invalid_input("Volume value required"));
    };
    if let Some(v) = raw.as_i64() {
        return Ok(v);
    }
    if let Some(v) = raw.as_f64() {
        return Ok(v as i64);
    }
    if let Some(v) = raw.as_str().and_then(|s| s.trim().parse::<i64>().ok()) {
        return Ok(v);
    }
    Err(invalid_input("Invalid volume value"))
}

fn invalid_input(message: &str) -> (StatusCode, Json<InvalidInputResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(InvalidInputResponse {
            success: false,
            error: message.to_string(),
        }),
    )
}

/// Fresh reading appended to every mutating response
async fn command_response(ctx: &AppContext, success: bool) -> CommandResponse {
    let reading = ctx.controller.current_volume().await;
    CommandResponse {
        success,
        volume: reading.volume,
        is_muted: reading.is_muted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_integer_volume() {
        assert_eq!(parse_target(&json!({"volume": 42})).unwrap(), 42);
    }

    #[test]
    fn truncates_float_volume() {
        assert_eq!(parse_target(&json!({"volume": 42.9})).unwrap(), 42);
    }

    #[test]
    fn parses_numeric_string_volume() {
        assert_eq!(parse_target(&json!({"volume": "30"})).unwrap(), 30);
        assert_eq!(parse_target(&json!({"volume": " 30 "})).unwrap(), 30);
    }

    #[test]
    fn missing_volume_is_a_client_error() {
        let (status, Json(body)) = parse_target(&json!({})).unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(!body.success);
        assert_eq!(body.error, "Volume value required");
    }

    #[test]
    fn non_numeric_volume_is_a_client_error() {
        let (status, Json(body)) = parse_target(&json!({"volume": "loud"})).unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, "Invalid volume value");

        let (status, _) = parse_target(&json!({"volume": null})).unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
