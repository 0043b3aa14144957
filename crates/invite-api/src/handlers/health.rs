//! Health and readiness probes.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use invite_media::check_ffmpeg;

use crate::state::AppState;

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub environment: String,
}

/// Health check endpoint (liveness probe).
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        environment: state.config.environment.clone(),
    })
}

/// Readiness check response.
#[derive(Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub ffmpeg: bool,
    pub missing_assets: Vec<String>,
}

/// Readiness check endpoint: verifies the render preconditions (ffmpeg on
/// PATH, background video and fonts on disk) without running a render.
pub async fn ready(
    State(state): State<AppState>,
) -> Result<Json<ReadinessResponse>, (StatusCode, Json<ReadinessResponse>)> {
    let ffmpeg = check_ffmpeg().is_ok();
    let missing_assets: Vec<String> = state
        .assets
        .audit(&state.layout)
        .into_iter()
        .map(|p| p.display().to_string())
        .collect();

    let response = ReadinessResponse {
        status: if ffmpeg && missing_assets.is_empty() {
            "ready".to_string()
        } else {
            "not_ready".to_string()
        },
        ffmpeg,
        missing_assets,
    };

    if response.status == "ready" {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}
