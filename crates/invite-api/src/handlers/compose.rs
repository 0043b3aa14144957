//! Video composition endpoint.

use std::time::Instant;

use axum::extract::{Multipart, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use tracing::{error, info, Instrument};
use uuid::Uuid;

use invite_media::{compose_video as render_video, ComposeRequest, MediaError, RenderOptions};
use invite_models::is_valid_image;

use crate::error::{ApiError, ApiResult};
use crate::metrics::record_render;
use crate::state::AppState;

/// Maximum accepted character image size.
const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// `POST /api/compose-video`
///
/// Multipart fields: `parentsName`, `date`, `venue` (required), `time`
/// (optional) and an optional `characterImage` file. Returns the finished
/// MP4 as an attachment, or `{success:false, error}` JSON on failure.
pub async fn compose_video(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<Response> {
    let request_id = Uuid::new_v4().simple().to_string();
    let span = tracing::info_span!("compose", request_id = %&request_id[..8]);

    async move {
        let request = match parse_request(multipart).await {
            Ok(request) => request,
            Err(err) => {
                record_render("rejected", 0.0);
                return Err(err);
            }
        };

        info!(
            has_character = request.character_image.is_some(),
            date = %request.date,
            "starting video composition"
        );

        let options = RenderOptions {
            timeout_secs: state.config.render_timeout_secs,
            scratch_root: None,
        };

        let started = Instant::now();
        let result = render_video(&request, &state.layout, &state.assets, &options).await;
        let duration = started.elapsed().as_secs_f64();

        match result {
            Ok(video) => {
                record_render("ok", duration);
                Ok((
                    [
                        (header::CONTENT_TYPE, "video/mp4".to_string()),
                        (
                            header::CONTENT_DISPOSITION,
                            "attachment; filename=invitation.mp4".to_string(),
                        ),
                        (header::CONTENT_LENGTH, video.len().to_string()),
                    ],
                    video,
                )
                    .into_response())
            }
            Err(err) => {
                let outcome = match &err {
                    MediaError::Timeout(_) => "timeout",
                    _ => "failed",
                };
                record_render(outcome, duration);
                error!(error = %err, "video composition failed");
                Err(err.into())
            }
        }
    }
    .instrument(span)
    .await
}

/// Parse and validate the multipart body into a [`ComposeRequest`].
///
/// All validation happens here, before any subprocess or scratch-file work.
async fn parse_request(mut multipart: Multipart) -> ApiResult<ComposeRequest> {
    let mut parents_name = String::new();
    let mut date = String::new();
    let mut time = String::new();
    let mut venue = String::new();
    let mut character_image: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::bad_request("Malformed multipart body"))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "parentsName" => parents_name = read_text(field).await?,
            "date" => date = read_text(field).await?,
            "time" => time = read_text(field).await?,
            "venue" => venue = read_text(field).await?,
            "characterImage" => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|_| ApiError::bad_request("Failed to read character image"))?;
                if bytes.len() > MAX_IMAGE_BYTES {
                    return Err(ApiError::bad_request(
                        "Character image exceeds the 10MB limit",
                    ));
                }
                if !is_valid_image(&bytes) {
                    return Err(ApiError::bad_request(
                        "Invalid image file. Please upload a valid JPEG, PNG, GIF, or WebP image.",
                    ));
                }
                character_image = Some(bytes.to_vec());
            }
            // Unknown fields are ignored rather than rejected.
            _ => {}
        }
    }

    let mut missing = Vec::new();
    if parents_name.trim().is_empty() {
        missing.push("parentsName");
    }
    if date.trim().is_empty() {
        missing.push("date");
    }
    if venue.trim().is_empty() {
        missing.push("venue");
    }
    if !missing.is_empty() {
        return Err(ApiError::bad_request(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )));
    }

    let time = time.trim();
    Ok(ComposeRequest {
        parents_name,
        date,
        time: (!time.is_empty()).then(|| time.to_string()),
        venue,
        character_image,
    })
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> ApiResult<String> {
    field
        .text()
        .await
        .map_err(|_| ApiError::bad_request("Malformed multipart body"))
}
