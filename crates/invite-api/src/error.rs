//! API error types.

use std::sync::OnceLock;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use invite_media::MediaError;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Media error: {0}")]
    Media(#[from] MediaError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Media(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short, non-technical message shown to end users.
    fn user_message(&self) -> String {
        match self {
            ApiError::BadRequest(msg) => msg.clone(),
            ApiError::Media(MediaError::Timeout(_)) => {
                "Video composition timed out. Please try again.".to_string()
            }
            ApiError::Media(MediaError::MissingAsset(_)) => {
                "Required assets not found. Please contact support.".to_string()
            }
            ApiError::Media(_) => "Video composition failed. Please try again.".to_string(),
            ApiError::Internal(_) => "An internal error occurred.".to_string(),
        }
    }

    /// Raw diagnostic detail, exposed only outside production.
    fn debug_detail(&self) -> Option<String> {
        match self {
            ApiError::BadRequest(_) => None,
            ApiError::Media(MediaError::FfmpegFailed {
                message,
                stderr,
                exit_code,
            }) => Some(format!(
                "{message} (exit code {exit_code:?}): {}",
                stderr.as_deref().unwrap_or("<no stderr>")
            )),
            other => Some(other.to_string()),
        }
    }

    /// The wire body for this failure. Debug detail is dropped in
    /// production mode.
    fn response_body(&self, production: bool) -> ErrorResponse {
        ErrorResponse {
            success: false,
            error: self.user_message(),
            detail: if production { None } else { self.debug_detail() },
        }
    }
}

/// Production mode, resolved from the environment once per process.
fn production_mode() -> bool {
    static PRODUCTION: OnceLock<bool> = OnceLock::new();
    *PRODUCTION.get_or_init(|| {
        std::env::var("ENVIRONMENT")
            .map(|e| e.to_lowercase() == "production")
            .unwrap_or(false)
    })
}

/// Wire shape for every failure response.
#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = self.response_body(production_mode());
        (status, Json(body)).into_response()
    }
}
