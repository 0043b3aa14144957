//! Error types for media operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for media operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Maximum number of characters of FFmpeg stderr carried in an error.
pub const STDERR_TAIL_CHARS: usize = 500;

/// Errors that can occur during video composition.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("FFmpeg not found in PATH")]
    FfmpegNotFound,

    #[error("FFmpeg command failed: {message}")]
    FfmpegFailed {
        message: String,
        /// Bounded tail of the engine's diagnostic output.
        stderr: Option<String>,
        exit_code: Option<i32>,
    },

    #[error("render timed out after {0} seconds")]
    Timeout(u64),

    #[error("required asset not found: {0}")]
    MissingAsset(PathBuf),

    #[error("layout configuration error: {0}")]
    Config(#[from] invite_models::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MediaError {
    /// Create an FFmpeg failure error, truncating stderr to its tail.
    pub fn ffmpeg_failed(
        message: impl Into<String>,
        stderr: Option<String>,
        exit_code: Option<i32>,
    ) -> Self {
        Self::FfmpegFailed {
            message: message.into(),
            stderr: stderr.map(|s| stderr_tail(&s, STDERR_TAIL_CHARS)),
            exit_code,
        }
    }

    /// Whether the failure is a render timeout (callers message these
    /// differently from hard process failures).
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}

/// Last `max_chars` characters of a diagnostic stream.
pub fn stderr_tail(stderr: &str, max_chars: usize) -> String {
    let count = stderr.chars().count();
    if count <= max_chars {
        return stderr.to_string();
    }
    stderr.chars().skip(count - max_chars).collect()
}
