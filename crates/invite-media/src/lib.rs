//! FFmpeg CLI wrapper for invitation video composition.
//!
//! This crate provides:
//! - Filtergraph text/path escaping for user-supplied strings
//! - Fade alpha expression construction from timing windows
//! - The filter graph builder (background, character overlay, text layers)
//! - Type-safe FFmpeg command building and a runner with timeout handling
//! - The render executor with scratch directory lifecycle

pub mod assets;
pub mod command;
pub mod compose;
pub mod error;
pub mod escape;
pub mod fade;
pub mod graph;

pub use assets::{AssetStore, DEFAULT_FONT};
pub use command::{check_ffmpeg, FfmpegCommand, FfmpegRunner};
pub use compose::{compose_video, ComposeRequest, RenderOptions};
pub use error::{MediaError, MediaResult};
pub use escape::{escape_font_path, escape_text};
pub use fade::fade_alpha_expr;
pub use graph::{build_filter_graph, FilterGraph};
