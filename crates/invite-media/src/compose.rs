//! Render executor.
//!
//! Owns the whole lifecycle of one render: precondition checks, the scratch
//! directory, the FFmpeg invocation and reading the finished video back into
//! memory. The scratch directory is a [`TempDir`], so it is removed on every
//! exit path when it drops, including timeouts and process failures.

use std::path::{Path, PathBuf};
use std::time::Instant;
use tempfile::TempDir;
use tracing::{info, instrument};

use invite_models::LayoutConfig;

use crate::assets::AssetStore;
use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::MediaResult;
use crate::graph::build_filter_graph;

/// Cap on the looped character still input. Without an explicit duration
/// the loop is an unbounded stream and the muxer writes a malformed
/// container.
pub const CHARACTER_LOOP_SECS: u32 = 30;

/// Default wall-clock limit for one render.
pub const DEFAULT_RENDER_TIMEOUT_SECS: u64 = 300;

/// The unit of work for one render. Consumed once, never retained.
#[derive(Debug, Clone)]
pub struct ComposeRequest {
    pub parents_name: String,
    pub date: String,
    pub time: Option<String>,
    pub venue: String,
    /// Raw bytes of the generated character illustration, if the user
    /// supplied one.
    pub character_image: Option<Vec<u8>>,
}

/// Knobs for one render invocation.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub timeout_secs: u64,
    /// Parent directory for the scratch directory. `None` uses the system
    /// temp dir.
    pub scratch_root: Option<PathBuf>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_RENDER_TIMEOUT_SECS,
            scratch_root: None,
        }
    }
}

/// Render a finished invitation video and return its bytes.
///
/// Asset preconditions and the filter graph are checked before any scratch
/// file is written. Output encoding targets WhatsApp/mobile playback and is
/// deliberately not tunable.
#[instrument(skip_all, fields(venue_len = request.venue.len(), has_character = request.character_image.is_some()))]
pub async fn compose_video(
    request: &ComposeRequest,
    layout: &LayoutConfig,
    assets: &AssetStore,
    options: &RenderOptions,
) -> MediaResult<Vec<u8>> {
    assets.verify(layout)?;
    let graph = build_filter_graph(request, layout, assets)?;

    let scratch = create_scratch(options.scratch_root.as_deref())?;
    let output_path = scratch.path().join("output.mp4");

    let mut cmd = FfmpegCommand::new(&output_path).input(&assets.background_video);

    if let Some(image) = &request.character_image {
        let character_path = scratch.path().join("character.png");
        tokio::fs::write(&character_path, image).await?;
        cmd = cmd.input_with_args(
            ["-loop", "1", "-t", &CHARACTER_LOOP_SECS.to_string()],
            character_path,
        );
    }

    let cmd = cmd
        .filter_complex(graph.filter_complex)
        .map(format!("[{}]", graph.output_label))
        // Audio passthrough from the background clip, if it has any.
        .map("0:a?")
        .video_codec("libx264")
        .preset("fast")
        .frame_rate(24)
        .crf(23)
        .output_args(["-maxrate", "2500k", "-bufsize", "5000k"])
        .audio_codec("aac")
        .audio_bitrate("128k")
        .pixel_format("yuv420p")
        .output_args(["-movflags", "+faststart", "-shortest"]);

    let started = Instant::now();
    FfmpegRunner::new()
        .with_timeout(options.timeout_secs)
        .run(&cmd)
        .await?;

    let video = tokio::fs::read(&output_path).await?;
    info!(
        duration_ms = started.elapsed().as_millis() as u64,
        output_bytes = video.len(),
        "video composition complete"
    );

    // Scratch directory (inputs and output file) is removed when `scratch`
    // drops, on this path and on every early return above.
    Ok(video)
}

/// Create a uniquely named scratch directory for one render.
fn create_scratch(root: Option<&Path>) -> std::io::Result<TempDir> {
    let mut builder = tempfile::Builder::new();
    builder.prefix("invite-compose-");
    match root {
        Some(dir) => builder.tempdir_in(dir),
        None => builder.tempdir(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stub_assets(dir: &Path) -> AssetStore {
        let fonts_dir = dir.join("fonts");
        std::fs::create_dir_all(&fonts_dir).unwrap();
        for font in ["Brightwall.ttf", "Opensauce.ttf", "Roxborough CF.ttf"] {
            std::fs::write(fonts_dir.join(font), b"\x00\x01\x00\x00").unwrap();
        }
        let background = dir.join("background.mp4");
        std::fs::write(&background, b"not a real video").unwrap();
        AssetStore::new(background, fonts_dir)
    }

    fn request() -> ComposeRequest {
        ComposeRequest {
            parents_name: "Asha & Rohan".to_string(),
            date: "19 February 2026".to_string(),
            time: Some("5 pm".to_string()),
            venue: "Rose Garden".to_string(),
            character_image: None,
        }
    }

    fn dir_entry_count(path: &Path) -> usize {
        std::fs::read_dir(path).unwrap().count()
    }

    #[test]
    fn test_scratch_dirs_are_unique_and_removed_on_drop() {
        let root = TempDir::new().unwrap();

        let a = create_scratch(Some(root.path())).unwrap();
        let b = create_scratch(Some(root.path())).unwrap();
        assert_ne!(a.path(), b.path());
        assert!(a.path().exists() && b.path().exists());
        assert_eq!(dir_entry_count(root.path()), 2);

        drop(a);
        drop(b);
        assert_eq!(dir_entry_count(root.path()), 0);
    }

    #[tokio::test]
    async fn test_missing_background_short_circuits_before_scratch() {
        let root = TempDir::new().unwrap();
        let assets = AssetStore::new("/nonexistent/background.mp4", root.path().join("fonts"));
        let options = RenderOptions {
            timeout_secs: 5,
            scratch_root: Some(root.path().to_path_buf()),
        };

        let result =
            compose_video(&request(), &LayoutConfig::baby_shower(), &assets, &options).await;
        assert!(result.is_err());
        assert_eq!(dir_entry_count(root.path()), 0);
    }

    #[tokio::test]
    async fn test_scratch_cleaned_up_after_failed_render() {
        // The stub background is not a decodable video, so the subprocess
        // fails (or ffmpeg is absent entirely); either way the scratch
        // directory must be gone afterwards.
        let assets_dir = TempDir::new().unwrap();
        let assets = stub_assets(assets_dir.path());
        let scratch_root = TempDir::new().unwrap();
        let options = RenderOptions {
            timeout_secs: 30,
            scratch_root: Some(scratch_root.path().to_path_buf()),
        };

        let mut req = request();
        req.character_image = Some(vec![0x89, 0x50, 0x4E, 0x47]);

        let result = compose_video(&req, &LayoutConfig::baby_shower(), &assets, &options).await;
        assert!(result.is_err());
        assert_eq!(dir_entry_count(scratch_root.path()), 0);
    }

    #[tokio::test]
    async fn test_concurrent_renders_do_not_collide() {
        let assets_dir = TempDir::new().unwrap();
        let assets = stub_assets(assets_dir.path());
        let scratch_root = TempDir::new().unwrap();
        let options = RenderOptions {
            timeout_secs: 30,
            scratch_root: Some(scratch_root.path().to_path_buf()),
        };

        let layout = LayoutConfig::baby_shower();
        let req_a = request();
        let mut req_b = request();
        req_b.venue = "Another Venue".to_string();

        let (a, b) = tokio::join!(
            compose_video(&req_a, &layout, &assets, &options),
            compose_video(&req_b, &layout, &assets, &options),
        );

        // Both fail against stub inputs; the point is neither render's
        // scratch directory survives or interferes with the other's.
        assert!(a.is_err() && b.is_err());
        assert_eq!(dir_entry_count(scratch_root.path()), 0);
    }
}
