//! Application state.

use std::sync::Arc;

use tracing::{info, warn};

use invite_media::{check_ffmpeg, AssetStore};
use invite_models::LayoutConfig;

use crate::config::ApiConfig;

/// Shared application state.
///
/// The layout tree and asset store are built once at startup and read-only
/// afterwards; renders share no other state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub layout: Arc<LayoutConfig>,
    pub assets: Arc<AssetStore>,
}

impl AppState {
    /// Create new application state: load and validate the layout tree,
    /// wire up the asset store and audit the deployment.
    pub fn new(config: ApiConfig) -> anyhow::Result<Self> {
        let layout = match &config.layout_file {
            Some(path) => {
                info!(path = %path.display(), "loading layout tree from file");
                LayoutConfig::from_json_file(path)?
            }
            None => LayoutConfig::baby_shower(),
        };
        layout.validate()?;

        let assets = AssetStore::new(&config.background_video, &config.fonts_dir);

        // Missing assets are logged, not fatal: the deployment may mount
        // them after boot, and renders fail cleanly until then.
        for path in assets.audit(&layout) {
            warn!(path = %path.display(), "asset missing at startup");
        }
        if check_ffmpeg().is_err() {
            warn!("ffmpeg not found in PATH; renders will fail until it is installed");
        }

        Ok(Self {
            config,
            layout: Arc::new(layout),
            assets: Arc::new(assets),
        })
    }
}
