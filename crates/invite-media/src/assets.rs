//! Static render assets: background video and font files.

use std::path::{Path, PathBuf};
use tracing::warn;

use invite_models::{ElementName, LayoutConfig};

use crate::error::{MediaError, MediaResult};

/// Fallback font for elements whose configured family is missing on disk.
pub const DEFAULT_FONT: &str = "Opensauce.ttf";

/// Locations of the deployment-provided assets a render needs.
///
/// These are a deployment precondition: they are audited at startup and
/// re-checked at the start of every render, before any scratch files are
/// written.
#[derive(Debug, Clone)]
pub struct AssetStore {
    pub background_video: PathBuf,
    pub fonts_dir: PathBuf,
}

impl AssetStore {
    pub fn new(background_video: impl Into<PathBuf>, fonts_dir: impl Into<PathBuf>) -> Self {
        Self {
            background_video: background_video.into(),
            fonts_dir: fonts_dir.into(),
        }
    }

    /// Resolve a font family name to a file path.
    ///
    /// Unknown or missing families fall back to [`DEFAULT_FONT`], mirroring
    /// the front-end behavior of rendering everything in the body font when
    /// a display font is unavailable.
    pub fn font_path(&self, font_family: &str) -> PathBuf {
        let name = if font_family.is_empty() {
            DEFAULT_FONT
        } else {
            font_family
        };
        let path = self.fonts_dir.join(name);
        if path.exists() {
            path
        } else {
            self.fonts_dir.join(DEFAULT_FONT)
        }
    }

    /// Every font file the layout tree references, deduplicated.
    fn required_fonts(&self, layout: &LayoutConfig) -> Vec<PathBuf> {
        let mut fonts: Vec<PathBuf> = Vec::new();
        for &name in ElementName::TEXT_ORDER {
            let family = layout.resolve(name).style.font_family;
            if family.is_empty() {
                continue;
            }
            let path = self.fonts_dir.join(&family);
            if !fonts.contains(&path) {
                fonts.push(path);
            }
        }
        fonts
    }

    /// Paths that are missing on disk, for the startup audit log.
    pub fn audit(&self, layout: &LayoutConfig) -> Vec<PathBuf> {
        let mut missing = Vec::new();
        if !self.background_video.exists() {
            missing.push(self.background_video.clone());
        }
        for font in self.required_fonts(layout) {
            if !font.exists() {
                missing.push(font);
            }
        }
        missing
    }

    /// Fail if any required asset is absent. Called before a render writes
    /// any scratch files.
    pub fn verify(&self, layout: &LayoutConfig) -> MediaResult<()> {
        if let Some(path) = self.audit(layout).into_iter().next() {
            warn!(path = %path.display(), "required render asset missing");
            return Err(MediaError::MissingAsset(path));
        }
        Ok(())
    }
}

/// Helper for joining a fonts directory from asset roots.
pub fn fonts_dir(assets_root: impl AsRef<Path>) -> PathBuf {
    assets_root.as_ref().join("fonts")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_with_fonts(fonts: &[&str]) -> (TempDir, AssetStore) {
        let dir = TempDir::new().unwrap();
        let fonts_dir = dir.path().join("fonts");
        std::fs::create_dir_all(&fonts_dir).unwrap();
        for font in fonts {
            std::fs::write(fonts_dir.join(font), b"\x00\x01\x00\x00").unwrap();
        }
        let background = dir.path().join("background.mp4");
        std::fs::write(&background, b"stub").unwrap();
        let store = AssetStore::new(background, fonts_dir);
        (dir, store)
    }

    #[test]
    fn test_font_path_resolves_known_family() {
        let (_dir, store) = store_with_fonts(&["Brightwall.ttf", DEFAULT_FONT]);
        let path = store.font_path("Brightwall.ttf");
        assert!(path.ends_with("Brightwall.ttf"));
    }

    #[test]
    fn test_font_path_falls_back_to_default() {
        let (_dir, store) = store_with_fonts(&[DEFAULT_FONT]);
        let path = store.font_path("Missing.ttf");
        assert!(path.ends_with(DEFAULT_FONT));
        let path = store.font_path("");
        assert!(path.ends_with(DEFAULT_FONT));
    }

    #[test]
    fn test_verify_passes_with_all_assets() {
        let (_dir, store) =
            store_with_fonts(&["Brightwall.ttf", "Opensauce.ttf", "Roxborough CF.ttf"]);
        let layout = LayoutConfig::baby_shower();
        assert!(store.audit(&layout).is_empty());
        store.verify(&layout).unwrap();
    }

    #[test]
    fn test_verify_reports_missing_background() {
        let (_dir, store) =
            store_with_fonts(&["Brightwall.ttf", "Opensauce.ttf", "Roxborough CF.ttf"]);
        let store = AssetStore::new("/nonexistent/background.mp4", store.fonts_dir);
        let layout = LayoutConfig::baby_shower();
        match store.verify(&layout) {
            Err(MediaError::MissingAsset(path)) => {
                assert_eq!(path, PathBuf::from("/nonexistent/background.mp4"));
            }
            other => panic!("expected MissingAsset, got {other:?}"),
        }
    }

    #[test]
    fn test_audit_lists_missing_fonts() {
        let (_dir, store) = store_with_fonts(&["Opensauce.ttf"]);
        let layout = LayoutConfig::baby_shower();
        let missing = store.audit(&layout);
        assert_eq!(missing.len(), 2);
        assert!(missing.iter().any(|p| p.ends_with("Brightwall.ttf")));
        assert!(missing.iter().any(|p| p.ends_with("Roxborough CF.ttf")));
    }
}
