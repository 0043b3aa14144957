//! API configuration.

use std::path::PathBuf;

/// API server configuration, read from environment variables at startup.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// CORS origins
    pub cors_origins: Vec<String>,
    /// Max request body size (multipart upload incl. character image)
    pub max_body_size: usize,
    /// Wall-clock limit for one render
    pub render_timeout_secs: u64,
    /// Path to the background video clip
    pub background_video: PathBuf,
    /// Directory holding the template font files
    pub fonts_dir: PathBuf,
    /// Optional JSON layout tree overriding the built-in template
    pub layout_file: Option<PathBuf>,
    /// Environment (development/production)
    pub environment: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            cors_origins: vec!["*".to_string()],
            max_body_size: 12 * 1024 * 1024, // 10MB image + multipart overhead
            render_timeout_secs: 300,
            background_video: PathBuf::from("assets/background.mp4"),
            fonts_dir: PathBuf::from("assets/fonts"),
            layout_file: None,
            environment: "development".to_string(),
        }
    }
}

impl ApiConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("API_HOST").unwrap_or(defaults.host),
            port: std::env::var("API_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.port),
            cors_origins: std::env::var("CORS_ORIGINS")
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or(defaults.cors_origins),
            max_body_size: std::env::var("MAX_BODY_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_body_size),
            render_timeout_secs: std::env::var("RENDER_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.render_timeout_secs),
            background_video: std::env::var("BACKGROUND_VIDEO")
                .map(PathBuf::from)
                .unwrap_or(defaults.background_video),
            fonts_dir: std::env::var("FONTS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.fonts_dir),
            layout_file: std::env::var("LAYOUT_CONFIG").ok().map(PathBuf::from),
            environment: std::env::var("ENVIRONMENT").unwrap_or(defaults.environment),
        }
    }

    /// Check if running in production mode.
    pub fn is_production(&self) -> bool {
        self.environment.to_lowercase() == "production"
    }
}
