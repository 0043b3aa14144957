//! Shared data models for the invite backend.
//!
//! This crate provides Serde-serializable types for:
//! - The output canvas and element layout tree
//! - Fade timing windows and the opacity ramp function
//! - Date decomposition for date-derived text elements
//! - Upload validation helpers

pub mod canvas;
pub mod date;
pub mod element;
pub mod layout;
pub mod timing;
pub mod upload;

// Re-export common types
pub use canvas::VideoCanvas;
pub use date::{parse_date_parts, DateParts, MONTH_NAMES, WEEKDAY_NAMES};
pub use element::{Align, ElementName, ElementSpec, Position, TextStyle};
pub use layout::{ConfigError, LayoutConfig, ResolvedElement};
pub use timing::TimingWindow;
pub use upload::is_valid_image;
