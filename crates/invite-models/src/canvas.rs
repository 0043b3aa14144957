//! Output canvas dimensions.

use serde::{Deserialize, Serialize};

/// Fixed output dimensions for a rendered invitation video.
///
/// The canvas is decided by the layout tree at startup and never changes
/// during the life of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoCanvas {
    pub width: u32,
    pub height: u32,
}

impl Default for VideoCanvas {
    /// Portrait 9:16 canvas used by all shipped templates.
    fn default() -> Self {
        Self {
            width: 1080,
            height: 1920,
        }
    }
}
