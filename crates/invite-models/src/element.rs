//! Visual element definitions for the layout tree.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::timing::TimingWindow;

/// Names of the visual elements an invitation can place on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ElementName {
    ParentsName,
    Month,
    DayName,
    Time,
    DateNumber,
    Year,
    Venue,
    /// The generated character illustration overlay.
    BabyImage,
}

impl ElementName {
    /// Text elements in the fixed order they are layered onto the video.
    pub const TEXT_ORDER: &'static [ElementName] = &[
        ElementName::ParentsName,
        ElementName::Month,
        ElementName::DayName,
        ElementName::Time,
        ElementName::DateNumber,
        ElementName::Year,
        ElementName::Venue,
    ];

    /// The camelCase name used in layout configuration files.
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementName::ParentsName => "parentsName",
            ElementName::Month => "month",
            ElementName::DayName => "dayName",
            ElementName::Time => "time",
            ElementName::DateNumber => "dateNumber",
            ElementName::Year => "year",
            ElementName::Venue => "venue",
            ElementName::BabyImage => "babyImage",
        }
    }
}

impl fmt::Display for ElementName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Horizontal alignment rule for a text element.
///
/// Alignment is resolved against the rendered text width at render time, so
/// the resolver emits expressions rather than literal pixel offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Left,
    #[default]
    Center,
    Right,
}

/// Anchor position of an element, plus an optional bounding box for image
/// elements.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

/// Font and color styling for a text element.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextStyle {
    /// Font file name, resolved against the configured fonts directory.
    pub font_family: String,
    pub font_size: f64,
    /// `#RRGGBB` hex color.
    pub color: String,
    pub font_weight: Option<u32>,
    /// Letter spacing hint. Carried by the layout tree for front-end
    /// parity; the drawtext stage does not consume it.
    pub tracking: Option<f64>,
}

/// One named element of the layout tree.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ElementSpec {
    pub position: Position,
    pub align: Align,
    pub style: Option<TextStyle>,
    /// Inline timing window, taking precedence over `timing_ref`.
    pub timing: Option<TimingWindow>,
    /// Name of a timing preset in the layout tree.
    pub timing_ref: Option<String>,
}
