//! Declarative element layout tree.
//!
//! The layout tree describes where every element sits on the canvas, how it
//! is styled and when it fades. It is loaded (or defaulted) once at startup,
//! validated once, and read-only afterwards. The resolver returns
//! fully-populated structs so downstream code never probes optional fields.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

use crate::canvas::VideoCanvas;
use crate::element::{Align, ElementName, ElementSpec, Position, TextStyle};
use crate::timing::TimingWindow;

/// Errors raised by layout validation at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("layout element '{0}' is missing")]
    MissingElement(ElementName),

    #[error("layout element '{element}' has no text style")]
    MissingStyle { element: ElementName },

    #[error("layout element '{element}' has invalid font size {size}")]
    InvalidFontSize { element: ElementName, size: f64 },

    #[error("layout element '{element}' has invalid color '{color}' (expected #RRGGBB)")]
    InvalidColor { element: ElementName, color: String },

    #[error("layout element '{element}' references unknown timing preset '{preset}'")]
    UnknownTimingPreset { element: ElementName, preset: String },

    #[error("layout element '{element}' needs a positive width and height")]
    InvalidBoundingBox { element: ElementName },

    #[error("timing for '{element}' is invalid: {reason}")]
    InvalidTiming { element: ElementName, reason: String },

    #[error("failed to read layout file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse layout file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A fully resolved element: every field populated, no optionals left.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResolvedElement {
    pub position: Position,
    pub align: Align,
    pub style: TextStyle,
    pub timing: TimingWindow,
}

/// The complete layout tree for one invitation template.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutConfig {
    pub canvas: VideoCanvas,
    /// Named timing presets referenced by elements via `timingRef`.
    pub timings: HashMap<String, TimingWindow>,
    pub elements: HashMap<ElementName, ElementSpec>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self::baby_shower()
    }
}

impl LayoutConfig {
    /// Load a layout tree from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Resolve one element into a fully-populated struct.
    ///
    /// Missing elements resolve to defaults (zero position, blank style,
    /// always-visible timing) rather than an error, because some elements
    /// are legitimately absent from a template.
    pub fn resolve(&self, name: ElementName) -> ResolvedElement {
        let Some(spec) = self.elements.get(&name) else {
            return ResolvedElement::default();
        };

        ResolvedElement {
            position: spec.position,
            align: spec.align,
            style: spec.style.clone().unwrap_or_default(),
            timing: self.timing_for(spec),
        }
    }

    /// Timing resolution order: inline window, then named preset, then the
    /// empty always-visible window.
    fn timing_for(&self, spec: &ElementSpec) -> TimingWindow {
        if let Some(timing) = spec.timing {
            return timing;
        }
        spec.timing_ref
            .as_deref()
            .and_then(|name| self.timings.get(name))
            .copied()
            .unwrap_or_default()
    }

    /// Validate the tree once at startup.
    ///
    /// Every text element must carry a usable style (positive font size,
    /// `#RRGGBB` color, non-empty font family), every `timingRef` must
    /// resolve, and every timing window must satisfy its own invariants.
    /// This is what lets the graph builder emit numeric tokens without
    /// re-checking each field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for &name in ElementName::TEXT_ORDER {
            let spec = self
                .elements
                .get(&name)
                .ok_or(ConfigError::MissingElement(name))?;

            let style = spec
                .style
                .as_ref()
                .ok_or(ConfigError::MissingStyle { element: name })?;

            if !(style.font_size > 0.0) {
                return Err(ConfigError::InvalidFontSize {
                    element: name,
                    size: style.font_size,
                });
            }
            if style.font_family.is_empty() {
                return Err(ConfigError::MissingStyle { element: name });
            }
            if !is_hex_color(&style.color) {
                return Err(ConfigError::InvalidColor {
                    element: name,
                    color: style.color.clone(),
                });
            }
        }

        if let Some(spec) = self.elements.get(&ElementName::BabyImage) {
            let positive = |v: Option<f64>| v.map(|v| v > 0.0).unwrap_or(false);
            if !positive(spec.position.width) || !positive(spec.position.height) {
                return Err(ConfigError::InvalidBoundingBox {
                    element: ElementName::BabyImage,
                });
            }
        }

        for (&name, spec) in &self.elements {
            if let Some(preset) = spec.timing_ref.as_deref() {
                if !self.timings.contains_key(preset) {
                    return Err(ConfigError::UnknownTimingPreset {
                        element: name,
                        preset: preset.to_string(),
                    });
                }
            }
            self.timing_for(spec)
                .validate()
                .map_err(|reason| ConfigError::InvalidTiming {
                    element: name,
                    reason,
                })?;
        }

        Ok(())
    }

    /// The built-in baby shower template, mirroring the front-end layout.
    pub fn baby_shower() -> Self {
        let mut timings = HashMap::new();
        timings.insert(
            "hero".to_string(),
            TimingWindow {
                fade_in_start: 15.0,
                fade_in_duration: 1.0,
                fade_out_start: Some(19.0),
                fade_out_duration: Some(1.0),
            },
        );
        timings.insert(
            "details".to_string(),
            TimingWindow {
                fade_in_start: 20.0,
                fade_in_duration: 1.0,
                fade_out_start: Some(45.0),
                fade_out_duration: Some(0.0),
            },
        );

        let text = |x: f64, y: f64, family: &str, size: f64, weight: u32, color: &str, tracking: f64| {
            ElementSpec {
                position: Position {
                    x,
                    y,
                    ..Default::default()
                },
                align: Align::Center,
                style: Some(TextStyle {
                    font_family: family.to_string(),
                    font_size: size,
                    color: color.to_string(),
                    font_weight: Some(weight),
                    tracking: Some(tracking),
                }),
                timing: None,
                timing_ref: Some("details".to_string()),
            }
        };

        let mut elements = HashMap::new();
        elements.insert(
            ElementName::BabyImage,
            ElementSpec {
                position: Position {
                    x: 540.0,
                    y: 620.0,
                    width: Some(520.0),
                    height: Some(650.0),
                },
                timing_ref: Some("hero".to_string()),
                ..Default::default()
            },
        );
        elements.insert(ElementName::ParentsName, {
            let mut spec = text(560.0, 1080.0, "Brightwall.ttf", 70.0, 400, "#af7f54", 0.0);
            spec.timing_ref = Some("hero".to_string());
            spec
        });
        elements.insert(
            ElementName::Month,
            text(560.0, 800.0, "Opensauce.ttf", 50.0, 700, "#4b4a4a", 60.0),
        );
        elements.insert(
            ElementName::DayName,
            text(280.0, 920.0, "Opensauce.ttf", 50.0, 700, "#4b4a4a", 40.0),
        );
        elements.insert(
            ElementName::Time,
            text(800.0, 920.0, "Opensauce.ttf", 50.0, 700, "#4b4a4a", 20.0),
        );
        elements.insert(
            ElementName::DateNumber,
            text(560.0, 920.0, "Roxborough CF.ttf", 85.0, 400, "#705e3c", 0.0),
        );
        elements.insert(
            ElementName::Year,
            text(560.0, 1020.0, "Opensauce.ttf", 50.0, 700, "#4b4a4a", 80.0),
        );
        elements.insert(
            ElementName::Venue,
            text(560.0, 1200.0, "Opensauce.ttf", 50.0, 400, "#4b4a4a", 0.0),
        );

        Self {
            canvas: VideoCanvas::default(),
            timings,
            elements,
        }
    }
}

/// Check for a `#RRGGBB` token.
fn is_hex_color(color: &str) -> bool {
    color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit())
}
