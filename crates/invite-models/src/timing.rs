//! Fade timing windows.

use serde::{Deserialize, Serialize};

/// Fade-in/fade-out schedule for a single visual element, in seconds
/// relative to the start of the render.
///
/// An all-default window (`TimingWindow::default()`) means "visible from the
/// first frame, no fade" and is the fallback for elements with no timing of
/// their own.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimingWindow {
    pub fade_in_start: f64,
    pub fade_in_duration: f64,
    pub fade_out_start: Option<f64>,
    pub fade_out_duration: Option<f64>,
}

impl TimingWindow {
    /// Time at which the fade-in ramp completes.
    pub fn fade_in_end(&self) -> f64 {
        self.fade_in_start + self.fade_in_duration
    }

    /// Whether a fade-out with positive duration is configured.
    pub fn has_fade_out(&self) -> bool {
        matches!(
            (self.fade_out_start, self.fade_out_duration),
            (Some(_), Some(d)) if d > 0.0
        )
    }

    /// Opacity of the element at clock time `t`, in `[0, 1]`.
    ///
    /// Linear ramp up over the fade-in window, then fully opaque until the
    /// fade-out window (if any) ramps back down to zero. A non-positive
    /// fade-in duration degenerates to a step function at `fade_in_start`.
    pub fn opacity_at(&self, t: f64) -> f64 {
        if t < self.fade_in_start {
            return 0.0;
        }

        let rising = if self.fade_in_duration <= 0.0 {
            1.0
        } else if t < self.fade_in_end() {
            (t - self.fade_in_start) / self.fade_in_duration
        } else {
            1.0
        };

        match (self.fade_out_start, self.fade_out_duration) {
            (Some(out_start), Some(out_duration)) if out_duration > 0.0 => {
                if t < out_start {
                    rising
                } else if t < out_start + out_duration {
                    1.0 - (t - out_start) / out_duration
                } else {
                    0.0
                }
            }
            _ => rising,
        }
    }

    /// Check structural invariants: `fade_in_start >= 0`, and a configured
    /// fade-out must not begin before the fade-in completes.
    pub fn validate(&self) -> Result<(), String> {
        if self.fade_in_start < 0.0 {
            return Err(format!(
                "fadeInStart must be >= 0, got {}",
                self.fade_in_start
            ));
        }
        if let Some(out_start) = self.fade_out_start {
            if self.has_fade_out() && out_start < self.fade_in_end() {
                return Err(format!(
                    "fadeOutStart ({}) begins before fade-in completes ({})",
                    out_start,
                    self.fade_in_end()
                ));
            }
        }
        Ok(())
    }
}
