//! Fade alpha expressions.
//!
//! The opacity ramp from `TimingWindow::opacity_at` has to be evaluated by
//! FFmpeg per frame, so the same piecewise function is emitted here as a
//! nested-conditional expression over the frame clock `t`.

use invite_models::TimingWindow;

/// Format a number the way filtergraph expressions expect: no trailing
/// zeros, no scientific notation for the magnitudes involved.
pub(crate) fn fmt_num(value: f64) -> String {
    format!("{}", value)
}

/// Build the per-frame alpha expression for a timing window.
///
/// A non-positive fade-in duration emits a step function instead of a ramp
/// so the expression never divides by zero.
pub fn fade_alpha_expr(timing: &TimingWindow) -> String {
    let start = fmt_num(timing.fade_in_start);
    let duration = timing.fade_in_duration;
    let fade_in_end = fmt_num(timing.fade_in_end());

    // The value of the expression once the fade-in window has passed.
    let settled = if timing.has_fade_out() {
        let out_start = timing.fade_out_start.unwrap_or_default();
        let out_duration = timing.fade_out_duration.unwrap_or_default();
        format!(
            "if(lt(t,{out}),1,if(lt(t,{out_end}),1-((t-{out})/{out_d}),0))",
            out = fmt_num(out_start),
            out_end = fmt_num(out_start + out_duration),
            out_d = fmt_num(out_duration),
        )
    } else {
        "1".to_string()
    };

    if duration <= 0.0 {
        format!("if(lt(t,{start}),0,{settled})")
    } else {
        format!(
            "if(lt(t,{start}),0,if(lt(t,{fade_in_end}),((t-{start})/{d}),{settled}))",
            d = fmt_num(duration),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fade_in_only() {
        let timing = TimingWindow {
            fade_in_start: 20.0,
            fade_in_duration: 1.0,
            ..Default::default()
        };
        assert_eq!(
            fade_alpha_expr(&timing),
            "if(lt(t,20),0,if(lt(t,21),((t-20)/1),1))"
        );
    }

    #[test]
    fn test_fade_in_and_out() {
        let timing = TimingWindow {
            fade_in_start: 15.0,
            fade_in_duration: 1.0,
            fade_out_start: Some(19.0),
            fade_out_duration: Some(1.0),
        };
        assert_eq!(
            fade_alpha_expr(&timing),
            "if(lt(t,15),0,if(lt(t,16),((t-15)/1),if(lt(t,19),1,if(lt(t,20),1-((t-19)/1),0))))"
        );
    }

    #[test]
    fn test_step_function_for_zero_duration() {
        let timing = TimingWindow {
            fade_in_start: 10.0,
            fade_in_duration: 0.0,
            ..Default::default()
        };
        assert_eq!(fade_alpha_expr(&timing), "if(lt(t,10),0,1)");
    }

    #[test]
    fn test_step_function_with_fade_out() {
        let timing = TimingWindow {
            fade_in_start: 10.0,
            fade_in_duration: 0.0,
            fade_out_start: Some(30.0),
            fade_out_duration: Some(2.0),
        };
        assert_eq!(
            fade_alpha_expr(&timing),
            "if(lt(t,10),0,if(lt(t,30),1,if(lt(t,32),1-((t-30)/2),0)))"
        );
    }

    #[test]
    fn test_zero_fade_out_duration_treated_as_no_fade_out() {
        let timing = TimingWindow {
            fade_in_start: 20.0,
            fade_in_duration: 1.0,
            fade_out_start: Some(45.0),
            fade_out_duration: Some(0.0),
        };
        assert_eq!(
            fade_alpha_expr(&timing),
            "if(lt(t,20),0,if(lt(t,21),((t-20)/1),1))"
        );
    }

    #[test]
    fn test_fractional_seconds_format() {
        let timing = TimingWindow {
            fade_in_start: 1.5,
            fade_in_duration: 0.25,
            ..Default::default()
        };
        assert_eq!(
            fade_alpha_expr(&timing),
            "if(lt(t,1.5),0,if(lt(t,1.75),((t-1.5)/0.25),1))"
        );
    }
}
