//! Filter graph builder.
//!
//! Assembles the complete `-filter_complex` program for one render:
//! background scale/crop, optional fading character overlay, then one
//! drawtext stage per non-empty text element. Stages are chained by pad
//! label, and the label chain only advances on stages actually emitted, so
//! skipped elements never leave a gap.

use invite_models::{
    parse_date_parts, Align, ConfigError, DateParts, ElementName, LayoutConfig, ResolvedElement,
    TimingWindow,
};

use crate::assets::AssetStore;
use crate::compose::ComposeRequest;
use crate::error::{MediaError, MediaResult};
use crate::escape::{escape_font_path, escape_text};
use crate::fade::{fade_alpha_expr, fmt_num};

/// The character overlay never rises above this top padding, so short
/// bounding boxes cannot push it off-canvas.
pub const MIN_TOP_PADDING: f64 = 150.0;

/// Venue strings longer than this shrink proportionally to stay inside
/// their fixed-width box.
pub const MAX_VENUE_CHARS: usize = 28;

/// Character fade schedule used when the layout tree has no timing for the
/// image element.
pub const DEFAULT_CHARACTER_TIMING: TimingWindow = TimingWindow {
    fade_in_start: 15.0,
    fade_in_duration: 1.0,
    fade_out_start: Some(28.0),
    fade_out_duration: Some(2.0),
};

/// A complete filtergraph program plus the pad label carrying the final
/// video stream.
#[derive(Debug, Clone)]
pub struct FilterGraph {
    pub filter_complex: String,
    pub output_label: String,
    /// Whether input 1 (the character still) participates in the graph.
    pub uses_character: bool,
}

/// Build the filter graph for one compose request.
pub fn build_filter_graph(
    request: &ComposeRequest,
    layout: &LayoutConfig,
    assets: &AssetStore,
) -> MediaResult<FilterGraph> {
    let canvas = layout.canvas;
    let mut stages: Vec<String> = Vec::new();

    // Background: aspect-fill the canvas, then center-crop to exact size.
    stages.push(format!(
        "[0:v]scale={w}:{h}:force_original_aspect_ratio=increase,crop={w}:{h}[bg]",
        w = canvas.width,
        h = canvas.height,
    ));

    let uses_character = request.character_image.is_some();
    if uses_character {
        stages.extend(character_stages(layout));
    } else {
        stages.push("[bg]copy[vid]".to_string());
    }

    // Absent date parts mean all date-derived elements are omitted, not an
    // error.
    let date_parts = parse_date_parts(&request.date);

    let mut current = "vid".to_string();
    let mut next_index = 1u32;

    for &name in ElementName::TEXT_ORDER {
        let text = element_text(name, request, date_parts.as_ref());
        if text.trim().is_empty() {
            continue;
        }

        let element = layout.resolve(name);
        let label = format!("v{next_index}");
        stages.push(drawtext_stage(name, &text, &element, assets, &current, &label)?);
        current = label;
        next_index += 1;
    }

    Ok(FilterGraph {
        filter_complex: stages.join(";"),
        output_label: current,
        uses_character,
    })
}

/// Scale the character still into its bounding box, fade it, and overlay it
/// onto the background at its configured center.
fn character_stages(layout: &LayoutConfig) -> Vec<String> {
    let character = layout.resolve(ElementName::BabyImage);

    let box_width = character.position.width.unwrap_or(0.0).round();
    let box_height = character.position.height.unwrap_or(0.0).round();
    // A template without a usable bounding box simply has no character slot.
    if box_width <= 0.0 || box_height <= 0.0 {
        return vec!["[bg]copy[vid]".to_string()];
    }

    let timing = if character.timing == TimingWindow::default() {
        DEFAULT_CHARACTER_TIMING
    } else {
        character.timing
    };

    let center_x = character.position.x.round();
    let center_y = character.position.y.round();

    let mut scale_fade = format!(
        "[1:v]scale={w}:{h}:force_original_aspect_ratio=decrease,format=rgba,\
         fade=in:st={st}:d={d}:alpha=1",
        w = fmt_num(box_width),
        h = fmt_num(box_height),
        st = fmt_num(timing.fade_in_start),
        d = fmt_num(timing.fade_in_duration.max(0.0)),
    );
    if timing.has_fade_out() {
        scale_fade.push_str(&format!(
            ",fade=out:st={st}:d={d}:alpha=1",
            st = fmt_num(timing.fade_out_start.unwrap_or_default()),
            d = fmt_num(timing.fade_out_duration.unwrap_or_default()),
        ));
    }
    scale_fade.push_str("[char]");

    // The comma inside max() must be escaped or the filtergraph parser
    // treats it as a filter separator.
    let overlay = format!(
        "[bg][char]overlay={x}-(w/2):max({pad}\\,{y}-(h/2))[vid]",
        x = fmt_num(center_x),
        pad = fmt_num(MIN_TOP_PADDING),
        y = fmt_num(center_y),
    );

    vec![scale_fade, overlay]
}

/// One drawtext stage, consuming `input` and producing `output`.
fn drawtext_stage(
    name: ElementName,
    text: &str,
    element: &ResolvedElement,
    assets: &AssetStore,
    input: &str,
    output: &str,
) -> MediaResult<String> {
    let style = &element.style;

    // The layout tree is validated at startup; these guards keep a
    // hand-built tree from ever emitting a malformed numeric or color token.
    if !(style.font_size > 0.0) {
        return Err(MediaError::Config(ConfigError::InvalidFontSize {
            element: name,
            size: style.font_size,
        }));
    }
    if style.color.len() != 7 || !style.color.starts_with('#') {
        return Err(MediaError::Config(ConfigError::InvalidColor {
            element: name,
            color: style.color.clone(),
        }));
    }

    let font_path = assets.font_path(&style.font_family);
    let font = escape_font_path(&font_path.to_string_lossy());

    let font_size = if name == ElementName::Venue {
        venue_font_size(style.font_size, text)
    } else {
        style.font_size
    };

    Ok(format!(
        "[{input}]drawtext=fontfile='{font}':text='{text}':fontsize={size}:fontcolor={color}:\
         x={x}:y={y}:alpha='{alpha}'[{output}]",
        text = escape_text(text),
        size = fmt_num(font_size),
        color = to_ffmpeg_color(&style.color),
        x = align_x(element),
        y = align_y(element),
        alpha = fade_alpha_expr(&element.timing),
    ))
}

/// The rendered string for one text element.
fn element_text(
    name: ElementName,
    request: &ComposeRequest,
    date_parts: Option<&DateParts>,
) -> String {
    match name {
        ElementName::ParentsName => request.parents_name.clone(),
        ElementName::Venue => request.venue.clone(),
        ElementName::Time => request
            .time
            .as_deref()
            .unwrap_or_default()
            .to_uppercase(),
        ElementName::Month => date_parts
            .map(|p| p.month.to_uppercase())
            .unwrap_or_default(),
        ElementName::DayName => date_parts
            .map(|p| p.day_name.to_uppercase())
            .unwrap_or_default(),
        ElementName::DateNumber => date_parts
            .map(|p| p.date_number.clone())
            .unwrap_or_default(),
        ElementName::Year => date_parts.map(|p| p.year.clone()).unwrap_or_default(),
        ElementName::BabyImage => String::new(),
    }
}

/// Shrink the venue font proportionally once the text exceeds the box.
fn venue_font_size(base: f64, venue: &str) -> f64 {
    let length = venue.trim().chars().count();
    if length == 0 || length <= MAX_VENUE_CHARS {
        return base;
    }
    base * (MAX_VENUE_CHARS as f64 / length as f64)
}

/// `#RRGGBB` to FFmpeg's `0xRRGGBB` color token.
fn to_ffmpeg_color(hex: &str) -> String {
    format!("0x{}", hex.trim_start_matches('#'))
}

/// Horizontal position expression; rendered text width is only known at
/// render time, so alignment is expressed in terms of `text_w`.
fn align_x(element: &ResolvedElement) -> String {
    let x = fmt_num(element.position.x);
    match element.align {
        Align::Left => x,
        Align::Center => format!("{x}-(text_w/2)"),
        Align::Right => format!("{x}-(text_w)"),
    }
}

/// Vertical center anchor, independent of horizontal alignment.
fn align_y(element: &ResolvedElement) -> String {
    format!("{}-(text_h/2)", fmt_num(element.position.y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn test_assets() -> AssetStore {
        // Paths never touched by the builder itself; font fallback resolves
        // to the default font under this directory.
        AssetStore::new("/assets/background.mp4", "/assets/fonts")
    }

    fn request(date: &str, time: Option<&str>, venue: &str) -> ComposeRequest {
        ComposeRequest {
            parents_name: "Asha & Rohan".to_string(),
            date: date.to_string(),
            time: time.map(str::to_string),
            venue: venue.to_string(),
            character_image: None,
        }
    }

    fn drawtext_count(graph: &FilterGraph) -> usize {
        graph.filter_complex.matches("drawtext=").count()
    }

    #[test]
    fn test_full_request_emits_all_text_stages() {
        let req = request("19 February 2026", Some("5 pm"), "Rose Garden");
        let graph = build_filter_graph(&req, &LayoutConfig::baby_shower(), &test_assets()).unwrap();

        assert_eq!(drawtext_count(&graph), 7);
        assert_eq!(graph.output_label, "v7");
        assert!(graph
            .filter_complex
            .starts_with("[0:v]scale=1080:1920:force_original_aspect_ratio=increase,crop=1080:1920[bg]"));
        assert!(graph.filter_complex.contains("[bg]copy[vid]"));
        assert!(!graph.uses_character);
        // Uppercasing rules
        assert!(graph.filter_complex.contains("text='FEBRUARY'"));
        assert!(graph.filter_complex.contains("text='THURSDAY'"));
        assert!(graph.filter_complex.contains("text='5 PM'"));
        assert!(graph.filter_complex.contains("text='19'"));
        assert!(graph.filter_complex.contains("text='2026'"));
    }

    #[test]
    fn test_malformed_date_omits_date_stages() {
        let req = request("not a date", None, "Rose Garden");
        let graph = build_filter_graph(&req, &LayoutConfig::baby_shower(), &test_assets()).unwrap();

        // Only parentsName and venue survive.
        assert_eq!(drawtext_count(&graph), 2);
        assert!(graph.filter_complex.contains("[vid]drawtext"));
        assert!(graph.filter_complex.contains("[v1]drawtext"));
        assert_eq!(graph.output_label, "v2");
    }

    #[test]
    fn test_label_chain_has_no_gaps() {
        let req = request("not a date", None, "Rose Garden");
        let graph = build_filter_graph(&req, &LayoutConfig::baby_shower(), &test_assets()).unwrap();

        // Each stage consumes the previous stage's output label.
        let stages: Vec<&str> = graph.filter_complex.split(';').collect();
        let text_stages: Vec<&str> = stages
            .iter()
            .filter(|s| s.contains("drawtext"))
            .copied()
            .collect();
        assert!(text_stages[0].starts_with("[vid]"));
        assert!(text_stages[0].ends_with("[v1]"));
        assert!(text_stages[1].starts_with("[v1]"));
        assert!(text_stages[1].ends_with("[v2]"));
    }

    #[test]
    fn test_character_overlay_stages() {
        let mut req = request("19 February 2026", None, "Rose Garden");
        req.character_image = Some(vec![0x89, 0x50, 0x4E, 0x47]);
        let graph = build_filter_graph(&req, &LayoutConfig::baby_shower(), &test_assets()).unwrap();

        assert!(graph.uses_character);
        assert!(graph.filter_complex.contains(
            "[1:v]scale=520:650:force_original_aspect_ratio=decrease,format=rgba"
        ));
        // hero preset: in 15s/1s, out 19s/1s
        assert!(graph
            .filter_complex
            .contains("fade=in:st=15:d=1:alpha=1,fade=out:st=19:d=1:alpha=1[char]"));
        assert!(graph
            .filter_complex
            .contains("[bg][char]overlay=540-(w/2):max(150\\,620-(h/2))[vid]"));
        assert!(!graph.filter_complex.contains("[bg]copy[vid]"));
    }

    #[test]
    fn test_character_without_box_falls_back_to_copy() {
        let mut layout = LayoutConfig::baby_shower();
        layout.elements.remove(&ElementName::BabyImage);

        let mut req = request("19 February 2026", None, "Rose Garden");
        req.character_image = Some(vec![0x89, 0x50, 0x4E, 0x47]);
        let graph = build_filter_graph(&req, &layout, &test_assets()).unwrap();

        assert!(graph.filter_complex.contains("[bg]copy[vid]"));
        assert!(!graph.filter_complex.contains("overlay"));
    }

    #[test]
    fn test_character_timing_fallback() {
        let mut layout = LayoutConfig::baby_shower();
        layout
            .elements
            .get_mut(&ElementName::BabyImage)
            .unwrap()
            .timing_ref = None;

        let mut req = request("19 February 2026", None, "Rose Garden");
        req.character_image = Some(vec![0xFF, 0xD8, 0xFF]);
        let graph = build_filter_graph(&req, &layout, &test_assets()).unwrap();

        assert!(graph
            .filter_complex
            .contains("fade=in:st=15:d=1:alpha=1,fade=out:st=28:d=2:alpha=1[char]"));
    }

    #[test]
    fn test_venue_font_scaling() {
        assert_eq!(venue_font_size(50.0, &"v".repeat(56)), 25.0);
        assert_eq!(venue_font_size(50.0, "Short Venue"), 50.0);
        assert_eq!(venue_font_size(50.0, &"v".repeat(28)), 50.0);
        assert_eq!(venue_font_size(50.0, ""), 50.0);

        let req = request("not a date", None, &"v".repeat(56));
        let graph = build_filter_graph(&req, &LayoutConfig::baby_shower(), &test_assets()).unwrap();
        assert!(graph.filter_complex.contains("fontsize=25:"));
    }

    #[test]
    fn test_hostile_text_is_escaped_in_place() {
        let req = request("not a date", None, "O'Brien's: Hall, Suite 2\nFloor 3");
        let graph = build_filter_graph(&req, &LayoutConfig::baby_shower(), &test_assets()).unwrap();
        assert!(graph
            .filter_complex
            .contains("text='O\\'Brien\\'s\\: Hall\\, Suite 2\\nFloor 3'"));
    }

    #[test]
    fn test_style_tokens() {
        let req = request("19 February 2026", None, "Rose Garden");
        let graph = build_filter_graph(&req, &LayoutConfig::baby_shower(), &test_assets()).unwrap();

        assert!(graph.filter_complex.contains("fontcolor=0xaf7f54"));
        assert!(graph.filter_complex.contains("x=560-(text_w/2)"));
        assert!(graph.filter_complex.contains("y=1080-(text_h/2)"));
        // Venue uses the "details" preset with a zero-length fade-out.
        assert!(graph
            .filter_complex
            .contains("alpha='if(lt(t,20),0,if(lt(t,21),((t-20)/1),1))'"));
    }

    #[test]
    fn test_missing_font_size_fails_fast() {
        let mut layout = LayoutConfig::baby_shower();
        layout
            .elements
            .get_mut(&ElementName::Venue)
            .unwrap()
            .style
            .as_mut()
            .unwrap()
            .font_size = 0.0;

        let req = request("19 February 2026", None, "Rose Garden");
        let err = build_filter_graph(&req, &layout, &test_assets()).unwrap_err();
        assert!(matches!(
            err,
            MediaError::Config(ConfigError::InvalidFontSize { .. })
        ));
    }

    #[test]
    fn test_font_paths_are_escaped() {
        let assets = AssetStore::new(
            PathBuf::from("/assets/background.mp4"),
            PathBuf::from("/srv/app's fonts"),
        );
        let req = request("not a date", None, "Rose Garden");
        let graph = build_filter_graph(&req, &LayoutConfig::baby_shower(), &assets).unwrap();
        assert!(graph
            .filter_complex
            .contains("fontfile='/srv/app\\'s fonts/Opensauce.ttf'"));
    }
}
