//! Escaping for the FFmpeg filtergraph mini-language.
//!
//! Backslash, single quote, colon and comma are structural delimiters in
//! filtergraph syntax, so any user text or font path interpolated into a
//! filter must be escaped here. This module is the only place escaping
//! happens; every interpolation site in the graph builder goes through it.

/// Escape user-supplied text for a `drawtext` argument.
///
/// Backslash is escaped first so the escapes added for the remaining
/// characters are not themselves re-escaped. Newlines become the literal
/// two-character sequence `\n`.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            ':' => out.push_str("\\:"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => {
                // Treat CRLF as one newline
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push_str("\\n");
            }
            _ => out.push(c),
        }
    }
    out
}

/// Escape a font file path for a `drawtext=fontfile=` argument.
///
/// Path separators are normalized to forward slashes (the filtergraph
/// parser does not reliably accept backslash separators), then quote and
/// colon are escaped.
pub fn escape_font_path(path: &str) -> String {
    path.replace('\\', "/")
        .replace('\'', "\\'")
        .replace(':', "\\:")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_text_unchanged() {
        assert_eq!(escape_text("Simple Venue"), "Simple Venue");
        assert_eq!(escape_text(""), "");
    }

    #[test]
    fn test_hostile_text_escaped() {
        let escaped = escape_text("O'Brien's: Hall, Suite 2\nFloor 3");
        assert_eq!(escaped, "O\\'Brien\\'s\\: Hall\\, Suite 2\\nFloor 3");
    }

    #[test]
    fn test_backslash_escaped_first() {
        // A literal backslash followed by a colon must not turn into a
        // double-escaped colon.
        assert_eq!(escape_text("a\\:b"), "a\\\\\\:b");
        assert_eq!(escape_text("\\"), "\\\\");
    }

    #[test]
    fn test_crlf_collapses_to_single_escape() {
        assert_eq!(escape_text("a\r\nb"), "a\\nb");
        assert_eq!(escape_text("a\rb"), "a\\nb");
    }

    #[test]
    fn test_font_path_forward_slashes() {
        assert_eq!(
            escape_font_path("C:\\fonts\\Opensauce.ttf"),
            "C\\:/fonts/Opensauce.ttf"
        );
        assert_eq!(
            escape_font_path("/srv/fonts/Roxborough CF.ttf"),
            "/srv/fonts/Roxborough CF.ttf"
        );
    }

    #[test]
    fn test_font_path_quote_escaped() {
        assert_eq!(escape_font_path("/a'b/f.ttf"), "/a\\'b/f.ttf");
    }
}
