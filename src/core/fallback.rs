//! Locally rendered badge used when the badge service cannot be reached.

use super::count::INVALID_COUNT;
use super::options::{BadgeOptions, DEFAULT_LABEL, MISSING_COUNT_COLOR};

/// Average glyph advance for 11px Verdana, in pixels.
const CHAR_WIDTH: usize = 7;
/// Horizontal padding inside each half of the badge.
const SIDE_PADDING: usize = 10;
/// Fill of the label half.
const LABEL_FILL: &str = "#555";

/// Produces a static badge image without any network access.
pub trait FallbackRenderer {
    fn render_fallback_badge(&self) -> Vec<u8>;

    /// Media type of [`render_fallback_badge`](Self::render_fallback_badge).
    fn content_type(&self) -> &'static str {
        "image/svg+xml"
    }
}

/// Flat-style SVG badge built from a fixed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SvgFallback {
    label: String,
    message: String,
    color: String,
}

impl Default for SvgFallback {
    fn default() -> Self {
        Self::new(DEFAULT_LABEL, INVALID_COUNT, MISSING_COUNT_COLOR)
    }
}

impl SvgFallback {
    #[must_use]
    pub fn new(label: impl Into<String>, message: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            message: message.into(),
            color: color.into(),
        }
    }

    /// Fallback mirroring the badge the service would have rendered.
    #[must_use]
    pub fn for_options(options: &BadgeOptions, value: &str) -> Self {
        Self::new(options.label(), value, options.color())
    }

    fn render_svg(&self) -> String {
        let label_width = text_width(&self.label);
        let message_width = text_width(&self.message);
        let total_width = label_width + message_width;
        // Text is drawn at 10x scale for sub-pixel centering.
        let label_x = label_width * 5;
        let message_x = (label_width * 10) + (message_width * 5);
        let label = escape_xml(&self.label);
        let message = escape_xml(&self.message);
        let fill = color_hex(&self.color);

        format!(
            concat!(
                r#"<svg xmlns="http://www.w3.org/2000/svg" width="{total}" height="20" role="img" aria-label="{label}: {message}">"#,
                r#"<title>{label}: {message}</title>"#,
                r#"<g shape-rendering="crispEdges">"#,
                r#"<rect width="{lw}" height="20" fill="{label_fill}"/>"#,
                r#"<rect x="{lw}" width="{mw}" height="20" fill="{fill}"/>"#,
                r#"</g>"#,
                r##"<g fill="#fff" text-anchor="middle" font-family="Verdana,Geneva,DejaVu Sans,sans-serif" font-size="110">"##,
                r#"<text x="{lx}" y="140" transform="scale(.1)">{label}</text>"#,
                r#"<text x="{mx}" y="140" transform="scale(.1)">{message}</text>"#,
                r#"</g></svg>"#,
            ),
            total = total_width,
            lw = label_width,
            mw = message_width,
            lx = label_x,
            mx = message_x,
            label = label,
            message = message,
            label_fill = LABEL_FILL,
            fill = fill,
        )
    }
}

impl FallbackRenderer for SvgFallback {
    fn render_fallback_badge(&self) -> Vec<u8> {
        self.render_svg().into_bytes()
    }
}

fn text_width(text: &str) -> usize {
    text.chars().count() * CHAR_WIDTH + SIDE_PADDING
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}

/// Resolves a badge color name or bare hex value to an SVG fill.
fn color_hex(color: &str) -> String {
    let named = match color.to_ascii_lowercase().as_str() {
        "brightgreen" | "success" => Some("#4c1"),
        "green" => Some("#97ca00"),
        "yellowgreen" => Some("#a4a61d"),
        "yellow" => Some("#dfb317"),
        "orange" | "important" => Some("#fe7d37"),
        "red" | "critical" => Some("#e05d44"),
        "blue" | "informational" => Some("#007ec6"),
        "grey" | "gray" => Some("#555"),
        "lightgrey" | "lightgray" | "inactive" => Some("#9f9f9f"),
        _ => None,
    };
    if let Some(hex) = named {
        return hex.to_string();
    }

    let bare = color.strip_prefix('#').unwrap_or(color);
    if matches!(bare.len(), 3 | 6) && bare.chars().all(|c| c.is_ascii_hexdigit()) {
        format!("#{bare}")
    } else {
        "#9f9f9f".to_string()
    }
}
