//! Line wrapping for text layers.
//!
//! SVG text does not wrap, so text layers are broken into line fragments up
//! front. Glyph advances are estimated from a fixed per-character width
//! table instead of real font metrics; the thresholds below must stay as
//! they are to keep output compatible with earlier conversions.

use once_cell::sync::Lazy;
use regex::Regex;

/// Advance of a space, in ems
const SPACE_ADVANCE: f64 = 0.3125;
/// Advance of a Latin-1 character, in ems
const NARROW_ADVANCE: f64 = 0.5;
/// Advance of any other character (CJK and friends), in ems
const WIDE_ADVANCE: f64 = 1.0;
/// Overflow tolerated before breaking, in ems
const BREAK_SLACK: f64 = 0.5;

static LINE_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\r\n|\r|\n").expect("BUG: invalid LINE_BREAK regex literal"));

/// Vertical offset of a fragment from the previous one
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineStep {
    /// First fragment: baseline sits one font size below the box top
    FontSize(f64),
    /// Every later fragment advances by the line height
    LineHeight(f64),
}

impl LineStep {
    pub fn value(&self) -> f64 {
        match self {
            LineStep::FontSize(value) | LineStep::LineHeight(value) => *value,
        }
    }
}

/// One wrapped segment of a logical line
#[derive(Debug, Clone, PartialEq)]
pub struct LineFragment {
    /// Horizontal anchor; always the container's left edge
    pub x: f64,
    pub dy: LineStep,
    pub text: String,
    /// Estimated advance width of `text`
    pub width: f64,
}

/// Estimated advance of `c` in ems
fn advance(c: char) -> f64 {
    if c == ' ' {
        SPACE_ADVANCE
    } else if (c as u32) < 256 {
        NARROW_ADVANCE
    } else {
        WIDE_ADVANCE
    }
}

/// Break `text` into line fragments that fit `container_width`.
///
/// Each logical line (split on CR, LF or CRLF) yields at least one
/// fragment, so an empty line still advances the baseline.
pub fn wrap_text(
    text: &str,
    font_size: f64,
    line_height: f64,
    container_width: f64,
    container_left: f64,
) -> Vec<LineFragment> {
    let mut fragments = Vec::new();

    for line in LINE_BREAK.split(text) {
        wrap_line(
            line,
            font_size,
            line_height,
            container_width,
            container_left,
            &mut fragments,
        );
    }

    if let Some(first) = fragments.first_mut() {
        first.dy = LineStep::FontSize(font_size);
    }

    fragments
}

fn wrap_line(
    line: &str,
    font_size: f64,
    line_height: f64,
    container_width: f64,
    container_left: f64,
    fragments: &mut Vec<LineFragment>,
) {
    let fragment = |text: &str, width: f64| LineFragment {
        x: container_left,
        dy: LineStep::LineHeight(line_height),
        text: text.to_string(),
        width,
    };

    let mut begin = 0;
    let mut width = 0.0;

    for (offset, c) in line.char_indices() {
        let next_width = width + advance(c) * font_size;

        if next_width - font_size * BREAK_SLACK > container_width {
            fragments.push(fragment(&line[begin..offset], width));
            begin = offset;
            // The rejected character opens the next fragment
            width = next_width - width;
        } else {
            width = next_width;
        }
    }

    fragments.push(fragment(&line[begin..], width));
}
