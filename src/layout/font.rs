//! Font metrics for text measurement

use unicode_segmentation::UnicodeSegmentation;

use crate::style::{RenderStyle, TextStyle};

/// Approximate glyph metrics for one resolved text style. Widths are a
/// per-character table for ASCII and a default for everything else; the
/// table is derived from the style's em size and width factor.
#[derive(Debug, Clone, PartialEq)]
pub struct FontMetrics {
    /// Line height in logical pixels
    pub line_height: f32,
    /// Width of ASCII characters (0-127)
    char_widths: Vec<f32>,
    /// Default width for non-ASCII characters
    default_width: f32,
}

const NARROW: &str = "iljtf.,:;'|!Ir()[]{} ";
const WIDE: &str = "mwMW@";

impl FontMetrics {
    pub fn from_style(style: &TextStyle) -> Self {
        let avg = style.font_px * style.width_factor;
        let mut char_widths = vec![avg; 128];
        for c in 0u8..128 {
            let ch = c as char;
            let w = if NARROW.contains(ch) {
                avg * 0.55
            } else if WIDE.contains(ch) {
                avg * 1.45
            } else if ch.is_ascii_uppercase() {
                avg * 1.2
            } else if ch.is_ascii_digit() {
                avg * 1.05
            } else {
                avg
            };
            char_widths[c as usize] = w;
        }

        Self {
            line_height: style.line_height,
            char_widths,
            default_width: avg,
        }
    }

    /// Get width of a character
    pub fn width(&self, c: char) -> f32 {
        if c.is_ascii() {
            if let Some(w) = self.char_widths.get(c as usize) {
                return *w;
            }
        }
        self.default_width
    }

    /// Width of a text run, summed per grapheme cluster. A multi-scalar
    /// cluster renders as one glyph, so it gets its widest scalar's width.
    pub fn text_width(&self, text: &str) -> f32 {
        text.graphemes(true)
            .map(|g| {
                let mut chars = g.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => self.width(c),
                    (Some(first), Some(_)) => g
                        .chars()
                        .map(|c| self.width(c))
                        .fold(self.width(first), f32::max),
                    (None, _) => 0.0,
                }
            })
            .sum()
    }
}

impl Default for FontMetrics {
    fn default() -> Self {
        FontMetrics::from_style(&RenderStyle::default().body)
    }
}

/// The two metric sets a resolved style yields.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleMetrics {
    pub body: FontMetrics,
    pub heading: FontMetrics,
}

impl StyleMetrics {
    pub fn from_style(style: &RenderStyle) -> Self {
        Self {
            body: FontMetrics::from_style(&style.body),
            heading: FontMetrics::from_style(&style.heading),
        }
    }
}
