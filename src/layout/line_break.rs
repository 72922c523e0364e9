//! Greedy line wrapping over Unicode break opportunities

use std::ops::Range;

use unicode_linebreak::{linebreaks, BreakOpportunity};
use unicode_segmentation::UnicodeSegmentation;

use crate::layout::font::FontMetrics;

/// Wrap `text` into lines no wider than `max_width`, returning byte ranges.
/// Breaks happen at Unicode break opportunities; a segment wider than the
/// line on its own is broken mid-word at grapheme boundaries. Empty text is
/// one empty line.
pub fn wrap_lines(text: &str, metrics: &FontMetrics, max_width: f32) -> Vec<Range<usize>> {
    if text.is_empty() {
        return vec![0..0];
    }

    let mut lines = Vec::new();
    let mut line_start = 0usize;
    let mut line_width = 0.0f32;
    let mut prev = 0usize;

    for (pos, opportunity) in linebreaks(text) {
        let segment = &text[prev..pos];
        let trimmed_width = metrics.text_width(segment.trim_end());

        if line_width > 0.0 && line_width + trimmed_width > max_width {
            lines.push(line_start..prev);
            line_start = prev;
            line_width = 0.0;
        }

        if line_width == 0.0 && trimmed_width > max_width {
            // Segment alone overflows: emergency break inside it.
            let mut w = 0.0f32;
            for (offset, grapheme) in segment.grapheme_indices(true) {
                let gw = metrics.text_width(grapheme);
                if w + gw > max_width && line_start < prev + offset {
                    lines.push(line_start..prev + offset);
                    line_start = prev + offset;
                    w = 0.0;
                }
                w += gw;
            }
            line_width = w;
        } else {
            line_width += metrics.text_width(segment);
        }

        if opportunity == BreakOpportunity::Mandatory {
            lines.push(line_start..pos);
            line_start = pos;
            line_width = 0.0;
        }
        prev = pos;
    }

    // linebreaks always ends with a mandatory break at text.len(), so every
    // byte is covered; guard anyway for the degenerate case.
    if lines.is_empty() {
        lines.push(0..text.len());
    }
    lines
}

/// Number of rendered lines for a text run at the given width.
pub fn line_count(text: &str, metrics: &FontMetrics, max_width: f32) -> usize {
    wrap_lines(text, metrics, max_width).len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics() -> FontMetrics {
        FontMetrics::default()
    }

    #[test]
    fn test_empty_text_is_one_line() {
        let lines = wrap_lines("", &metrics(), 100.0);
        assert_eq!(lines, vec![0..0]);
    }

    #[test]
    fn test_short_text_single_line() {
        let lines = wrap_lines("Hello", &metrics(), 1000.0);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0], 0..5);
    }

    #[test]
    fn test_wraps_at_word_boundary() {
        let m = metrics();
        let text = "Hello brave new world";
        let width = m.text_width("Hello brave") + 1.0;
        let lines = wrap_lines(text, &m, width);
        assert!(lines.len() >= 2);
        // First break lands on a space, not mid-word.
        let first = &text[lines[0].clone()];
        assert!(text[first.len()..].starts_with(|c: char| !c.is_alphanumeric()) || first.ends_with(' '));
    }

    #[test]
    fn test_mandatory_break() {
        let lines = wrap_lines("Hello\nWorld", &metrics(), 1000.0);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], 0..6);
        assert_eq!(lines[1], 6..11);
    }

    #[test]
    fn test_emergency_break_makes_progress() {
        let m = metrics();
        let narrow = m.text_width("abc") + 1.0;
        let lines = wrap_lines("abcdefghijklmnop", &m, narrow);
        assert!(lines.len() > 1);
        // Ranges tile the text with no gaps.
        let mut cursor = 0;
        for range in &lines {
            assert_eq!(range.start, cursor);
            cursor = range.end;
        }
        assert_eq!(cursor, 16);
    }

    #[test]
    fn test_line_count_grows_as_width_shrinks() {
        let m = metrics();
        let text = "The quick brown fox jumps over the lazy dog";
        let wide = line_count(text, &m, 10_000.0);
        let narrow = line_count(text, &m, m.text_width("The quick") + 1.0);
        assert_eq!(wide, 1);
        assert!(narrow > wide);
    }
}
