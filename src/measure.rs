//! Text measurement: natural size of a text block on a character grid.
//!
//! The disclosure only follows sizes it is given; something still has to
//! produce them. For hosts that render onto a character grid these helpers
//! compute the natural extent of a (possibly partially revealed) text:
//! display columns per Unicode width rules and rows after greedy wrapping.
//! Hosts with a real layout engine measure there instead and ignore this
//! module.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Display width of the widest line of `text`, in columns.
///
/// Wide (e.g. CJK) graphemes count two columns, zero-width marks count
/// none. Hard newlines separate lines; no wrapping is applied.
pub fn display_width(text: &str) -> usize {
    text.split('\n')
        .map(UnicodeWidthStr::width)
        .max()
        .unwrap_or(0)
}

/// Number of rows `text` occupies when wrapped greedily at `wrap_width`
/// columns.
///
/// Empty text occupies no rows; a hard newline always starts a new row. A
/// grapheme wider than `wrap_width` still occupies a row of its own rather
/// than being dropped. Returns 0 for a zero-width grid.
pub fn text_rows(text: &str, wrap_width: u16) -> u32 {
    if wrap_width == 0 || text.is_empty() {
        return 0;
    }

    let mut rows = 0u32;
    for line in text.split('\n') {
        rows += 1;
        let mut col = 0u16;
        for grapheme in line.graphemes(true) {
            let width = u16::try_from(UnicodeWidthStr::width(grapheme)).unwrap_or(u16::MAX);
            if width == 0 {
                continue;
            }
            if col > 0 && col.saturating_add(width) > wrap_width {
                rows += 1;
                col = 0;
            }
            col = col.saturating_add(width);
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_width_ascii() {
        assert_eq!(display_width("Hello"), 5);
    }

    #[test]
    fn test_display_width_takes_widest_line() {
        assert_eq!(display_width("ab\nabcdef\ncd"), 6);
    }

    #[test]
    fn test_display_width_wide_graphemes() {
        assert_eq!(display_width("日本語"), 6);
    }

    #[test]
    fn test_empty_text_has_no_rows() {
        assert_eq!(text_rows("", 80), 0);
    }

    #[test]
    fn test_single_line_fits() {
        assert_eq!(text_rows("Hello", 80), 1);
    }

    #[test]
    fn test_hard_newlines_count_rows() {
        assert_eq!(text_rows("a\nb\nc", 80), 3);
    }

    #[test]
    fn test_greedy_wrap() {
        // 11 columns at width 5: Hello | _worl | d
        assert_eq!(text_rows("Hello world", 5), 3);
    }

    #[test]
    fn test_wide_graphemes_wrap_earlier() {
        // Three 2-column graphemes at width 4: two fit, third wraps.
        assert_eq!(text_rows("日本語", 4), 2);
    }

    #[test]
    fn test_zero_width_grid() {
        assert_eq!(text_rows("Hello", 0), 0);
    }

    #[test]
    fn test_rows_grow_with_revealed_prefix() {
        // As a reveal session drains, the measured extent of its prefix
        // never shrinks.
        let text = "one two three four five six";
        let mut last = 0;
        for end in 0..=text.len() {
            if text.is_char_boundary(end) {
                let rows = text_rows(&text[..end], 8);
                assert!(rows >= last);
                last = rows;
            }
        }
    }
}
