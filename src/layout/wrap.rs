use crate::units::Pt;

/// Anything that can tell how wide a piece of text is when set at a given size
pub trait TextMeasure {
    /// Horizontal advance of a single character
    fn char_width(&self, ch: char, size: Pt) -> Pt;

    /// Calculate the width of a given string of text
    fn width_of(&self, text: &str, size: Pt) -> Pt {
        text.chars().map(|ch| self.char_width(ch, size)).sum()
    }
}

/// Breaks a single block of text into lines no wider than `max_width`.
///
/// Lines are broken at the last whitespace that still fits, and the whitespace at the
/// break is dropped. A word that is wider than a whole line on its own is broken between
/// characters instead, and every line holds at least one character so that layout always
/// makes progress. Empty text yields a single empty line.
///
/// ```
/// use pdf_reflow::layout::{wrap_line, TextMeasure};
/// use pdf_reflow::Pt;
///
/// struct Cells;
/// impl TextMeasure for Cells {
///     fn char_width(&self, _: char, _: Pt) -> Pt {
///         Pt(1.0)
///     }
/// }
///
/// let lines = wrap_line("asdf asdf", Pt(6.0), &Cells, Pt(1.0));
/// assert_eq!(lines, vec!["asdf", "asdf"]);
/// ```
pub fn wrap_line(text: &str, max_width: Pt, measure: &dyn TextMeasure, size: Pt) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut lines: Vec<String> = Vec::new();

    let mut start = 0usize;
    while start < chars.len() {
        let mut width = Pt(0.0);
        let mut end = start;
        // most recent whitespace on this line that we could break at
        let mut last_break: Option<usize> = None;

        while end < chars.len() {
            let ch = chars[end];
            let advance = measure.char_width(ch, size);
            if end > start && width + advance > max_width {
                break;
            }
            if ch.is_whitespace() && end > start {
                last_break = Some(end);
            }
            width += advance;
            end += 1;
        }

        if end == chars.len() {
            lines.push(collect_trimmed(&chars[start..]));
            break;
        }

        // overflowed at `end`; prefer breaking on whitespace over splitting a word
        let cut = if chars[end].is_whitespace() {
            end
        } else {
            last_break.unwrap_or(end)
        };
        lines.push(collect_trimmed(&chars[start..cut]));

        start = cut;
        while start < chars.len() && chars[start].is_whitespace() {
            start += 1;
        }
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

fn collect_trimmed(chars: &[char]) -> String {
    let line: String = chars.iter().collect();
    line.trim_end().to_string()
}
