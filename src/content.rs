//! Content stream rendering for pages.

use crate::font::Typeface;
use crate::page::SpanLayout;
use crate::units::Pt;
use std::io::Write;

const TABSIZE: usize = 4;

/// The resource name every page refers to its font by
pub(crate) const FONT_RESOURCE: &[u8] = b"F0";

/// Replace tabs with spaces and drop any other control characters, which no font can
/// show and which a block is never supposed to contain
pub(crate) fn normalize_span_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if ch == '\t' {
            out.push_str(&" ".repeat(TABSIZE));
        } else if !ch.is_control() {
            out.push(ch);
        }
    }
    out
}

/// Renders the text spans of a page to an (uncompressed) PDF content stream.
///
/// Returns the stream and the number of characters the typeface had no glyph for.
#[allow(clippy::write_with_newline)]
pub(crate) fn render_spans(
    spans: &[SpanLayout],
    typeface: &Typeface,
    font_size: Pt,
) -> Result<(Vec<u8>, usize), std::io::Error> {
    let mut content: Vec<u8> = Vec::default();
    let mut missing = 0usize;
    if spans.is_empty() {
        return Ok((content, missing));
    }

    write!(content, "q\n")?;
    write!(content, "0 g\n")?;
    write!(content, "BT\n")?;
    write!(
        content,
        "/{} {} Tf\n",
        String::from_utf8_lossy(FONT_RESOURCE),
        *font_size
    )?;

    for span in spans.iter() {
        let (bytes, span_missing) = typeface.encode(&normalize_span_text(&span.text));
        missing += span_missing;

        // `Tm` positions absolutely, so spans don't depend on each other
        write!(
            content,
            "1 0 0 1 {} {} Tm\n",
            *span.coords.0,
            *span.coords.1
        )?;
        write!(content, "<")?;
        for byte in bytes {
            write!(content, "{byte:02x}")?;
        }
        write!(content, "> Tj\n")?;
    }

    write!(content, "ET\n")?;
    write!(content, "Q\n")?;
    Ok((content, missing))
}
