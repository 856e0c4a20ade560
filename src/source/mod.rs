//! Where paragraphs come from.
//!
//! A [`ParagraphSource`] turns some document on disk or in memory into the ordered list of
//! [`TextBlock`]s the layout works on. Two sources are provided: Word documents
//! ([`DocxSource`]) and plain UTF-8 text ([`PlainTextSource`]).

mod docx;
mod text;

pub use docx::*;
pub use text::*;

use crate::{layout::TextBlock, ReflowError};
use std::path::Path;

/// A document that can be read as a sequence of paragraphs
pub trait ParagraphSource {
    /// Read every paragraph, in document order
    fn paragraphs(&mut self) -> Result<Vec<TextBlock>, ReflowError>;
}

/// Open a file as a paragraph source, picking the reader by file extension: `.docx`
/// files are read as Word documents and everything else as plain text
pub fn open<P: AsRef<Path>>(path: P) -> Result<Box<dyn ParagraphSource>, ReflowError> {
    let path = path.as_ref();
    let is_docx = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("docx"))
        .unwrap_or(false);

    log::debug!(
        "reading {} as {}",
        path.display(),
        if is_docx { "a Word document" } else { "plain text" }
    );
    if is_docx {
        Ok(Box::new(DocxSource::open(path)?))
    } else {
        Ok(Box::new(PlainTextSource::open(path)?))
    }
}
