use crate::{error::FormatError, layout::TextBlock, source::ParagraphSource, ReflowError};
use std::{io::Read, path::Path};

/// Plain UTF-8 text, one paragraph per line. `\n`, `\r\n` and a lone `\r` all end a line.
#[derive(Debug, Clone)]
pub struct PlainTextSource {
    contents: Vec<u8>,
}

impl PlainTextSource {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<PlainTextSource, ReflowError> {
        Ok(PlainTextSource::new(std::fs::read(path)?))
    }

    pub fn from_reader<R: Read>(mut reader: R) -> Result<PlainTextSource, ReflowError> {
        let mut contents = Vec::new();
        reader.read_to_end(&mut contents)?;
        Ok(PlainTextSource::new(contents))
    }

    pub fn new(contents: Vec<u8>) -> PlainTextSource {
        PlainTextSource { contents }
    }
}

impl ParagraphSource for PlainTextSource {
    fn paragraphs(&mut self) -> Result<Vec<TextBlock>, ReflowError> {
        let text = std::str::from_utf8(&self.contents).map_err(|_| FormatError::InvalidUtf8)?;
        let text = text.strip_prefix('\u{FEFF}').unwrap_or(text);
        if text.is_empty() {
            return Ok(Vec::new());
        }

        let text = text.replace("\r\n", "\n").replace('\r', "\n");
        // a trailing newline terminates the last line rather than starting a new one
        let text = text.strip_suffix('\n').unwrap_or(&text);
        Ok(text.split('\n').map(TextBlock::from).collect())
    }
}
