use crate::{error::FormatError, layout::TextBlock, source::ParagraphSource, ReflowError};
use regex::{Captures, Regex};
use std::{
    fs::File,
    io::{BufReader, Read, Seek},
    path::Path,
    sync::OnceLock,
};
use zip::{result::ZipError, ZipArchive};

const DOCUMENT_PART: &str = "word/document.xml";

/// A Word (`.docx`) document. Only the main document part is read, and only for its
/// text: each `<w:p>` paragraph becomes one block made of its `<w:t>` runs, with tabs
/// kept as tabs and line breaks turned into spaces. Formatting, headers, footers,
/// footnotes and deleted revisions are ignored.
pub struct DocxSource<R: Read + Seek> {
    archive: ZipArchive<R>,
}

impl DocxSource<BufReader<File>> {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ReflowError> {
        DocxSource::from_reader(BufReader::new(File::open(path)?))
    }
}

impl<R: Read + Seek> DocxSource<R> {
    pub fn from_reader(reader: R) -> Result<Self, ReflowError> {
        let archive = ZipArchive::new(reader).map_err(|err| match err {
            ZipError::Io(err) => ReflowError::Io(err),
            ZipError::InvalidArchive(_) | ZipError::UnsupportedArchive(_) => {
                FormatError::NotDocx(err.to_string()).into()
            }
            err => ReflowError::Zip(err),
        })?;
        Ok(DocxSource { archive })
    }

    fn document_xml(&mut self) -> Result<String, ReflowError> {
        let mut part = match self.archive.by_name(DOCUMENT_PART) {
            Ok(part) => part,
            Err(ZipError::FileNotFound) => return Err(FormatError::MissingDocumentPart.into()),
            Err(err) => return Err(err.into()),
        };

        let mut bytes = Vec::with_capacity(part.size() as usize);
        part.read_to_end(&mut bytes)?;
        String::from_utf8(bytes).map_err(|_| FormatError::InvalidUtf8.into())
    }
}

impl<R: Read + Seek> ParagraphSource for DocxSource<R> {
    fn paragraphs(&mut self) -> Result<Vec<TextBlock>, ReflowError> {
        let xml = self.document_xml()?;
        let blocks = extract_paragraphs(&xml);
        log::debug!("{} paragraph(s) in {DOCUMENT_PART}", blocks.len());
        Ok(blocks)
    }
}

/// Pull the paragraph text out of a WordprocessingML main document part
pub fn extract_paragraphs(xml: &str) -> Vec<TextBlock> {
    static RE_TAG: OnceLock<Regex> = OnceLock::new();
    let re_tag = RE_TAG.get_or_init(|| {
        Regex::new(r"<(/?)w:(pPr|p|tab|br|cr|t)(?:\s[^>]*?)?(/?)>").expect("valid tag pattern")
    });

    let mut blocks: Vec<TextBlock> = Vec::new();
    // paragraphs nest inside text boxes, so keep one buffer per open paragraph
    let mut open: Vec<String> = Vec::new();
    let mut in_properties = 0usize;
    let mut text_start: Option<usize> = None;

    for tag in re_tag.captures_iter(xml) {
        let whole = tag.get(0).expect("match has a whole group");
        let closing = !tag[1].is_empty();
        let self_closing = !tag[3].is_empty();

        if let Some(start) = text_start.take() {
            if let Some(paragraph) = open.last_mut() {
                paragraph.push_str(&decode_entities(&xml[start..whole.start()]));
            }
        }

        match (&tag[2], closing, self_closing) {
            ("pPr", false, false) => in_properties += 1,
            ("pPr", true, _) => in_properties = in_properties.saturating_sub(1),
            // tab stop definitions live inside paragraph properties
            (_, _, _) if in_properties > 0 => {}
            ("p", false, false) => open.push(String::new()),
            ("p", false, true) => blocks.push(TextBlock::default()),
            ("p", true, _) => {
                if let Some(paragraph) = open.pop() {
                    blocks.push(TextBlock::new(paragraph));
                }
            }
            ("t", false, false) => text_start = Some(whole.end()),
            ("tab", false, _) => push_to(&mut open, "\t"),
            ("br", false, _) | ("cr", false, _) => push_to(&mut open, " "),
            _ => {}
        }
    }

    // an unterminated paragraph at the end of a truncated part still counts
    blocks.extend(open.into_iter().map(TextBlock::new));
    blocks
}

fn push_to(open: &mut [String], text: &str) {
    if let Some(paragraph) = open.last_mut() {
        paragraph.push_str(text);
    }
}

/// Decode the five predefined XML entities and numeric character references
fn decode_entities(text: &str) -> String {
    static RE_ENTITY: OnceLock<Regex> = OnceLock::new();
    let re_entity = RE_ENTITY.get_or_init(|| {
        Regex::new(r"&(#x[0-9a-fA-F]+|#[0-9]+|amp|lt|gt|quot|apos);").expect("valid entity pattern")
    });

    re_entity
        .replace_all(text, |caps: &Captures| {
            let entity = &caps[1];
            let decoded = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                _ => {
                    let code = match entity.strip_prefix("#x") {
                        Some(hex) => u32::from_str_radix(hex, 16).ok(),
                        None => entity[1..].parse::<u32>().ok(),
                    };
                    code.and_then(char::from_u32)
                }
            };
            decoded
                .map(String::from)
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}
