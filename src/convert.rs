//! End-to-end conversion: paragraphs in, PDF out.
//!
//! Everything a conversion needs is carried by an explicit [`ReflowConfig`]; nothing is
//! read from the environment. [`convert_file`] never writes to the destination directly:
//! the PDF is rendered into a uniquely named temporary file next to it, which replaces
//! the destination only once rendering has succeeded and is removed on every other path.

use crate::{
    document::Document,
    error::ConfigurationError,
    font::{Font, StandardFont, Typeface},
    info::Info,
    layout::{layout, layout_wrapped, PageGeometry},
    source::{self, ParagraphSource},
    Pt, ReflowError,
};
use serde::{Deserialize, Serialize};
use std::{
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

/// Which face to set text in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontSpec {
    /// One of the PDF base fonts, referenced by name
    Standard(StandardFont),
    /// A TrueType / OpenType font file to embed
    File(PathBuf),
}

impl Default for FontSpec {
    fn default() -> Self {
        FontSpec::Standard(StandardFont::default())
    }
}

impl FontSpec {
    pub fn load(&self) -> Result<Typeface, ReflowError> {
        match self {
            FontSpec::Standard(font) => Ok(Typeface::Standard(*font)),
            FontSpec::File(path) => {
                log::debug!("loading font from {}", path.display());
                Ok(Typeface::Embedded(Font::from_file(path)?))
            }
        }
    }
}

/// Everything that controls a conversion. Missing fields in a configuration file take
/// their default values.
///
/// ```
/// use pdf_reflow::{ReflowConfig, Pt};
///
/// let config = ReflowConfig::from_json_str(r#"{
///     "geometry": { "line_height": 14.0 },
///     "font": { "standard": "courier" },
///     "wrap": true
/// }"#).unwrap();
///
/// assert_eq!(config.geometry.line_height, Pt(14.0));
/// assert_eq!(config.geometry.top_margin, Pt(750.0));
/// assert_eq!(config.font_size, Pt(12.0));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReflowConfig {
    pub geometry: PageGeometry,
    pub font: FontSpec,
    pub font_size: Pt,
    /// Break blocks that are too wide into several lines instead of letting them run
    /// off the page
    pub wrap: bool,
    pub title: Option<String>,
    pub author: Option<String>,
}

impl Default for ReflowConfig {
    fn default() -> Self {
        ReflowConfig {
            geometry: PageGeometry::default(),
            font: FontSpec::default(),
            font_size: Pt(12.0),
            wrap: false,
            title: None,
            author: None,
        }
    }
}

impl ReflowConfig {
    pub fn from_json_str(json: &str) -> Result<ReflowConfig, ReflowError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<ReflowConfig, ReflowError> {
        let json = std::fs::read_to_string(path)?;
        ReflowConfig::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.geometry.validate()?;
        if !self.font_size.is_positive() {
            return Err(ConfigurationError::NotPositive {
                name: "font_size",
                value: self.font_size,
            });
        }
        Ok(())
    }

    fn info(&self) -> Info {
        let mut info = Info::new();
        info.title = self.title.clone();
        info.author = self.author.clone();
        info
    }
}

/// What a conversion produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionReport {
    /// Paragraphs read from the source
    pub paragraphs: usize,
    /// Lines placed on pages; equal to `paragraphs` unless wrapping is on
    pub lines: usize,
    pub pages: usize,
    /// Where the PDF was written; only known to [`convert_file`]
    pub output: Option<PathBuf>,
}

/// Read every paragraph from `source`, lay them out and write the PDF to `writer`
pub fn convert<S, W>(
    source: &mut S,
    config: &ReflowConfig,
    writer: W,
) -> Result<ConversionReport, ReflowError>
where
    S: ParagraphSource + ?Sized,
    W: Write,
{
    config.validate()?;
    let typeface = config.font.load()?;
    let blocks = source.paragraphs()?;

    let layout = if config.wrap {
        layout_wrapped(&blocks, &config.geometry, &typeface, config.font_size)?
    } else {
        layout(&blocks, &config.geometry)?
    };
    let report = ConversionReport {
        paragraphs: blocks.len(),
        lines: layout.instructions().len(),
        pages: layout.page_count(),
        output: None,
    };

    let mut document = Document::from_layout(&layout, &config.geometry, typeface, config.font_size)?;
    document.set_info(config.info());
    document.write(writer)?;

    Ok(report)
}

/// Convert the document at `input` (picked by extension, see [`source::open`]) into a
/// PDF at `output`, replacing any existing file there only if the conversion succeeds.
/// Without a configured title, the input's file stem is used.
pub fn convert_file<P, Q>(
    input: P,
    output: Q,
    config: &ReflowConfig,
) -> Result<ConversionReport, ReflowError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let (input, output) = (input.as_ref(), output.as_ref());
    if same_file(input, output) {
        return Err(ReflowError::OutputIsInput(output.to_path_buf()));
    }
    config.validate()?;

    let mut config = config.clone();
    if config.title.is_none() {
        config.title = input
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned());
    }

    let mut source = source::open(input)?;

    let directory = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut staged = tempfile::Builder::new()
        .prefix(".pdf-reflow-")
        .suffix(".pdf")
        .tempfile_in(directory)?;
    log::debug!("staging output in {}", staged.path().display());

    let mut report = {
        let mut out = BufWriter::new(staged.as_file_mut());
        let report = convert(source.as_mut(), &config, &mut out)?;
        out.flush()?;
        report
    };

    staged.persist(output)?;
    log::info!(
        "converted {} to {} ({} paragraphs, {} pages)",
        input.display(),
        output.display(),
        report.paragraphs,
        report.pages
    );
    report.output = Some(output.to_path_buf());
    Ok(report)
}

fn same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (std::fs::canonicalize(a), std::fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
