use crate::units::Pt;
use thiserror::Error;

/// Invalid layout or rendering parameters. These are always detected before any
/// layout work starts.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("{name} must be a positive, finite length (got {value})")]
    /// A geometry value (or the font size) is zero, negative, NaN or infinite
    NotPositive { name: &'static str, value: Pt },

    #[error("top margin ({top}) must lie above the bottom margin ({bottom})")]
    /// The cursor would start at or below the cutoff, so no line could ever be placed
    MarginsInverted { top: Pt, bottom: Pt },

    #[error("top margin ({top}) lies above the top of the page ({page_height})")]
    TopOutsidePage { top: Pt, page_height: Pt },

    #[error("line height {line_height} fits more lines between the margins than a page can hold")]
    /// The line height is so small relative to the margins that the page capacity
    /// can't be represented
    TooManyLines { line_height: Pt },

    #[error("horizontal margins ({left} + {right}) leave no room on a {page_width} wide page")]
    NoHorizontalSpace { left: Pt, right: Pt, page_width: Pt },
}

/// Input that could not be decoded into paragraphs, or a font / page size name
/// that isn't known
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormatError {
    #[error("not a Word document: {0}")]
    NotDocx(String),

    #[error("Word document has no `word/document.xml` part")]
    MissingDocumentPart,

    #[error("input is not valid UTF-8 text")]
    InvalidUtf8,

    #[error("unknown standard font `{0}`")]
    UnknownFont(String),

    #[error("unknown page size `{0}`")]
    UnknownPageSize(String),
}

/// All errors that the crate can generate
#[derive(Error, Debug)]
pub enum ReflowError {
    #[error(transparent)]
    /// An I/O error occurred
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    /// [owned_ttf_parser] failed to parse the font
    FaceParsing(#[from] owned_ttf_parser::FaceParsingError),

    #[error(transparent)]
    /// The ZIP container of a Word document could not be read
    Zip(#[from] zip::result::ZipError),

    #[error("invalid configuration file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("refusing to overwrite the input file {}", .0.display())]
    /// The output path names the input document
    OutputIsInput(std::path::PathBuf),

    #[error("could not move the finished PDF into place: {0}")]
    /// The temporary output file could not be persisted over the destination
    Persist(#[from] tempfile::PersistError),
}
