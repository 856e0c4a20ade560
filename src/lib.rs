//! Re-flow document paragraphs onto fixed-size PDF pages.
//!
//! Paragraphs are read from a Word document or text file ([`source`]), placed one per
//! line onto pages ([`layout`]), and rendered to PDF ([`Document`]). [`convert_file`]
//! wires the three together.
//!
//! ```no_run
//! use pdf_reflow::{convert_file, ReflowConfig};
//!
//! let report = convert_file("letter.docx", "letter.pdf", &ReflowConfig::default())?;
//! println!("{} pages", report.pages);
//! # Ok::<(), pdf_reflow::ReflowError>(())
//! ```

mod content;

mod convert;
pub use convert::*;

mod document;
pub use document::*;

mod error;
pub use error::*;

mod font;
pub use font::*;

mod info;
pub use info::*;

/// Utility functions and structures to lay text out on pages
pub mod layout;

mod page;
pub use page::*;

pub mod pagesize;

mod rect;
pub use rect::*;

pub(crate) mod refs;

pub mod source;

mod units;
pub use units::*;

/// Re-export PDF-writer, whose types show up in [`Rect`] conversions
pub use pdf_writer;
