//! Paginated text layout.
//!
//! Paragraphs ([`TextBlock`]s) are placed one per line onto pages described by a
//! [`PageGeometry`]. The cursor starts at the top margin of the first page, moves down by
//! the line height after every line, and starts a new page once the next line would sit
//! below the bottom margin. The output is a [`Layout`]: a list of [`DrawInstruction`]s
//! that the renderer turns into page content.
//!
//! Two strategies are available:
//!
//! - [`layout`](crate::layout::layout) - one block is exactly one line; nothing is measured
//!   and text that is too wide runs off the page
//! - [`layout_wrapped`](crate::layout::layout_wrapped) - blocks are broken into lines that
//!   fit between the left and right margins, using a [`TextMeasure`]
//!
//! # Example
//!
//! ```
//! use pdf_reflow::layout::{layout, PageGeometry, TextBlock};
//! use pdf_reflow::Pt;
//!
//! let geometry = PageGeometry::default()
//!     .with_top_margin(Pt(750.0))
//!     .with_bottom_margin(Pt(50.0))
//!     .with_line_height(Pt(20.0));
//!
//! let blocks = vec![TextBlock::new("Hello"), TextBlock::new("world")];
//! let layout = layout(&blocks, &geometry).expect("valid geometry");
//!
//! assert_eq!(layout.instructions()[1].y, Pt(730.0));
//! ```

mod geometry;
mod margins;
mod paginate;
mod wrap;

pub use geometry::*;
pub use margins::*;
pub use paginate::*;
pub use wrap::*;
