//! Pre-defined page sizes for the paper formats documents are usually printed on.
//!
//! All sizes are provided in portrait orientation (width, height) where width ≤ height.
//! Use the [`PageOrientation`](crate::pagesize::PageOrientation) trait to convert between
//! portrait and landscape, and [`by_name`](crate::pagesize::by_name) to look a size up from
//! user input.
//!
//! # Example
//!
//! ```
//! use pdf_reflow::pagesize::{self, PageOrientation, A4};
//!
//! let landscape = A4.landscape();
//! assert!(landscape.0 > landscape.1);
//! assert_eq!(pagesize::by_name("letter").unwrap(), pagesize::LETTER);
//! ```

use crate::error::FormatError;
use crate::units::*;

/// Page dimensions as (width, height) in points.
pub type PageSize = (Pt, Pt);

pub const LETTER: PageSize = (Pt(8.5 * 72.0), Pt(11.0 * 72.0));
pub const HALF_LETTER: PageSize = (Pt(5.5 * 72.0), Pt(8.5 * 72.0));
pub const LEGAL: PageSize = (Pt(8.5 * 72.0), Pt(14.0 * 72.0));
pub const TABLOID: PageSize = (Pt(11.0 * 72.0), Pt(17.0 * 72.0));

// iso a-series (converted from mm to points)
pub const A3: PageSize = (Pt(297.0 * 72.0 / 25.4), Pt(420.0 * 72.0 / 25.4));
pub const A4: PageSize = (Pt(210.0 * 72.0 / 25.4), Pt(297.0 * 72.0 / 25.4));
pub const A5: PageSize = (Pt(148.0 * 72.0 / 25.4), Pt(210.0 * 72.0 / 25.4));

/// Look up a page size by its (case-insensitive) name, e.g. `"a4"` or `"half-letter"`
pub fn by_name(name: &str) -> Result<PageSize, FormatError> {
    let size = match name.trim().to_ascii_lowercase().replace('_', "-").as_str() {
        "letter" => LETTER,
        "half-letter" => HALF_LETTER,
        "legal" => LEGAL,
        "tabloid" => TABLOID,
        "a3" => A3,
        "a4" => A4,
        "a5" => A5,
        _ => return Err(FormatError::UnknownPageSize(name.to_string())),
    };
    Ok(size)
}

/// Convert page sizes between portrait and landscape orientations.
pub trait PageOrientation {
    /// Returns the size in portrait orientation (width ≤ height).
    fn portrait(self) -> Self;
    /// Returns the size in landscape orientation (width ≥ height).
    fn landscape(self) -> Self;
}

impl PageOrientation for PageSize {
    fn portrait(self) -> Self {
        if self.0 <= self.1 {
            self
        } else {
            (self.1, self.0)
        }
    }

    fn landscape(self) -> PageSize {
        if self.0 >= self.1 {
            self
        } else {
            (self.1, self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_forgiving() {
        assert_eq!(by_name(" A4 ").unwrap(), A4);
        assert_eq!(by_name("half_letter").unwrap(), HALF_LETTER);
        assert_eq!(
            by_name("b5"),
            Err(FormatError::UnknownPageSize("b5".to_string()))
        );
    }

    #[test]
    fn orientation_round_trips() {
        assert_eq!(LETTER.landscape().portrait(), LETTER);
        assert_eq!(LETTER.landscape(), (Pt(792.0), Pt(612.0)));
    }
}
