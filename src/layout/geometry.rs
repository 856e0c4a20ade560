use crate::error::ConfigurationError;
use crate::layout::Margins;
use crate::pagesize::{PageSize, LETTER};
use crate::rect::Rect;
use crate::units::Pt;
use serde::{Deserialize, Serialize};

/// Upper bound on the number of lines a single page may hold
const MAX_LINES_PER_PAGE: f64 = u32::MAX as f64;

/// The fixed numbers that decide where lines go and how many fit on a page.
///
/// Unlike [`Margins`], the vertical values are _page coordinates_ measured upwards from
/// the bottom edge, as in PDF user space: `top_margin` is the baseline of the first line
/// on every page and `bottom_margin` is the lowest baseline a line may sit on. Every line
/// starts at `left_margin`; `right_margin` only matters when lines are wrapped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageGeometry {
    pub page_width: Pt,
    pub page_height: Pt,
    pub top_margin: Pt,
    pub bottom_margin: Pt,
    pub left_margin: Pt,
    pub right_margin: Pt,
    pub line_height: Pt,
}

impl Default for PageGeometry {
    /// US Letter, first baseline at 750pt, lines every 20pt down to 50pt
    fn default() -> Self {
        PageGeometry {
            page_width: LETTER.0,
            page_height: LETTER.1,
            top_margin: Pt(750.0),
            bottom_margin: Pt(50.0),
            left_margin: Pt(50.0),
            right_margin: Pt(50.0),
            line_height: Pt(20.0),
        }
    }
}

impl PageGeometry {
    /// Derive a geometry from a page size and margins measured from the page edges
    pub fn from_page_size(size: PageSize, margins: &Margins, line_height: Pt) -> PageGeometry {
        PageGeometry {
            page_width: size.0,
            page_height: size.1,
            top_margin: size.1 - margins.top,
            bottom_margin: margins.bottom,
            left_margin: margins.left,
            right_margin: margins.right,
            line_height,
        }
    }

    /// The margins of this geometry as distances from the page edges
    pub fn margins(&self) -> Margins {
        Margins::trbl(
            self.page_height - self.top_margin,
            self.right_margin,
            self.bottom_margin,
            self.left_margin,
        )
    }

    /// Move to a different page size, keeping every margin at the same distance from
    /// its page edge
    pub fn with_page_size(&self, size: PageSize) -> PageGeometry {
        PageGeometry::from_page_size(size, &self.margins(), self.line_height)
    }

    pub fn with_line_height(mut self, line_height: Pt) -> PageGeometry {
        self.line_height = line_height;
        self
    }

    pub fn with_top_margin(mut self, top: Pt) -> PageGeometry {
        self.top_margin = top;
        self
    }

    pub fn with_bottom_margin(mut self, bottom: Pt) -> PageGeometry {
        self.bottom_margin = bottom;
        self
    }

    pub fn with_left_margin(mut self, left: Pt) -> PageGeometry {
        self.left_margin = left;
        self
    }

    pub fn with_right_margin(mut self, right: Pt) -> PageGeometry {
        self.right_margin = right;
        self
    }

    /// Check the geometry can actually hold text. Layout refuses to start on a geometry
    /// that fails this check.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        for (name, value) in [
            ("page_width", self.page_width),
            ("page_height", self.page_height),
            ("top_margin", self.top_margin),
            ("bottom_margin", self.bottom_margin),
            ("line_height", self.line_height),
        ] {
            if !value.is_positive() {
                return Err(ConfigurationError::NotPositive { name, value });
            }
        }

        for (name, value) in [
            ("left_margin", self.left_margin),
            ("right_margin", self.right_margin),
        ] {
            if !value.is_finite() || *value < 0.0 {
                return Err(ConfigurationError::NotPositive { name, value });
            }
        }

        if self.top_margin <= self.bottom_margin {
            return Err(ConfigurationError::MarginsInverted {
                top: self.top_margin,
                bottom: self.bottom_margin,
            });
        }

        if self.line_span() >= MAX_LINES_PER_PAGE {
            return Err(ConfigurationError::TooManyLines {
                line_height: self.line_height,
            });
        }

        if self.top_margin > self.page_height {
            return Err(ConfigurationError::TopOutsidePage {
                top: self.top_margin,
                page_height: self.page_height,
            });
        }

        if self.left_margin + self.right_margin >= self.page_width {
            return Err(ConfigurationError::NoHorizontalSpace {
                left: self.left_margin,
                right: self.right_margin,
                page_width: self.page_width,
            });
        }

        Ok(())
    }

    /// How many lines fit on one page: `floor((top - bottom) / line_height) + 1`.
    /// Only meaningful for a geometry that passed [`validate`](Self::validate).
    pub fn lines_per_page(&self) -> usize {
        (self.line_span().floor() as usize).saturating_add(1)
    }

    /// `(top - bottom) / line_height`, in double precision
    fn line_span(&self) -> f64 {
        (f64::from(*self.top_margin) - f64::from(*self.bottom_margin))
            / f64::from(*self.line_height)
    }

    /// Baseline of the `line`th line on a page (0-based). Never lower than the bottom
    /// margin, even where rounding would put the last line a hair beneath it.
    pub fn baseline(&self, line: usize) -> Pt {
        let y = f64::from(*self.top_margin) - f64::from(*self.line_height) * line as f64;
        let y = Pt(y as f32);
        if y < self.bottom_margin {
            self.bottom_margin
        } else {
            y
        }
    }

    /// Width available to a line between the left and right margins
    pub fn content_width(&self) -> Pt {
        self.page_width - self.left_margin - self.right_margin
    }

    pub fn media_box(&self) -> Rect {
        Rect::sized(self.page_width, self.page_height)
    }

    pub fn content_box(&self) -> Rect {
        Rect {
            x1: self.left_margin,
            y1: self.bottom_margin,
            x2: self.page_width - self.right_margin,
            y2: self.top_margin,
        }
    }
}
