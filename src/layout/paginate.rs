use crate::error::ConfigurationError;
use crate::layout::{wrap_line, PageGeometry, TextMeasure};
use crate::units::Pt;
use serde::{Deserialize, Serialize};

/// One paragraph of source text. A block is laid out as a single line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TextBlock {
    text: String,
}

impl TextBlock {
    pub fn new<S: Into<String>>(text: S) -> TextBlock {
        TextBlock { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl From<&str> for TextBlock {
    fn from(text: &str) -> Self {
        TextBlock::new(text)
    }
}

impl From<String> for TextBlock {
    fn from(text: String) -> Self {
        TextBlock::new(text)
    }
}

/// Text placed at an explicit baseline position on a page
#[derive(Debug, Clone, PartialEq)]
pub struct DrawInstruction {
    /// 0-based index of the page the text belongs on
    pub page_index: usize,
    pub x: Pt,
    /// Baseline of the text, measured upwards from the bottom of the page
    pub y: Pt,
    pub text: String,
}

/// The result of laying out a sequence of blocks: how many pages are needed and what
/// goes where. Instructions are ordered by block, and therefore by page.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    page_count: usize,
    instructions: Vec<DrawInstruction>,
}

impl Layout {
    /// Number of pages, never less than 1: an empty document is still one (blank) page
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    pub fn instructions(&self) -> &[DrawInstruction] {
        &self.instructions
    }

    /// The instructions that belong on a single page
    pub fn page(&self, page_index: usize) -> &[DrawInstruction] {
        let start = self
            .instructions
            .partition_point(|i| i.page_index < page_index);
        let end = self
            .instructions
            .partition_point(|i| i.page_index <= page_index);
        &self.instructions[start..end]
    }

    /// Iterate over every page in order, including pages without any instructions
    pub fn pages(&self) -> impl Iterator<Item = &[DrawInstruction]> + '_ {
        (0..self.page_count).map(move |i| self.page(i))
    }
}

/// Where the next line goes. Lives only for the duration of one layout call.
struct LayoutCursor<'g> {
    geometry: &'g PageGeometry,
    lines_per_page: usize,
    page_index: usize,
    /// lines already placed on the current page
    line: usize,
}

impl<'g> LayoutCursor<'g> {
    fn new(geometry: &'g PageGeometry) -> LayoutCursor<'g> {
        LayoutCursor {
            geometry,
            lines_per_page: geometry.lines_per_page(),
            page_index: 0,
            line: 0,
        }
    }

    fn place(&mut self, text: String) -> DrawInstruction {
        // break lazily so that a full last page doesn't leave a blank one behind it
        if self.line == self.lines_per_page {
            self.page_index += 1;
            self.line = 0;
            log::trace!("page break before page {}", self.page_index);
        }

        // derived from the line index rather than accumulated, so the page capacity
        // never drifts with rounding
        let y = self.geometry.baseline(self.line);
        self.line += 1;

        DrawInstruction {
            page_index: self.page_index,
            x: self.geometry.left_margin,
            y,
            text,
        }
    }

    fn finish(self, instructions: Vec<DrawInstruction>) -> Layout {
        Layout {
            page_count: self.page_index + 1,
            instructions,
        }
    }
}

/// Place every block on its own line, top to bottom, starting a new page whenever the
/// next line would fall below the bottom margin.
///
/// Text is never wrapped or measured: a block wider than the page simply runs off the
/// right edge. Use [`layout_wrapped`] to break long blocks into several lines.
///
/// ```
/// use pdf_reflow::layout::{layout, PageGeometry, TextBlock};
///
/// let blocks: Vec<TextBlock> = (1..=40).map(|i| TextBlock::new(format!("line {i}"))).collect();
/// let layout = layout(&blocks, &PageGeometry::default()).expect("geometry is valid");
///
/// assert_eq!(layout.page_count(), 2);
/// assert_eq!(layout.page(0).len(), 36);
/// assert_eq!(layout.page(1)[0].text, "line 37");
/// ```
pub fn layout(blocks: &[TextBlock], geometry: &PageGeometry) -> Result<Layout, ConfigurationError> {
    geometry.validate()?;

    let mut cursor = LayoutCursor::new(geometry);
    let instructions: Vec<DrawInstruction> = blocks
        .iter()
        .map(|block| cursor.place(block.text().to_string()))
        .collect();

    let layout = cursor.finish(instructions);
    log::debug!(
        "laid out {} blocks on {} page(s)",
        blocks.len(),
        layout.page_count()
    );
    Ok(layout)
}

/// Like [`layout`], but first breaks each block into lines no wider than the content
/// width of the page (see [`wrap_line`]), measuring text with `measure` at `size`.
/// An empty block still takes up one line.
pub fn layout_wrapped(
    blocks: &[TextBlock],
    geometry: &PageGeometry,
    measure: &dyn TextMeasure,
    size: Pt,
) -> Result<Layout, ConfigurationError> {
    geometry.validate()?;
    if !size.is_positive() {
        return Err(ConfigurationError::NotPositive {
            name: "font_size",
            value: size,
        });
    }

    let max_width = geometry.content_width();
    let mut cursor = LayoutCursor::new(geometry);
    let mut instructions: Vec<DrawInstruction> = Vec::with_capacity(blocks.len());
    for block in blocks {
        for line in wrap_line(block.text(), max_width, measure, size) {
            instructions.push(cursor.place(line));
        }
    }

    let layout = cursor.finish(instructions);
    log::debug!(
        "wrapped {} blocks into {} lines on {} page(s)",
        blocks.len(),
        layout.instructions().len(),
        layout.page_count()
    );
    Ok(layout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn blocks(n: usize) -> Vec<TextBlock> {
        (0..n).map(|i| TextBlock::new(format!("block {i}"))).collect()
    }

    #[test]
    fn empty_input_is_one_blank_page() {
        let layout = layout(&[], &PageGeometry::default()).unwrap();
        assert_eq!(layout.page_count(), 1);
        assert!(layout.instructions().is_empty());
        assert_eq!(layout.pages().count(), 1);
        assert!(layout.page(0).is_empty());
    }

    #[test]
    fn lines_walk_down_the_page() {
        let layout = layout(&blocks(3), &PageGeometry::default()).unwrap();
        let ys: Vec<Pt> = layout.instructions().iter().map(|i| i.y).collect();
        assert_eq!(ys, vec![Pt(750.0), Pt(730.0), Pt(710.0)]);
        assert!(layout.instructions().iter().all(|i| i.x == Pt(50.0)));
    }

    #[test]
    fn forty_blocks_break_after_thirty_six() {
        let layout = layout(&blocks(40), &PageGeometry::default()).unwrap();
        let instructions = layout.instructions();

        assert_eq!(instructions.len(), 40);
        assert_eq!(instructions[35].page_index, 0);
        assert_eq!(instructions[35].y, Pt(50.0));
        assert_eq!(instructions[36].page_index, 1);
        assert_eq!(instructions[36].y, Pt(750.0));
        assert_eq!(layout.page_count(), 2);
        assert_eq!(layout.page(1).len(), 4);
    }

    #[test]
    fn a_full_last_page_has_no_blank_page_after_it() {
        let layout = layout(&blocks(72), &PageGeometry::default()).unwrap();
        assert_eq!(layout.page_count(), 2);
        assert_eq!(layout.page(1).len(), 36);
    }

    #[test]
    fn sub_point_geometry_stays_above_the_bottom_margin() {
        let geometry = PageGeometry::default()
            .with_top_margin(Pt(0.4))
            .with_bottom_margin(Pt(0.1))
            .with_line_height(Pt(0.1));
        let layout = layout(&blocks(9), &geometry).unwrap();

        assert_eq!(layout.page_count(), 3);
        assert_eq!(layout.page(0).len(), 4);
        assert!(layout
            .instructions()
            .iter()
            .all(|i| i.y >= geometry.bottom_margin));
    }

    #[test]
    fn unrepresentable_capacity_is_an_error() {
        let geometry = PageGeometry::default().with_line_height(Pt(1e-14));
        assert!(matches!(
            layout(&blocks(2), &geometry),
            Err(ConfigurationError::TooManyLines { .. })
        ));
    }

    #[test]
    fn invalid_geometry_fails_before_layout() {
        let geometry = PageGeometry::default()
            .with_top_margin(Pt(10.0))
            .with_bottom_margin(Pt(50.0));
        assert!(matches!(
            layout(&blocks(1), &geometry),
            Err(ConfigurationError::MarginsInverted { .. })
        ));
    }

    #[test]
    fn long_blocks_are_not_wrapped() {
        let long = "word ".repeat(500);
        let layout = layout(&[TextBlock::new(long.clone())], &PageGeometry::default()).unwrap();
        assert_eq!(layout.instructions().len(), 1);
        assert_eq!(layout.instructions()[0].text, long);
    }

    #[test]
    fn non_integral_line_heights_keep_exact_capacity() {
        let geometry = PageGeometry::default()
            .with_top_margin(Pt(700.5))
            .with_bottom_margin(Pt(36.0))
            .with_line_height(Pt(14.3));
        let per_page = ((700.5f32 - 36.0) / 14.3).floor() as usize + 1;
        let layout = layout(&blocks(per_page * 2 + 1), &geometry).unwrap();
        assert_eq!(layout.page(0).len(), per_page);
        assert_eq!(layout.page(1).len(), per_page);
        assert_eq!(layout.page(2).len(), 1);
    }
}
