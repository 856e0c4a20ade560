use crate::{
    error::ConfigurationError,
    font::Typeface,
    info::Info,
    layout::{Layout, PageGeometry, TextMeasure},
    page::{Page, PageRefs, SpanLayout},
    refs::{ObjectReferences, RefType},
    ReflowError, Pt,
};
use pdf_writer::{Finish, Pdf, Ref};
use std::io::Write;

/// A document is the main object that stores all the contents of the PDF
/// then renders it out with a call to [Document::write]. All text in a document is set
/// in one typeface at one size.
#[derive(Debug)]
pub struct Document {
    pub info: Option<Info>,
    pub typeface: Typeface,
    pub font_size: Pt,
    pub pages: Vec<Page>,
}

impl Document {
    pub fn new(typeface: Typeface, font_size: Pt) -> Result<Document, ConfigurationError> {
        if !font_size.is_positive() {
            return Err(ConfigurationError::NotPositive {
                name: "font_size",
                value: font_size,
            });
        }
        Ok(Document {
            info: None,
            typeface,
            font_size,
            pages: Vec::default(),
        })
    }

    /// Build a document with one page per page of the layout, each holding that page's
    /// draw instructions as text spans
    pub fn from_layout(
        layout: &Layout,
        geometry: &PageGeometry,
        typeface: Typeface,
        font_size: Pt,
    ) -> Result<Document, ConfigurationError> {
        geometry.validate()?;
        let mut document = Document::new(typeface, font_size)?;

        let right_edge = geometry.page_width - geometry.right_margin;
        let mut overflowing = 0usize;
        for instructions in layout.pages() {
            let mut page = Page::new(geometry);
            for instruction in instructions {
                let width = document.typeface.width_of(&instruction.text, font_size);
                if instruction.x + width > right_edge {
                    overflowing += 1;
                }
                page.add_span(SpanLayout {
                    text: instruction.text.clone(),
                    coords: (instruction.x, instruction.y),
                });
            }
            document.add_page(page);
        }

        if overflowing > 0 {
            log::warn!("{overflowing} line(s) run past the right margin");
        }
        Ok(document)
    }

    /// Sets information about the document. If not provided, no information block will be
    /// written to the PDF
    pub fn set_info(&mut self, info: Info) {
        self.info = Some(info);
    }

    /// Add a page to the end of the document, returning its 0-based index
    pub fn add_page(&mut self, page: Page) -> usize {
        self.pages.push(page);
        self.pages.len() - 1
    }

    /// Write the entire document to the writer. The whole document is rendered in memory
    /// first, then written out in one go.
    pub fn write<W: Write>(self, mut w: W) -> Result<(), ReflowError> {
        let Document {
            info,
            typeface,
            font_size,
            pages,
        } = self;

        let mut refs = ObjectReferences::new();
        let catalog_id = refs.gen(RefType::Catalog);
        let page_tree_id = refs.gen(RefType::PageTree);

        let mut writer = Pdf::new();
        if let Some(info) = info {
            info.write(&mut refs, &mut writer);
        }

        let page_refs: Vec<Ref> = (0..pages.len())
            .map(|i| refs.gen(RefType::Page(i)))
            .collect();
        writer
            .pages(page_tree_id)
            .count(page_refs.len() as i32)
            .kids(page_refs.iter().copied());

        let font_id = typeface.write(&mut refs, &mut writer);
        log::debug!("writing {} page(s) set in {}", pages.len(), typeface.name());

        let mut missing = 0usize;
        for (page_index, page) in pages.iter().enumerate() {
            let content_id = refs.gen(RefType::ContentForPage(page_index));
            let ids = PageRefs {
                id: page_refs[page_index],
                parent: page_tree_id,
                font: font_id,
                content: content_id,
            };
            missing += page.write(ids, &typeface, font_size, &mut writer)?;
        }
        if missing > 0 {
            log::warn!(
                "{missing} character(s) have no glyph in {} and were replaced",
                typeface.name()
            );
        }

        let mut catalog = writer.catalog(catalog_id);
        catalog.pages(page_tree_id);
        catalog.finish();

        w.write_all(writer.finish().as_slice())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{layout, TextBlock};

    fn render(blocks: usize) -> Vec<u8> {
        let blocks: Vec<TextBlock> = (0..blocks)
            .map(|i| TextBlock::new(format!("line {i}")))
            .collect();
        let geometry = PageGeometry::default();
        let layout = layout(&blocks, &geometry).unwrap();
        let document =
            Document::from_layout(&layout, &geometry, Typeface::default(), Pt(12.0)).unwrap();
        let mut out: Vec<u8> = Vec::new();
        document.write(&mut out).unwrap();
        out
    }

    #[test]
    fn pages_follow_the_layout() {
        let blocks: Vec<TextBlock> = (0..40).map(|i| TextBlock::new(i.to_string())).collect();
        let geometry = PageGeometry::default();
        let layout = layout(&blocks, &geometry).unwrap();
        let document =
            Document::from_layout(&layout, &geometry, Typeface::default(), Pt(12.0)).unwrap();

        assert_eq!(document.pages.len(), 2);
        assert_eq!(document.pages[0].spans.len(), 36);
        assert_eq!(document.pages[1].spans[0].coords, (Pt(50.0), Pt(750.0)));
        assert_eq!(document.pages[0].media_box, geometry.media_box());
    }

    #[test]
    fn empty_layout_is_a_blank_page() {
        let out = render(0);
        let pdf = String::from_utf8_lossy(&out);
        assert!(pdf.starts_with("%PDF-"));
        assert!(pdf.contains("/Count 1"));
    }

    #[test]
    fn writes_a_complete_pdf() {
        let out = render(80);
        let pdf = String::from_utf8_lossy(&out);
        assert!(pdf.starts_with("%PDF-"));
        assert!(pdf.trim_end().ends_with("%%EOF"));
        assert!(pdf.contains("/Count 3"));
        assert!(pdf.contains("/BaseFont /Helvetica"));
    }

    #[test]
    fn embedded_fonts_are_written_as_cid_fonts() {
        use crate::font::Font;

        let font = Font::load(include_bytes!("../assets/DejaVuSansMono.ttf").to_vec())
            .expect("can load font");
        let blocks = vec![TextBlock::new("Grüße"), TextBlock::new("漢字")];
        let geometry = PageGeometry::default();
        let layout = layout(&blocks, &geometry).unwrap();
        let document =
            Document::from_layout(&layout, &geometry, Typeface::Embedded(font), Pt(11.0))
                .unwrap();

        let mut out: Vec<u8> = Vec::new();
        document.write(&mut out).unwrap();
        let pdf = String::from_utf8_lossy(&out);

        assert!(pdf.contains("/Subtype /Type0"));
        assert!(pdf.contains("/BaseFont /DejaVuSansMono"));
        assert!(pdf.contains("/Encoding /Identity-H"));
        assert!(pdf.contains("/Subtype /CIDFontType2"));
        assert!(pdf.contains("/ToUnicode"));
        assert!(pdf.contains("/FontFile2"));
        assert!(pdf.trim_end().ends_with("%%EOF"));
    }

    #[test]
    fn font_size_must_be_positive() {
        assert!(matches!(
            Document::new(Typeface::default(), Pt(0.0)),
            Err(ConfigurationError::NotPositive {
                name: "font_size",
                ..
            })
        ));
    }
}
