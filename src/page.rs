use crate::content::{render_spans, FONT_RESOURCE};
use crate::font::Typeface;
use crate::layout::PageGeometry;
use crate::rect::Rect;
use crate::units::Pt;
use miniz_oxide::deflate::compress_to_vec_zlib;
use pdf_writer::{Filter, Finish, Name, Pdf, Ref};

/// A run of text with the coordinates of its baseline start
#[derive(Clone, PartialEq, Debug)]
pub struct SpanLayout {
    pub text: String,
    pub coords: (Pt, Pt),
}

/// Object ids a page needs when it is written
pub(crate) struct PageRefs {
    pub id: Ref,
    pub parent: Ref,
    pub font: Ref,
    pub content: Ref,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Page {
    /// The size of the page
    pub media_box: Rect,
    /// Where content is meant to live, i.e. within the margins
    pub content_box: Rect,
    /// The laid out text
    pub spans: Vec<SpanLayout>,
}

impl Page {
    pub fn new(geometry: &PageGeometry) -> Page {
        Page {
            media_box: geometry.media_box(),
            content_box: geometry.content_box(),
            spans: Vec::default(),
        }
    }

    pub fn add_span(&mut self, span: SpanLayout) {
        self.spans.push(span);
    }

    /// Write the page object and its (compressed) content stream.
    ///
    /// Returns the number of characters the typeface could not show.
    pub(crate) fn write(
        &self,
        refs: PageRefs,
        typeface: &Typeface,
        font_size: Pt,
        writer: &mut Pdf,
    ) -> Result<usize, std::io::Error> {
        let mut page = writer.page(refs.id);
        page.media_box(self.media_box.into());
        page.art_box(self.content_box.into());
        page.parent(refs.parent);
        page.resources()
            .fonts()
            .pair(Name(FONT_RESOURCE), refs.font);
        page.contents(refs.content);
        page.finish();

        let (rendered, missing) = render_spans(&self.spans, typeface, font_size)?;
        let compressed = compress_to_vec_zlib(rendered.as_slice(), 6);
        writer
            .stream(refs.content, compressed.as_slice())
            .filter(Filter::FlateDecode);

        Ok(missing)
    }
}
