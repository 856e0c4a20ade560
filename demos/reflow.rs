use pdf_reflow::layout::{layout_wrapped, PageGeometry, TextBlock};
use pdf_reflow::pagesize::A5;
use pdf_reflow::{Document, Font, Info, Pt, Typeface};

fn main() {
    // load a font to embed and set all the text in
    let dejavu_mono = include_bytes!("../assets/DejaVuSansMono.ttf");
    let dejavu_mono = Typeface::Embedded(Font::load(dejavu_mono.to_vec()).expect("can load font"));

    // a handful of paragraphs of filler text, some of them far too long for one line
    let blocks: Vec<TextBlock> = (1..=24)
        .map(|i| TextBlock::new(lipsum::lipsum_words(i * 3)))
        .collect();

    // an A5 page, lines every 14pt between 1.5cm from the top and 1.5cm from the bottom
    let geometry = PageGeometry::default()
        .with_page_size(A5)
        .with_top_margin(A5.1 - Pt(42.5))
        .with_bottom_margin(Pt(42.5))
        .with_line_height(Pt(14.0));

    // break the long paragraphs so they stay between the left and right margins
    let font_size = Pt(10.0);
    let layout =
        layout_wrapped(&blocks, &geometry, &dejavu_mono, font_size).expect("geometry is valid");
    println!(
        "{} paragraphs -> {} lines on {} pages",
        blocks.len(),
        layout.instructions().len(),
        layout.page_count()
    );

    let mut doc =
        Document::from_layout(&layout, &geometry, dejavu_mono, font_size).expect("valid font size");
    doc.set_info(Info::new().with_title("Reflow Example").with_author("pdf-reflow"));

    let mut out = std::fs::File::create("reflow.pdf").unwrap();
    doc.write(&mut out).unwrap();
}
