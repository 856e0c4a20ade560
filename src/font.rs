use crate::{
    error::FormatError,
    layout::TextMeasure,
    refs::{ObjectReferences, RefType},
    ReflowError, Pt,
};
use owned_ttf_parser::{AsFaceRef, GlyphId, OwnedFace};
use pdf_writer::{
    types::{CidFontType, FontFlags, SystemInfo},
    Filter, Finish, Name, Pdf, Ref, Str,
};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt, path::Path, str::FromStr};

/// One of the base fonts every PDF reader ships with. These are referenced by name and
/// never embedded, which keeps documents tiny, but they can only show characters from
/// the WinAnsi (Windows-1252) character set.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StandardFont {
    #[default]
    Helvetica,
    HelveticaBold,
    TimesRoman,
    TimesBold,
    Courier,
    CourierBold,
}

impl StandardFont {
    /// The PostScript name the font is referred to by inside the PDF
    pub fn base_font(&self) -> &'static str {
        match self {
            StandardFont::Helvetica => "Helvetica",
            StandardFont::HelveticaBold => "Helvetica-Bold",
            StandardFont::TimesRoman => "Times-Roman",
            StandardFont::TimesBold => "Times-Bold",
            StandardFont::Courier => "Courier",
            StandardFont::CourierBold => "Courier-Bold",
        }
    }

    /// Average advance of a glyph, as a fraction of the font size. Exact for Courier;
    /// an estimate for the proportional faces.
    fn average_advance(&self) -> f32 {
        match self {
            StandardFont::Helvetica | StandardFont::HelveticaBold => 0.556,
            StandardFont::TimesRoman | StandardFont::TimesBold => 0.5,
            StandardFont::Courier | StandardFont::CourierBold => 0.6,
        }
    }
}

impl FromStr for StandardFont {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let font = match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "helvetica" | "sans" => StandardFont::Helvetica,
            "helvetica-bold" => StandardFont::HelveticaBold,
            "times" | "times-roman" | "serif" => StandardFont::TimesRoman,
            "times-bold" => StandardFont::TimesBold,
            "courier" | "mono" => StandardFont::Courier,
            "courier-bold" => StandardFont::CourierBold,
            _ => return Err(FormatError::UnknownFont(s.to_string())),
        };
        Ok(font)
    }
}

impl TextMeasure for StandardFont {
    fn char_width(&self, _ch: char, size: Pt) -> Pt {
        size * self.average_advance()
    }
}

/// A parsed TrueType / OpenType font. The font is embedded in its entirety in the
/// generated PDF, so large fonts dramatically increase the size of the output.
pub struct Font {
    pub face: OwnedFace,
}

impl fmt::Debug for Font {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Font")
            .field("name", &self.name())
            .field("glyphs", &self.face.as_face_ref().number_of_glyphs())
            .finish()
    }
}

impl Font {
    /// Load a font from raw bytes, parsing the font and returning an error if the font
    /// could not be parsed
    pub fn load(bytes: Vec<u8>) -> Result<Font, ReflowError> {
        let face = OwnedFace::from_vec(bytes, 0)?;
        Ok(Font { face })
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Font, ReflowError> {
        Font::load(std::fs::read(path)?)
    }

    fn name_entry(&self, id: u16) -> Option<String> {
        self.face
            .as_face_ref()
            .names()
            .into_iter()
            .find(|name| name.name_id == id && name.is_unicode())
            .and_then(|name| name.to_string())
    }

    /// The full name of the font, if the font carries one
    pub fn name(&self) -> Option<String> {
        self.name_entry(owned_ttf_parser::name_id::FULL_NAME)
    }

    pub fn family(&self) -> Option<String> {
        self.name_entry(owned_ttf_parser::name_id::FAMILY)
    }

    /// A name usable as a PDF base font: the PostScript name if present, with spaces removed
    fn base_font(&self) -> String {
        self.name_entry(owned_ttf_parser::name_id::POST_SCRIPT_NAME)
            .or_else(|| self.name())
            .unwrap_or_else(|| "EmbeddedFont".to_string())
            .replace(' ', "")
    }

    pub fn glyph_id(&self, ch: char) -> Option<u16> {
        self.face.as_face_ref().glyph_index(ch).map(|i| i.0)
    }

    pub fn replacement_glyph_id(&self) -> Option<u16> {
        self.glyph_id('\u{FFFD}').or_else(|| self.glyph_id('?'))
    }

    /// 1000 / units-per-em, the factor between font units and PDF glyph space
    fn glyph_space_scaling(&self) -> f32 {
        1000.0 / self.face.as_face_ref().units_per_em() as f32
    }

    /// Every glyph reachable from a unicode cmap subtable, with the first character that
    /// maps to it
    fn glyph_chars(&self) -> BTreeMap<u16, char> {
        let mut map: BTreeMap<u16, char> = BTreeMap::new();
        let Some(cmap) = self.face.as_face_ref().tables().cmap else {
            return map;
        };

        for subtable in cmap.subtables.into_iter().filter(|table| table.is_unicode()) {
            subtable.codepoints(|codepoint: u32| {
                if let Ok(ch) = char::try_from(codepoint) {
                    if let Some(index) = subtable.glyph_index(codepoint).filter(|index| index.0 > 0)
                    {
                        map.entry(index.0).or_insert(ch);
                    }
                }
            });
        }

        map
    }

    fn write_cid(&self, refs: &mut ObjectReferences, writer: &mut Pdf) -> Ref {
        let descriptor_id = self.write_descriptor(refs, writer);
        let id = refs.gen(RefType::CidFont);
        let base_font = self.base_font();
        let scaling = self.glyph_space_scaling();

        let mut id_widths: Vec<(u16, f32)> = self
            .glyph_chars()
            .keys()
            .filter_map(|&gid| {
                self.face
                    .as_face_ref()
                    .glyph_hor_advance(GlyphId(gid))
                    .map(|advance| (gid, advance as f32 * scaling))
            })
            .collect();
        id_widths.sort_by_key(|(gid, _)| *gid);

        let mut cid_font = writer.cid_font(id);
        cid_font.subtype(CidFontType::Type2);
        cid_font.base_font(Name(base_font.as_bytes()));
        cid_font.system_info(SystemInfo {
            registry: Str(b"Adobe"),
            ordering: Str(b"Identity"),
            supplement: 0,
        });
        cid_font.font_descriptor(descriptor_id);
        cid_font.default_width(1000.0);
        cid_font.cid_to_gid_map_predefined(Name(b"Identity"));

        // group runs of consecutive glyph ids into a single `W` entry each
        let mut widths = cid_font.widths();
        let mut run: Vec<f32> = Vec::new();
        let mut run_start: u16 = 0;
        for (gid, width) in id_widths {
            if !run.is_empty() && gid as usize != run_start as usize + run.len() {
                widths.consecutive(run_start, run.drain(..));
            }
            if run.is_empty() {
                run_start = gid;
            }
            run.push(width);
        }
        if !run.is_empty() {
            widths.consecutive(run_start, run.drain(..));
        }
        widths.finish();
        cid_font.finish();

        id
    }

    fn write_descriptor(&self, refs: &mut ObjectReferences, writer: &mut Pdf) -> Ref {
        let face = self.face.as_face_ref();
        let data_id = refs.gen(RefType::FontData);
        writer
            .stream(data_id, self.face.as_slice())
            .pair(Name(b"Length1"), self.face.as_slice().len() as i32);

        let id = refs.gen(RefType::FontDescriptor);
        let scaling = self.glyph_space_scaling();
        let base_font = self.base_font();
        let bbox = face.global_bounding_box();

        let mut flags = FontFlags::NON_SYMBOLIC;
        if face.is_monospaced() {
            flags.insert(FontFlags::FIXED_PITCH);
        }
        if face.is_italic() {
            flags.insert(FontFlags::ITALIC);
        }

        let mut descriptor = writer.font_descriptor(id);
        descriptor.name(Name(base_font.as_bytes()));
        if let Some(family) = self.family() {
            descriptor.family(Str(family.as_bytes()));
        }
        descriptor.flags(flags);
        descriptor.bbox(pdf_writer::Rect {
            x1: bbox.x_min as f32 * scaling,
            y1: bbox.y_min as f32 * scaling,
            x2: bbox.x_max as f32 * scaling,
            y2: bbox.y_max as f32 * scaling,
        });
        // readers take the real slant from the embedded program
        descriptor.italic_angle(0.0);
        descriptor.ascent(face.ascender() as f32 * scaling);
        descriptor.descent(face.descender() as f32 * scaling);
        descriptor.cap_height(
            face.capital_height()
                .map(|h| h as f32 * scaling)
                .unwrap_or(face.ascender() as f32 * scaling),
        );
        descriptor.stem_v(80.0);
        descriptor.font_file2(data_id);
        descriptor.finish();

        id
    }

    fn write_to_unicode(&self, refs: &mut ObjectReferences, writer: &mut Pdf) -> Ref {
        let id = refs.gen(RefType::ToUnicode);

        let mut cmap = String::from(
            "/CIDInit /ProcSet findresource begin\n\
             12 dict begin\n\
             begincmap\n\
             /CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n\
             /CMapName /Adobe-Identity-UCS def\n\
             /CMapType 2 def\n\
             1 begincodespacerange\n\
             <0000> <FFFF>\n\
             endcodespacerange\n",
        );

        // bfchar blocks hold at most 100 entries
        let glyphs: Vec<(u16, char)> = self.glyph_chars().into_iter().collect();
        for block in glyphs.chunks(100) {
            cmap.push_str(&format!("{} beginbfchar\n", block.len()));
            for &(gid, ch) in block {
                let mut utf16 = [0u16; 2];
                let hex: String = ch
                    .encode_utf16(&mut utf16)
                    .iter()
                    .map(|unit| format!("{unit:04x}"))
                    .collect();
                cmap.push_str(&format!("<{gid:04x}> <{hex}>\n"));
            }
            cmap.push_str("endbfchar\n");
        }
        cmap.push_str("endcmap CMapName currentdict /CMap defineresource pop end end\n");

        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(cmap.as_bytes(), 6);
        writer
            .stream(id, compressed.as_slice())
            .filter(Filter::FlateDecode);

        id
    }

    fn write(&self, refs: &mut ObjectReferences, writer: &mut Pdf) -> Ref {
        let font_id = refs.gen(RefType::Font);
        let cid_font_id = self.write_cid(refs, writer);
        let to_unicode_id = self.write_to_unicode(refs, writer);
        let base_font = self.base_font();

        let mut font = writer.type0_font(font_id);
        font.base_font(Name(base_font.as_bytes()));
        font.encoding_predefined(Name(b"Identity-H"));
        font.descendant_font(cid_font_id);
        font.to_unicode(to_unicode_id);
        font.finish();

        font_id
    }
}

impl TextMeasure for Font {
    fn char_width(&self, ch: char, size: Pt) -> Pt {
        let face = self.face.as_face_ref();
        let advance = self
            .glyph_id(ch)
            .or_else(|| self.replacement_glyph_id())
            .and_then(|gid| face.glyph_hor_advance(GlyphId(gid)))
            .unwrap_or_default();
        size * (advance as f32 / face.units_per_em() as f32)
    }
}

/// The face all text in a document is set in
#[derive(Debug)]
pub enum Typeface {
    Standard(StandardFont),
    Embedded(Font),
}

impl Default for Typeface {
    fn default() -> Self {
        Typeface::Standard(StandardFont::default())
    }
}

impl Typeface {
    pub fn name(&self) -> String {
        match self {
            Typeface::Standard(font) => font.base_font().to_string(),
            Typeface::Embedded(font) => font.base_font(),
        }
    }

    /// Encode text as the bytes of a `Tj` string operand for this face.
    ///
    /// Returns the encoded bytes and the number of characters the face could not show,
    /// which were substituted with a replacement glyph.
    pub(crate) fn encode(&self, text: &str) -> (Vec<u8>, usize) {
        let mut missing = 0usize;
        let mut bytes: Vec<u8> = Vec::with_capacity(text.len() * 2);
        match self {
            Typeface::Standard(_) => {
                for ch in text.chars() {
                    bytes.push(winansi_byte(ch).unwrap_or_else(|| {
                        missing += 1;
                        b'?'
                    }));
                }
            }
            Typeface::Embedded(font) => {
                for ch in text.chars() {
                    let gid = font.glyph_id(ch).unwrap_or_else(|| {
                        missing += 1;
                        font.replacement_glyph_id().unwrap_or(0)
                    });
                    bytes.extend_from_slice(&gid.to_be_bytes());
                }
            }
        }
        (bytes, missing)
    }

    /// Write the font objects, returning the reference pages use in their resources
    pub(crate) fn write(&self, refs: &mut ObjectReferences, writer: &mut Pdf) -> Ref {
        match self {
            Typeface::Standard(font) => {
                let id = refs.gen(RefType::Font);
                let mut type1 = writer.type1_font(id);
                type1.base_font(Name(font.base_font().as_bytes()));
                type1.encoding_predefined(Name(b"WinAnsiEncoding"));
                type1.finish();
                id
            }
            Typeface::Embedded(font) => font.write(refs, writer),
        }
    }
}

impl TextMeasure for Typeface {
    fn char_width(&self, ch: char, size: Pt) -> Pt {
        match self {
            Typeface::Standard(font) => font.char_width(ch, size),
            Typeface::Embedded(font) => font.char_width(ch, size),
        }
    }
}

/// Map a character to its code in WinAnsiEncoding, if it has one
fn winansi_byte(ch: char) -> Option<u8> {
    let code = ch as u32;
    match code {
        0x20..=0x7E | 0xA0..=0xFF => Some(code as u8),
        _ => {
            let byte = match ch {
                '€' => 0x80,
                '‚' => 0x82,
                'ƒ' => 0x83,
                '„' => 0x84,
                '…' => 0x85,
                '†' => 0x86,
                '‡' => 0x87,
                'ˆ' => 0x88,
                '‰' => 0x89,
                'Š' => 0x8A,
                '‹' => 0x8B,
                'Œ' => 0x8C,
                'Ž' => 0x8E,
                '‘' => 0x91,
                '’' => 0x92,
                '“' => 0x93,
                '”' => 0x94,
                '•' => 0x95,
                '–' => 0x96,
                '—' => 0x97,
                '˜' => 0x98,
                '™' => 0x99,
                'š' => 0x9A,
                '›' => 0x9B,
                'œ' => 0x9C,
                'ž' => 0x9E,
                'Ÿ' => 0x9F,
                _ => return None,
            };
            Some(byte)
        }
    }
}
