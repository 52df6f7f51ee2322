//! Font selection and text encoding.
//!
//! OFD font programs are not embedded. Latin text on a recognised Latin
//! family maps to a standard-14 font; everything else uses the Adobe-GB1
//! `STSong-Light` CID font, which conforming viewers supply.

use lopdf::{dictionary, Document as PdfDocument, Object, ObjectId, StringFormat};

use crate::model::Font;

/// Base font of the CJK fallback.
pub(crate) const CJK_BASE_FONT: &str = "STSong-Light";

/// Skew applied to synthesised italics (tan 12°).
pub(crate) const ITALIC_SHEAR: f64 = 0.2126;

/// The PDF font a text object is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum FontFace {
    /// A standard-14 font, WinAnsi encoded
    Standard(&'static str),
    /// The CID fallback, UTF-16BE encoded
    Cjk,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Family {
    Helvetica,
    Times,
    Courier,
}

impl FontFace {
    /// Pick a face for `text` drawn with the OFD font `font`.
    pub(crate) fn select(font: Option<&Font>, text: &str, bold: bool, italic: bool) -> FontFace {
        let family = font.and_then(latin_family);
        let latin = text.chars().all(is_win_ansi);

        match family {
            Some(family) if latin => FontFace::Standard(standard_name(family, bold, italic)),
            None if latin && !font.map(is_cjk_font).unwrap_or(false) => {
                FontFace::Standard(standard_name(Family::Helvetica, bold, italic))
            }
            _ => FontFace::Cjk,
        }
    }

    /// Whether bold and italic must be simulated for this face.
    pub(crate) fn synthesizes_style(&self) -> bool {
        matches!(self, FontFace::Cjk)
    }

    /// Encode one character as a PDF string operand.
    pub(crate) fn encode(&self, ch: char) -> Object {
        match self {
            FontFace::Standard(_) => {
                let byte = if is_win_ansi(ch) { ch as u32 as u8 } else { b'?' };
                Object::String(vec![byte], StringFormat::Literal)
            }
            FontFace::Cjk => {
                let mut units = [0u16; 2];
                let bytes = ch
                    .encode_utf16(&mut units)
                    .iter()
                    .flat_map(|u| u.to_be_bytes())
                    .collect();
                Object::String(bytes, StringFormat::Hexadecimal)
            }
        }
    }

    /// Add the font dictionary to the PDF.
    pub(crate) fn write(&self, pdf: &mut PdfDocument) -> ObjectId {
        match self {
            FontFace::Standard(name) => pdf.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => Object::Name(name.as_bytes().to_vec()),
                "Encoding" => "WinAnsiEncoding",
            }),
            FontFace::Cjk => {
                let descriptor = pdf.add_object(dictionary! {
                    "Type" => "FontDescriptor",
                    "FontName" => CJK_BASE_FONT,
                    "Flags" => 6,
                    "FontBBox" => vec![(-25).into(), (-254).into(), 1000.into(), 880.into()],
                    "ItalicAngle" => 0,
                    "Ascent" => 880,
                    "Descent" => -120,
                    "CapHeight" => 880,
                    "StemV" => 93,
                });
                let descendant = pdf.add_object(dictionary! {
                    "Type" => "Font",
                    "Subtype" => "CIDFontType0",
                    "BaseFont" => CJK_BASE_FONT,
                    "CIDSystemInfo" => dictionary! {
                        "Registry" => Object::string_literal("Adobe"),
                        "Ordering" => Object::string_literal("GB1"),
                        "Supplement" => 4,
                    },
                    "FontDescriptor" => descriptor,
                    "DW" => 1000,
                    "W" => vec![1.into(), 95.into(), 500.into()],
                });
                pdf.add_object(dictionary! {
                    "Type" => "Font",
                    "Subtype" => "Type0",
                    "BaseFont" => CJK_BASE_FONT,
                    "Encoding" => "UniGB-UTF16-H",
                    "DescendantFonts" => vec![descendant.into()],
                })
            }
        }
    }
}

/// Characters shared by WinAnsiEncoding and Latin-1.
fn is_win_ansi(ch: char) -> bool {
    matches!(ch as u32, 0x20..=0x7E | 0xA0..=0xFF)
}

fn latin_family(font: &Font) -> Option<Family> {
    let name = font
        .family
        .as_deref()
        .unwrap_or(font.name.as_str())
        .to_ascii_lowercase();

    if name.contains("courier") || name.contains("mono") || (font.fixed_width && !is_cjk_font(font))
    {
        Some(Family::Courier)
    } else if name.contains("times") || name.contains("roman") || name.contains("georgia") {
        Some(Family::Times)
    } else if ["arial", "helvetica", "calibri", "verdana", "tahoma", "segoe"]
        .iter()
        .any(|f| name.contains(f))
    {
        Some(Family::Helvetica)
    } else {
        None
    }
}

/// Fonts whose Latin glyphs would look out of place in Helvetica.
fn is_cjk_font(font: &Font) -> bool {
    const CJK: &[&str] = &[
        "song", "sun", "kai", "hei", "fang", "yahei", "ming", "宋", "楷", "黑", "仿", "明",
    ];
    let name = format!(
        "{} {}",
        font.name.to_lowercase(),
        font.family.as_deref().unwrap_or("").to_lowercase()
    );
    CJK.iter().any(|k| name.contains(k)) || !name.is_ascii()
}

fn standard_name(family: Family, bold: bool, italic: bool) -> &'static str {
    match (family, bold, italic) {
        (Family::Helvetica, false, false) => "Helvetica",
        (Family::Helvetica, true, false) => "Helvetica-Bold",
        (Family::Helvetica, false, true) => "Helvetica-Oblique",
        (Family::Helvetica, true, true) => "Helvetica-BoldOblique",
        (Family::Times, false, false) => "Times-Roman",
        (Family::Times, true, false) => "Times-Bold",
        (Family::Times, false, true) => "Times-Italic",
        (Family::Times, true, true) => "Times-BoldItalic",
        (Family::Courier, false, false) => "Courier",
        (Family::Courier, true, false) => "Courier-Bold",
        (Family::Courier, false, true) => "Courier-Oblique",
        (Family::Courier, true, true) => "Courier-BoldOblique",
    }
}
