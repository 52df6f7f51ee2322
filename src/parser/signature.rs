//! Signature list (`Signatures.xml`), signature files and seal pictures.
//!
//! Seal data is stored in SES structures. They are not decoded: the
//! picture is found by scanning the raw bytes for an embedded PNG, JPEG
//! or OFD container.

use quick_xml::events::{BytesStart, Event};

use crate::detect::detect_format_from_bytes;
use crate::error::Result;
use crate::model::StampAnnot;

use super::xml::{attr, local_name, parse_box, read_text, reader, skip};

/// One `Signature` entry of the signature list.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SignatureEntry {
    pub id: String,
    pub base_loc: String,
}

/// Parse `Signatures.xml`.
pub(crate) fn parse_signature_list(xml: &str) -> Result<Vec<SignatureEntry>> {
    let mut reader = reader(xml);
    let mut entries = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(ref e) if local_name(e.name().as_ref()) == b"Signature" => {
                push_entry(&mut entries, e);
                skip(&mut reader, e)?;
            }
            Event::Empty(ref e) if local_name(e.name().as_ref()) == b"Signature" => {
                push_entry(&mut entries, e);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(entries)
}

fn push_entry(entries: &mut Vec<SignatureEntry>, e: &BytesStart) {
    match (attr(e, "ID"), attr(e, "BaseLoc")) {
        (Some(id), Some(base_loc)) => entries.push(SignatureEntry { id, base_loc }),
        _ => log::warn!("Signature without ID or BaseLoc"),
    }
}

/// Declarations from a signature file.
#[derive(Debug, Default)]
pub(crate) struct SignatureDecl {
    pub stamps: Vec<StampAnnot>,
    /// `SignedInfo/Seal/BaseLoc`
    pub seal_loc: Option<String>,
    /// `SignedValue`
    pub signed_value: Option<String>,
}

/// Parse a `Signature.xml` file.
pub(crate) fn parse_signature(xml: &str) -> Result<SignatureDecl> {
    let mut reader = reader(xml);
    let mut decl = SignatureDecl::default();
    let mut in_seal = false;

    loop {
        match reader.read_event()? {
            Event::Start(ref e) => match local_name(e.name().as_ref()) {
                b"StampAnnot" => {
                    push_stamp(&mut decl, e)?;
                    skip(&mut reader, e)?;
                }
                b"Seal" => in_seal = true,
                b"BaseLoc" if in_seal => {
                    let loc = read_text(&mut reader)?.trim().to_string();
                    decl.seal_loc = (!loc.is_empty()).then_some(loc);
                }
                b"SignedValue" => {
                    let loc = read_text(&mut reader)?.trim().to_string();
                    decl.signed_value = (!loc.is_empty()).then_some(loc);
                }
                _ => {}
            },
            Event::Empty(ref e) if local_name(e.name().as_ref()) == b"StampAnnot" => {
                push_stamp(&mut decl, e)?;
            }
            Event::End(ref e) if local_name(e.name().as_ref()) == b"Seal" => in_seal = false,
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(decl)
}

fn push_stamp(decl: &mut SignatureDecl, e: &BytesStart) -> Result<()> {
    let (Some(page_id), Some(boundary)) = (attr(e, "PageRef"), attr(e, "Boundary")) else {
        log::warn!("StampAnnot without PageRef or Boundary");
        return Ok(());
    };
    let clip = match attr(e, "Clip") {
        Some(clip) => Some(parse_box(&clip)?),
        None => None,
    };
    decl.stamps.push(StampAnnot {
        id: attr(e, "ID"),
        page_id: page_id.trim().to_string(),
        boundary: parse_box(&boundary)?,
        clip,
    });
    Ok(())
}

/// A seal picture found inside seal data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SealPicture<'a> {
    /// Raster image bytes and their format name
    Image(&'a [u8], &'static str),
    /// A complete OFD container
    Ofd(&'a [u8]),
}

const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";
const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF];
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const ZIP_END: &[u8] = b"PK\x05\x06";

/// Find the earliest well-formed picture embedded in `data`.
pub(crate) fn locate_seal_picture(data: &[u8]) -> Option<SealPicture<'_>> {
    let png = first_match(data, PNG_MAGIC, png_end)
        .map(|(s, e)| (s, SealPicture::Image(&data[s..e], "PNG")));
    let jpeg = first_match(data, JPEG_MAGIC, jpeg_end)
        .map(|(s, e)| (s, SealPicture::Image(&data[s..e], "JPEG")));
    let ofd = first_match(data, ZIP_MAGIC, |d, start| {
        let end = zip_end(d, start)?;
        detect_format_from_bytes(&d[start..end]).ok().map(|_| end)
    })
    .map(|(s, e)| (s, SealPicture::Ofd(&data[s..e])));

    [png, jpeg, ofd]
        .into_iter()
        .flatten()
        .min_by_key(|(start, _)| *start)
        .map(|(_, picture)| picture)
}

/// First occurrence of `magic` for which `end_of` finds a complete
/// structure, as a `(start, end)` byte range.
fn first_match(
    data: &[u8],
    magic: &[u8],
    end_of: impl Fn(&[u8], usize) -> Option<usize>,
) -> Option<(usize, usize)> {
    let mut from = 0;
    while let Some(start) = find(data, magic, from) {
        if let Some(end) = end_of(data, start) {
            return Some((start, end));
        }
        from = start + 1;
    }
    None
}

fn find(data: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    data.get(from..)?
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|i| i + from)
}

fn be_u32(data: &[u8], at: usize) -> Option<usize> {
    let bytes = data.get(at..at + 4)?;
    Some(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as usize)
}

fn be_u16(data: &[u8], at: usize) -> Option<usize> {
    let bytes = data.get(at..at + 2)?;
    Some(u16::from_be_bytes([bytes[0], bytes[1]]) as usize)
}

/// End of a PNG stream: walk the chunks up to `IEND`.
fn png_end(data: &[u8], start: usize) -> Option<usize> {
    let mut pos = start + PNG_MAGIC.len();
    let mut first = true;
    loop {
        let length = be_u32(data, pos)?;
        let kind = data.get(pos + 4..pos + 8)?;
        if first && kind != b"IHDR" {
            return None;
        }
        first = false;
        let end = pos.checked_add(12)?.checked_add(length)?;
        if end > data.len() {
            return None;
        }
        if kind == b"IEND" {
            return Some(end);
        }
        pos = end;
    }
}

/// End of a JPEG stream: walk the marker segments, then the entropy
/// coded data of each scan, up to `EOI`.
fn jpeg_end(data: &[u8], start: usize) -> Option<usize> {
    let mut pos = start + 2;
    loop {
        if *data.get(pos)? != 0xFF {
            return None;
        }
        while *data.get(pos + 1)? == 0xFF {
            pos += 1;
        }
        let marker = *data.get(pos + 1)?;
        match marker {
            0xD9 => return Some(pos + 2),
            0x01 | 0xD0..=0xD7 => pos += 2,
            0x00 | 0xD8 => return None,
            _ => {
                let length = be_u16(data, pos + 2)?;
                if length < 2 {
                    return None;
                }
                pos = pos + 2 + length;
                if marker == 0xDA {
                    pos = scan_entropy_data(data, pos)?;
                }
            }
        }
    }
}

/// Position of the first marker after entropy coded data.
fn scan_entropy_data(data: &[u8], mut pos: usize) -> Option<usize> {
    loop {
        let offset = data.get(pos..)?.iter().position(|&b| b == 0xFF)?;
        pos += offset;
        match *data.get(pos + 1)? {
            0x00 | 0xD0..=0xD7 | 0xFF => pos += 1,
            _ => return Some(pos),
        }
    }
}

/// End of a zip archive: the end of central directory record and its comment.
fn zip_end(data: &[u8], start: usize) -> Option<usize> {
    let eocd = find(data, ZIP_END, start)?;
    let comment = data.get(eocd + 20..eocd + 22)?;
    let end = eocd + 22 + u16::from_le_bytes([comment[0], comment[1]]) as usize;
    (end <= data.len()).then_some(end)
}
