//! Small helpers over quick-xml events.

use crate::error::{Error, Result};
use crate::model::{Matrix, Rect};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Strip a namespace prefix (`ofd:Page` -> `Page`).
pub fn local_name(name: &[u8]) -> &[u8] {
    match name.iter().position(|&b| b == b':') {
        Some(idx) => &name[idx + 1..],
        None => name,
    }
}

/// Get an attribute value by local name.
pub fn attr(e: &BytesStart, name: &str) -> Option<String> {
    for attr in e.attributes().flatten() {
        if local_name(attr.key.as_ref()) == name.as_bytes() {
            return match attr.unescape_value() {
                Ok(v) => Some(v.into_owned()),
                Err(_) => Some(String::from_utf8_lossy(&attr.value).into_owned()),
            };
        }
    }
    None
}

/// Get a numeric attribute.
pub fn attr_f64(e: &BytesStart, name: &str) -> Option<f64> {
    attr(e, name).and_then(|v| v.trim().parse().ok())
}

/// Get a boolean attribute (`true`/`false`, `1`/`0`).
pub fn attr_bool(e: &BytesStart, name: &str) -> Option<bool> {
    attr(e, name).and_then(|v| parse_bool(&v))
}

pub fn parse_bool(s: &str) -> Option<bool> {
    match s.trim() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

/// Parse a whitespace separated number list (`ST_Array`).
///
/// Entries prefixed with `#` are hexadecimal, as used by some color values.
pub fn parse_numbers(s: &str) -> Result<Vec<f64>> {
    s.split_whitespace()
        .map(|token| {
            let parsed = match token.strip_prefix('#') {
                Some(hex) => u32::from_str_radix(hex, 16).ok().map(f64::from),
                None => token.parse::<f64>().ok(),
            };
            parsed.ok_or_else(|| Error::Xml(format!("invalid number '{}'", token)))
        })
        .collect()
}

/// Parse an `ST_Box` (`x y w h`).
pub fn parse_box(s: &str) -> Result<Rect> {
    match parse_numbers(s)?.as_slice() {
        [x, y, w, h] => Ok(Rect::new(*x, *y, *w, *h)),
        _ => Err(Error::Xml(format!("invalid box '{}'", s))),
    }
}

/// Parse a CTM (`a b c d e f`).
pub fn parse_matrix(s: &str) -> Result<Matrix> {
    let values = parse_numbers(s)?;
    Matrix::from_slice(&values).ok_or_else(|| Error::Xml(format!("invalid matrix '{}'", s)))
}

/// Create a reader over an XML part.
///
/// Text is not trimmed: a `TextCode` may consist of a single space.
pub fn reader(xml: &str) -> Reader<&[u8]> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);
    reader
}

/// Collect the text content of the current element up to its end tag,
/// including the text of nested elements.
pub fn read_text(reader: &mut Reader<&[u8]>) -> Result<String> {
    let mut text = String::new();
    let mut depth = 0usize;

    loop {
        match reader.read_event()? {
            Event::Text(t) => text.push_str(&t.unescape()?),
            Event::CData(t) => text.push_str(&String::from_utf8_lossy(&t)),
            Event::Start(_) => depth += 1,
            Event::End(_) => {
                if depth == 0 {
                    return Ok(text);
                }
                depth -= 1;
            }
            Event::Eof => return Err(Error::Xml("unexpected end of document".into())),
            _ => {}
        }
    }
}

/// Skip the current element, including its children.
pub fn skip(reader: &mut Reader<&[u8]>, e: &BytesStart) -> Result<()> {
    reader.read_to_end(e.name())?;
    Ok(())
}
