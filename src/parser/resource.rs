//! Resource file (`Res`) parsing.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{Error, Result};
use crate::model::{
    ColorSpace, ColorSpaceKind, CompositeUnit, DrawParam, Font, LineCap, LineJoin, MediaType,
    MultiMedia, Resources,
};
use crate::package::{parent_dir, resolve_loc};

use super::content::{parse_color, parse_objects};
use super::xml::{
    attr, attr_bool, attr_f64, local_name, parse_numbers, read_text, reader, skip,
};

/// Parse a resource file located at `res_path` inside the container.
///
/// File references (`FontFile`, `MediaFile`) are resolved against the
/// file's `BaseLoc`. Media data is loaded separately.
pub(crate) fn parse_res(xml: &str, res_path: &str) -> Result<Resources> {
    let mut reader = reader(xml);
    let mut resources = Resources::new();
    let mut base_dir = parent_dir(res_path).to_string();

    loop {
        match reader.read_event()? {
            Event::Start(ref e) => match local_name(e.name().as_ref()) {
                b"Res" => base_dir = res_base_dir(e, res_path)?,
                b"Fonts" | b"ColorSpaces" | b"DrawParams" | b"MultiMedias"
                | b"CompositeGraphicUnits" => {}
                b"Font" => {
                    let font = parse_font(&mut reader, e, &base_dir)?;
                    resources.fonts.insert(font.id.clone(), font);
                }
                b"ColorSpace" => {
                    if let Some(cs) = parse_color_space(&mut reader, e, false)? {
                        resources.color_spaces.insert(cs.id.clone(), cs);
                    }
                }
                b"DrawParam" => {
                    let param = parse_draw_param(&mut reader, e, false)?;
                    resources.draw_params.insert(param.id.clone(), param);
                }
                b"MultiMedia" => {
                    let media = parse_multimedia(&mut reader, e, &base_dir)?;
                    resources.media.insert(media.id.clone(), media);
                }
                b"CompositeGraphicUnit" => {
                    let unit = parse_composite_unit(&mut reader, e)?;
                    resources.composites.insert(unit.id.clone(), unit);
                }
                _ => skip(&mut reader, e)?,
            },
            Event::Empty(ref e) => match local_name(e.name().as_ref()) {
                b"Font" => {
                    let font = font_from_attrs(e);
                    resources.fonts.insert(font.id.clone(), font);
                }
                b"ColorSpace" => {
                    if let Some(cs) = parse_color_space(&mut reader, e, true)? {
                        resources.color_spaces.insert(cs.id.clone(), cs);
                    }
                }
                b"DrawParam" => {
                    let param = parse_draw_param(&mut reader, e, true)?;
                    resources.draw_params.insert(param.id.clone(), param);
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    log::debug!("{}: {} resources", res_path, resources.len());
    Ok(resources)
}

fn res_base_dir(e: &BytesStart, res_path: &str) -> Result<String> {
    let res_dir = parent_dir(res_path);
    match attr(e, "BaseLoc") {
        Some(loc) if !loc.trim().is_empty() => resolve_loc(res_dir, &loc),
        _ => Ok(res_dir.to_string()),
    }
}

fn font_from_attrs(e: &BytesStart) -> Font {
    Font {
        id: attr(e, "ID").unwrap_or_default(),
        name: attr(e, "FontName").unwrap_or_default(),
        family: attr(e, "FamilyName"),
        charset: attr(e, "Charset"),
        bold: attr_bool(e, "Bold").unwrap_or(false),
        italic: attr_bool(e, "Italic").unwrap_or(false),
        serif: attr_bool(e, "Serif").unwrap_or(false),
        fixed_width: attr_bool(e, "FixedWidth").unwrap_or(false),
        font_file: None,
    }
}

fn parse_font(reader: &mut Reader<&[u8]>, e: &BytesStart, base_dir: &str) -> Result<Font> {
    let mut font = font_from_attrs(e);
    loop {
        match reader.read_event()? {
            Event::Start(ref child) => {
                if local_name(child.name().as_ref()) == b"FontFile" {
                    let loc = read_text(reader)?;
                    font.font_file = Some(resolve_loc(base_dir, &loc)?);
                } else {
                    skip(reader, child)?;
                }
            }
            Event::End(_) => return Ok(font),
            Event::Eof => return Err(Error::Xml("unterminated Font".into())),
            _ => {}
        }
    }
}

fn parse_color_space(
    reader: &mut Reader<&[u8]>,
    e: &BytesStart,
    empty: bool,
) -> Result<Option<ColorSpace>> {
    let id = attr(e, "ID").unwrap_or_default();
    let kind = attr(e, "Type").and_then(|t| ColorSpaceKind::parse(&t));
    let mut space = ColorSpace::new(id, kind.unwrap_or_default());
    if let Some(bits) = attr_f64(e, "BitsPerComponent") {
        space.bits_per_component = bits as u8;
    }

    if !empty {
        loop {
            match reader.read_event()? {
                Event::Start(ref child) => match local_name(child.name().as_ref()) {
                    b"Palette" => {}
                    b"CV" => space.palette.push(parse_numbers(&read_text(reader)?)?),
                    _ => skip(reader, child)?,
                },
                Event::End(ref end) => {
                    if local_name(end.name().as_ref()) == b"ColorSpace" {
                        break;
                    }
                }
                Event::Eof => return Err(Error::Xml("unterminated ColorSpace".into())),
                _ => {}
            }
        }
    }

    if kind.is_none() {
        log::warn!("color space {} has an unsupported type, skipping", space.id);
        return Ok(None);
    }
    Ok(Some(space))
}

fn parse_draw_param(reader: &mut Reader<&[u8]>, e: &BytesStart, empty: bool) -> Result<DrawParam> {
    let mut param = DrawParam {
        id: attr(e, "ID").unwrap_or_default(),
        relative: attr(e, "Relative"),
        line_width: attr_f64(e, "LineWidth"),
        join: attr(e, "Join").and_then(|j| LineJoin::parse(&j)),
        cap: attr(e, "Cap").and_then(|c| LineCap::parse(&c)),
        dash_offset: attr_f64(e, "DashOffset"),
        dash_pattern: attr(e, "DashPattern")
            .map(|d| parse_numbers(&d))
            .transpose()?,
        miter_limit: attr_f64(e, "MiterLimit"),
        fill_color: None,
        stroke_color: None,
    };
    if empty {
        return Ok(param);
    }

    loop {
        match reader.read_event()? {
            Event::Start(ref child) => match local_name(child.name().as_ref()) {
                b"FillColor" => param.fill_color = Some(parse_color(reader, child, false)?),
                b"StrokeColor" => param.stroke_color = Some(parse_color(reader, child, false)?),
                _ => skip(reader, child)?,
            },
            Event::Empty(ref child) => match local_name(child.name().as_ref()) {
                b"FillColor" => param.fill_color = Some(parse_color(reader, child, true)?),
                b"StrokeColor" => param.stroke_color = Some(parse_color(reader, child, true)?),
                _ => {}
            },
            Event::End(_) => return Ok(param),
            Event::Eof => return Err(Error::Xml("unterminated DrawParam".into())),
            _ => {}
        }
    }
}

fn parse_multimedia(
    reader: &mut Reader<&[u8]>,
    e: &BytesStart,
    base_dir: &str,
) -> Result<MultiMedia> {
    let mut media = MultiMedia {
        id: attr(e, "ID").unwrap_or_default(),
        media_type: attr(e, "Type")
            .map(|t| MediaType::parse(&t))
            .unwrap_or_default(),
        format: attr(e, "Format").filter(|f| !f.is_empty()),
        path: String::new(),
        data: Vec::new(),
    };

    loop {
        match reader.read_event()? {
            Event::Start(ref child) => {
                if local_name(child.name().as_ref()) == b"MediaFile" {
                    let loc = read_text(reader)?;
                    media.path = resolve_loc(base_dir, &loc)?;
                } else {
                    skip(reader, child)?;
                }
            }
            Event::End(_) => return Ok(media),
            Event::Eof => return Err(Error::Xml("unterminated MultiMedia".into())),
            _ => {}
        }
    }
}

fn parse_composite_unit(reader: &mut Reader<&[u8]>, e: &BytesStart) -> Result<CompositeUnit> {
    let mut unit = CompositeUnit {
        id: attr(e, "ID").unwrap_or_default(),
        width: attr_f64(e, "Width").unwrap_or(0.0),
        height: attr_f64(e, "Height").unwrap_or(0.0),
        objects: Vec::new(),
    };

    loop {
        match reader.read_event()? {
            Event::Start(ref child) => {
                if local_name(child.name().as_ref()) == b"Content" {
                    unit.objects = parse_objects(reader)?;
                } else {
                    skip(reader, child)?;
                }
            }
            Event::End(_) => return Ok(unit),
            Event::Eof => return Err(Error::Xml("unterminated CompositeGraphicUnit".into())),
            _ => {}
        }
    }
}
