//! Page content, graphic objects and annotation appearance parsing.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{Error, Result};
use crate::model::path::parse_abbreviated_data;
use crate::model::text::expand_deltas;
use crate::model::{
    Annotation, Color, CompositeObject, FillRule, GraphicObject, GraphicUnit, ImageObject, Layer,
    LayerType, LineCap, LineJoin, PathObject, Rect, TextCode, TextObject, ZOrder,
};

use super::xml::{
    attr, attr_bool, attr_f64, local_name, parse_box, parse_matrix, parse_numbers, read_text,
    reader, skip,
};

/// Everything a page (or template page) content file declares.
#[derive(Debug, Default)]
pub(crate) struct PageContent {
    pub area: Option<Rect>,
    /// Template ID with the z-order given on the reference, if any
    pub templates: Vec<(String, Option<ZOrder>)>,
    /// PageRes locations, relative to the content file
    pub page_res: Vec<String>,
    pub layers: Vec<Layer>,
}

/// Parse a page `Content.xml`.
pub(crate) fn parse_page_content(xml: &str) -> Result<PageContent> {
    let mut reader = reader(xml);
    let mut content = PageContent::default();

    loop {
        match reader.read_event()? {
            Event::Start(ref e) => match local_name(e.name().as_ref()) {
                b"Area" => content.area = parse_area(&mut reader)?,
                b"PageRes" => content.page_res.push(read_text(&mut reader)?.trim().to_string()),
                b"Layer" => {
                    let mut layer = layer_from_attrs(e);
                    layer.objects = parse_objects(&mut reader)?;
                    content.layers.push(layer);
                }
                b"Template" => {
                    push_template(&mut content, e);
                    skip(&mut reader, e)?;
                }
                b"Page" | b"Content" => {}
                _ => skip(&mut reader, e)?,
            },
            Event::Empty(ref e) => match local_name(e.name().as_ref()) {
                b"Layer" => content.layers.push(layer_from_attrs(e)),
                b"Template" => push_template(&mut content, e),
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(content)
}

fn layer_from_attrs(e: &BytesStart) -> Layer {
    Layer {
        layer_type: attr(e, "Type")
            .map(|t| LayerType::parse(&t))
            .unwrap_or_default(),
        draw_param: attr(e, "DrawParam"),
        objects: Vec::new(),
    }
}

fn push_template(content: &mut PageContent, e: &BytesStart) {
    match attr(e, "TemplateID") {
        Some(id) => {
            let z_order = attr(e, "ZOrder").map(|z| ZOrder::parse(&z));
            content.templates.push((id, z_order));
        }
        None => log::warn!("Template reference without TemplateID"),
    }
}

/// Parse a `CT_PageArea`, returning its physical box.
pub(crate) fn parse_area(reader: &mut Reader<&[u8]>) -> Result<Option<Rect>> {
    let mut physical = None;
    loop {
        match reader.read_event()? {
            Event::Start(ref e) => {
                if local_name(e.name().as_ref()) == b"PhysicalBox" {
                    physical = Some(parse_box(&read_text(reader)?)?);
                } else {
                    skip(reader, e)?;
                }
            }
            Event::End(_) => return Ok(physical),
            Event::Eof => return Err(Error::Xml("unterminated Area".into())),
            _ => {}
        }
    }
}

/// Parse graphic objects up to the end tag of the enclosing element.
pub(crate) fn parse_objects(reader: &mut Reader<&[u8]>) -> Result<Vec<GraphicObject>> {
    let mut objects = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(ref e) => match local_name(e.name().as_ref()) {
                b"TextObject" => objects.push(GraphicObject::Text(parse_text_object(reader, e)?)),
                b"PathObject" => objects.push(GraphicObject::Path(parse_path_object(reader, e)?)),
                b"ImageObject" => {
                    objects.push(GraphicObject::Image(image_from_attrs(e)?));
                    skip(reader, e)?;
                }
                b"CompositeObject" => {
                    objects.push(GraphicObject::Composite(composite_from_attrs(e)?));
                    skip(reader, e)?;
                }
                b"PageBlock" => objects.push(GraphicObject::Block {
                    objects: parse_objects(reader)?,
                }),
                _ => skip(reader, e)?,
            },
            Event::Empty(ref e) => match local_name(e.name().as_ref()) {
                b"TextObject" => objects.push(GraphicObject::Text(text_from_attrs(e)?)),
                b"PathObject" => objects.push(GraphicObject::Path(path_from_attrs(e)?)),
                b"ImageObject" => objects.push(GraphicObject::Image(image_from_attrs(e)?)),
                b"CompositeObject" => {
                    objects.push(GraphicObject::Composite(composite_from_attrs(e)?))
                }
                _ => {}
            },
            Event::End(_) => return Ok(objects),
            Event::Eof => return Err(Error::Xml("unterminated content block".into())),
            _ => {}
        }
    }
}

/// Attributes common to all graphic units.
fn unit_from_attrs(e: &BytesStart) -> Result<GraphicUnit> {
    let boundary = match attr(e, "Boundary") {
        Some(b) => parse_box(&b)?,
        None => Rect::default(),
    };

    let mut unit = GraphicUnit::new(boundary);
    unit.id = attr(e, "ID");
    unit.ctm = attr(e, "CTM").map(|m| parse_matrix(&m)).transpose()?;
    unit.draw_param = attr(e, "DrawParam");
    unit.line_width = attr_f64(e, "LineWidth");
    unit.cap = attr(e, "Cap").and_then(|c| LineCap::parse(&c));
    unit.join = attr(e, "Join").and_then(|j| LineJoin::parse(&j));
    unit.miter_limit = attr_f64(e, "MiterLimit");
    unit.dash_offset = attr_f64(e, "DashOffset");
    unit.dash_pattern = attr(e, "DashPattern")
        .map(|d| parse_numbers(&d))
        .transpose()?;
    unit.alpha = attr_f64(e, "Alpha").map(|a| a.clamp(0.0, 255.0) as u8);
    unit.visible = attr_bool(e, "Visible").unwrap_or(true);
    Ok(unit)
}

fn text_from_attrs(e: &BytesStart) -> Result<TextObject> {
    let font = attr(e, "Font").unwrap_or_default();
    let size = attr_f64(e, "Size").unwrap_or(0.0);

    let mut text = TextObject::new(font, size);
    text.unit = unit_from_attrs(e)?;
    text.fill = attr_bool(e, "Fill").unwrap_or(true);
    text.stroke = attr_bool(e, "Stroke").unwrap_or(false);
    text.hscale = attr_f64(e, "HScale").unwrap_or(1.0);
    text.weight = attr_f64(e, "Weight").map(|w| w as u32).unwrap_or(400);
    text.italic = attr_bool(e, "Italic").unwrap_or(false);
    Ok(text)
}

fn parse_text_object(reader: &mut Reader<&[u8]>, e: &BytesStart) -> Result<TextObject> {
    let mut text = text_from_attrs(e)?;

    loop {
        match reader.read_event()? {
            Event::Start(ref child) => match local_name(child.name().as_ref()) {
                b"FillColor" => text.fill_color = Some(parse_color(reader, child, false)?),
                b"StrokeColor" => text.stroke_color = Some(parse_color(reader, child, false)?),
                b"TextCode" => {
                    let mut code = text_code_from_attrs(child)?;
                    code.text = read_text(reader)?;
                    text.codes.push(code);
                }
                _ => skip(reader, child)?,
            },
            Event::Empty(ref child) => match local_name(child.name().as_ref()) {
                b"FillColor" => text.fill_color = Some(parse_color(reader, child, true)?),
                b"StrokeColor" => text.stroke_color = Some(parse_color(reader, child, true)?),
                _ => {}
            },
            Event::End(_) => return Ok(text),
            Event::Eof => return Err(Error::Xml("unterminated TextObject".into())),
            _ => {}
        }
    }
}

fn text_code_from_attrs(e: &BytesStart) -> Result<TextCode> {
    Ok(TextCode {
        x: attr_f64(e, "X"),
        y: attr_f64(e, "Y"),
        delta_x: attr(e, "DeltaX")
            .map(|d| expand_deltas(&d))
            .transpose()?
            .unwrap_or_default(),
        delta_y: attr(e, "DeltaY")
            .map(|d| expand_deltas(&d))
            .transpose()?
            .unwrap_or_default(),
        text: String::new(),
    })
}

fn path_from_attrs(e: &BytesStart) -> Result<PathObject> {
    let mut path = PathObject::new(Vec::new());
    path.unit = unit_from_attrs(e)?;
    path.stroke = attr_bool(e, "Stroke").unwrap_or(true);
    path.fill = attr_bool(e, "Fill").unwrap_or(false);
    path.rule = attr(e, "Rule")
        .map(|r| FillRule::parse(&r))
        .unwrap_or_default();
    Ok(path)
}

fn parse_path_object(reader: &mut Reader<&[u8]>, e: &BytesStart) -> Result<PathObject> {
    let mut path = path_from_attrs(e)?;

    loop {
        match reader.read_event()? {
            Event::Start(ref child) => match local_name(child.name().as_ref()) {
                b"FillColor" => path.fill_color = Some(parse_color(reader, child, false)?),
                b"StrokeColor" => path.stroke_color = Some(parse_color(reader, child, false)?),
                b"AbbreviatedData" => {
                    path.commands = parse_abbreviated_data(&read_text(reader)?)?;
                }
                _ => skip(reader, child)?,
            },
            Event::Empty(ref child) => match local_name(child.name().as_ref()) {
                b"FillColor" => path.fill_color = Some(parse_color(reader, child, true)?),
                b"StrokeColor" => path.stroke_color = Some(parse_color(reader, child, true)?),
                _ => {}
            },
            Event::End(_) => return Ok(path),
            Event::Eof => return Err(Error::Xml("unterminated PathObject".into())),
            _ => {}
        }
    }
}

fn image_from_attrs(e: &BytesStart) -> Result<ImageObject> {
    Ok(ImageObject {
        unit: unit_from_attrs(e)?,
        resource_id: attr(e, "ResourceID").unwrap_or_default(),
    })
}

fn composite_from_attrs(e: &BytesStart) -> Result<CompositeObject> {
    Ok(CompositeObject {
        unit: unit_from_attrs(e)?,
        resource_id: attr(e, "ResourceID").unwrap_or_default(),
    })
}

fn color_from_attrs(e: &BytesStart) -> Result<Color> {
    let mut color = Color::new(
        attr(e, "Value")
            .map(|v| parse_numbers(&v))
            .transpose()?
            .unwrap_or_default(),
    );
    color.color_space = attr(e, "ColorSpace");
    color.index = attr_f64(e, "Index").map(|i| i as usize);
    color.alpha = attr_f64(e, "Alpha")
        .map(|a| a.clamp(0.0, 255.0) as u8)
        .unwrap_or(255);
    Ok(color)
}

/// Parse a `CT_Color` element.
///
/// Shading children (axial, radial, Gouraud) are approximated by the last
/// color they declare.
pub(crate) fn parse_color(
    reader: &mut Reader<&[u8]>,
    e: &BytesStart,
    empty: bool,
) -> Result<Color> {
    let mut color = color_from_attrs(e)?;
    if empty {
        return Ok(color);
    }

    let mut last_stop: Option<Color> = None;
    let mut depth = 0usize;
    loop {
        match reader.read_event()? {
            Event::Start(ref child) => {
                depth += 1;
                if local_name(child.name().as_ref()) == b"Color" {
                    last_stop = Some(color_from_attrs(child)?);
                }
            }
            Event::Empty(ref child) => {
                if local_name(child.name().as_ref()) == b"Color" {
                    last_stop = Some(color_from_attrs(child)?);
                }
            }
            Event::End(_) => {
                if depth == 0 {
                    break;
                }
                depth -= 1;
            }
            Event::Eof => return Err(Error::Xml("unterminated color".into())),
            _ => {}
        }
    }

    if color.value.is_empty() && color.index.is_none() {
        if let Some(stop) = last_stop {
            color.value = stop.value;
            color.index = stop.index;
            if color.color_space.is_none() {
                color.color_space = stop.color_space;
            }
        }
    }
    Ok(color)
}

/// Parse a page annotation file (`PageAnnot`).
pub(crate) fn parse_page_annotations(xml: &str) -> Result<Vec<Annotation>> {
    let mut reader = reader(xml);
    let mut annotations = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(ref e) => match local_name(e.name().as_ref()) {
                b"Annot" => annotations.push(parse_annot(&mut reader, e)?),
                b"PageAnnot" => {}
                _ => skip(&mut reader, e)?,
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(annotations)
}

fn parse_annot(reader: &mut Reader<&[u8]>, e: &BytesStart) -> Result<Annotation> {
    let mut annotation = Annotation {
        id: attr(e, "ID"),
        annot_type: attr(e, "Type").unwrap_or_else(|| "Link".to_string()),
        subtype: attr(e, "Subtype"),
        visible: attr_bool(e, "Visible").unwrap_or(true),
        boundary: Rect::default(),
        objects: Vec::new(),
    };

    loop {
        match reader.read_event()? {
            Event::Start(ref child) => {
                if local_name(child.name().as_ref()) == b"Appearance" {
                    if let Some(b) = attr(child, "Boundary") {
                        annotation.boundary = parse_box(&b)?;
                    }
                    annotation.objects = parse_objects(reader)?;
                } else {
                    skip(reader, child)?;
                }
            }
            Event::End(_) => return Ok(annotation),
            Event::Eof => return Err(Error::Xml("unterminated Annot".into())),
            _ => {}
        }
    }
}
