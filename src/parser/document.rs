//! Container entry (`OFD.xml`) and document root (`Document.xml`) parsing.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{Error, Result};
use crate::model::{Metadata, Rect, ZOrder};

use super::content::parse_area;
use super::xml::{attr, attr_bool, attr_f64, local_name, read_text, reader, skip};

/// Declarations from `OFD.xml`.
#[derive(Debug, Default)]
pub(crate) struct OfdEntry {
    pub metadata: Metadata,
    /// DocRoot of the first DocBody
    pub doc_root: Option<String>,
    /// Signature list of the first DocBody
    pub signatures: Option<String>,
    pub doc_bodies: usize,
}

/// Parse `OFD.xml`. Only the first `DocBody` is read.
pub(crate) fn parse_ofd_entry(xml: &str) -> Result<OfdEntry> {
    let mut reader = reader(xml);
    let mut entry = OfdEntry::default();

    loop {
        match reader.read_event()? {
            Event::Start(ref e) => match local_name(e.name().as_ref()) {
                b"OFD" => {
                    entry.metadata =
                        Metadata::with_version(attr(e, "Version").unwrap_or_else(|| "1.0".into()));
                    if let Some(doc_type) = attr(e, "DocType") {
                        entry.metadata.doc_type = doc_type;
                    }
                }
                b"DocBody" => {
                    entry.doc_bodies += 1;
                    if entry.doc_bodies == 1 {
                        parse_doc_body(&mut reader, &mut entry)?;
                    } else {
                        skip(&mut reader, e)?;
                    }
                }
                _ => skip(&mut reader, e)?,
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(entry)
}

fn parse_doc_body(reader: &mut Reader<&[u8]>, entry: &mut OfdEntry) -> Result<()> {
    loop {
        match reader.read_event()? {
            Event::Start(ref e) => match local_name(e.name().as_ref()) {
                b"DocInfo" => parse_doc_info(reader, &mut entry.metadata)?,
                b"DocRoot" => entry.doc_root = Some(read_text(reader)?.trim().to_string()),
                b"Signatures" => {
                    let loc = read_text(reader)?.trim().to_string();
                    entry.signatures = (!loc.is_empty()).then_some(loc);
                }
                _ => skip(reader, e)?,
            },
            Event::End(_) => return Ok(()),
            Event::Eof => return Err(Error::Xml("unterminated DocBody".into())),
            _ => {}
        }
    }
}

fn parse_doc_info(reader: &mut Reader<&[u8]>, metadata: &mut Metadata) -> Result<()> {
    loop {
        match reader.read_event()? {
            Event::Start(ref e) => {
                let name = local_name(e.name().as_ref()).to_vec();
                if name == b"Keywords" {
                    parse_keywords(reader, metadata)?;
                    continue;
                }
                if name == b"CustomDatas" {
                    skip(reader, e)?;
                    continue;
                }

                let value = read_text(reader)?.trim().to_string();
                if value.is_empty() {
                    continue;
                }
                match name.as_slice() {
                    b"DocID" => metadata.doc_id = Some(value),
                    b"Title" => metadata.title = Some(value),
                    b"Author" => metadata.author = Some(value),
                    b"Subject" => metadata.subject = Some(value),
                    b"Abstract" => metadata.abstract_text = Some(value),
                    b"Creator" => metadata.creator = Some(value),
                    b"CreatorVersion" => metadata.creator_version = Some(value),
                    b"CreationDate" => metadata.created = parse_date(&value),
                    b"ModDate" => metadata.modified = parse_date(&value),
                    _ => {}
                }
            }
            Event::End(_) => return Ok(()),
            Event::Eof => return Err(Error::Xml("unterminated DocInfo".into())),
            _ => {}
        }
    }
}

fn parse_keywords(reader: &mut Reader<&[u8]>, metadata: &mut Metadata) -> Result<()> {
    loop {
        match reader.read_event()? {
            Event::Start(ref e) => {
                if local_name(e.name().as_ref()) == b"Keyword" {
                    let keyword = read_text(reader)?.trim().to_string();
                    if !keyword.is_empty() {
                        metadata.keywords.push(keyword);
                    }
                } else {
                    skip(reader, e)?;
                }
            }
            Event::End(_) => return Ok(()),
            Event::Eof => return Err(Error::Xml("unterminated Keywords".into())),
            _ => {}
        }
    }
}

/// Parse an `xs:date` or `xs:dateTime` value.
pub(crate) fn parse_date(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt);
        }
    }
    // A date may carry a zone suffix ("2021-03-01Z", "2021-03-01+08:00")
    let date_part = s.get(..10).unwrap_or(s);
    match NaiveDate::parse_from_str(date_part, "%Y-%m-%d") {
        Ok(date) => date.and_hms_opt(0, 0, 0),
        Err(_) => {
            log::warn!("unparsable date '{}'", s);
            None
        }
    }
}

/// A template page declaration.
#[derive(Debug, Clone)]
pub(crate) struct TemplateDecl {
    pub id: String,
    pub name: Option<String>,
    pub z_order: ZOrder,
    pub base_loc: String,
}

/// A page entry of `Pages`.
#[derive(Debug, Clone)]
pub(crate) struct PageDecl {
    pub id: String,
    pub base_loc: String,
}

/// An outline entry with its raw destination.
#[derive(Debug, Clone, Default)]
pub(crate) struct OutlineDecl {
    pub title: String,
    pub expanded: bool,
    pub page_id: Option<String>,
    pub children: Vec<OutlineDecl>,
}

/// Declarations from `Document.xml`.
#[derive(Debug, Default)]
pub(crate) struct DocumentDecl {
    pub page_area: Option<Rect>,
    pub public_res: Vec<String>,
    pub document_res: Vec<String>,
    /// ID of the color space used by colors that name none
    pub default_cs: Option<String>,
    pub templates: Vec<TemplateDecl>,
    pub pages: Vec<PageDecl>,
    pub outlines: Vec<OutlineDecl>,
    pub attachments: Option<String>,
    pub annotations: Option<String>,
}

/// Parse `Document.xml`.
pub(crate) fn parse_document(xml: &str) -> Result<DocumentDecl> {
    let mut reader = reader(xml);
    let mut doc = DocumentDecl::default();

    loop {
        match reader.read_event()? {
            Event::Start(ref e) => match local_name(e.name().as_ref()) {
                b"Document" | b"CommonData" | b"Pages" => {}
                b"PageArea" => doc.page_area = parse_area(&mut reader)?,
                b"PublicRes" => doc.public_res.push(read_text(&mut reader)?.trim().to_string()),
                b"DocumentRes" => doc
                    .document_res
                    .push(read_text(&mut reader)?.trim().to_string()),
                b"DefaultCS" => {
                    let id = read_text(&mut reader)?.trim().to_string();
                    doc.default_cs = (!id.is_empty()).then_some(id);
                }
                b"Outlines" => doc.outlines = parse_outlines(&mut reader)?,
                b"Attachments" => doc.attachments = Some(read_text(&mut reader)?.trim().to_string()),
                b"Annotations" => doc.annotations = Some(read_text(&mut reader)?.trim().to_string()),
                b"TemplatePage" => {
                    push_template(&mut doc, e);
                    skip(&mut reader, e)?;
                }
                b"Page" => {
                    push_page(&mut doc, e);
                    skip(&mut reader, e)?;
                }
                _ => skip(&mut reader, e)?,
            },
            Event::Empty(ref e) => match local_name(e.name().as_ref()) {
                b"TemplatePage" => push_template(&mut doc, e),
                b"Page" => push_page(&mut doc, e),
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(doc)
}

fn push_template(doc: &mut DocumentDecl, e: &BytesStart) {
    match (attr(e, "ID"), attr(e, "BaseLoc")) {
        (Some(id), Some(base_loc)) => doc.templates.push(TemplateDecl {
            id,
            name: attr(e, "Name"),
            z_order: attr(e, "ZOrder")
                .map(|z| ZOrder::parse(&z))
                .unwrap_or_default(),
            base_loc,
        }),
        _ => log::warn!("TemplatePage without ID or BaseLoc"),
    }
}

fn push_page(doc: &mut DocumentDecl, e: &BytesStart) {
    match (attr(e, "ID"), attr(e, "BaseLoc")) {
        (Some(id), Some(base_loc)) => doc.pages.push(PageDecl { id, base_loc }),
        _ => log::warn!("Page without ID or BaseLoc"),
    }
}

/// Parse `OutlineElem` children up to the end of the enclosing element.
fn parse_outlines(reader: &mut Reader<&[u8]>) -> Result<Vec<OutlineDecl>> {
    let mut items = Vec::new();
    loop {
        match reader.read_event()? {
            Event::Start(ref e) => {
                if local_name(e.name().as_ref()) == b"OutlineElem" {
                    items.push(parse_outline_elem(reader, e)?);
                } else {
                    skip(reader, e)?;
                }
            }
            Event::Empty(ref e) => {
                if local_name(e.name().as_ref()) == b"OutlineElem" {
                    items.push(outline_from_attrs(e));
                }
            }
            Event::End(_) => return Ok(items),
            Event::Eof => return Err(Error::Xml("unterminated Outlines".into())),
            _ => {}
        }
    }
}

fn outline_from_attrs(e: &BytesStart) -> OutlineDecl {
    OutlineDecl {
        title: attr(e, "Title").unwrap_or_default(),
        expanded: attr_bool(e, "Expanded").unwrap_or(true),
        page_id: None,
        children: Vec::new(),
    }
}

fn parse_outline_elem(reader: &mut Reader<&[u8]>, e: &BytesStart) -> Result<OutlineDecl> {
    let mut item = outline_from_attrs(e);
    let mut depth = 0usize;

    loop {
        match reader.read_event()? {
            Event::Start(ref child) => match local_name(child.name().as_ref()) {
                b"OutlineElem" => item.children.push(parse_outline_elem(reader, child)?),
                b"Dest" => {
                    take_dest(&mut item, child);
                    skip(reader, child)?;
                }
                // Actions/Action/Goto wrap the destination
                _ => depth += 1,
            },
            Event::Empty(ref child) => match local_name(child.name().as_ref()) {
                b"OutlineElem" => item.children.push(outline_from_attrs(child)),
                b"Dest" => take_dest(&mut item, child),
                _ => {}
            },
            Event::End(_) => {
                if depth == 0 {
                    return Ok(item);
                }
                depth -= 1;
            }
            Event::Eof => return Err(Error::Xml("unterminated OutlineElem".into())),
            _ => {}
        }
    }
}

fn take_dest(item: &mut OutlineDecl, e: &BytesStart) {
    if item.page_id.is_none() {
        item.page_id = attr(e, "PageID");
    }
}

/// An attachment entry of the attachments file.
#[derive(Debug, Clone)]
pub(crate) struct AttachmentDecl {
    pub id: String,
    pub name: String,
    pub format: Option<String>,
    pub creation_date: Option<NaiveDateTime>,
    pub size: Option<f64>,
    pub file_loc: String,
}

/// Parse the attachments file (`Attachments`).
pub(crate) fn parse_attachments(xml: &str) -> Result<Vec<AttachmentDecl>> {
    let mut reader = reader(xml);
    let mut attachments = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(ref e) => match local_name(e.name().as_ref()) {
                b"Attachments" => {}
                b"Attachment" => {
                    let mut decl = AttachmentDecl {
                        id: attr(e, "ID").unwrap_or_default(),
                        name: attr(e, "Name").unwrap_or_default(),
                        format: attr(e, "Format").filter(|f| !f.is_empty()),
                        creation_date: attr(e, "CreationDate").and_then(|d| parse_date(&d)),
                        size: attr_f64(e, "Size"),
                        file_loc: String::new(),
                    };
                    decl.file_loc = read_file_loc(&mut reader)?;
                    if decl.file_loc.is_empty() {
                        log::warn!("attachment {} has no FileLoc", decl.id);
                    } else {
                        attachments.push(decl);
                    }
                }
                _ => skip(&mut reader, e)?,
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(attachments)
}

/// Read the `FileLoc` child of the current element.
fn read_file_loc(reader: &mut Reader<&[u8]>) -> Result<String> {
    let mut loc = String::new();
    loop {
        match reader.read_event()? {
            Event::Start(ref e) => {
                if local_name(e.name().as_ref()) == b"FileLoc" {
                    loc = read_text(reader)?.trim().to_string();
                } else {
                    skip(reader, e)?;
                }
            }
            Event::End(_) => return Ok(loc),
            Event::Eof => return Err(Error::Xml("unterminated FileLoc parent".into())),
            _ => {}
        }
    }
}

/// Parse the annotation index: `(page ID, annotation file location)` pairs.
pub(crate) fn parse_annotation_index(xml: &str) -> Result<Vec<(String, String)>> {
    let mut reader = reader(xml);
    let mut entries = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(ref e) => match local_name(e.name().as_ref()) {
                b"Annotations" => {}
                b"Page" => {
                    let page_id = attr(e, "PageID");
                    let loc = read_file_loc(&mut reader)?;
                    match page_id {
                        Some(id) if !loc.is_empty() => entries.push((id, loc)),
                        _ => log::warn!("annotation index entry without PageID or FileLoc"),
                    }
                }
                _ => skip(&mut reader, e)?,
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(entries)
}
