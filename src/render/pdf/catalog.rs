//! Document-level PDF structures: outline, embedded files and info.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDateTime;
use lopdf::{dictionary, Dictionary, Document as PdfDocument, Object, ObjectId, Stream, StringFormat};

use super::deflate;
use crate::error::Result;
use crate::model::{Attachment, Metadata, OutlineItem};

/// A PDF text string: UTF-16BE with a byte order mark.
pub(crate) fn text_string(s: &str) -> Object {
    let mut bytes = vec![0xFE, 0xFF];
    bytes.extend(s.encode_utf16().flat_map(|u| u.to_be_bytes()));
    Object::String(bytes, StringFormat::Hexadecimal)
}

/// A PDF date string (`D:YYYYMMDDHHmmSS`).
pub(crate) fn date_string(date: &NaiveDateTime) -> Object {
    Object::string_literal(date.format("D:%Y%m%d%H%M%S").to_string())
}

/// Write the outline tree; returns the `/Outlines` dictionary ID.
///
/// Items pointing at pages that are not exported keep their place in the
/// tree but get no destination.
pub(crate) fn write_outline(
    pdf: &mut PdfDocument,
    items: &[OutlineItem],
    page_ids: &HashMap<u32, ObjectId>,
) -> Option<ObjectId> {
    if items.is_empty() {
        return None;
    }
    let root = pdf.new_object_id();
    let (first, last, count) = write_items(pdf, items, root, page_ids);
    pdf.objects.insert(
        root,
        Object::Dictionary(dictionary! {
            "Type" => "Outlines",
            "First" => first,
            "Last" => last,
            "Count" => count,
        }),
    );
    Some(root)
}

/// Write sibling items; returns first, last and the visible item count.
fn write_items(
    pdf: &mut PdfDocument,
    items: &[OutlineItem],
    parent: ObjectId,
    page_ids: &HashMap<u32, ObjectId>,
) -> (ObjectId, ObjectId, i64) {
    let ids: Vec<ObjectId> = items.iter().map(|_| pdf.new_object_id()).collect();
    let mut visible = 0;

    for (i, item) in items.iter().enumerate() {
        let mut dict = dictionary! {
            "Title" => text_string(&item.title),
            "Parent" => parent,
        };
        if i > 0 {
            dict.set("Prev", ids[i - 1]);
        }
        if let Some(next) = ids.get(i + 1) {
            dict.set("Next", *next);
        }
        if let Some(page_id) = item.page.and_then(|p| page_ids.get(&p)) {
            dict.set(
                "Dest",
                vec![
                    (*page_id).into(),
                    "XYZ".into(),
                    Object::Null,
                    Object::Null,
                    Object::Null,
                ],
            );
        }

        visible += 1;
        if !item.children.is_empty() {
            let (first, last, count) = write_items(pdf, &item.children, ids[i], page_ids);
            dict.set("First", first);
            dict.set("Last", last);
            if item.expanded {
                dict.set("Count", count);
                visible += count;
            } else {
                dict.set("Count", -count);
            }
        }
        pdf.objects.insert(ids[i], Object::Dictionary(dict));
    }

    (ids[0], ids[ids.len() - 1], visible)
}

/// Write attachments as an `/EmbeddedFiles` name tree, sorted by name.
pub(crate) fn write_embedded_files(
    pdf: &mut PdfDocument,
    attachments: &[Attachment],
    compress: bool,
) -> Result<Option<ObjectId>> {
    let mut named: BTreeMap<String, &Attachment> = BTreeMap::new();
    for attachment in attachments {
        let mut key = attachment.name.clone();
        if key.is_empty() || named.contains_key(&key) {
            key = format!("{} ({})", attachment.name, attachment.id);
        }
        named.insert(key, attachment);
    }
    if named.is_empty() {
        return Ok(None);
    }

    let mut names = Vec::with_capacity(named.len() * 2);
    for (key, attachment) in named {
        let mut params = dictionary! { "Size" => attachment.size() as i64 };
        if let Some(date) = &attachment.creation_date {
            params.set("CreationDate", date_string(date));
        }
        let mut stream_dict = dictionary! {
            "Type" => "EmbeddedFile",
            "Params" => params,
        };
        let data = if compress {
            stream_dict.set("Filter", "FlateDecode");
            deflate(&attachment.data)?
        } else {
            attachment.data.clone()
        };
        let file_id = pdf.add_object(Stream::new(stream_dict, data));

        let spec = pdf.add_object(dictionary! {
            "Type" => "Filespec",
            "F" => Object::string_literal(ascii_fallback(&key)),
            "UF" => text_string(&key),
            "EF" => dictionary! { "F" => file_id },
        });
        names.push(text_string(&key));
        names.push(spec.into());
    }

    Ok(Some(pdf.add_object(dictionary! { "Names" => names })))
}

fn ascii_fallback(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii() && !c.is_ascii_control() { c } else { '_' })
        .collect()
}

/// Build the `/Info` dictionary; `None` when it would be empty.
pub(crate) fn info_dictionary(metadata: &Metadata, producer: Option<&str>) -> Option<Dictionary> {
    let mut info = Dictionary::new();
    let mut text = |key: &str, value: Option<&str>| {
        if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
            info.set(key, text_string(value));
        }
    };

    text("Title", metadata.title.as_deref());
    text("Author", metadata.author.as_deref());
    text(
        "Subject",
        metadata.subject.as_deref().or(metadata.abstract_text.as_deref()),
    );
    text("Keywords", metadata.keywords_joined().as_deref());
    let creator = match (&metadata.creator, &metadata.creator_version) {
        (Some(name), Some(version)) => Some(format!("{} {}", name, version)),
        (Some(name), None) => Some(name.clone()),
        _ => None,
    };
    text("Creator", creator.as_deref());
    text("Producer", producer);

    if let Some(date) = &metadata.created {
        info.set("CreationDate", date_string(date));
    }
    if let Some(date) = &metadata.modified {
        info.set("ModDate", date_string(date));
    }

    (!info.is_empty()).then_some(info)
}
