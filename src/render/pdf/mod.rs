//! PDF writer.
//!
//! Builds a PDF 1.7 document with lopdf: one page per exported OFD page,
//! plus bookmarks, embedded attachments and document info. Output depends
//! only on the input document and options, so repeated conversions are
//! byte-identical.

mod catalog;
mod content;
mod font;
mod image;
mod resources;

use std::collections::HashMap;
use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;
use lopdf::{dictionary, Document as PdfDocument, Object, ObjectId, Stream};

use self::catalog::{info_dictionary, write_embedded_files, write_outline};
use self::content::page_content;
use self::resources::SharedResources;
use super::options::ExportOptions;
use crate::error::Result;
use crate::model::{Document, Page, Rect};

/// PDF version written to the header.
pub const PDF_VERSION: &str = "1.7";

/// Zlib-compress a byte buffer for a FlateDecode stream.
pub(crate) fn deflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

/// Render a document to PDF bytes.
pub fn to_pdf(doc: &Document, options: &ExportOptions) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    write_pdf(doc, options, &mut buffer)?;
    Ok(buffer)
}

/// Render a document as PDF into a writer.
pub fn write_pdf<W: Write>(doc: &Document, options: &ExportOptions, mut writer: W) -> Result<()> {
    let total = doc.metadata.page_count.max(doc.page_count());
    options.page_selection.validate(total)?;

    let mut pdf = build(doc, options)?;
    pdf.save_to(&mut writer)?;
    writer.flush()?;
    Ok(())
}

fn build(doc: &Document, options: &ExportOptions) -> Result<PdfDocument> {
    let mut pdf = PdfDocument::with_version(PDF_VERSION);
    let pages_id = pdf.new_object_id();
    let mut shared = SharedResources::default();

    let selected: Vec<&Page> = doc
        .pages
        .iter()
        .filter(|p| options.page_selection.includes(p.number))
        .collect();

    let mut kids: Vec<Object> = Vec::with_capacity(selected.len());
    let mut page_ids: HashMap<u32, ObjectId> = HashMap::new();

    for page in &selected {
        let id = write_page(&mut pdf, doc, page, pages_id, &mut shared, options)?;
        page_ids.insert(page.number, id);
        kids.push(id.into());
    }

    if kids.is_empty() {
        // An OFD without pages still yields a viewable single blank page
        log::warn!("no pages to export, writing a blank page");
        let blank = Page::new(1, "", doc.page_area);
        let id = write_page(&mut pdf, doc, &blank, pages_id, &mut shared, options)?;
        kids.push(id.into());
    }

    let count = kids.len() as i64;
    pdf.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );

    let mut catalog = dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    };

    if options.outline {
        if let Some(outline) = doc.outline.as_ref().filter(|o| !o.is_empty()) {
            if let Some(outlines_id) = write_outline(&mut pdf, &outline.items, &page_ids) {
                catalog.set("Outlines", outlines_id);
                catalog.set("PageMode", "UseOutlines");
            }
        }
    }

    if options.attachments && !doc.attachments.is_empty() {
        if let Some(tree) = write_embedded_files(&mut pdf, &doc.attachments, options.compress)? {
            catalog.set("Names", dictionary! { "EmbeddedFiles" => tree });
        }
    }

    let catalog_id = pdf.add_object(catalog);
    pdf.trailer.set("Root", catalog_id);

    let producer = options.producer.as_deref();
    if let Some(info) = info_dictionary(&doc.metadata, producer) {
        let info_id = pdf.add_object(info);
        pdf.trailer.set("Info", info_id);
    }

    log::debug!(
        "built PDF with {} pages and {} objects",
        count,
        pdf.objects.len()
    );
    Ok(pdf)
}

fn write_page(
    pdf: &mut PdfDocument,
    doc: &Document,
    page: &Page,
    parent: ObjectId,
    shared: &mut SharedResources,
    options: &ExportOptions,
) -> Result<ObjectId> {
    let (content, resources) = page_content(
        doc,
        page,
        options.annotations,
        options.seals,
        pdf,
        shared,
    )?;

    let stream = if options.compress {
        Stream::new(dictionary! { "Filter" => "FlateDecode" }, deflate(&content)?)
    } else {
        Stream::new(lopdf::Dictionary::new(), content)
    };
    let content_id = pdf.add_object(stream);
    let resources_id = pdf.add_object(resources.to_dictionary());

    Ok(pdf.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => parent,
        "MediaBox" => media_box(&page.area),
        "Contents" => content_id,
        "Resources" => resources_id,
    }))
}

fn media_box(area: &Rect) -> Vec<Object> {
    vec![
        0.into(),
        0.into(),
        Object::Real(area.width_pt() as f32),
        Object::Real(area.height_pt() as f32),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Layer, LayerType, Outline, OutlineItem, TextCode, TextObject};
    use crate::model::GraphicObject;

    fn sample_document() -> Document {
        let mut doc = Document::new();
        for number in 1..=2 {
            let mut page = Page::new(number, number.to_string(), Rect::a4());
            let mut text = TextObject::new("1", 5.0);
            text.unit.boundary = Rect::new(20.0, 20.0, 100.0, 10.0);
            text.codes.push(TextCode::new(0.0, 5.0, format!("Page {}", number)));
            let mut layer = Layer::new(LayerType::Body);
            layer.objects.push(GraphicObject::Text(text));
            page.layers.push(layer);
            doc.add_page(page);
        }
        doc.metadata.page_count = 2;
        doc.metadata.title = Some("Sample".into());
        let mut outline = Outline::new();
        outline.add_item(OutlineItem::new("Second", Some(2), 0));
        doc.outline = Some(outline);
        doc
    }

    #[test]
    fn test_to_pdf_structure() {
        let bytes = to_pdf(&sample_document(), &ExportOptions::default()).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.7"));

        let pdf = PdfDocument::load_mem(&bytes).unwrap();
        assert_eq!(pdf.get_pages().len(), 2);
        let catalog = pdf.catalog().unwrap();
        assert!(catalog.has(b"Outlines"));
        assert!(pdf.trailer.has(b"Info"));
    }

    #[test]
    fn test_page_selection_and_blank_page() {
        let doc = sample_document();
        let options = ExportOptions::default().with_page_list(vec![2]);
        let pdf = PdfDocument::load_mem(&to_pdf(&doc, &options).unwrap()).unwrap();
        assert_eq!(pdf.get_pages().len(), 1);

        let empty = Document::new();
        let pdf = PdfDocument::load_mem(&to_pdf(&empty, &ExportOptions::default()).unwrap())
            .unwrap();
        assert_eq!(pdf.get_pages().len(), 1);
    }

    #[test]
    fn test_out_of_range_selection() {
        let options = ExportOptions::default().with_page_list(vec![5]);
        assert!(matches!(
            to_pdf(&sample_document(), &options),
            Err(crate::Error::PageOutOfRange(5, 2))
        ));
    }

    #[test]
    fn test_output_is_deterministic() {
        let doc = sample_document();
        let options = ExportOptions::default();
        assert_eq!(to_pdf(&doc, &options).unwrap(), to_pdf(&doc, &options).unwrap());
    }

    #[test]
    fn test_uncompressed_content_is_readable() {
        let options = ExportOptions::default().with_compression(false);
        let bytes = to_pdf(&sample_document(), &options).unwrap();
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("(P) Tj"));
        assert!(text.contains("/Helvetica"));
    }

    #[test]
    fn test_deflate_roundtrip() {
        use flate2::read::ZlibDecoder;
        use std::io::Read;

        let compressed = deflate(b"q 1 0 0 1 0 0 cm Q").unwrap();
        let mut out = Vec::new();
        ZlibDecoder::new(&compressed[..]).read_to_end(&mut out).unwrap();
        assert_eq!(out, b"q 1 0 0 1 0 0 cm Q");
    }
}
