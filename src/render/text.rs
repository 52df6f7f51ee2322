//! Plain text rendering for OFD documents.

use crate::error::Result;
use crate::model::Document;

use super::ExportOptions;

/// Convert a document to plain text.
///
/// Each page contributes one line per visible text object; pages are
/// separated by a blank line.
pub fn to_text(doc: &Document, options: &ExportOptions) -> Result<String> {
    let total = doc.metadata.page_count.max(doc.page_count());
    options.page_selection.validate(total)?;

    let output = doc
        .pages
        .iter()
        .filter(|page| options.page_selection.includes(page.number))
        .map(|page| page.plain_text())
        .collect::<Vec<_>>()
        .join("\n\n");

    Ok(output.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{GraphicObject, Layer, LayerType, Page, Rect, TextCode, TextObject};

    fn page(number: u32, lines: &[&str]) -> Page {
        let mut page = Page::new(number, number.to_string(), Rect::a4());
        let mut layer = Layer::new(LayerType::Body);
        for line in lines {
            let mut text = TextObject::new("1", 3.0);
            text.codes.push(TextCode::new(0.0, 3.0, *line));
            layer.objects.push(GraphicObject::Text(text));
        }
        page.layers.push(layer);
        page
    }

    #[test]
    fn test_to_text() {
        let mut doc = Document::new();
        doc.add_page(page(1, &["Hello, world!", "Second line."]));
        doc.add_page(page(2, &["Page two"]));

        let result = to_text(&doc, &ExportOptions::default()).unwrap();
        assert_eq!(result, "Hello, world!\nSecond line.\n\nPage two");
    }

    #[test]
    fn test_to_text_page_selection() {
        let mut doc = Document::new();
        doc.add_page(page(1, &["first"]));
        doc.add_page(page(2, &["second"]));

        let options = ExportOptions::default().with_page_list(vec![2]);
        assert_eq!(to_text(&doc, &options).unwrap(), "second");
    }

    #[test]
    fn test_to_text_normalizes_nfc() {
        let mut doc = Document::new();
        doc.add_page(page(1, &["e\u{301}"]));
        assert_eq!(to_text(&doc, &ExportOptions::default()).unwrap(), "\u{e9}");
    }
}
