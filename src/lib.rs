//! # ofd2pdf
//!
//! Convert OFD (Open Fixed-layout Document, GB/T 33190) files to PDF.
//!
//! The library reads the OFD container (a zip archive of XML parts),
//! builds a typed document model and renders it to PDF with vector paths,
//! positioned text, images, templates, annotations, bookmarks and
//! attachments. Plain text and JSON exports of the model are also
//! available.
//!
//! ## Quick Start
//!
//! ```no_run
//! fn main() -> ofd2pdf::Result<()> {
//!     ofd2pdf::convert("invoice.ofd", "invoice.pdf")?;
//!     Ok(())
//! }
//! ```
//!
//! ## Working with the document
//!
//! ```no_run
//! use ofd2pdf::{ExportOptions, OfdDocument, PageSelection};
//!
//! let doc = OfdDocument::open("invoice.ofd")?;
//! println!("{} pages", doc.page_count());
//! println!("{}", doc.to_text()?);
//!
//! let options = ExportOptions::new().with_pages(PageSelection::Range(1..=2));
//! doc.export_with_options("first-pages.pdf", &options)?;
//! # Ok::<(), ofd2pdf::Error>(())
//! ```

pub mod convert;
pub mod detect;
pub mod error;
pub mod model;
pub mod package;
pub mod parser;
pub mod render;

// Re-export commonly used types
#[cfg(feature = "async")]
pub use convert::convert_async;
pub use convert::{
    convert, convert_with_options, ConvertOptions, ConverterRegistry, DocumentConverter,
    JsonConverter, PdfConverter, TextConverter,
};
pub use detect::{detect_format_from_bytes, detect_format_from_path, is_ofd, is_ofd_bytes, OfdFormat};
pub use error::{Error, Result};
pub use model::{Document, Metadata, Outline, Page};
pub use parser::{ErrorMode, OfdParser, ReadOptions};
pub use render::{ExportOptions, JsonFormat, PageSelection};

use std::io::Write;
use std::path::Path;

/// Parse an OFD file and return its document model.
///
/// # Example
///
/// ```no_run
/// let doc = ofd2pdf::parse_file("invoice.ofd").unwrap();
/// println!("Pages: {}", doc.page_count());
/// ```
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Document> {
    OfdParser::open(path)?.parse()
}

/// Parse an OFD from bytes.
pub fn parse_bytes(data: &[u8]) -> Result<Document> {
    OfdParser::from_bytes(data)?.parse()
}

/// Extract plain text from an OFD file.
pub fn extract_text<P: AsRef<Path>>(path: P) -> Result<String> {
    let options = ReadOptions::new().text_only();
    let doc = OfdParser::open_with_options(path, options)?.parse()?;
    render::to_text(&doc, &ExportOptions::default())
}

/// A parsed OFD document ready for export.
///
/// The container is closed as soon as parsing finishes; the handle only
/// holds the document model.
#[derive(Debug, Clone)]
pub struct OfdDocument {
    document: Document,
}

impl OfdDocument {
    /// Open and parse an OFD file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, ReadOptions::default())
    }

    /// Open and parse an OFD file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: ReadOptions) -> Result<Self> {
        let document = OfdParser::open_with_options(path, options)?.parse()?;
        Ok(Self { document })
    }

    /// Parse an OFD from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let document = OfdParser::from_bytes(data)?.parse()?;
        Ok(Self { document })
    }

    /// Parsed document model.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Number of pages in the source document.
    pub fn page_count(&self) -> u32 {
        self.document
            .metadata
            .page_count
            .max(self.document.page_count())
    }

    /// Export to a PDF file with default options.
    pub fn export<P: AsRef<Path>>(&self, destination: P) -> Result<()> {
        self.export_with_options(destination, &ExportOptions::default())
    }

    /// Export to a PDF file.
    pub fn export_with_options<P: AsRef<Path>>(
        &self,
        destination: P,
        options: &ExportOptions,
    ) -> Result<()> {
        convert::write_atomic(destination.as_ref(), |writer| {
            render::write_pdf(&self.document, options, writer)
        })
    }

    /// Export PDF into any writer.
    pub fn export_to_writer<W: Write>(&self, writer: W, options: &ExportOptions) -> Result<()> {
        render::write_pdf(&self.document, options, writer)
    }

    /// Render the PDF into memory.
    pub fn to_pdf_bytes(&self, options: &ExportOptions) -> Result<Vec<u8>> {
        render::to_pdf(&self.document, options)
    }

    /// Plain text of all pages.
    pub fn to_text(&self) -> Result<String> {
        render::to_text(&self.document, &ExportOptions::default())
    }

    /// The document model as JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.document, format)
    }

    /// Take the document model.
    pub fn into_document(self) -> Document {
        self.document
    }
}
