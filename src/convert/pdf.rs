//! PDF converter implementation.

use crate::error::Result;
use crate::parser::OfdParser;
use crate::render::{to_pdf, write_pdf};
use std::path::Path;

use super::{load, write_atomic, ConvertOptions, DocumentConverter};

/// OFD to PDF converter.
#[derive(Debug, Clone, Default)]
pub struct PdfConverter {
    _private: (),
}

impl PdfConverter {
    /// Create a new PDF converter.
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl DocumentConverter for PdfConverter {
    fn supported_extensions(&self) -> &[&str] {
        &["pdf"]
    }

    fn name(&self) -> &str {
        "pdf"
    }

    fn convert(&self, source: &Path, destination: &Path, options: &ConvertOptions) -> Result<()> {
        let doc = load(source, options)?;
        write_atomic(destination, |writer| write_pdf(&doc, &options.export, writer))
    }

    fn convert_bytes(&self, data: &[u8], options: &ConvertOptions) -> Result<Vec<u8>> {
        let doc = OfdParser::from_bytes_with_options(data, options.read.clone())?.parse()?;
        to_pdf(&doc, &options.export)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_converter_extensions() {
        let converter = PdfConverter::new();
        assert_eq!(converter.supported_extensions(), &["pdf"]);
        assert!(converter.supports_extension("pdf"));
        assert!(converter.supports_extension("PDF"));
        assert!(!converter.supports_extension("ofd"));
        assert_eq!(converter.name(), "pdf");
    }

    #[test]
    fn test_convert_bytes_rejects_non_ofd() {
        let converter = PdfConverter::new();
        let err = converter
            .convert_bytes(b"%PDF-1.7", &ConvertOptions::default())
            .unwrap_err();
        assert!(matches!(err, crate::Error::UnsupportedFormat(_)));
    }
}
