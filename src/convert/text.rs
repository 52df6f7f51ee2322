//! Plain text converter implementation.

use crate::error::Result;
use crate::model::Document;
use crate::parser::OfdParser;
use crate::render::to_text;
use std::io::Write;
use std::path::Path;

use super::{load, write_atomic, ConvertOptions, DocumentConverter};

/// OFD to plain text converter.
#[derive(Debug, Clone, Default)]
pub struct TextConverter {
    _private: (),
}

impl TextConverter {
    /// Create a new text converter.
    pub fn new() -> Self {
        Self { _private: () }
    }

    fn render(&self, doc: &Document, options: &ConvertOptions) -> Result<Vec<u8>> {
        let mut text = to_text(doc, &options.export)?;
        if !text.is_empty() {
            text.push('\n');
        }
        Ok(text.into_bytes())
    }
}

impl DocumentConverter for TextConverter {
    fn supported_extensions(&self) -> &[&str] {
        &["txt", "text"]
    }

    fn name(&self) -> &str {
        "text"
    }

    fn convert(&self, source: &Path, destination: &Path, options: &ConvertOptions) -> Result<()> {
        let options = text_options(options);
        let bytes = self.render(&load(source, &options)?, &options)?;
        write_atomic(destination, |writer| Ok(writer.write_all(&bytes)?))
    }

    fn convert_bytes(&self, data: &[u8], options: &ConvertOptions) -> Result<Vec<u8>> {
        let options = text_options(options);
        let doc = OfdParser::from_bytes_with_options(data, options.read.clone())?.parse()?;
        self.render(&doc, &options)
    }
}

/// Text output needs neither media nor attachments.
fn text_options(options: &ConvertOptions) -> ConvertOptions {
    let mut options = options.clone();
    options.read = options.read.text_only();
    options
}
