//! Document converter module providing a plugin architecture for output formats.
//!
//! The top-level [`convert`] functions turn an OFD file into a PDF file.
//! Converters for other targets are registered in a [`ConverterRegistry`],
//! which dispatches on the destination file extension.
//!
//! # Example
//!
//! ```no_run
//! use ofd2pdf::convert::{ConvertOptions, ConverterRegistry};
//! use std::path::Path;
//!
//! fn main() -> ofd2pdf::Result<()> {
//!     let registry = ConverterRegistry::with_defaults();
//!     registry.convert(
//!         Path::new("invoice.ofd"),
//!         Path::new("invoice.txt"),
//!         &ConvertOptions::default(),
//!     )?;
//!     Ok(())
//! }
//! ```

mod json;
mod pdf;
mod text;

pub use json::JsonConverter;
pub use pdf::PdfConverter;
pub use text::TextConverter;

use crate::error::{Error, Result};
use crate::parser::{OfdParser, ReadOptions};
use crate::render::{write_pdf, ExportOptions, PageSelection};
use std::collections::HashMap;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;
use tempfile::NamedTempFile;

/// Options for document conversion.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Parsing options
    pub read: ReadOptions,

    /// Output options
    pub export: ExportOptions,
}

impl ConvertOptions {
    /// Create new conversion options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive reading options from export options, so that only what is
    /// exported gets loaded.
    pub fn from_export(export: ExportOptions) -> Self {
        let read = ReadOptions::new()
            .with_pages(export.page_selection.clone())
            .with_annotations(export.annotations)
            .with_seals(export.seals)
            .with_attachments(export.attachments);
        Self { read, export }
    }

    /// Set parsing options.
    pub fn with_read_options(mut self, options: ReadOptions) -> Self {
        self.read = options;
        self
    }

    /// Set output options.
    pub fn with_export_options(mut self, options: ExportOptions) -> Self {
        self.export = options;
        self
    }

    /// Limit both parsing and output to a page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.read = self.read.with_pages(pages.clone());
        self.export = self.export.with_pages(pages);
        self
    }

    /// Keep going past malformed pages.
    pub fn lenient(mut self) -> Self {
        self.read = self.read.lenient();
        self
    }
}

/// Convert an OFD file to a PDF file.
///
/// The source is parsed completely before the destination is touched. The
/// PDF is written to a temporary file next to the destination and moved
/// into place, so a failed conversion leaves no partial output and keeps
/// any previous file intact.
///
/// # Example
///
/// ```no_run
/// ofd2pdf::convert("invoice.ofd", "invoice.pdf").unwrap();
/// ```
pub fn convert<P: AsRef<Path>, Q: AsRef<Path>>(source: P, destination: Q) -> Result<()> {
    convert_with_options(source, destination, &ExportOptions::default())
}

/// Convert an OFD file to a PDF file with custom export options.
pub fn convert_with_options<P: AsRef<Path>, Q: AsRef<Path>>(
    source: P,
    destination: Q,
    options: &ExportOptions,
) -> Result<()> {
    let options = ConvertOptions::from_export(options.clone());
    PdfConverter::new().convert(source.as_ref(), destination.as_ref(), &options)
}

/// Run [`convert_with_options`] on the blocking thread pool.
#[cfg(feature = "async")]
pub async fn convert_async<P: AsRef<Path>, Q: AsRef<Path>>(
    source: P,
    destination: Q,
    options: ExportOptions,
) -> Result<()> {
    let source = source.as_ref().to_path_buf();
    let destination = destination.as_ref().to_path_buf();
    tokio::task::spawn_blocking(move || convert_with_options(&source, &destination, &options))
        .await
        .map_err(|e| Error::Other(format!("conversion task failed: {}", e)))?
}

/// Parse a source file with the given options.
pub(crate) fn load(path: &Path, options: &ConvertOptions) -> Result<crate::model::Document> {
    OfdParser::open_with_options(path, options.read.clone())?.parse()
}

/// Write through a temporary file in the destination directory, then
/// rename it over the destination.
pub(crate) fn write_atomic<F>(destination: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut dyn Write) -> Result<()>,
{
    let dir = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(temp.as_file_mut());
        write(&mut writer)?;
        writer.flush()?;
    }
    temp.as_file().sync_all()?;
    temp.persist(destination)?;

    log::debug!("wrote {}", destination.display());
    Ok(())
}

/// Trait for document converters.
///
/// Implement this trait to add support for a new output format.
pub trait DocumentConverter: Send + Sync {
    /// Get the output file extensions this converter produces.
    ///
    /// Extensions should be lowercase without the leading dot (e.g., `["pdf"]`).
    fn supported_extensions(&self) -> &[&str];

    /// Get the name of this converter.
    fn name(&self) -> &str;

    /// Convert the OFD file at `source` and write the result to `destination`.
    fn convert(&self, source: &Path, destination: &Path, options: &ConvertOptions) -> Result<()>;

    /// Convert OFD bytes to output bytes.
    fn convert_bytes(&self, data: &[u8], options: &ConvertOptions) -> Result<Vec<u8>>;

    /// Check if this converter supports the given extension.
    fn supports_extension(&self, ext: &str) -> bool {
        let ext_lower = ext.to_lowercase();
        self.supported_extensions().iter().any(|e| *e == ext_lower)
    }
}

/// Registry for document converters.
///
/// The registry maps destination extensions to converters.
pub struct ConverterRegistry {
    converters: HashMap<String, Arc<dyn DocumentConverter>>,
    by_name: HashMap<String, Arc<dyn DocumentConverter>>,
}

impl ConverterRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            converters: HashMap::new(),
            by_name: HashMap::new(),
        }
    }

    /// Create a registry with the PDF, text and JSON converters.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(PdfConverter::new()));
        registry.register(Arc::new(TextConverter::new()));
        registry.register(Arc::new(JsonConverter::new()));
        registry
    }

    /// Register a converter.
    ///
    /// The converter will be registered for all its supported extensions.
    pub fn register(&mut self, converter: Arc<dyn DocumentConverter>) {
        for ext in converter.supported_extensions() {
            self.converters
                .insert(ext.to_lowercase(), converter.clone());
        }
        self.by_name
            .insert(converter.name().to_lowercase(), converter);
    }

    /// Get a converter by file extension.
    pub fn get_by_extension(&self, ext: &str) -> Option<Arc<dyn DocumentConverter>> {
        self.converters.get(&ext.to_lowercase()).cloned()
    }

    /// Get a converter by name.
    pub fn get_by_name(&self, name: &str) -> Option<Arc<dyn DocumentConverter>> {
        self.by_name.get(&name.to_lowercase()).cloned()
    }

    /// Check if an extension is supported.
    pub fn supports(&self, ext: &str) -> bool {
        self.converters.contains_key(&ext.to_lowercase())
    }

    /// Get all supported extensions, sorted.
    pub fn supported_extensions(&self) -> Vec<&str> {
        let mut extensions: Vec<&str> = self.converters.keys().map(|s| s.as_str()).collect();
        extensions.sort_unstable();
        extensions
    }

    /// Convert a file, picking the converter from the destination extension.
    pub fn convert(
        &self,
        source: &Path,
        destination: &Path,
        options: &ConvertOptions,
    ) -> Result<()> {
        let ext = destination
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| Error::Other("Destination has no extension".into()))?;

        let converter = self
            .get_by_extension(ext)
            .ok_or_else(|| Error::Other(format!("No converter for extension: {}", ext)))?;

        converter.convert(source, destination, options)
    }

    /// Convert bytes using the specified extension to determine the converter.
    pub fn convert_bytes(
        &self,
        data: &[u8],
        ext: &str,
        options: &ConvertOptions,
    ) -> Result<Vec<u8>> {
        let converter = self
            .get_by_extension(ext)
            .ok_or_else(|| Error::Other(format!("No converter for extension: {}", ext)))?;

        converter.convert_bytes(data, options)
    }
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
