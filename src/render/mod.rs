//! Rendering module for converting parsed documents to output formats.

mod json;
mod options;
pub mod pdf;
mod text;

pub use json::{to_json, JsonFormat};
pub use options::{ExportOptions, PageSelection, DEFAULT_PRODUCER};
pub use pdf::{to_pdf, write_pdf};
pub use text::to_text;
