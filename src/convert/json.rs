//! JSON converter implementation.

use crate::error::Result;
use crate::parser::OfdParser;
use crate::render::{to_json, JsonFormat};
use std::io::Write;
use std::path::Path;

use super::{load, write_atomic, ConvertOptions, DocumentConverter};

/// OFD to JSON converter, serializing the parsed document model.
#[derive(Debug, Clone, Default)]
pub struct JsonConverter {
    format: JsonFormat,
}

impl JsonConverter {
    /// Create a new JSON converter with pretty output.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output format.
    pub fn with_format(mut self, format: JsonFormat) -> Self {
        self.format = format;
        self
    }
}

impl DocumentConverter for JsonConverter {
    fn supported_extensions(&self) -> &[&str] {
        &["json"]
    }

    fn name(&self) -> &str {
        "json"
    }

    fn convert(&self, source: &Path, destination: &Path, options: &ConvertOptions) -> Result<()> {
        let mut read = options.read.clone().with_media(false);
        read.attachments = false;
        let options = options.clone().with_read_options(read);
        let json = to_json(&load(source, &options)?, self.format)?;
        write_atomic(destination, |writer| Ok(writer.write_all(json.as_bytes())?))
    }

    fn convert_bytes(&self, data: &[u8], options: &ConvertOptions) -> Result<Vec<u8>> {
        let read = options.read.clone().with_media(false);
        let doc = OfdParser::from_bytes_with_options(data, read)?.parse()?;
        Ok(to_json(&doc, self.format)?.into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_converter() {
        let converter = JsonConverter::new().with_format(JsonFormat::Compact);
        assert_eq!(converter.supported_extensions(), &["json"]);
        assert_eq!(converter.format, JsonFormat::Compact);
    }
}
