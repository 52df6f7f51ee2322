//! OFD format detection and validation.

use crate::error::{Error, Result};
use crate::package::{OfdPackage, ROOT_ENTRY};
use crate::parser::xml::{attr, local_name};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;

/// OFD format information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfdFormat {
    /// OFD version declared on the root element (e.g., "1.0", "1.1")
    pub version: String,
    /// Document type declared on the root element ("OFD" or "OFD-A")
    pub doc_type: String,
}

impl std::fmt::Display for OfdFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.doc_type, self.version)
    }
}

/// Zip local file header magic: PK\x03\x04
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

/// Document types accepted on the `OFD` root element.
const ACCEPTED_DOC_TYPES: &[&str] = &["OFD", "OFD-A"];

/// Detect OFD format from a file path.
///
/// # Returns
/// * `Ok(OfdFormat)` if the file is a valid OFD container
/// * `Err(Error::NotFound)` if the file does not exist
/// * `Err(Error::UnsupportedFormat)` if the file is not an OFD container
///
/// # Example
/// ```no_run
/// use ofd2pdf::detect::detect_format_from_path;
///
/// let format = detect_format_from_path("invoice.ofd").unwrap();
/// println!("OFD version: {}", format.version);
/// ```
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Result<OfdFormat> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => Error::not_found(path),
        _ => Error::Io(e),
    })?;
    detect_format_from_reader(BufReader::new(file))
}

/// Detect OFD format from a complete in-memory container.
pub fn detect_format_from_bytes(data: &[u8]) -> Result<OfdFormat> {
    detect_format_from_reader(Cursor::new(data))
}

/// Detect OFD format from any seekable reader.
pub fn detect_format_from_reader<R: Read + Seek>(mut reader: R) -> Result<OfdFormat> {
    let mut magic = [0u8; 4];
    if reader.read_exact(&mut magic).is_err() || magic != ZIP_MAGIC {
        return Err(Error::UnsupportedFormat(
            "not a zip container (missing PK header)".into(),
        ));
    }
    reader.rewind()?;

    let mut package = OfdPackage::new(reader)?;
    let entry = package.find_entry(ROOT_ENTRY).ok_or_else(|| {
        Error::UnsupportedFormat(format!("container has no {} entry", ROOT_ENTRY))
    })?;
    let xml = package.read_string(&entry)?;
    read_root_element(&xml)
}

/// Parse the root element of OFD.xml and validate its attributes.
fn read_root_element(xml: &str) -> Result<OfdFormat> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                if local_name(e.name().as_ref()) != b"OFD" {
                    return Err(Error::UnsupportedFormat(format!(
                        "unexpected root element <{}>",
                        String::from_utf8_lossy(e.name().as_ref())
                    )));
                }

                let version = attr(e, "Version").unwrap_or_else(|| "1.0".to_string());
                let doc_type = attr(e, "DocType").unwrap_or_else(|| "OFD".to_string());
                if !ACCEPTED_DOC_TYPES.contains(&doc_type.as_str()) {
                    return Err(Error::UnsupportedFormat(format!(
                        "unsupported DocType: {}",
                        doc_type
                    )));
                }

                return Ok(OfdFormat { version, doc_type });
            }
            Ok(Event::Eof) => {
                return Err(Error::UnsupportedFormat(format!(
                    "{} has no root element",
                    ROOT_ENTRY
                )))
            }
            Err(e) => return Err(Error::UnsupportedFormat(format!("{}: {}", ROOT_ENTRY, e))),
            _ => {}
        }
    }
}

/// Check if a file is a valid OFD container.
pub fn is_ofd<P: AsRef<Path>>(path: P) -> bool {
    detect_format_from_path(path).is_ok()
}

/// Check if bytes represent a valid OFD container.
pub fn is_ofd_bytes(data: &[u8]) -> bool {
    detect_format_from_bytes(data).is_ok()
}
