//! Error types for ofd2pdf library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for ofd2pdf operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during OFD processing.
#[derive(Error, Debug)]
pub enum Error {
    /// The source document does not exist.
    #[error("File not found: {}", path.display())]
    NotFound {
        /// Path that was looked up
        path: PathBuf,
    },

    /// The file is not a valid OFD container.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The PDF backend failed to build or serialize the output.
    #[error("PDF library error: {0}")]
    Library(String),

    /// An XML part of the container is malformed.
    #[error("XML parsing error: {0}")]
    Xml(String),

    /// A part referenced by the document is missing from the container.
    #[error("Missing container part: {0}")]
    MissingPart(String),

    /// An image resource could not be decoded.
    #[error("Image error: {0}")]
    Image(String),

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// Invalid page range specification.
    #[error("Invalid page range: {0}")]
    InvalidPageRange(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Build a `NotFound` error for a path.
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Error::NotFound { path: path.into() }
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(e) => Error::Io(e),
            zip::result::ZipError::FileNotFound => Error::MissingPart("entry not found".into()),
            _ => Error::UnsupportedFormat(err.to_string()),
        }
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Xml(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::Xml(err.to_string())
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            _ => Error::Library(err.to_string()),
        }
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::IoError(e) => Error::Io(e),
            _ => Error::Image(err.to_string()),
        }
    }
}

impl From<tempfile::PersistError> for Error {
    fn from(err: tempfile::PersistError) -> Self {
        Error::Io(err.error)
    }
}
