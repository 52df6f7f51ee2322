//! OFD parsing module.

mod content;
mod document;
mod ofd_parser;
mod options;
mod resource;
mod signature;
pub mod xml;

pub use ofd_parser::OfdParser;
pub use options::{ErrorMode, ReadOptions};
