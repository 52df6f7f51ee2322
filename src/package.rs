//! OFD container access.
//!
//! An OFD file is a zip archive whose parts are addressed with `ST_Loc`
//! paths. This module wraps the archive and resolves those paths.

use crate::error::{Error, Result};
use std::collections::BTreeMap;
use std::io::{Read, Seek};
use zip::ZipArchive;

/// Name of the container entry point.
pub const ROOT_ENTRY: &str = "OFD.xml";

/// A scoped handle on an OFD zip container.
///
/// The underlying reader (usually a file) is released when the package drops.
pub struct OfdPackage<R: Read + Seek> {
    archive: ZipArchive<R>,
    /// Lowercased, normalised entry name -> name stored in the archive
    index: BTreeMap<String, String>,
}

impl<R: Read + Seek> OfdPackage<R> {
    /// Open a container from a source that implements Read + Seek.
    pub fn new(reader: R) -> Result<Self> {
        let archive = ZipArchive::new(reader)
            .map_err(|e| Error::UnsupportedFormat(format!("invalid zip container: {}", e)))?;

        let index = archive
            .file_names()
            .filter(|name| !name.ends_with('/'))
            .map(|name| (normalize_entry_name(name).to_lowercase(), name.to_string()))
            .collect();

        Ok(Self { archive, index })
    }

    /// Find the archive name for a container path.
    ///
    /// Exact matches win; otherwise the lookup falls back to a
    /// case-insensitive match, which real-world producers rely on.
    pub fn find_entry(&self, path: &str) -> Option<String> {
        let normalized = normalize_entry_name(path);
        if self.archive.index_for_name(&normalized).is_some() {
            return Some(normalized);
        }
        self.index.get(&normalized.to_lowercase()).cloned()
    }

    /// Check if a part exists in the container.
    pub fn exists(&self, path: &str) -> bool {
        self.find_entry(path).is_some()
    }

    /// All file entries in the container, normalised.
    pub fn entry_names(&self) -> Vec<String> {
        self.index.values().map(|n| normalize_entry_name(n)).collect()
    }

    /// Read a part as bytes.
    pub fn read_bytes(&mut self, path: &str) -> Result<Vec<u8>> {
        let name = self
            .find_entry(path)
            .ok_or_else(|| Error::MissingPart(path.to_string()))?;

        let mut file = self.archive.by_name(&name).map_err(|e| match e {
            zip::result::ZipError::FileNotFound => Error::MissingPart(path.to_string()),
            other => Error::from(other),
        })?;

        let mut contents = Vec::with_capacity(initial_capacity(file.size()));
        file.read_to_end(&mut contents)?;
        Ok(contents)
    }

    /// Read a part as a UTF-8 string, dropping a leading byte order mark.
    pub fn read_string(&mut self, path: &str) -> Result<String> {
        let bytes = self.read_bytes(path)?;
        let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(&bytes);
        match std::str::from_utf8(bytes) {
            Ok(s) => Ok(s.to_string()),
            Err(_) => {
                log::warn!("{} is not valid UTF-8, decoding lossily", path);
                Ok(String::from_utf8_lossy(bytes).into_owned())
            }
        }
    }

    /// Size in bytes of a part, if present.
    pub fn entry_size(&mut self, path: &str) -> Option<u64> {
        let name = self.find_entry(path)?;
        self.archive.by_name(&name).ok().map(|f| f.size())
    }
}

/// Largest buffer reserved up front from a declared entry size.
const MAX_PREALLOC: u64 = 64 * 1024 * 1024;

/// Buffer size to reserve for an entry; the declared size comes from the
/// archive and is not trusted beyond `MAX_PREALLOC`.
fn initial_capacity(declared: u64) -> usize {
    usize::try_from(declared.min(MAX_PREALLOC)).unwrap_or(0)
}

/// Strip leading separators and unify backslashes.
fn normalize_entry_name(name: &str) -> String {
    name.replace('\\', "/").trim_start_matches('/').to_string()
}

/// Directory part of a container path ("Doc_0/Document.xml" -> "Doc_0").
pub fn parent_dir(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[..idx],
        None => "",
    }
}

/// Resolve an `ST_Loc` against the directory of the file that references it.
///
/// Absolute locations (leading `/`) start at the container root. `.` and
/// `..` segments are collapsed; a location may not climb above the root.
pub fn resolve_loc(base_dir: &str, loc: &str) -> Result<String> {
    let loc = loc.trim().replace('\\', "/");
    if loc.is_empty() {
        return Err(Error::MissingPart("empty location".into()));
    }

    let mut segments: Vec<&str> = Vec::new();
    if !loc.starts_with('/') {
        segments.extend(base_dir.split('/').filter(|s| !s.is_empty() && *s != "."));
    }

    for segment in loc.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.pop().is_none() {
                    return Err(Error::MissingPart(format!(
                        "location escapes container root: {}",
                        loc
                    )));
                }
            }
            s => segments.push(s),
        }
    }

    Ok(segments.join("/"))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;

    /// Build an in-memory zip container from (name, content) pairs.
    pub(crate) fn zip_bytes<C: AsRef<[u8]>>(entries: &[(&str, C)]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (name, content) in entries {
            writer
                .start_file(*name, SimpleFileOptions::default())
                .unwrap();
            writer.write_all(content.as_ref()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_resolve_relative() {
        assert_eq!(
            resolve_loc("Doc_0", "Pages/Page_0/Content.xml").unwrap(),
            "Doc_0/Pages/Page_0/Content.xml"
        );
        assert_eq!(resolve_loc("", "OFD.xml").unwrap(), "OFD.xml");
    }

    #[test]
    fn test_resolve_absolute() {
        assert_eq!(
            resolve_loc("Doc_0/Pages", "/Doc_0/Res/image_1.png").unwrap(),
            "Doc_0/Res/image_1.png"
        );
    }

    #[test]
    fn test_resolve_dot_segments() {
        assert_eq!(
            resolve_loc("Doc_0/Pages/Page_0", "../../Res/./font.ttf").unwrap(),
            "Doc_0/Res/font.ttf"
        );
        assert_eq!(
            resolve_loc("Doc_0", "Res\\image.png").unwrap(),
            "Doc_0/Res/image.png"
        );
    }

    #[test]
    fn test_resolve_escape_rejected() {
        assert!(resolve_loc("Doc_0", "../../secret").is_err());
        assert!(resolve_loc("Doc_0", "   ").is_err());
    }

    #[test]
    fn test_initial_capacity_is_capped() {
        assert_eq!(initial_capacity(0), 0);
        assert_eq!(initial_capacity(4096), 4096);
        assert_eq!(initial_capacity(u64::MAX), MAX_PREALLOC as usize);
    }

    #[test]
    fn test_parent_dir() {
        assert_eq!(parent_dir("Doc_0/Document.xml"), "Doc_0");
        assert_eq!(parent_dir("OFD.xml"), "");
    }

    #[test]
    fn test_package_lookup_case_insensitive() {
        let data = zip_bytes(&[("ofd.xml", "<OFD/>"), ("Doc_0/Document.xml", "<Document/>")]);
        let mut package = OfdPackage::new(Cursor::new(data)).unwrap();

        assert!(package.exists("OFD.xml"));
        assert!(package.exists("/Doc_0/Document.xml"));
        assert!(!package.exists("Doc_0/Missing.xml"));
        assert_eq!(package.read_string("OFD.xml").unwrap(), "<OFD/>");
    }

    #[test]
    fn test_package_missing_part() {
        let data = zip_bytes(&[("OFD.xml", "<OFD/>")]);
        let mut package = OfdPackage::new(Cursor::new(data)).unwrap();
        let result = package.read_bytes("Doc_0/Document.xml");
        assert!(matches!(result, Err(Error::MissingPart(_))));
    }

    #[test]
    fn test_package_rejects_garbage() {
        let result = OfdPackage::new(Cursor::new(b"not a zip file".to_vec()));
        assert!(matches!(result, Err(Error::UnsupportedFormat(_))));
    }
}
