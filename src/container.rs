//! Random access to the named parts of a DOCX package.
//!
//! A DOCX file is a ZIP archive. Extraction only ever needs two operations
//! from it: read one part by name, and read every part whose name matches a
//! pattern. [`PartReader`] captures that contract; [`ZipContainer`] implements
//! it over the `zip` crate.

use std::io::{Cursor, Read};
use std::sync::Arc;

use regex::Regex;
use zip::result::ZipError;
use zip::ZipArchive;

use crate::error::{Error, Result};

/// One named part read from a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    /// Full part name inside the package (e.g. `word/media/image1.png`)
    pub name: String,
    /// Raw part bytes
    pub data: Vec<u8>,
}

impl Part {
    /// Create a part.
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    /// Size of the part in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Part data as UTF-8 text, with a leading BOM removed.
    pub fn text(&self) -> Result<&str> {
        let text = std::str::from_utf8(&self.data)
            .map_err(|e| Error::markup(&self.name, format!("invalid UTF-8: {}", e)))?;
        Ok(strip_bom(text))
    }
}

/// Read access to the parts of a package.
///
/// "Not found" is never an error: `read_part` returns `Ok(None)`. Errors are
/// reserved for entries that exist but cannot be read.
pub trait PartReader {
    /// Read a single part by exact name.
    fn read_part(&mut self, name: &str) -> Result<Option<Vec<u8>>>;

    /// Names of all non-directory parts matching `pattern`, in a stable order.
    fn part_names(&self, pattern: &Regex) -> Vec<String>;

    /// Read every non-directory part whose name matches `pattern`.
    fn read_parts(&mut self, pattern: &Regex) -> Result<Vec<Part>> {
        let mut parts = Vec::new();
        for name in self.part_names(pattern) {
            if let Some(data) = self.read_part(&name)? {
                parts.push(Part::new(name, data));
            }
        }
        Ok(parts)
    }

    /// Whether a part with this name exists.
    fn contains(&self, name: &str) -> bool;
}

/// A ZIP-backed package.
///
/// The container keeps its bytes behind an `Arc` so that additional,
/// independent archive handles can be opened over the same buffer (see
/// [`ZipContainer::reopen`]).
pub struct ZipContainer {
    bytes: Arc<[u8]>,
    archive: ZipArchive<Cursor<Arc<[u8]>>>,
    names: Vec<String>,
}

impl ZipContainer {
    /// Open a container over a materialized buffer.
    pub fn open(bytes: impl Into<Arc<[u8]>>) -> Result<Self> {
        let bytes: Arc<[u8]> = bytes.into();
        let archive = ZipArchive::new(Cursor::new(Arc::clone(&bytes)))
            .map_err(|e| Error::InvalidContainer(format!("failed to open package: {}", e)))?;

        // Central directory order, directories excluded.
        let names = archive
            .file_names()
            .filter(|name| !name.ends_with('/'))
            .map(str::to_string)
            .collect::<Vec<_>>();

        log::debug!("Opened package with {} parts", names.len());
        Ok(Self {
            bytes,
            archive,
            names,
        })
    }

    /// Open an independent handle over the same bytes.
    pub fn reopen(&self) -> Result<Self> {
        Self::open(Arc::clone(&self.bytes))
    }

    /// All part names, in central-directory order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of parts (directories excluded).
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the package has no parts.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Shared handle to the underlying bytes.
    pub fn bytes(&self) -> Arc<[u8]> {
        Arc::clone(&self.bytes)
    }

    /// Uncompressed size declared in the archive, without reading the part.
    pub fn declared_size(&mut self, name: &str) -> Option<u64> {
        self.archive.by_name(name).ok().map(|file| file.size())
    }
}

impl PartReader for ZipContainer {
    fn read_part(&mut self, name: &str) -> Result<Option<Vec<u8>>> {
        let mut file = match self.archive.by_name(name) {
            Ok(file) => file,
            Err(ZipError::FileNotFound) => return Ok(None),
            Err(e) => {
                return Err(Error::InvalidContainer(format!(
                    "cannot read part {}: {}",
                    name, e
                )))
            }
        };

        if file.is_dir() {
            return Ok(None);
        }

        let mut data = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut data).map_err(|e| {
            Error::InvalidContainer(format!("cannot decompress part {}: {}", name, e))
        })?;
        Ok(Some(data))
    }

    fn part_names(&self, pattern: &Regex) -> Vec<String> {
        self.names
            .iter()
            .filter(|name| pattern.is_match(name))
            .cloned()
            .collect()
    }

    fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }
}

impl std::fmt::Debug for ZipContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZipContainer")
            .field("size", &self.bytes.len())
            .field("parts", &self.names.len())
            .finish()
    }
}

/// Strip a UTF-8 byte order mark.
pub(crate) fn strip_bom(s: &str) -> &str {
    s.strip_prefix('\u{FEFF}').unwrap_or(s)
}
