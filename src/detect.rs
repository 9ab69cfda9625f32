//! DOCX format detection and validation.

use crate::container::{PartReader, ZipContainer};
use crate::error::{Error, Result};
use crate::parser::{resolve_main_part, PartPatterns, CORE_PROPERTIES_PART};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Summary of a DOCX package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocxFormat {
    /// Main document part (e.g. `word/document.xml`)
    pub main_part: String,
    /// Number of parts in the package
    pub part_count: usize,
    /// Whether `docProps/core.xml` is present
    pub has_core_properties: bool,
    /// Number of header parts
    pub header_count: usize,
    /// Number of footer parts
    pub footer_count: usize,
    /// Number of media parts
    pub media_count: usize,
}

impl std::fmt::Display for DocxFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DOCX ({} parts, main part {})", self.part_count, self.main_part)
    }
}

/// ZIP local file header signature.
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
/// ZIP end of central directory signature (empty archive).
const ZIP_EMPTY_MAGIC: &[u8] = b"PK\x05\x06";

/// Whether the data starts with a ZIP signature.
pub fn has_zip_signature(data: &[u8]) -> bool {
    data.starts_with(ZIP_MAGIC) || data.starts_with(ZIP_EMPTY_MAGIC)
}

/// Detect DOCX format from a file path.
///
/// # Example
/// ```no_run
/// use undocx::detect::detect_format_from_path;
///
/// let format = detect_format_from_path("report.docx").unwrap();
/// println!("Main part: {}", format.main_part);
/// ```
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Result<DocxFormat> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    detect_format_from_bytes(&data)
}

/// Detect DOCX format from the complete package bytes.
///
/// # Returns
/// * `Ok(DocxFormat)` if the data is a ZIP package with a main document part
/// * `Err(Error::UnknownFormat)` if the data does not start with a ZIP signature
/// * `Err(Error::InvalidContainer)` if the ZIP cannot be read
/// * `Err(Error::MissingPart)` if there is no main document part
pub fn detect_format_from_bytes(data: &[u8]) -> Result<DocxFormat> {
    if !has_zip_signature(data) {
        return Err(Error::UnknownFormat);
    }

    let mut container = ZipContainer::open(data.to_vec())?;
    let main_part = resolve_main_part(&mut container)?;
    let patterns = PartPatterns::new()?;

    Ok(DocxFormat {
        main_part,
        part_count: container.len(),
        has_core_properties: container.contains(CORE_PROPERTIES_PART),
        header_count: container.part_names(&patterns.headers).len(),
        footer_count: container.part_names(&patterns.footers).len(),
        media_count: container.part_names(&patterns.media).len(),
    })
}

/// Check if a file is a readable DOCX package.
pub fn is_docx<P: AsRef<Path>>(path: P) -> bool {
    detect_format_from_path(path).is_ok()
}

/// Check if bytes are a readable DOCX package.
pub fn is_docx_bytes(data: &[u8]) -> bool {
    detect_format_from_bytes(data).is_ok()
}
