//! PDF header detection.
//!
//! Readers accept a `%PDF-x.y` header anywhere in the first kilobyte, so
//! files with a short preamble (mail headers, BOMs) are still recognized.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{Error, Result};

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
const VERSION_LEN: usize = 3;

/// How far into the file the header may start.
pub const HEADER_SEARCH_WINDOW: usize = 1024;

/// Location and version of a PDF header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfHeader {
    /// Declared version, e.g. "1.7"
    pub version: String,
    /// Byte offset of `%PDF-`
    pub offset: usize,
}

impl std::fmt::Display for PdfHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PDF {}", self.version)
    }
}

/// Find and validate the PDF header in the leading bytes of a document.
pub fn detect_pdf(data: &[u8]) -> Result<PdfHeader> {
    let window = &data[..data.len().min(HEADER_SEARCH_WINDOW)];
    let offset = window
        .windows(PDF_MAGIC.len())
        .position(|w| w == PDF_MAGIC)
        .ok_or(Error::UnknownFormat)?;

    let start = offset + PDF_MAGIC.len();
    let version_bytes = data
        .get(start..start + VERSION_LEN)
        .ok_or(Error::UnknownFormat)?;
    let version = String::from_utf8_lossy(version_bytes).to_string();

    if !is_valid_version(version_bytes) {
        return Err(Error::UnsupportedVersion(version));
    }

    Ok(PdfHeader { version, offset })
}

/// Detect the PDF header of a file, reading only its first kilobyte.
pub fn detect_pdf_file<P: AsRef<Path>>(path: P) -> Result<PdfHeader> {
    let mut head = Vec::with_capacity(HEADER_SEARCH_WINDOW);
    File::open(path)?
        .take(HEADER_SEARCH_WINDOW as u64)
        .read_to_end(&mut head)?;
    detect_pdf(&head)
}

/// Check whether bytes start like a PDF.
pub fn is_pdf(data: &[u8]) -> bool {
    detect_pdf(data).is_ok()
}

/// Check whether a file looks like a PDF.
pub fn is_pdf_file<P: AsRef<Path>>(path: P) -> bool {
    detect_pdf_file(path).is_ok()
}

/// Versions 1.x and 2.0.
fn is_valid_version(version: &[u8]) -> bool {
    match version {
        [b'1', b'.', minor] => minor.is_ascii_digit(),
        [b'2', b'.', b'0'] => true,
        _ => false,
    }
}
