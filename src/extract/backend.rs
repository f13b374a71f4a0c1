//! PDF backend abstraction layer.
//!
//! The layout source only talks to [`PdfBackend`]; the lopdf types stay
//! behind [`LopdfBackend`].

use std::collections::BTreeMap;
use std::path::Path;

use lopdf::{Document as LopdfDocument, Object};

use crate::error::{Error, Result};

/// Page identifier: (object number, generation number).
pub type PageId = (u32, u16);

/// US Letter height, used when a page has no readable MediaBox.
pub const DEFAULT_PAGE_HEIGHT: f32 = 792.0;

/// Font resource of a page.
#[derive(Debug, Clone)]
pub struct BackendFontInfo {
    /// Resource name (key in the page's font dictionary)
    pub name: Vec<u8>,
    /// Base font name, e.g. "Helvetica-Bold"
    pub base_font: String,
}

/// A content stream operand.
#[derive(Debug, Clone, PartialEq)]
pub enum PdfValue {
    Integer(i64),
    Real(f32),
    Name(Vec<u8>),
    Str(Vec<u8>),
    Array(Vec<PdfValue>),
    Other,
}

impl PdfValue {
    /// Numeric value of an integer or real operand.
    pub fn as_number(&self) -> Option<f32> {
        match self {
            PdfValue::Integer(i) => Some(*i as f32),
            PdfValue::Real(r) => Some(*r),
            _ => None,
        }
    }
}

/// A single content stream operation.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentOp {
    pub operator: String,
    pub operands: Vec<PdfValue>,
}

impl ContentOp {
    /// Numeric operand at `index`, or `default`.
    pub fn number(&self, index: usize, default: f32) -> f32 {
        self.operands
            .get(index)
            .and_then(PdfValue::as_number)
            .unwrap_or(default)
    }
}

/// Page-level access to a loaded PDF.
pub trait PdfBackend {
    /// All pages as page number → id.
    fn pages(&self) -> BTreeMap<u32, PageId>;

    /// Font resources of a page.
    fn page_fonts(&self, page: PageId) -> Result<Vec<BackendFontInfo>>;

    /// Decompressed content stream of a page.
    fn page_content(&self, page: PageId) -> Result<Vec<u8>>;

    /// Page height from its MediaBox.
    fn page_height(&self, page: PageId) -> f32;

    /// Parse a content stream into operations.
    fn decode_content(&self, data: &[u8]) -> Result<Vec<ContentOp>>;

    /// Decode a string operand with the font's encoding, falling back to
    /// [`decode_text_simple`].
    fn decode_text(&self, page: PageId, font_name: &[u8], bytes: &[u8]) -> String;

    /// Plain text of a page, without layout information.
    fn page_text(&self, page_number: u32) -> Result<String>;

    /// Title from the document information dictionary.
    fn metadata_title(&self) -> Option<String>;
}

/// Decode bytes as UTF-16BE (with BOM), UTF-8, or Latin-1.
pub fn decode_text_simple(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }

    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    bytes.iter().map(|&b| b as char).collect()
}

/// Stream data with filters applied; unfiltered streams come back as stored.
fn stream_bytes(stream: &lopdf::Stream) -> Vec<u8> {
    stream
        .decompressed_content()
        .unwrap_or_else(|_| stream.content.clone())
}

/// [`PdfBackend`] backed by `lopdf::Document`.
pub struct LopdfBackend {
    doc: LopdfDocument,
}

impl LopdfBackend {
    /// Load from a file path.
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::from_document(LopdfDocument::load(path)?))
    }

    /// Load from an in-memory byte slice.
    pub fn load_bytes(data: &[u8]) -> Result<Self> {
        Ok(Self::from_document(LopdfDocument::load_mem(data)?))
    }

    fn from_document(doc: LopdfDocument) -> Self {
        let backend = Self { doc };
        log::debug!("Loaded PDF {}", backend.version());
        // Encrypted documents still load; their strings usually decode to noise.
        if backend.is_encrypted() {
            log::warn!("Document is encrypted, extracted text may be unreadable");
        }
        backend
    }

    /// Check if the document is encrypted.
    pub fn is_encrypted(&self) -> bool {
        self.doc.is_encrypted()
    }

    /// PDF version string.
    pub fn version(&self) -> String {
        self.doc.version.to_string()
    }
}

impl PdfBackend for LopdfBackend {
    fn pages(&self) -> BTreeMap<u32, PageId> {
        self.doc.get_pages()
    }

    fn page_fonts(&self, page: PageId) -> Result<Vec<BackendFontInfo>> {
        let fonts = self.doc.get_page_fonts(page)?;

        Ok(fonts
            .iter()
            .map(|(name, dict)| BackendFontInfo {
                name: name.clone(),
                base_font: dict
                    .get(b"BaseFont")
                    .ok()
                    .and_then(|o| o.as_name().ok())
                    .map(|n| String::from_utf8_lossy(n).to_string())
                    .unwrap_or_else(|| "Unknown".to_string()),
            })
            .collect())
    }

    fn page_content(&self, page_id: PageId) -> Result<Vec<u8>> {
        let page_dict = self.doc.get_dictionary(page_id)?;
        let contents = page_dict.get(b"Contents")?;

        match contents {
            Object::Reference(r) => match self.doc.get_object(*r) {
                Ok(Object::Stream(s)) => Ok(stream_bytes(s)),
                _ => Err(Error::PdfParse("Invalid content stream".to_string())),
            },
            Object::Array(arr) => {
                let mut content = Vec::new();
                for obj in arr {
                    if let Object::Reference(r) = obj {
                        if let Ok(Object::Stream(s)) = self.doc.get_object(*r) {
                            content.extend_from_slice(&stream_bytes(s));
                            content.push(b' ');
                        }
                    }
                }
                Ok(content)
            }
            Object::Stream(s) => Ok(stream_bytes(s)),
            _ => Err(Error::PdfParse("Invalid content stream".to_string())),
        }
    }

    fn page_height(&self, page_id: PageId) -> f32 {
        self.doc
            .get_dictionary(page_id)
            .ok()
            .and_then(|dict| dict.get(b"MediaBox").ok())
            .and_then(|media_box| media_box.as_array().ok())
            .filter(|array| array.len() >= 4)
            .and_then(|array| {
                let bottom = array[1].as_float().unwrap_or(0.0);
                array[3].as_float().ok().map(|top| top - bottom)
            })
            .filter(|height| *height > 0.0)
            .unwrap_or(DEFAULT_PAGE_HEIGHT)
    }

    fn decode_content(&self, data: &[u8]) -> Result<Vec<ContentOp>> {
        let content = lopdf::content::Content::decode(data)?;

        Ok(content
            .operations
            .into_iter()
            .map(|op| ContentOp {
                operands: op.operands.iter().map(convert_object).collect(),
                operator: op.operator,
            })
            .collect())
    }

    fn decode_text(&self, page: PageId, font_name: &[u8], bytes: &[u8]) -> String {
        if let Ok(fonts) = self.doc.get_page_fonts(page) {
            if let Some(font_dict) = fonts.get(font_name) {
                if let Ok(enc) = font_dict.get_font_encoding(&self.doc) {
                    if let Ok(text) = LopdfDocument::decode_text(&enc, bytes) {
                        return text;
                    }
                }
            }
        }
        decode_text_simple(bytes)
    }

    fn page_text(&self, page_number: u32) -> Result<String> {
        let page_count = self.doc.get_pages().len() as u32;
        if page_number == 0 || page_number > page_count {
            return Err(Error::PageOutOfRange(page_number, page_count));
        }
        self.doc
            .extract_text(&[page_number])
            .map_err(|e| Error::TextExtract(format!("Page {}: {}", page_number, e)))
    }

    fn metadata_title(&self) -> Option<String> {
        let info = self.doc.trailer.get(b"Info").ok()?;
        let dict = match info {
            Object::Reference(r) => self.doc.get_dictionary(*r).ok()?,
            Object::Dictionary(d) => d,
            _ => return None,
        };

        let title = match dict.get(b"Title").ok()? {
            Object::String(bytes, _) => decode_text_simple(bytes),
            Object::Name(bytes) => String::from_utf8_lossy(bytes).to_string(),
            _ => return None,
        };
        let title = title.trim_matches(char::from(0)).trim();
        (!title.is_empty()).then(|| title.to_string())
    }
}

fn convert_object(obj: &Object) -> PdfValue {
    match obj {
        Object::Integer(i) => PdfValue::Integer(*i),
        Object::Real(r) => PdfValue::Real(*r),
        Object::Name(n) => PdfValue::Name(n.clone()),
        Object::String(b, _) => PdfValue::Str(b.clone()),
        Object::Array(arr) => PdfValue::Array(arr.iter().map(convert_object).collect()),
        _ => PdfValue::Other,
    }
}
