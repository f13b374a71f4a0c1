//! Plain-text fallback extraction.

use crate::error::Result;
use crate::model::{Fragment, MIN_SHORT_TEXT};

use super::backend::{LopdfBackend, PageId, PdfBackend};
use super::{extract_pages, ExtractedDocument, FragmentSource};

/// Font size given to every plain-text fragment.
pub const PLAIN_FONT_SIZE: f32 = 12.0;

/// Extraction without layout: one fragment per text line, no style or position.
///
/// Used when positioned extraction fails. Every fragment has the same size,
/// so titles and headings can only come from text shape.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextSource;

/// Split page text into fragments.
pub fn text_to_fragments(text: &str, page_number: u32) -> Vec<Fragment> {
    text.lines()
        .map(str::trim)
        .filter(|line| line.chars().count() >= MIN_SHORT_TEXT)
        .map(|line| Fragment::new(line, PLAIN_FONT_SIZE, page_number))
        .collect()
}

fn page_fragments<B>(backend: &B, page_number: u32, _page: PageId) -> Result<Vec<Fragment>>
where
    B: PdfBackend + ?Sized,
{
    let text = backend.page_text(page_number)?;
    Ok(text_to_fragments(&text, page_number))
}

impl FragmentSource for PlainTextSource {
    fn name(&self) -> &'static str {
        "plain-text"
    }

    fn extract(&self, data: &[u8], max_pages: u32) -> Result<ExtractedDocument> {
        let backend = LopdfBackend::load_bytes(data)?;
        Ok(extract_pages(&backend, max_pages, page_fragments))
    }
}
