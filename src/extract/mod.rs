//! Fragment extraction from PDF documents.
//!
//! Extraction is a capability behind [`FragmentSource`]. The [`Extractor`]
//! holds the available sources in priority order and falls back to the next
//! one when a source fails or finds no text; the analysis never depends on
//! which source produced the fragments.

mod backend;
mod layout;
mod plain;

use std::path::Path;

use crate::detect::detect_pdf;
use crate::error::{Error, Result};
use crate::model::Fragment;

pub use backend::{
    decode_text_simple, BackendFontInfo, ContentOp, LopdfBackend, PageId, PdfBackend, PdfValue,
    DEFAULT_PAGE_HEIGHT,
};
pub use layout::{
    group_into_lines, page_fragments, spans_from_ops, LayoutSource, TextLine, TextSpan,
};
pub use plain::{text_to_fragments, PlainTextSource, PLAIN_FONT_SIZE};

/// Fragments and metadata read from one document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedDocument {
    /// Fragments of the first `max_pages` pages, in page order
    pub fragments: Vec<Fragment>,
    /// Title from the document information dictionary
    pub metadata_title: Option<String>,
    /// Total number of pages in the document
    pub page_count: u32,
    /// True if pages beyond the cap were dropped
    pub truncated: bool,
}

/// A way of turning PDF bytes into fragments.
pub trait FragmentSource: Send + Sync {
    /// Short name, used in logs.
    fn name(&self) -> &'static str;

    /// Whether this source can run in the current build.
    fn is_available(&self) -> bool {
        true
    }

    /// Extract fragments from at most `max_pages` pages.
    fn extract(&self, data: &[u8], max_pages: u32) -> Result<ExtractedDocument>;
}

/// Walk the first `max_pages` pages of a backend.
///
/// A page that fails to extract is logged and skipped; the rest of the
/// document is still used.
pub fn extract_pages<B, F>(backend: &B, max_pages: u32, mut read_page: F) -> ExtractedDocument
where
    B: PdfBackend + ?Sized,
    F: FnMut(&B, u32, PageId) -> Result<Vec<Fragment>>,
{
    let pages = backend.pages();
    let page_count = pages.len() as u32;
    let truncated = page_count > max_pages;
    if truncated {
        log::warn!(
            "Document has {} pages, only the first {} are read",
            page_count,
            max_pages
        );
    }

    let mut fragments = Vec::new();
    for (&number, &id) in pages.iter().take(max_pages as usize) {
        match read_page(backend, number, id) {
            Ok(page) => fragments.extend(page),
            Err(e) => log::warn!("Skipping page {}: {}", number, e),
        }
    }

    ExtractedDocument {
        fragments,
        metadata_title: backend.metadata_title(),
        page_count,
        truncated,
    }
}

/// Ordered list of fragment sources with fallback.
pub struct Extractor {
    sources: Vec<Box<dyn FragmentSource>>,
}

impl Extractor {
    /// Use every built-in source that is available, layout first.
    pub fn probe() -> Self {
        let candidates: Vec<Box<dyn FragmentSource>> =
            vec![Box::new(LayoutSource), Box::new(PlainTextSource)];
        Self::with_sources(candidates)
    }

    /// Use the given sources in priority order, dropping unavailable ones.
    pub fn with_sources(sources: Vec<Box<dyn FragmentSource>>) -> Self {
        let sources: Vec<_> = sources.into_iter().filter(|s| s.is_available()).collect();
        log::debug!(
            "Extraction sources: {:?}",
            sources.iter().map(|s| s.name()).collect::<Vec<_>>()
        );
        Self { sources }
    }

    /// Names of the sources, in priority order.
    pub fn source_names(&self) -> Vec<&'static str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    /// Extract from PDF bytes.
    ///
    /// Returns the first result with fragments. When every source runs but
    /// finds nothing, the last empty result is returned so its metadata is
    /// kept; when every source fails, the last error is returned.
    pub fn extract(&self, data: &[u8], max_pages: u32) -> Result<ExtractedDocument> {
        let header = detect_pdf(data)?;
        log::debug!("Detected {} at offset {}", header, header.offset);

        let mut empty: Option<ExtractedDocument> = None;
        let mut last_error: Option<Error> = None;

        for source in &self.sources {
            match source.extract(data, max_pages) {
                Ok(doc) if !doc.fragments.is_empty() => {
                    log::debug!(
                        "Source '{}' produced {} fragments from {} pages",
                        source.name(),
                        doc.fragments.len(),
                        doc.page_count
                    );
                    return Ok(doc);
                }
                Ok(doc) => {
                    log::warn!("Source '{}' found no text, trying next", source.name());
                    empty = Some(doc);
                }
                Err(e) => {
                    log::warn!("Source '{}' failed: {}, trying next", source.name(), e);
                    last_error = Some(e);
                }
            }
        }

        match (empty, last_error) {
            (Some(doc), _) => Ok(doc),
            (None, Some(e)) => Err(e),
            (None, None) => Err(Error::NoBackend("no extraction source configured".into())),
        }
    }

    /// Extract from a file on disk.
    pub fn extract_file<P: AsRef<Path>>(
        &self,
        path: P,
        max_pages: u32,
    ) -> Result<ExtractedDocument> {
        let data = std::fs::read(path)?;
        self.extract(&data, max_pages)
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::probe()
    }
}

impl std::fmt::Debug for Extractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Extractor")
            .field("sources", &self.source_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    struct FakeBackend {
        pages: u32,
        failing_page: Option<u32>,
    }

    impl PdfBackend for FakeBackend {
        fn pages(&self) -> BTreeMap<u32, PageId> {
            (1..=self.pages).map(|n| (n, (n + 10, 0))).collect()
        }
        fn page_fonts(&self, _page: PageId) -> Result<Vec<BackendFontInfo>> {
            Ok(Vec::new())
        }
        fn page_content(&self, _page: PageId) -> Result<Vec<u8>> {
            Ok(Vec::new())
        }
        fn page_height(&self, _page: PageId) -> f32 {
            DEFAULT_PAGE_HEIGHT
        }
        fn decode_content(&self, _data: &[u8]) -> Result<Vec<ContentOp>> {
            Ok(Vec::new())
        }
        fn decode_text(&self, _page: PageId, _font: &[u8], bytes: &[u8]) -> String {
            decode_text_simple(bytes)
        }
        fn page_text(&self, page_number: u32) -> Result<String> {
            if Some(page_number) == self.failing_page {
                return Err(Error::TextExtract(format!("page {}", page_number)));
            }
            Ok(format!("Heading {}\nbody of page {}", page_number, page_number))
        }
        fn metadata_title(&self) -> Option<String> {
            Some("Fake".to_string())
        }
    }

    fn plain(backend: &FakeBackend, number: u32, _id: PageId) -> Result<Vec<Fragment>> {
        Ok(text_to_fragments(&backend.page_text(number)?, number))
    }

    #[test]
    fn test_page_cap_and_truncation() {
        let backend = FakeBackend {
            pages: 5,
            failing_page: None,
        };
        let doc = extract_pages(&backend, 3, plain);
        assert_eq!(doc.page_count, 5);
        assert!(doc.truncated);
        assert_eq!(doc.fragments.len(), 6);
        assert_eq!(doc.fragments.last().map(|f| f.page_number), Some(3));
        assert_eq!(doc.metadata_title.as_deref(), Some("Fake"));

        let doc = extract_pages(&backend, 50, plain);
        assert!(!doc.truncated);
        assert_eq!(doc.fragments.len(), 10);
    }

    #[test]
    fn test_failing_page_is_skipped() {
        let backend = FakeBackend {
            pages: 3,
            failing_page: Some(2),
        };
        let doc = extract_pages(&backend, 50, plain);
        let pages: Vec<u32> = doc.fragments.iter().map(|f| f.page_number).collect();
        assert_eq!(pages, [1, 1, 3, 3]);
    }

    struct StaticSource {
        name: &'static str,
        available: bool,
        result: fn() -> Result<ExtractedDocument>,
    }

    impl FragmentSource for StaticSource {
        fn name(&self) -> &'static str {
            self.name
        }
        fn is_available(&self) -> bool {
            self.available
        }
        fn extract(&self, _data: &[u8], _max_pages: u32) -> Result<ExtractedDocument> {
            (self.result)()
        }
    }

    fn failing() -> Result<ExtractedDocument> {
        Err(Error::PdfParse("broken xref".into()))
    }

    fn empty() -> Result<ExtractedDocument> {
        Ok(ExtractedDocument {
            metadata_title: Some("Only Metadata".into()),
            ..Default::default()
        })
    }

    fn one_line() -> Result<ExtractedDocument> {
        Ok(ExtractedDocument {
            fragments: vec![Fragment::new("Found It", 12.0, 1)],
            page_count: 1,
            ..Default::default()
        })
    }

    fn source(
        name: &'static str,
        available: bool,
        result: fn() -> Result<ExtractedDocument>,
    ) -> Box<dyn FragmentSource> {
        Box::new(StaticSource {
            name,
            available,
            result,
        })
    }

    const PDF: &[u8] = b"%PDF-1.4\n";

    #[test]
    fn test_probe_order() {
        assert_eq!(Extractor::probe().source_names(), ["layout", "plain-text"]);
    }

    #[test]
    fn test_unavailable_sources_are_dropped() {
        let extractor = Extractor::with_sources(vec![
            source("missing", false, one_line),
            source("present", true, one_line),
        ]);
        assert_eq!(extractor.source_names(), ["present"]);
    }

    #[test]
    fn test_fallback_chain() {
        let extractor = Extractor::with_sources(vec![
            source("a", true, failing),
            source("b", true, empty),
            source("c", true, one_line),
        ]);
        let doc = extractor.extract(PDF, 50).unwrap();
        assert_eq!(doc.fragments[0].text, "Found It");

        let extractor =
            Extractor::with_sources(vec![source("a", true, empty), source("b", true, failing)]);
        let doc = extractor.extract(PDF, 50).unwrap();
        assert!(doc.fragments.is_empty());
        assert_eq!(doc.metadata_title.as_deref(), Some("Only Metadata"));

        let extractor = Extractor::with_sources(vec![source("a", true, failing)]);
        assert!(matches!(extractor.extract(PDF, 50), Err(Error::PdfParse(_))));

        let extractor = Extractor::with_sources(Vec::new());
        assert!(matches!(extractor.extract(PDF, 50), Err(Error::NoBackend(_))));
    }

    #[test]
    fn test_rejects_non_pdf_bytes() {
        let extractor = Extractor::with_sources(vec![source("a", true, one_line)]);
        assert!(matches!(
            extractor.extract(b"GIF89a....", 50),
            Err(Error::UnknownFormat)
        ));
    }
}
