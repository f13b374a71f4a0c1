//! # pdf-outline
//!
//! Heuristic title and heading outline inference for PDF documents.
//!
//! This library reads the positioned, styled text lines of a PDF and infers
//! a document title plus a three-level (H1/H2/H3) outline from font sizes,
//! boldness, position and text shape. It does not rely on the document's own
//! bookmarks.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdf_outline::{outline_file, render};
//!
//! fn main() -> pdf_outline::Result<()> {
//!     // Infer the outline of a PDF file
//!     let result = outline_file("report.pdf");
//!
//!     // Serialize as {title, outline, language}
//!     let json = render::to_json(&result, render::JsonFormat::Pretty)?;
//!     println!("{}", json);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Layout-aware extraction**: Text lines with size, weight and position
//! - **Multilingual**: Heading patterns for Latin, CJK, Arabic and Devanagari text
//! - **Flat or nested output**: Leveled heading list or a heading tree
//! - **Graceful degradation**: Failed documents yield a default result
//! - **Parallel batches**: Uses Rayon across documents

pub mod analysis;
pub mod detect;
pub mod error;
pub mod extract;
pub mod lang;
pub mod model;
pub mod pipeline;
pub mod render;

// Re-export commonly used types
pub use analysis::{HeadingTables, OutlineOptions};
pub use detect::{detect_pdf, is_pdf, PdfHeader};
pub use error::{Error, Result};
pub use extract::{ExtractedDocument, Extractor, FragmentSource};
pub use lang::{LanguageDetector, ScriptDetector, StatisticalDetector};
pub use model::{
    Fragment, HeadingLevel, LeveledHeading, Outline, OutlineNode, ProcessingResult, UNTITLED,
};
pub use pipeline::{BatchItem, OutlineExtractor};
pub use render::JsonFormat;

use std::path::Path;

/// Infer the title and outline of a PDF file.
///
/// Never fails: a document that cannot be read yields
/// [`ProcessingResult::untitled`].
///
/// # Example
///
/// ```no_run
/// use pdf_outline::outline_file;
///
/// let result = outline_file("report.pdf");
/// println!("{} ({} headings)", result.title, result.heading_count());
/// ```
pub fn outline_file<P: AsRef<Path>>(path: P) -> ProcessingResult {
    OutlineExtractor::new().process_file(path)
}

/// Infer the title and outline of a PDF file with custom options.
///
/// # Example
///
/// ```no_run
/// use pdf_outline::{outline_file_with_options, OutlineOptions};
///
/// let options = OutlineOptions::new().nested().with_max_pages(10);
/// let result = outline_file_with_options("report.pdf", options).unwrap();
/// ```
pub fn outline_file_with_options<P: AsRef<Path>>(
    path: P,
    options: OutlineOptions,
) -> Result<ProcessingResult> {
    Ok(OutlineExtractor::with_options(options)?.process_file(path))
}

/// Infer the title and outline of a PDF held in memory.
///
/// # Example
///
/// ```no_run
/// use pdf_outline::outline_bytes;
///
/// let data = std::fs::read("report.pdf").unwrap();
/// let result = outline_bytes(&data);
/// ```
pub fn outline_bytes(data: &[u8]) -> ProcessingResult {
    OutlineExtractor::new().process_bytes(data)
}

/// Infer the title and outline of fragments extracted elsewhere.
///
/// # Example
///
/// ```
/// use pdf_outline::{outline_fragments, Fragment};
///
/// let fragments = vec![
///     Fragment::new("Quarterly Results", 24.0, 1).bold(true).at(200.0, 60.0),
///     Fragment::new("Revenue grew in every region this quarter.", 11.0, 1),
/// ];
/// let result = outline_fragments(fragments, None);
/// assert_eq!(result.title, "Quarterly Results");
/// ```
pub fn outline_fragments(fragments: Vec<Fragment>, metadata_title: Option<&str>) -> ProcessingResult {
    OutlineExtractor::new().process_fragments(fragments, metadata_title)
}
