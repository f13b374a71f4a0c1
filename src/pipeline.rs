//! The per-document outline pipeline.
//!
//! [`OutlineExtractor`] ties extraction and analysis together. Every document
//! runs in isolation: an error or panic in one run becomes the default result
//! for that document and never reaches the others.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rayon::prelude::*;

use crate::analysis::{
    assign_levels, build_hierarchy, FontStatistics, HeadingScorer, HeadingTables,
    OutlineOptions, ScoringContext, TitleSelector, TitleSource,
};
use crate::error::{Error, Result};
use crate::extract::Extractor;
use crate::lang::{assign_language, detect_document_language, LanguageDetector, ScriptDetector};
use crate::model::{Fragment, Outline, ProcessingResult};

/// Outcome of one document in a batch.
#[derive(Debug, Clone)]
pub struct BatchItem {
    /// Input path
    pub path: PathBuf,
    /// Result, degraded to the default on failure
    pub result: ProcessingResult,
    /// Wall-clock time spent on the document
    pub elapsed: Duration,
    /// Why the document degraded, if it did
    pub error: Option<String>,
}

impl BatchItem {
    /// Whether the document was processed without error.
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Infers titles and outlines from PDF documents or fragment lists.
///
/// # Example
///
/// ```no_run
/// use pdf_outline::{OutlineExtractor, OutlineOptions};
///
/// let extractor = OutlineExtractor::with_options(OutlineOptions::new().nested())?;
/// let result = extractor.process_file("report.pdf");
/// println!("{}: {} headings", result.title, result.heading_count());
/// # Ok::<(), pdf_outline::Error>(())
/// ```
pub struct OutlineExtractor {
    options: OutlineOptions,
    tables: Arc<HeadingTables>,
    detector: Arc<dyn LanguageDetector>,
    extractor: Extractor,
    title_selector: TitleSelector,
    heading_scorer: HeadingScorer,
}

impl OutlineExtractor {
    /// Create an extractor with default options.
    pub fn new() -> Self {
        Self::build(OutlineOptions::default())
    }

    /// Create an extractor with validated options.
    pub fn with_options(options: OutlineOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self::build(options))
    }

    fn build(options: OutlineOptions) -> Self {
        Self {
            heading_scorer: HeadingScorer::new(options.max_headings),
            title_selector: TitleSelector::new(),
            tables: Arc::new(HeadingTables::builtin()),
            detector: Arc::new(ScriptDetector::new()),
            extractor: Extractor::probe(),
            options,
        }
    }

    /// Replace the language detector.
    pub fn with_detector(mut self, detector: impl LanguageDetector + 'static) -> Self {
        self.detector = Arc::new(detector);
        self
    }

    /// Replace the fragment extractor.
    pub fn with_extractor(mut self, extractor: Extractor) -> Self {
        self.extractor = extractor;
        self
    }

    /// Share heading tables with other extractors.
    pub fn with_tables(mut self, tables: Arc<HeadingTables>) -> Self {
        self.tables = tables;
        self
    }

    /// The options in use.
    pub fn options(&self) -> &OutlineOptions {
        &self.options
    }

    /// The heading tables in use.
    pub fn tables(&self) -> &Arc<HeadingTables> {
        &self.tables
    }

    /// Infer the outline of already extracted fragments.
    ///
    /// Fragments that agree on a language tag keep it; otherwise the
    /// language is detected, unless one is forced by the options.
    pub fn process_fragments(
        &self,
        fragments: Vec<Fragment>,
        metadata_title: Option<&str>,
    ) -> ProcessingResult {
        self.try_process_fragments(fragments, metadata_title)
            .unwrap_or_else(|e| degrade("fragments", &e))
    }

    /// Like [`process_fragments`](Self::process_fragments), reporting an
    /// internal fault instead of degrading.
    pub fn try_process_fragments(
        &self,
        fragments: Vec<Fragment>,
        metadata_title: Option<&str>,
    ) -> Result<ProcessingResult> {
        self.guarded("fragments", || Ok(self.analyze(fragments, metadata_title, false)))
    }

    /// Extract and analyze a PDF held in memory.
    pub fn process_bytes(&self, data: &[u8]) -> ProcessingResult {
        self.try_process_bytes(data)
            .unwrap_or_else(|e| degrade("bytes", &e))
    }

    /// Like [`process_bytes`](Self::process_bytes), returning the error.
    pub fn try_process_bytes(&self, data: &[u8]) -> Result<ProcessingResult> {
        self.guarded("bytes", || {
            let doc = self.extractor.extract(data, self.options.max_pages)?;
            Ok(self.analyze(doc.fragments, doc.metadata_title.as_deref(), true))
        })
    }

    /// Extract and analyze a PDF file.
    pub fn process_file<P: AsRef<Path>>(&self, path: P) -> ProcessingResult {
        let path = path.as_ref();
        self.try_process_file(path)
            .unwrap_or_else(|e| degrade(&path.display().to_string(), &e))
    }

    /// Like [`process_file`](Self::process_file), returning the error.
    pub fn try_process_file<P: AsRef<Path>>(&self, path: P) -> Result<ProcessingResult> {
        let path = path.as_ref();
        self.guarded(&path.display().to_string(), || {
            let doc = self.extractor.extract_file(path, self.options.max_pages)?;
            Ok(self.analyze(doc.fragments, doc.metadata_title.as_deref(), true))
        })
    }

    /// Process many files, in parallel unless the options say otherwise.
    ///
    /// Items come back in input order. A failing document yields the default
    /// result and an error message; it does not affect the rest.
    pub fn process_batch<P>(&self, paths: &[P]) -> Vec<BatchItem>
    where
        P: AsRef<Path> + Sync,
    {
        self.process_batch_with(paths, |_| {})
    }

    /// Like [`process_batch`](Self::process_batch), calling `on_done` as each
    /// document finishes. With parallel processing the calls arrive in
    /// completion order, from worker threads.
    pub fn process_batch_with<P, F>(&self, paths: &[P], on_done: F) -> Vec<BatchItem>
    where
        P: AsRef<Path> + Sync,
        F: Fn(&BatchItem) + Sync,
    {
        let run = |path: &P| {
            let item = self.batch_item(path.as_ref());
            on_done(&item);
            item
        };

        if self.options.parallel {
            paths.par_iter().map(run).collect()
        } else {
            paths.iter().map(run).collect()
        }
    }

    fn batch_item(&self, path: &Path) -> BatchItem {
        let started = Instant::now();
        let outcome = self.try_process_file(path);
        let elapsed = started.elapsed();
        match outcome {
            Ok(result) => BatchItem {
                path: path.to_path_buf(),
                result,
                elapsed,
                error: None,
            },
            Err(e) => BatchItem {
                path: path.to_path_buf(),
                result: degrade(&path.display().to_string(), &e),
                elapsed,
                error: Some(e.to_string()),
            },
        }
    }

    /// Run the analysis stages over one document's fragments.
    fn analyze(
        &self,
        mut fragments: Vec<Fragment>,
        metadata_title: Option<&str>,
        extracted: bool,
    ) -> ProcessingResult {
        if fragments.is_empty() {
            log::debug!("No fragments, returning default result");
            return ProcessingResult::untitled();
        }

        let language = self.resolve_language(&fragments, extracted);
        assign_language(&mut fragments, &language);

        let stats = FontStatistics::from_fragments(&fragments);
        log::debug!(
            "Font statistics over {} fragments: mean {:.2}, thresholds {:?}",
            fragments.len(),
            stats.mean_size,
            stats.thresholds
        );
        let ctx = ScoringContext::new(&stats, &self.tables);

        let metadata_title = metadata_title.filter(|_| self.options.use_metadata_title);
        let title = self.title_selector.select(&fragments, metadata_title, &ctx);
        let excluded = match title.source {
            TitleSource::Fragment(index) if self.options.exclude_title_from_outline => Some(index),
            _ => None,
        };

        let candidates = self
            .heading_scorer
            .candidates_excluding(&fragments, &ctx, excluded);
        let leveled = assign_levels(&candidates, &stats, &self.tables);

        let outline = if self.options.hierarchy {
            Outline::Nested(build_hierarchy(&leveled))
        } else {
            Outline::Flat(leveled)
        };

        ProcessingResult {
            title: title.title,
            outline,
            language,
        }
    }

    fn resolve_language(&self, fragments: &[Fragment], extracted: bool) -> String {
        if let Some(language) = &self.options.language {
            return language.clone();
        }

        if !extracted {
            let first = &fragments[0].language;
            if fragments.iter().all(|f| &f.language == first) {
                return first.clone();
            }
        }

        detect_document_language(fragments, self.detector.as_ref())
    }

    /// Run one document, turning panics into errors and logging slow runs.
    fn guarded<F>(&self, label: &str, run: F) -> Result<ProcessingResult>
    where
        F: FnOnce() -> Result<ProcessingResult>,
    {
        let started = Instant::now();
        let outcome = panic::catch_unwind(AssertUnwindSafe(run));

        let elapsed = started.elapsed();
        if elapsed > self.options.time_budget {
            log::warn!(
                "{} took {:.2}s, over the {:.0}s budget",
                label,
                elapsed.as_secs_f64(),
                self.options.time_budget.as_secs_f64()
            );
        }

        outcome.unwrap_or_else(|payload| {
            Err(Error::Internal(format!(
                "panic while processing {}: {}",
                label,
                panic_message(payload.as_ref())
            )))
        })
    }
}

impl Default for OutlineExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for OutlineExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutlineExtractor")
            .field("options", &self.options)
            .field("extractor", &self.extractor)
            .finish_non_exhaustive()
    }
}

fn degrade(label: &str, error: &Error) -> ProcessingResult {
    log::error!("{}: {}; using default result", label, error);
    ProcessingResult::untitled()
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
