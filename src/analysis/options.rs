//! Outline options and configuration.

use std::time::Duration;

use crate::error::{Error, Result};

use super::headings::DEFAULT_MAX_HEADINGS;

/// Default number of pages read from each document.
pub const DEFAULT_MAX_PAGES: u32 = 50;

/// Default soft per-document time budget.
pub const DEFAULT_TIME_BUDGET: Duration = Duration::from_secs(10);

/// Options for inferring document outlines.
#[derive(Debug, Clone, PartialEq)]
pub struct OutlineOptions {
    /// Pages read from each document (later pages are dropped)
    pub max_pages: u32,

    /// Maximum number of headings kept per document
    pub max_headings: usize,

    /// Emit a nested outline instead of the flat leveled sequence
    pub hierarchy: bool,

    /// Prefer the container's metadata title when present
    pub use_metadata_title: bool,

    /// Do not repeat the content-based title as a heading
    pub exclude_title_from_outline: bool,

    /// Force a language tag instead of detecting one
    pub language: Option<String>,

    /// Whether batch processing runs documents in parallel
    pub parallel: bool,

    /// Soft wall-clock budget per document; exceeding it is only logged
    pub time_budget: Duration,
}

impl OutlineOptions {
    /// Create new outline options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page cap.
    pub fn with_max_pages(mut self, pages: u32) -> Self {
        self.max_pages = pages;
        self
    }

    /// Set the heading cap.
    pub fn with_max_headings(mut self, headings: usize) -> Self {
        self.max_headings = headings;
        self
    }

    /// Emit a nested outline.
    pub fn nested(mut self) -> Self {
        self.hierarchy = true;
        self
    }

    /// Enable or disable the nested outline.
    pub fn with_hierarchy(mut self, hierarchy: bool) -> Self {
        self.hierarchy = hierarchy;
        self
    }

    /// Enable or disable the metadata title.
    pub fn with_metadata_title(mut self, use_metadata: bool) -> Self {
        self.use_metadata_title = use_metadata;
        self
    }

    /// Keep or drop the content title from the heading list.
    pub fn with_title_excluded(mut self, exclude: bool) -> Self {
        self.exclude_title_from_outline = exclude;
        self
    }

    /// Force a language tag.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Enable or disable parallel batch processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel batch processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Set the soft per-document time budget.
    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = budget;
        self
    }

    /// Check that every value is usable.
    pub fn validate(&self) -> Result<()> {
        if self.max_pages == 0 {
            return Err(Error::InvalidOption("max_pages must be at least 1".into()));
        }
        if self.max_headings == 0 {
            return Err(Error::InvalidOption(
                "max_headings must be at least 1".into(),
            ));
        }
        if let Some(language) = &self.language {
            let valid = !language.is_empty()
                && language.len() <= 8
                && language.chars().all(|c| c.is_ascii_alphabetic() || c == '-');
            if !valid {
                return Err(Error::InvalidOption(format!(
                    "language tag '{}' is not valid",
                    language
                )));
            }
        }
        Ok(())
    }
}

impl Default for OutlineOptions {
    fn default() -> Self {
        Self {
            max_pages: DEFAULT_MAX_PAGES,
            max_headings: DEFAULT_MAX_HEADINGS,
            hierarchy: false,
            use_metadata_title: true,
            exclude_title_from_outline: true,
            language: None,
            parallel: true,
            time_budget: DEFAULT_TIME_BUDGET,
        }
    }
}
