//! Heuristic outline inference.
//!
//! Every stage is a pure pass over the fragments of one document:
//!
//! 1. [`FontStatistics`] calibrates what "large" means for this document
//! 2. [`TitleSelector`] picks the title from the first page
//! 3. [`HeadingScorer`] scores, filters and ranks heading candidates
//! 4. [`assign_levels`] levels the candidates and puts them in reading order
//! 5. [`build_hierarchy`] optionally nests the leveled headings

mod headings;
mod hierarchy;
mod levels;
mod options;
mod rules;
mod stats;
mod tables;
mod title;

pub use headings::{HeadingCandidate, HeadingScorer, DEFAULT_MAX_HEADINGS, HEADING_THRESHOLD};
pub use hierarchy::{build_hierarchy, flatten};
pub use levels::{assign_levels, level_for};
pub use options::{OutlineOptions, DEFAULT_MAX_PAGES, DEFAULT_TIME_BUDGET};
pub use rules::{banded_rules, Rule, Scorecard, ScoringContext};
pub use stats::{FontStatistics, SizeThresholds, DEFAULT_MEAN_SIZE};
pub use tables::{HeadingTables, LanguageProfile};
pub use title::{
    TitleChoice, TitleSelector, TitleSource, MIN_METADATA_TITLE_LEN, TITLE_THRESHOLD,
};
