//! Heading candidate scoring and ranking.

use crate::model::Fragment;

use super::rules::{banded_rules, Rule, Scorecard, ScoringContext};

/// Minimum score for a fragment to be kept as a heading candidate.
pub const HEADING_THRESHOLD: u32 = 25;

/// Default cap on the number of candidates kept per document.
pub const DEFAULT_MAX_HEADINGS: usize = 50;

/// Relative font size bands, descending.
const RELATIVE_SIZE_BANDS: [(f32, u32); 5] = [
    (1.5, 35),
    (1.3, 30),
    (1.1, 25),
    (0.9, 15),
    (f32::NEG_INFINITY, 5),
];

/// A fragment that survived filtering, with its score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadingCandidate<'a> {
    /// Position of the fragment in the document's fragment list
    pub index: usize,
    /// The fragment itself
    pub fragment: &'a Fragment,
    /// Accumulated score
    pub score: u32,
}

/// Scores every fragment of a document as a potential heading.
#[derive(Debug)]
pub struct HeadingScorer {
    scorecard: Scorecard,
    max_candidates: usize,
}

impl HeadingScorer {
    /// Create a scorer keeping at most `max_candidates` candidates.
    pub fn new(max_candidates: usize) -> Self {
        let mut rules = banded_rules("relative_size", &RELATIVE_SIZE_BANDS, |f, ctx| {
            ctx.stats.relative_size(f.font_size)
        });
        rules.extend([
            Rule::new("bold", 25, |f, _| f.is_bold),
            Rule::new("near_top", 15, |f, _| f.is_near_top()),
            Rule::new("centered", 15, |f, _| f.is_centered()),
            Rule::new("title_case", 20, |f, _| f.is_title_case()),
            Rule::new("heading_pattern", 30, |f, ctx| f.has_heading_pattern(ctx.tables)),
            Rule::new("heading_keywords", 20, |f, ctx| {
                f.has_heading_keywords(ctx.tables)
            }),
            Rule::new("length_5_50", 10, |f, _| (5..=50).contains(&f.char_len())),
            Rule::new("length_51_80", 5, |f, _| (51..=80).contains(&f.char_len())),
        ]);

        Self {
            scorecard: Scorecard::new(rules, HEADING_THRESHOLD),
            max_candidates,
        }
    }

    /// The scorecard used for heading candidates.
    pub fn scorecard(&self) -> &Scorecard {
        &self.scorecard
    }

    /// Maximum number of candidates returned.
    pub fn max_candidates(&self) -> usize {
        self.max_candidates
    }

    /// Check the rejection filters that run before any scoring.
    pub fn passes_filters(fragment: &Fragment) -> bool {
        fragment.is_short_text()
            && !fragment.ends_like_sentence()
            && fragment.word_count() >= 2
            && fragment.has_capitalized_word()
    }

    /// Score, filter, rank and cap the candidates of a document.
    pub fn candidates<'a>(
        &self,
        fragments: &'a [Fragment],
        ctx: &ScoringContext<'_>,
    ) -> Vec<HeadingCandidate<'a>> {
        self.candidates_excluding(fragments, ctx, None)
    }

    /// Like [`candidates`](Self::candidates), never returning the fragment at `excluded`.
    pub fn candidates_excluding<'a>(
        &self,
        fragments: &'a [Fragment],
        ctx: &ScoringContext<'_>,
        excluded: Option<usize>,
    ) -> Vec<HeadingCandidate<'a>> {
        let mut candidates: Vec<HeadingCandidate<'a>> = fragments
            .iter()
            .enumerate()
            .filter(|(index, _)| Some(*index) != excluded)
            .filter(|(_, fragment)| Self::passes_filters(fragment))
            .filter_map(|(index, fragment)| {
                self.scorecard
                    .accept(fragment, ctx)
                    .map(|score| HeadingCandidate {
                        index,
                        fragment,
                        score,
                    })
            })
            .collect();

        let accepted = candidates.len();
        // Stable: equal scores keep document order
        candidates.sort_by(|a, b| b.score.cmp(&a.score));
        candidates.truncate(self.max_candidates);

        log::debug!(
            "Heading candidates: {} accepted, {} kept",
            accepted,
            candidates.len()
        );
        candidates
    }
}

impl Default for HeadingScorer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HEADINGS)
    }
}
