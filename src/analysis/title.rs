//! Document title selection.

use crate::model::{Fragment, UNTITLED};

use super::rules::{banded_rules, Rule, Scorecard, ScoringContext};

/// Minimum score for a first-page fragment to be considered a title.
pub const TITLE_THRESHOLD: u32 = 25;

/// Metadata titles must be longer than this after trimming.
pub const MIN_METADATA_TITLE_LEN: usize = 3;

/// Where the chosen title came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TitleSource {
    /// The container's metadata title
    Metadata,
    /// A first-page fragment, by index into the fragment list
    Fragment(usize),
    /// Nothing qualified
    Fallback,
}

/// The selected title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleChoice {
    /// Title text
    pub title: String,
    /// Origin of the title
    pub source: TitleSource,
}

impl TitleChoice {
    fn fallback() -> Self {
        Self {
            title: UNTITLED.to_string(),
            source: TitleSource::Fallback,
        }
    }
}

/// Picks the best title candidate from the first page.
#[derive(Debug)]
pub struct TitleSelector {
    scorecard: Scorecard,
}

impl TitleSelector {
    /// Create a selector with the standard title rules.
    pub fn new() -> Self {
        let mut rules = banded_rules(
            "size_tier",
            &[(3.0, 30), (2.0, 20), (1.0, 10)],
            |fragment, ctx| Some(size_tier(fragment.font_size, ctx)),
        );
        rules.extend([
            Rule::new("near_top", 15, |f, _| f.is_near_top()),
            Rule::new("centered", 10, |f, _| f.is_centered()),
            Rule::new("bold", 15, |f, _| f.is_bold),
            Rule::new("title_case", 20, |f, _| f.is_title_case()),
        ]);

        Self {
            scorecard: Scorecard::new(rules, TITLE_THRESHOLD),
        }
    }

    /// The scorecard used for title candidates.
    pub fn scorecard(&self) -> &Scorecard {
        &self.scorecard
    }

    /// Choose a title, preferring a usable metadata title.
    pub fn select(
        &self,
        fragments: &[Fragment],
        metadata_title: Option<&str>,
        ctx: &ScoringContext<'_>,
    ) -> TitleChoice {
        if let Some(title) = metadata_title.map(str::trim) {
            if title.chars().count() > MIN_METADATA_TITLE_LEN {
                return TitleChoice {
                    title: title.to_string(),
                    source: TitleSource::Metadata,
                };
            }
        }

        self.select_from_content(fragments, ctx)
    }

    /// Choose a title from first-page fragments only.
    ///
    /// The first fragment with the highest score wins.
    pub fn select_from_content(
        &self,
        fragments: &[Fragment],
        ctx: &ScoringContext<'_>,
    ) -> TitleChoice {
        let mut best: Option<(usize, u32)> = None;

        for (index, fragment) in fragments.iter().enumerate() {
            if fragment.page_number != 1 || !fragment.is_short_text() {
                continue;
            }
            let Some(score) = self.scorecard.accept(fragment, ctx) else {
                continue;
            };
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((index, score));
            }
        }

        match best {
            Some((index, score)) => {
                log::debug!("Title candidate #{} scored {}", index, score);
                TitleChoice {
                    title: fragments[index].text.clone(),
                    source: TitleSource::Fragment(index),
                }
            }
            None => TitleChoice::fallback(),
        }
    }
}

impl Default for TitleSelector {
    fn default() -> Self {
        Self::new()
    }
}

/// 3 = very large, 2 = large, 1 = medium, 0 = below medium.
fn size_tier(font_size: f32, ctx: &ScoringContext<'_>) -> f32 {
    let t = ctx.stats.thresholds_or_fallback();
    if font_size >= t.very_large {
        3.0
    } else if font_size >= t.large {
        2.0
    } else if font_size >= t.medium {
        1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{FontStatistics, HeadingTables};

    fn body(text: &str, page: u32) -> Fragment {
        Fragment::new(text, 10.0, page).at(200.0, 500.0)
    }

    fn select(fragments: &[Fragment], metadata: Option<&str>) -> TitleChoice {
        let stats = FontStatistics::from_fragments(fragments);
        let tables = HeadingTables::builtin();
        let ctx = ScoringContext::new(&stats, &tables);
        TitleSelector::new().select(fragments, metadata, &ctx)
    }

    #[test]
    fn test_selects_large_bold_top_fragment() {
        let fragments = vec![
            Fragment::new("Annual Report 2024", 28.0, 1)
                .bold(true)
                .at(72.0, 80.0),
            body("quarterly numbers follow below", 1),
            body("more body text here", 1),
        ];

        let choice = select(&fragments, None);
        assert_eq!(choice.title, "Annual Report 2024");
        assert_eq!(choice.source, TitleSource::Fragment(0));
    }

    #[test]
    fn test_ignores_later_pages() {
        let fragments = vec![
            body("lowercase body", 1),
            Fragment::new("Big Heading", 30.0, 2).bold(true).at(0.0, 0.0),
        ];
        let choice = select(&fragments, None);
        assert_eq!(choice.title, "Untitled Document");
        assert_eq!(choice.source, TitleSource::Fallback);
    }

    #[test]
    fn test_metadata_title_takes_precedence() {
        let fragments = vec![Fragment::new("Content Title", 28.0, 1).bold(true)];

        let choice = select(&fragments, Some("  Metadata Title "));
        assert_eq!(choice.title, "Metadata Title");
        assert_eq!(choice.source, TitleSource::Metadata);

        // Too short to trust
        let choice = select(&fragments, Some(" abc "));
        assert_eq!(choice.title, "Content Title");
    }

    #[test]
    fn test_ties_go_to_first_fragment() {
        let fragments = vec![
            Fragment::new("First Title", 20.0, 1).bold(true).at(10.0, 10.0),
            Fragment::new("Second Title", 20.0, 1).bold(true).at(10.0, 20.0),
        ];
        let first = select(&fragments, None);
        let second = select(&fragments, None);
        assert_eq!(first.title, "First Title");
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_input() {
        let choice = select(&[], None);
        assert_eq!(choice.title, "Untitled Document");
    }

    #[test]
    fn test_long_fragments_are_skipped() {
        let fragments = vec![Fragment::new("A".repeat(130), 40.0, 1).bold(true)];
        assert_eq!(select(&fragments, None).source, TitleSource::Fallback);
    }

    #[test]
    fn test_fallback_thresholds_without_sizes() {
        let stats = FontStatistics::default();
        let tables = HeadingTables::builtin();
        let ctx = ScoringContext::new(&stats, &tables);
        let card = TitleSelector::new();

        // 18 >= fallback very_large, nothing else applies
        let fragment = Fragment::new("lower words", 18.0, 1).at(400.0, 400.0);
        assert_eq!(card.scorecard().score(&fragment, &ctx), 30);
    }
}
