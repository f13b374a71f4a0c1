//! Heading level assignment and reading order.

use crate::model::{HeadingLevel, LeveledHeading};

use super::headings::HeadingCandidate;
use super::{FontStatistics, HeadingTables};

/// Assign a level from font size relative to the document mean.
///
/// Without a usable mean, numbered bold headings are H1, other bold
/// headings H2, and everything else H3.
pub fn level_for(
    candidate: &HeadingCandidate<'_>,
    stats: &FontStatistics,
    tables: &HeadingTables,
) -> HeadingLevel {
    let fragment = candidate.fragment;
    match stats.relative_size(fragment.font_size) {
        Some(r) if r >= 1.4 => HeadingLevel::H1,
        Some(r) if r >= 1.2 => HeadingLevel::H2,
        Some(_) => HeadingLevel::H3,
        None if fragment.is_bold && fragment.has_heading_pattern(tables) => HeadingLevel::H1,
        None if fragment.is_bold => HeadingLevel::H2,
        None => HeadingLevel::H3,
    }
}

/// Level every candidate and return them in reading order.
///
/// Reading order is page ascending, then vertical position ascending;
/// candidates at the same spot keep their incoming order.
pub fn assign_levels(
    candidates: &[HeadingCandidate<'_>],
    stats: &FontStatistics,
    tables: &HeadingTables,
) -> Vec<LeveledHeading> {
    let mut leveled: Vec<(f32, LeveledHeading)> = candidates
        .iter()
        .map(|candidate| {
            let fragment = candidate.fragment;
            let heading = LeveledHeading::new(
                level_for(candidate, stats, tables),
                fragment.trimmed(),
                fragment.page_number,
            );
            (fragment.y, heading)
        })
        .collect();

    leveled.sort_by(|(ya, a), (yb, b)| a.page.cmp(&b.page).then(ya.total_cmp(yb)));

    leveled.into_iter().map(|(_, heading)| heading).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Fragment;

    fn candidate(fragment: &Fragment) -> HeadingCandidate<'_> {
        HeadingCandidate {
            index: 0,
            fragment,
            score: 50,
        }
    }

    #[test]
    fn test_levels_from_relative_size() {
        let stats = FontStatistics::from_sizes([10.0; 4]);
        let tables = HeadingTables::builtin();
        let level = |size: f32| {
            let fragment = Fragment::new("Some Heading", size, 1);
            level_for(&candidate(&fragment), &stats, &tables)
        };

        assert_eq!(level(14.0), HeadingLevel::H1);
        assert_eq!(level(13.9), HeadingLevel::H2);
        assert_eq!(level(12.0), HeadingLevel::H2);
        assert_eq!(level(11.9), HeadingLevel::H3);
        assert_eq!(level(10.0), HeadingLevel::H3);
        assert_eq!(level(6.0), HeadingLevel::H3);
    }

    #[test]
    fn test_style_fallback_without_mean() {
        let stats = FontStatistics {
            mean_size: 0.0,
            thresholds: None,
        };
        let tables = HeadingTables::builtin();

        let numbered = Fragment::new("2. Methods Used", 12.0, 1).bold(true);
        let bold = Fragment::new("Methods Used", 12.0, 1).bold(true);
        let plain = Fragment::new("2. Methods Used", 12.0, 1);

        assert_eq!(level_for(&candidate(&numbered), &stats, &tables), HeadingLevel::H1);
        assert_eq!(level_for(&candidate(&bold), &stats, &tables), HeadingLevel::H2);
        assert_eq!(level_for(&candidate(&plain), &stats, &tables), HeadingLevel::H3);
    }

    #[test]
    fn test_reading_order() {
        let stats = FontStatistics::from_sizes([10.0; 4]);
        let tables = HeadingTables::builtin();
        let fragments = [
            Fragment::new("Page Two Low", 15.0, 2).at(0.0, 500.0),
            Fragment::new("Page One", 15.0, 1).at(0.0, 300.0),
            Fragment::new("Page Two High", 12.0, 2).at(0.0, 100.0),
            Fragment::new("  Same Spot A ", 10.0, 3).at(0.0, 50.0),
            Fragment::new("Same Spot B", 10.0, 3).at(0.0, 50.0),
        ];
        let candidates: Vec<_> = fragments.iter().map(candidate).collect();

        let leveled = assign_levels(&candidates, &stats, &tables);
        let order: Vec<(&str, u32)> = leveled.iter().map(|h| (h.text.as_str(), h.page)).collect();
        assert_eq!(
            order,
            [
                ("Page One", 1),
                ("Page Two High", 2),
                ("Page Two Low", 2),
                ("Same Spot A", 3),
                ("Same Spot B", 3),
            ]
        );
        assert_eq!(leveled[0].level, HeadingLevel::H1);
        assert_eq!(leveled[1].level, HeadingLevel::H2);
    }
}
