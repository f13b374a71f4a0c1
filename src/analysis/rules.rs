//! Additive scoring from independent weighted rules.
//!
//! Title and heading scoring are both a sum of `(predicate, weight)` pairs.
//! Keeping the pairs as data lets each rule be tested on its own and lets the
//! pipeline log which rules fired for a fragment.

use std::fmt;

use crate::model::Fragment;

use super::{FontStatistics, HeadingTables};

/// Document-level inputs available to every rule.
#[derive(Debug, Clone, Copy)]
pub struct ScoringContext<'a> {
    /// Font statistics of the current document
    pub stats: &'a FontStatistics,
    /// Heading tables of the current run
    pub tables: &'a HeadingTables,
}

impl<'a> ScoringContext<'a> {
    /// Create a new scoring context.
    pub fn new(stats: &'a FontStatistics, tables: &'a HeadingTables) -> Self {
        Self { stats, tables }
    }
}

type Predicate = Box<dyn Fn(&Fragment, &ScoringContext<'_>) -> bool + Send + Sync>;

/// A single weighted rule.
pub struct Rule {
    name: String,
    weight: u32,
    predicate: Predicate,
}

impl Rule {
    /// Create a rule that adds `weight` when `predicate` holds.
    pub fn new<F>(name: impl Into<String>, weight: u32, predicate: F) -> Self
    where
        F: Fn(&Fragment, &ScoringContext<'_>) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            weight,
            predicate: Box::new(predicate),
        }
    }

    /// Rule name, used in logs.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Points added when the rule applies.
    pub fn weight(&self) -> u32 {
        self.weight
    }

    /// Check whether the rule applies to a fragment.
    pub fn applies(&self, fragment: &Fragment, ctx: &ScoringContext<'_>) -> bool {
        (self.predicate)(fragment, ctx)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("weight", &self.weight)
            .finish()
    }
}

/// Build mutually exclusive rules from descending `(lower bound, weight)` bands.
///
/// Band `i` applies when `lower_i <= value < lower_{i-1}`. `measure` returning
/// `None` makes every band inapplicable.
pub fn banded_rules<M>(prefix: &str, bands: &[(f32, u32)], measure: M) -> Vec<Rule>
where
    M: Fn(&Fragment, &ScoringContext<'_>) -> Option<f32> + Clone + Send + Sync + 'static,
{
    let mut upper: Option<f32> = None;
    let mut rules = Vec::with_capacity(bands.len());

    for &(lower, weight) in bands {
        let measure = measure.clone();
        let name = if lower.is_finite() {
            format!("{prefix}>={lower}")
        } else {
            format!("{prefix}<{}", upper.unwrap_or(f32::INFINITY))
        };
        rules.push(Rule::new(name, weight, move |fragment, ctx| {
            measure(fragment, ctx)
                .is_some_and(|value| value >= lower && upper.map_or(true, |u| value < u))
        }));
        upper = Some(lower);
    }

    rules
}

/// An ordered list of rules with an acceptance threshold.
#[derive(Debug)]
pub struct Scorecard {
    rules: Vec<Rule>,
    threshold: u32,
}

impl Scorecard {
    /// Create a scorecard.
    pub fn new(rules: Vec<Rule>, threshold: u32) -> Self {
        Self { rules, threshold }
    }

    /// The rules, in evaluation order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Minimum score for acceptance.
    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Sum the weights of every rule that applies.
    pub fn score(&self, fragment: &Fragment, ctx: &ScoringContext<'_>) -> u32 {
        self.rules
            .iter()
            .filter(|rule| rule.applies(fragment, ctx))
            .map(Rule::weight)
            .sum()
    }

    /// Score a fragment, returning `None` when it falls below the threshold.
    pub fn accept(&self, fragment: &Fragment, ctx: &ScoringContext<'_>) -> Option<u32> {
        let score = self.score(fragment, ctx);
        (score >= self.threshold).then_some(score)
    }

    /// Names of the rules that apply to a fragment.
    pub fn fired(&self, fragment: &Fragment, ctx: &ScoringContext<'_>) -> Vec<&str> {
        self.rules
            .iter()
            .filter(|rule| rule.applies(fragment, ctx))
            .map(Rule::name)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context_parts() -> (FontStatistics, HeadingTables) {
        (
            FontStatistics::from_sizes([10.0, 10.0, 10.0, 10.0]),
            HeadingTables::builtin(),
        )
    }

    #[test]
    fn test_scorecard_sums_applicable_rules() {
        let (stats, tables) = context_parts();
        let ctx = ScoringContext::new(&stats, &tables);
        let card = Scorecard::new(
            vec![
                Rule::new("bold", 25, |f, _| f.is_bold),
                Rule::new("near_top", 15, |f, _| f.is_near_top()),
                Rule::new("never", 100, |_, _| false),
            ],
            30,
        );

        let fragment = Fragment::new("Scope", 10.0, 1).bold(true).at(0.0, 50.0);
        assert_eq!(card.score(&fragment, &ctx), 40);
        assert_eq!(card.accept(&fragment, &ctx), Some(40));
        assert_eq!(card.fired(&fragment, &ctx), ["bold", "near_top"]);

        let plain = Fragment::new("Scope", 10.0, 1).at(0.0, 500.0);
        assert_eq!(card.accept(&plain, &ctx), None);
    }

    #[test]
    fn test_banded_rules_are_exclusive() {
        let (stats, tables) = context_parts();
        let ctx = ScoringContext::new(&stats, &tables);
        let rules = banded_rules(
            "relative_size",
            &[(1.5, 35), (1.1, 25), (f32::NEG_INFINITY, 5)],
            |f, ctx| ctx.stats.relative_size(f.font_size),
        );
        let card = Scorecard::new(rules, 0);

        assert_eq!(card.score(&Fragment::new("A", 20.0, 1), &ctx), 35);
        assert_eq!(card.score(&Fragment::new("A", 15.0, 1), &ctx), 35);
        assert_eq!(card.score(&Fragment::new("A", 14.9, 1), &ctx), 25);
        assert_eq!(card.score(&Fragment::new("A", 11.0, 1), &ctx), 25);
        assert_eq!(card.score(&Fragment::new("A", 10.0, 1), &ctx), 5);
        assert_eq!(card.rules()[2].name(), "relative_size<1.1");
    }

    #[test]
    fn test_banded_rules_skip_missing_measure() {
        let (stats, tables) = context_parts();
        let ctx = ScoringContext::new(&stats, &tables);
        let rules = banded_rules("size", &[(1.0, 10), (f32::NEG_INFINITY, 1)], |_, _| None);
        let card = Scorecard::new(rules, 0);
        assert_eq!(card.score(&Fragment::new("A", 20.0, 1), &ctx), 0);
    }
}
