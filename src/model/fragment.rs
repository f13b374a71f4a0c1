//! Positioned text fragments and their derived predicates.

use serde::{Deserialize, Serialize};

use crate::analysis::HeadingTables;

/// Language tag assumed when detection fails or nothing was detected.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Languages whose headings are judged by Latin capitalization rules.
pub const LATIN_LANGUAGES: [&str; 6] = ["en", "es", "fr", "de", "it", "pt"];

/// Fragments left of this x coordinate count as centered.
///
/// Page width is unknown at this stage, so this is a lenient band rather
/// than a true centering test.
pub const CENTER_BAND_X: f32 = 150.0;

/// Fragments above this y coordinate (measured from the page top) are near the top.
pub const NEAR_TOP_Y: f32 = 300.0;

/// Minimum trimmed length, in characters, of heading-like text.
pub const MIN_SHORT_TEXT: usize = 2;

/// Maximum trimmed length, in characters, of heading-like text.
pub const MAX_SHORT_TEXT: usize = 120;

/// Font-name markers that indicate a bold face.
const BOLD_MARKERS: [&str; 4] = ["bold", "black", "heavy", "medium"];

/// One line of text as it appeared on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    /// Trimmed text content
    pub text: String,
    /// Font size in document units
    pub font_size: f32,
    /// Whether the font appears to be bold
    pub is_bold: bool,
    /// Left edge of the fragment
    pub x: f32,
    /// Top edge of the fragment, measured downward from the top of the page
    pub y: f32,
    /// Page number (1-indexed)
    pub page_number: u32,
    /// Document-wide language tag
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

impl Fragment {
    /// Create a fragment at the page origin with the default language.
    pub fn new(text: impl Into<String>, font_size: f32, page_number: u32) -> Self {
        Self {
            text: text.into(),
            font_size,
            is_bold: false,
            x: 0.0,
            y: 0.0,
            page_number,
            language: default_language(),
        }
    }

    /// Create a fragment whose boldness is derived from its font name.
    pub fn with_font_name(
        text: impl Into<String>,
        font_size: f32,
        font_name: &str,
        page_number: u32,
    ) -> Self {
        let mut fragment = Self::new(text, font_size, page_number);
        fragment.is_bold = is_bold_font_name(font_name);
        fragment
    }

    /// Set the position.
    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    /// Set boldness.
    pub fn bold(mut self, is_bold: bool) -> Self {
        self.is_bold = is_bold;
        self
    }

    /// Set the language tag.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// The text with surrounding whitespace removed.
    pub fn trimmed(&self) -> &str {
        self.text.trim()
    }

    /// Length of the trimmed text in characters.
    pub fn char_len(&self) -> usize {
        self.trimmed().chars().count()
    }

    /// Whether the fragment sits within the lenient centering band.
    pub fn is_centered(&self) -> bool {
        self.x.abs() < CENTER_BAND_X
    }

    /// Whether the fragment is near the top of its page.
    pub fn is_near_top(&self) -> bool {
        self.y < NEAR_TOP_Y
    }

    /// Whether the text is capitalized the way titles and headings usually are.
    ///
    /// Scripts without case get a weaker rule: short text containing an
    /// uppercase letter or a digit.
    pub fn is_title_case(&self) -> bool {
        let text = self.trimmed();
        if text.is_empty() {
            return false;
        }

        if is_all_uppercase(text) && text.chars().count() > 2 {
            return true;
        }

        if !LATIN_LANGUAGES.contains(&self.language.as_str()) {
            let has_upper = text.chars().any(char::is_uppercase);
            let has_digit = text.chars().any(char::is_numeric);
            if (has_upper || has_digit) && text.chars().count() <= 50 {
                return true;
            }
        }

        let words: Vec<&str> = text.split_whitespace().take(5).collect();
        let Some(first) = words.first() else {
            return false;
        };
        if !starts_uppercase(first) {
            return false;
        }

        let capitalized = words.iter().filter(|w| starts_uppercase(w)).count();
        capitalized as f32 >= words.len() as f32 * 0.6
    }

    /// Whether the text starts with a numbering or structural marker.
    pub fn has_heading_pattern(&self, tables: &HeadingTables) -> bool {
        let text = self.trimmed();
        if tables.patterns().iter().any(|re| re.is_match(text)) {
            return true;
        }

        tables
            .profile(&self.language)
            .structural_words
            .iter()
            .any(|word| text.starts_with(word))
    }

    /// Whether the trimmed text has a heading-appropriate length.
    pub fn is_short_text(&self) -> bool {
        (MIN_SHORT_TEXT..=MAX_SHORT_TEXT).contains(&self.char_len())
    }

    /// Whether the lower-cased text contains a heading keyword for its language.
    pub fn has_heading_keywords(&self, tables: &HeadingTables) -> bool {
        let text = self.trimmed().to_lowercase();
        tables
            .profile(&self.language)
            .keywords
            .iter()
            .any(|keyword| text.contains(keyword))
    }

    /// Whether the trimmed text ends like a sentence.
    pub fn ends_like_sentence(&self) -> bool {
        self.trimmed().ends_with(['.', '?', '!'])
    }

    /// Number of whitespace-separated words.
    pub fn word_count(&self) -> usize {
        self.trimmed().split_whitespace().count()
    }

    /// Whether at least one word starts with an uppercase letter.
    pub fn has_capitalized_word(&self) -> bool {
        self.trimmed().split_whitespace().any(starts_uppercase)
    }
}

/// Check whether a font name denotes a bold face.
pub fn is_bold_font_name(font_name: &str) -> bool {
    let name = font_name.to_lowercase();
    BOLD_MARKERS.iter().any(|marker| name.contains(marker))
}

fn starts_uppercase(word: &str) -> bool {
    word.chars().next().is_some_and(char::is_uppercase)
}

/// True when the text has cased letters and none of them is lowercase.
fn is_all_uppercase(text: &str) -> bool {
    let mut has_cased = false;
    for c in text.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            has_cased = true;
        }
    }
    has_cased
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tables() -> HeadingTables {
        HeadingTables::builtin()
    }

    #[test]
    fn test_bold_font_name_detection() {
        assert!(is_bold_font_name("Helvetica-Bold"));
        assert!(is_bold_font_name("Arial Black"));
        assert!(is_bold_font_name("Roboto-Medium"));
        assert!(is_bold_font_name("Futura-HeavyOblique"));
        assert!(!is_bold_font_name("Times-Roman"));

        let fragment = Fragment::with_font_name("Overview", 14.0, "ABCDEF+Inter-Bold", 1);
        assert!(fragment.is_bold);
    }

    #[test]
    fn test_position_predicates() {
        let fragment = Fragment::new("Heading", 12.0, 1).at(72.0, 90.0);
        assert!(fragment.is_centered());
        assert!(fragment.is_near_top());

        let fragment = Fragment::new("Heading", 12.0, 1).at(150.0, 300.0);
        assert!(!fragment.is_centered());
        assert!(!fragment.is_near_top());
    }

    #[test]
    fn test_title_case_latin() {
        assert!(Fragment::new("Annual Report 2024", 12.0, 1).is_title_case());
        assert!(Fragment::new("EXECUTIVE SUMMARY", 12.0, 1).is_title_case());
        assert!(!Fragment::new("the quick brown fox", 12.0, 1).is_title_case());
        // 2 of 5 words capitalized is below the 60% bar
        assert!(!Fragment::new("Results of the Survey run", 12.0, 1).is_title_case());
        assert!(!Fragment::new("ok", 12.0, 1).is_title_case());
    }

    #[test]
    fn test_title_case_caseless_script() {
        let fragment = Fragment::new("第1章 概要", 12.0, 1).with_language("ja");
        assert!(fragment.is_title_case());

        let fragment = Fragment::new("概要と背景", 12.0, 1).with_language("ja");
        assert!(!fragment.is_title_case());

        // The same digit rule does not apply to Latin languages
        let fragment = Fragment::new("figure 3 shows", 12.0, 1);
        assert!(!fragment.is_title_case());
    }

    #[test]
    fn test_heading_patterns() {
        let tables = tables();
        assert!(Fragment::new("1. Introduction", 12.0, 1).has_heading_pattern(&tables));
        assert!(Fragment::new("2) Scope", 12.0, 1).has_heading_pattern(&tables));
        assert!(Fragment::new("IV. Findings", 12.0, 1).has_heading_pattern(&tables));
        assert!(Fragment::new("b) Budget", 12.0, 1).has_heading_pattern(&tables));
        assert!(Fragment::new("C. Appendix", 12.0, 1).has_heading_pattern(&tables));
        assert!(Fragment::new("第3章 方法", 12.0, 1).has_heading_pattern(&tables));
        assert!(Fragment::new("الفصل 2", 12.0, 1).has_heading_pattern(&tables));
        assert!(Fragment::new("अध्याय 4", 12.0, 1).has_heading_pattern(&tables));
        assert!(Fragment::new("Chapter Seven", 12.0, 1).has_heading_pattern(&tables));
        assert!(!Fragment::new("Plain sentence here", 12.0, 1).has_heading_pattern(&tables));
    }

    #[test]
    fn test_structural_words_follow_language() {
        let tables = tables();
        let spanish = Fragment::new("Capítulo uno", 12.0, 1).with_language("es");
        assert!(spanish.has_heading_pattern(&tables));

        // English table does not know the Spanish word
        let english = Fragment::new("Capítulo uno", 12.0, 1);
        assert!(!english.has_heading_pattern(&tables));

        // Unknown languages fall back to English
        let unknown = Fragment::new("Chapter One", 12.0, 1).with_language("sw");
        assert!(unknown.has_heading_pattern(&tables));
    }

    #[test]
    fn test_short_text_bounds() {
        assert!(!Fragment::new("A", 12.0, 1).is_short_text());
        assert!(Fragment::new("Ab", 12.0, 1).is_short_text());
        assert!(Fragment::new("x".repeat(120), 12.0, 1).is_short_text());
        assert!(!Fragment::new("x".repeat(121), 12.0, 1).is_short_text());
        // Counted in characters, not bytes
        assert!(Fragment::new("章".repeat(100), 12.0, 1).is_short_text());
    }

    #[test]
    fn test_heading_keywords() {
        let tables = tables();
        assert!(Fragment::new("Project Overview", 12.0, 1).has_heading_keywords(&tables));
        assert!(Fragment::new("DESIGN GOALS", 12.0, 1).has_heading_keywords(&tables));
        assert!(!Fragment::new("Lunch Menu", 12.0, 1).has_heading_keywords(&tables));

        let german = Fragment::new("Einleitung", 12.0, 1).with_language("de");
        assert!(german.has_heading_keywords(&tables));
    }

    #[test]
    fn test_sentence_and_word_filters() {
        let fragment = Fragment::new("  Is this a heading?  ", 12.0, 1);
        assert!(fragment.ends_like_sentence());
        assert_eq!(fragment.word_count(), 4);
        assert!(fragment.has_capitalized_word());

        let fragment = Fragment::new("all lower case", 12.0, 1);
        assert!(!fragment.ends_like_sentence());
        assert!(!fragment.has_capitalized_word());
    }
}
