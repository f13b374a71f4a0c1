//! Per-language heading patterns and keywords.

use std::collections::HashMap;

use regex::Regex;

use crate::model::DEFAULT_LANGUAGE;

/// Numbering and structural markers that open a heading, in match order.
const NUMBERING_PATTERNS: [&str; 12] = [
    r"^\d+\.",
    r"^\d+\)",
    r"^[IVX]+\.",
    r"^[a-z]\)",
    r"^[A-Z]\.",
    // Japanese and Chinese chapter / section
    r"^第\d+章",
    r"^第\d+節",
    r"^第\d+节",
    // Arabic chapter / section
    r"^الفصل\s+\d+",
    r"^القسم\s+\d+",
    // Hindi chapter / section
    r"^अध्याय\s+\d+",
    r"^खंड\s+\d+",
];

static LANGUAGE_TABLES: [(&str, LanguageProfile); 8] = [
    (
        "en",
        LanguageProfile {
            structural_words: &[
                "Chapter", "Section", "Part", "Introduction", "Conclusion", "Abstract",
                "Summary", "Overview", "Background", "Method", "Results", "Discussion",
                "References", "Appendix",
            ],
            keywords: &[
                "chapter", "section", "part", "introduction", "conclusion", "abstract",
                "summary", "overview", "background", "method", "results", "discussion",
                "references", "appendix", "analysis", "evaluation", "assessment", "review",
                "study", "research", "implementation", "design", "development", "testing",
            ],
        },
    ),
    (
        "es",
        LanguageProfile {
            structural_words: &[
                "Capítulo", "Sección", "Parte", "Introducción", "Conclusión", "Resumen",
                "Antecedentes", "Método", "Resultados", "Discusión",
            ],
            keywords: &[
                "capítulo", "sección", "parte", "introducción", "conclusión", "resumen",
                "antecedentes", "método", "resultados", "discusión",
            ],
        },
    ),
    (
        "fr",
        LanguageProfile {
            structural_words: &[
                "Chapitre", "Section", "Partie", "Introduction", "Conclusion", "Résumé",
                "Contexte", "Méthode", "Résultats", "Discussion",
            ],
            keywords: &[
                "chapitre", "section", "partie", "introduction", "conclusion", "résumé",
                "contexte", "méthode", "résultats", "discussion",
            ],
        },
    ),
    (
        "de",
        LanguageProfile {
            structural_words: &[
                "Kapitel", "Abschnitt", "Teil", "Einleitung", "Schlussfolgerung",
                "Zusammenfassung", "Hintergrund", "Methode", "Ergebnisse",
            ],
            keywords: &[
                "kapitel", "abschnitt", "teil", "einleitung", "schlussfolgerung",
                "zusammenfassung", "hintergrund", "methode", "ergebnisse",
            ],
        },
    ),
    (
        "ja",
        LanguageProfile {
            structural_words: &["章", "節", "部", "序論", "結論", "要約", "背景", "方法", "結果"],
            keywords: &["章", "節", "部", "序論", "結論", "要約", "背景", "方法", "結果"],
        },
    ),
    (
        "zh",
        LanguageProfile {
            structural_words: &["章", "节", "部分", "引言", "结论", "摘要", "背景", "方法", "结果"],
            keywords: &["章", "节", "部分", "引言", "结论", "摘要", "背景", "方法", "结果"],
        },
    ),
    (
        "ar",
        LanguageProfile {
            structural_words: &["فصل", "قسم", "جزء", "مقدمة", "خاتمة", "ملخص", "خلفية", "طريقة"],
            keywords: &["فصل", "قسم", "جزء", "مقدمة", "خاتمة", "ملخص", "خلفية", "طريقة"],
        },
    ),
    (
        "hi",
        LanguageProfile {
            structural_words: &["अध्याय", "खंड", "भाग", "परिचय", "निष्कर्ष", "सारांश", "पृष्ठभूमि"],
            keywords: &["अध्याय", "खंड", "भाग", "परिचय", "निष्कर्ष", "सारांश", "पृष्ठभूमि"],
        },
    ),
];

/// Structural words and keywords for one language.
#[derive(Debug, Clone, Copy)]
pub struct LanguageProfile {
    /// Words that open a heading when the text starts with them
    pub structural_words: &'static [&'static str],
    /// Lower-case keywords matched anywhere in the text
    pub keywords: &'static [&'static str],
}

/// Immutable heading tables shared by every document of a run.
#[derive(Debug, Clone)]
pub struct HeadingTables {
    patterns: Vec<Regex>,
    profiles: HashMap<&'static str, LanguageProfile>,
}

impl HeadingTables {
    /// Build the built-in tables.
    pub fn builtin() -> Self {
        Self {
            patterns: NUMBERING_PATTERNS
                .iter()
                .map(|p| Regex::new(p).unwrap())
                .collect(),
            profiles: LANGUAGE_TABLES.iter().copied().collect(),
        }
    }

    /// Numbering patterns, in match order.
    pub fn patterns(&self) -> &[Regex] {
        &self.patterns
    }

    /// Profile for a language, falling back to English.
    pub fn profile(&self, language: &str) -> &LanguageProfile {
        self.profiles
            .get(language)
            .or_else(|| self.profiles.get(DEFAULT_LANGUAGE))
            .unwrap_or(&LANGUAGE_TABLES[0].1)
    }

    /// Check whether a language has its own table.
    pub fn supports(&self, language: &str) -> bool {
        self.profiles.contains_key(language)
    }

    /// Languages with their own table.
    pub fn languages(&self) -> impl Iterator<Item = &str> + '_ {
        self.profiles.keys().copied()
    }
}

impl Default for HeadingTables {
    fn default() -> Self {
        Self::builtin()
    }
}
