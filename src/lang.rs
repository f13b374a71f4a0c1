//! Document language detection.
//!
//! One tag is detected per document from a sample of its early fragments and
//! then stamped on every fragment. Detection never fails: anything outside the
//! supported set becomes English.

use std::collections::HashMap;

use crate::model::{Fragment, DEFAULT_LANGUAGE};

/// Languages with their own heading tables.
pub const SUPPORTED_LANGUAGES: [&str; 8] = ["en", "es", "fr", "de", "ja", "zh", "ar", "hi"];

/// Number of leading fragments considered for the sample.
pub const SAMPLE_FRAGMENTS: usize = 50;

/// Fragments must be longer than this (trimmed, in characters) to be sampled.
pub const MIN_SAMPLE_TEXT: usize = 10;

/// Maximum sample length in characters.
pub const MAX_SAMPLE_CHARS: usize = 1000;

/// Identifies the language of a text sample.
pub trait LanguageDetector: Send + Sync {
    /// Return a language tag, or `None` when the sample gives no signal.
    fn detect(&self, sample: &str) -> Option<String>;
}

/// Classifies text by Unicode script, then by common words for Latin text.
#[derive(Debug, Clone, Default)]
pub struct ScriptDetector;

impl ScriptDetector {
    /// Create a new detector.
    pub fn new() -> Self {
        Self
    }
}

#[derive(Debug, Default)]
struct ScriptCounts {
    kana: usize,
    han: usize,
    hangul: usize,
    arabic: usize,
    devanagari: usize,
    cyrillic: usize,
    latin: usize,
}

impl ScriptCounts {
    fn of(sample: &str) -> Self {
        let mut counts = Self::default();
        for c in sample.chars() {
            match c as u32 {
                0x3040..=0x30FF => counts.kana += 1,
                0x3400..=0x4DBF | 0x4E00..=0x9FFF | 0xF900..=0xFAFF => counts.han += 1,
                0xAC00..=0xD7AF => counts.hangul += 1,
                0x0600..=0x06FF | 0x0750..=0x077F | 0xFB50..=0xFDFF | 0xFE70..=0xFEFF => {
                    counts.arabic += 1
                }
                0x0900..=0x097F => counts.devanagari += 1,
                0x0400..=0x04FF => counts.cyrillic += 1,
                _ if c.is_alphabetic() => counts.latin += 1,
                _ => {}
            }
        }
        counts
    }
}

const STOPWORDS: [(&str, &[&str]); 4] = [
    (
        "en",
        &[
            "the", "and", "of", "to", "in", "is", "for", "with", "that", "this", "are", "on",
            "be", "by", "from", "it", "as", "or",
        ],
    ),
    (
        "es",
        &[
            "el", "la", "de", "que", "y", "en", "los", "las", "del", "por", "con", "una", "para",
            "es", "se", "al", "lo", "como",
        ],
    ),
    (
        "fr",
        &[
            "le", "la", "les", "de", "des", "et", "est", "une", "un", "du", "que", "pour", "dans",
            "sur", "avec", "au", "aux", "ce",
        ],
    ),
    (
        "de",
        &[
            "der", "die", "das", "und", "ist", "nicht", "mit", "ein", "eine", "den", "dem", "von",
            "zu", "auf", "für", "sich", "im", "des",
        ],
    ),
];

const DIACRITICS: [(&str, &str); 3] = [("es", "ñ¿¡áíóú"), ("fr", "çœèêëàâîôûù"), ("de", "ßäöü")];

impl LanguageDetector for ScriptDetector {
    fn detect(&self, sample: &str) -> Option<String> {
        let counts = ScriptCounts::of(sample);
        let cjk = counts.kana + counts.han;

        let scripts = [
            (cjk, if counts.kana > 0 { "ja" } else { "zh" }),
            (counts.hangul, "ko"),
            (counts.arabic, "ar"),
            (counts.devanagari, "hi"),
            (counts.cyrillic, "ru"),
            (counts.latin, ""),
        ];
        let (count, tag) = scripts
            .iter()
            .copied()
            .fold((0, ""), |best, s| if s.0 > best.0 { s } else { best });

        match (count, tag) {
            (0, _) => None,
            (_, "") => detect_latin(sample),
            (_, tag) => Some(tag.to_string()),
        }
    }
}

fn detect_latin(sample: &str) -> Option<String> {
    let lower = sample.to_lowercase();
    let mut scores: HashMap<&str, usize> = HashMap::new();

    for word in lower.split(|c: char| !c.is_alphabetic()) {
        for (lang, words) in STOPWORDS {
            if words.contains(&word) {
                *scores.entry(lang).or_default() += 1;
            }
        }
    }
    for c in lower.chars() {
        for (lang, marks) in DIACRITICS {
            if marks.contains(c) {
                *scores.entry(lang).or_default() += 2;
            }
        }
    }

    // Iterate in table order so ties resolve to the earlier language
    let mut best: Option<(&str, usize)> = None;
    for (lang, _) in STOPWORDS {
        let score = scores.get(lang).copied().unwrap_or(0);
        if score > 0 && best.map_or(true, |(_, top)| score > top) {
            best = Some((lang, score));
        }
    }
    best.map(|(lang, _)| lang.to_string())
}

/// Statistical detection backed by `whatlang` trigram profiles.
///
/// Only reliable guesses are trusted. Anything else goes to [`ScriptDetector`].
#[derive(Debug, Clone, Default)]
pub struct StatisticalDetector {
    fallback: ScriptDetector,
}

impl StatisticalDetector {
    /// Create a new detector.
    pub fn new() -> Self {
        Self::default()
    }
}

impl LanguageDetector for StatisticalDetector {
    fn detect(&self, sample: &str) -> Option<String> {
        match whatlang::detect(sample) {
            Some(info) if info.is_reliable() => {
                log::debug!(
                    "whatlang: {} ({:?}, confidence {:.2})",
                    info.lang().code(),
                    info.script(),
                    info.confidence()
                );
                Some(iso_639_1(info.lang().code()).to_string())
            }
            _ => self.fallback.detect(sample),
        }
    }
}

/// Two-letter tag for the supported ISO 639-3 codes; other codes pass through.
fn iso_639_1(code: &str) -> &str {
    match code {
        "eng" => "en",
        "spa" => "es",
        "fra" => "fr",
        "deu" => "de",
        "jpn" => "ja",
        "cmn" => "zh",
        "ara" => "ar",
        "hin" => "hi",
        other => other,
    }
}

/// Map a detector tag onto the supported set.
///
/// Region and script subtags are dropped (`zh-cn` → `zh`); anything else
/// unsupported becomes English.
pub fn normalize_language(tag: &str) -> &'static str {
    let primary = tag
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    SUPPORTED_LANGUAGES
        .iter()
        .copied()
        .find(|lang| *lang == primary)
        .unwrap_or(DEFAULT_LANGUAGE)
}

/// Build the detection sample from the leading fragments.
pub fn language_sample(fragments: &[Fragment]) -> String {
    let joined = fragments
        .iter()
        .take(SAMPLE_FRAGMENTS)
        .filter(|f| f.char_len() > MIN_SAMPLE_TEXT)
        .map(|f| f.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    match joined.char_indices().nth(MAX_SAMPLE_CHARS) {
        Some((cut, _)) => joined[..cut].to_string(),
        None => joined,
    }
}

/// Detect the language of a whole document.
pub fn detect_document_language(fragments: &[Fragment], detector: &dyn LanguageDetector) -> String {
    let sample = language_sample(fragments);
    if sample.trim().is_empty() {
        return DEFAULT_LANGUAGE.to_string();
    }

    let detected = detector.detect(&sample);
    let language = detected.as_deref().map_or(DEFAULT_LANGUAGE, normalize_language);
    log::info!(
        "Detected language: {} (raw {:?}, {} sample chars)",
        language,
        detected,
        sample.chars().count()
    );
    language.to_string()
}

/// Stamp one language tag on every fragment of a document.
pub fn assign_language(fragments: &mut [Fragment], language: &str) {
    for fragment in fragments {
        if fragment.language != language {
            fragment.language = language.to_string();
        }
    }
}
