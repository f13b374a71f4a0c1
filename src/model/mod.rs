//! Data model for outline inference.
//!
//! Fragments are the input: one positioned, styled line of text each. The
//! outline types are the output of the pipeline and are what gets serialized.

mod fragment;
mod outline;

pub use fragment::{
    is_bold_font_name, Fragment, CENTER_BAND_X, DEFAULT_LANGUAGE, LATIN_LANGUAGES,
    MAX_SHORT_TEXT, MIN_SHORT_TEXT, NEAR_TOP_Y,
};
pub use outline::{
    HeadingLevel, LeveledHeading, Outline, OutlineNode, ProcessingResult, UNTITLED,
};
