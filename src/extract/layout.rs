//! Positioned fragment extraction from page content streams.
//!
//! Text-showing operators are turned into spans carrying position and font,
//! spans sharing a baseline are merged into lines, and each line becomes one
//! [`Fragment`].

use std::collections::HashMap;

use unicode_normalization::UnicodeNormalization;

use crate::error::Result;
use crate::model::{is_bold_font_name, Fragment, MIN_SHORT_TEXT};

use super::backend::{ContentOp, LopdfBackend, PageId, PdfBackend, PdfValue};
use super::{extract_pages, ExtractedDocument, FragmentSource};

/// TJ adjustments beyond this (thousandths of an em) count as a word space.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// Baselines closer than this fraction of the font size share a line.
const LINE_TOLERANCE: f32 = 0.3;

/// A horizontal gap wider than this many font sizes splits a line in two.
const GUTTER_EM: f32 = 2.5;

/// Approximate glyph advance as a fraction of the font size.
const AVG_GLYPH_WIDTH: f32 = 0.5;

/// A run of text shown by one operator.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSpan {
    /// Decoded text
    pub text: String,
    /// X position (left edge)
    pub x: f32,
    /// Y position of the baseline, PDF space (upward)
    pub y: f32,
    /// Estimated advance width
    pub width: f32,
    /// Effective font size
    pub font_size: f32,
    /// Whether the font name marks a bold face
    pub is_bold: bool,
}

impl TextSpan {
    /// Create a span, estimating its width from the character count.
    pub fn new(text: impl Into<String>, x: f32, y: f32, font_size: f32, font_name: &str) -> Self {
        let text = text.into();
        let width = text.chars().count() as f32 * font_size * AVG_GLYPH_WIDTH;
        Self {
            text,
            x,
            y,
            width,
            font_size,
            is_bold: is_bold_font_name(font_name),
        }
    }

    /// Approximate top of the glyphs.
    pub fn top(&self) -> f32 {
        self.y + self.font_size * 0.8
    }

    fn right(&self) -> f32 {
        self.x + self.width
    }
}

/// Spans sharing a baseline, sorted left to right.
#[derive(Debug, Clone)]
pub struct TextLine {
    pub spans: Vec<TextSpan>,
}

impl TextLine {
    fn from_spans(mut spans: Vec<TextSpan>) -> Self {
        spans.sort_by(|a, b| a.x.total_cmp(&b.x));
        Self { spans }
    }

    /// Combined text, with a space wherever the gap between spans is wider
    /// than a fifth of a glyph. Chinese and Japanese neighbours are never
    /// separated.
    pub fn text(&self) -> String {
        let mut result = String::new();

        for (i, span) in self.spans.iter().enumerate() {
            if i > 0 {
                let prev = &self.spans[i - 1];
                let gap = span.x - prev.right();
                let threshold = span.font_size * AVG_GLYPH_WIDTH * 0.2;

                let both_spaceless = prev.text.chars().last().is_some_and(is_spaceless_script_char)
                    && span.text.chars().next().is_some_and(is_spaceless_script_char);
                let has_space = prev.text.ends_with([' ', '\u{00A0}'])
                    || span.text.starts_with([' ', '\u{00A0}']);

                if gap > threshold && !both_spaceless && !has_space {
                    result.push(' ');
                }
            }
            result.push_str(&span.text);
        }

        result
    }

    /// Largest font size on the line.
    pub fn font_size(&self) -> f32 {
        self.spans.iter().map(|s| s.font_size).fold(0.0, f32::max)
    }

    /// True if any span is bold.
    pub fn is_bold(&self) -> bool {
        self.spans.iter().any(|s| s.is_bold)
    }

    /// Leftmost x.
    pub fn left(&self) -> f32 {
        self.spans.iter().map(|s| s.x).fold(f32::INFINITY, f32::min)
    }

    /// Highest glyph top.
    pub fn top(&self) -> f32 {
        self.spans.iter().map(TextSpan::top).fold(f32::NEG_INFINITY, f32::max)
    }

    /// Convert to a fragment; `None` when the normalized text is too short.
    pub fn to_fragment(&self, page_number: u32, page_height: f32) -> Option<Fragment> {
        let text: String = self.text().nfkc().collect();
        let text = text.trim();
        if text.chars().count() < MIN_SHORT_TEXT {
            return None;
        }

        let y = (page_height - self.top()).max(0.0);
        Some(
            Fragment::new(text, self.font_size(), page_number)
                .at(self.left(), y)
                .bold(self.is_bold()),
        )
    }
}

/// Text state of a `BT ... ET` block.
#[derive(Debug, Clone, Copy)]
struct TextMatrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
    line_e: f32,
    line_f: f32,
    leading: f32,
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
            line_e: 0.0,
            line_f: 0.0,
            leading: 0.0,
        }
    }
}

impl TextMatrix {
    fn set(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        *self = Self {
            a,
            b,
            c,
            d,
            e,
            f,
            line_e: e,
            line_f: f,
            leading: self.leading,
        };
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        self.line_e += tx * self.a + ty * self.c;
        self.line_f += tx * self.b + ty * self.d;
        self.e = self.line_e;
        self.f = self.line_f;
    }

    fn next_line(&mut self) {
        self.translate(0.0, -self.leading);
    }

    /// Move past shown text of `width` text-space units.
    fn advance(&mut self, width: f32) {
        self.e += width * self.a;
        self.f += width * self.b;
    }

    fn position(&self) -> (f32, f32) {
        (self.e, self.f)
    }

    fn vertical_scale(&self) -> f32 {
        (self.c * self.c + self.d * self.d).sqrt()
    }
}

/// Turn decoded content stream operations into text spans.
///
/// `fonts` maps font resource names to base font names; `decode` decodes a
/// string operand given the current font resource name.
pub fn spans_from_ops<D>(
    ops: &[ContentOp],
    fonts: &HashMap<Vec<u8>, String>,
    decode: D,
) -> Vec<TextSpan>
where
    D: Fn(&[u8], &[u8]) -> String,
{
    let mut spans = Vec::new();
    let mut font_resource: Vec<u8> = Vec::new();
    let mut font_name = String::new();
    let mut font_size: f32 = 12.0;
    let mut matrix = TextMatrix::default();
    let mut in_text = false;

    for op in ops {
        let shown: Option<String> = match op.operator.as_str() {
            "BT" => {
                in_text = true;
                matrix = TextMatrix {
                    leading: matrix.leading,
                    ..TextMatrix::default()
                };
                None
            }
            "ET" => {
                in_text = false;
                None
            }
            "Tf" => {
                if let Some(PdfValue::Name(name)) = op.operands.first() {
                    font_name = fonts
                        .get(name)
                        .cloned()
                        .unwrap_or_else(|| String::from_utf8_lossy(name).to_string());
                    font_resource = name.clone();
                }
                font_size = op.number(1, 12.0);
                None
            }
            "TL" => {
                matrix.leading = op.number(0, 0.0);
                None
            }
            "Td" => {
                matrix.translate(op.number(0, 0.0), op.number(1, 0.0));
                None
            }
            "TD" => {
                let ty = op.number(1, 0.0);
                matrix.leading = -ty;
                matrix.translate(op.number(0, 0.0), ty);
                None
            }
            "Tm" => {
                matrix.set(
                    op.number(0, 1.0),
                    op.number(1, 0.0),
                    op.number(2, 0.0),
                    op.number(3, 1.0),
                    op.number(4, 0.0),
                    op.number(5, 0.0),
                );
                None
            }
            "T*" => {
                matrix.next_line();
                None
            }
            "Tj" => match op.operands.first() {
                Some(PdfValue::Str(bytes)) => Some(decode(&font_resource, bytes)),
                _ => None,
            },
            "TJ" => match op.operands.first() {
                Some(PdfValue::Array(items)) => {
                    Some(decode_tj_array(items, |b| decode(&font_resource, b)))
                }
                _ => None,
            },
            "'" | "\"" => {
                matrix.next_line();
                let index = if op.operator == "\"" { 2 } else { 0 };
                match op.operands.get(index) {
                    Some(PdfValue::Str(bytes)) => Some(decode(&font_resource, bytes)),
                    _ => None,
                }
            }
            _ => None,
        };

        let Some(text) = shown else {
            continue;
        };
        if !in_text || text.trim().is_empty() {
            continue;
        }

        let (x, y) = matrix.position();
        let span = TextSpan::new(text, x, y, font_size * matrix.vertical_scale(), &font_name);
        matrix.advance(span.text.chars().count() as f32 * font_size * AVG_GLYPH_WIDTH);
        spans.push(span);
    }

    spans
}

/// Join the strings of a TJ array, inserting spaces for large adjustments.
fn decode_tj_array<D>(items: &[PdfValue], decode: D) -> String
where
    D: Fn(&[u8]) -> String,
{
    let mut combined = String::new();

    for item in items {
        match item {
            PdfValue::Str(bytes) => combined.push_str(&decode(bytes)),
            other => {
                // Negative adjustments move the next glyph right
                let adjustment = -other.as_number().unwrap_or(0.0);
                let wants_space = adjustment > TJ_SPACE_THRESHOLD
                    && !combined.ends_with([' ', '\u{00A0}'])
                    && combined.chars().last().is_some_and(|c| !is_spaceless_script_char(c));
                if wants_space {
                    combined.push(' ');
                }
            }
        }
    }

    combined
}

/// Group spans into lines by baseline, top of page first.
///
/// Spans on one baseline separated by a gutter wider than
/// [`GUTTER_EM`] font sizes become separate lines, so side-by-side columns
/// do not merge.
pub fn group_into_lines(mut spans: Vec<TextSpan>) -> Vec<TextLine> {
    spans.sort_by(|a, b| b.y.total_cmp(&a.y).then(a.x.total_cmp(&b.x)));

    let mut rows: Vec<Vec<TextSpan>> = Vec::new();
    let mut current_y: Option<f32> = None;

    for span in spans {
        let same_row =
            current_y.is_some_and(|y| (span.y - y).abs() <= span.font_size * LINE_TOLERANCE);
        if !same_row {
            current_y = Some(span.y);
            rows.push(Vec::new());
        }
        if let Some(row) = rows.last_mut() {
            row.push(span);
        }
    }

    rows.into_iter()
        .flat_map(split_on_gutters)
        .map(TextLine::from_spans)
        .collect()
}

fn split_on_gutters(mut row: Vec<TextSpan>) -> Vec<Vec<TextSpan>> {
    row.sort_by(|a, b| a.x.total_cmp(&b.x));

    let mut parts: Vec<Vec<TextSpan>> = Vec::new();
    for span in row {
        let starts_new = match parts.last().and_then(|p| p.last()) {
            Some(prev) => span.x - prev.right() > GUTTER_EM * span.font_size.max(prev.font_size),
            None => true,
        };
        if starts_new {
            parts.push(Vec::new());
        }
        if let Some(part) = parts.last_mut() {
            part.push(span);
        }
    }
    parts
}

/// Chinese and Japanese characters, which are written without word spaces.
/// Hangul is excluded because Korean uses spaces.
fn is_spaceless_script_char(c: char) -> bool {
    matches!(c as u32,
        0x4E00..=0x9FFF
        | 0x3400..=0x4DBF
        | 0x20000..=0x2EBEF
        | 0x3040..=0x309F
        | 0x30A0..=0x30FF
        | 0x3000..=0x303F)
}

/// Fragments of one page of a loaded document.
pub fn page_fragments<B>(backend: &B, page_number: u32, page: PageId) -> Result<Vec<Fragment>>
where
    B: PdfBackend + ?Sized,
{
    let fonts: HashMap<Vec<u8>, String> = backend
        .page_fonts(page)?
        .into_iter()
        .map(|f| (f.name, f.base_font))
        .collect();
    let content = backend.page_content(page)?;
    let ops = backend.decode_content(&content)?;

    let spans = spans_from_ops(&ops, &fonts, |font, bytes| backend.decode_text(page, font, bytes));
    let height = backend.page_height(page);

    Ok(group_into_lines(spans)
        .iter()
        .filter_map(|line| line.to_fragment(page_number, height))
        .collect())
}

/// Positioned extraction: font size, weight and position per line.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutSource;

impl FragmentSource for LayoutSource {
    fn name(&self) -> &'static str {
        "layout"
    }

    fn extract(&self, data: &[u8], max_pages: u32) -> Result<ExtractedDocument> {
        let backend = LopdfBackend::load_bytes(data)?;
        Ok(extract_pages(&backend, max_pages, page_fragments))
    }
}
