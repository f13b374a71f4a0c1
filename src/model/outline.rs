//! Outline types produced by the inference pipeline.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::fragment::DEFAULT_LANGUAGE;

/// Title used when no title can be inferred.
pub const UNTITLED: &str = "Untitled Document";

/// Heading level in the three-level scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
}

impl HeadingLevel {
    /// Nesting depth of this level (H1 = 1).
    pub fn depth(self) -> usize {
        match self {
            HeadingLevel::H1 => 1,
            HeadingLevel::H2 => 2,
            HeadingLevel::H3 => 3,
        }
    }
}

impl fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeadingLevel::H1 => write!(f, "H1"),
            HeadingLevel::H2 => write!(f, "H2"),
            HeadingLevel::H3 => write!(f, "H3"),
        }
    }
}

/// A heading with its level, in reading order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeveledHeading {
    /// Heading level
    pub level: HeadingLevel,
    /// Trimmed heading text
    pub text: String,
    /// Page number (1-indexed)
    pub page: u32,
}

impl LeveledHeading {
    /// Create a new leveled heading.
    pub fn new(level: HeadingLevel, text: impl Into<String>, page: u32) -> Self {
        Self {
            level,
            text: text.into(),
            page,
        }
    }
}

/// A node of the nested outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineNode {
    /// Heading text
    pub title: String,
    /// Page number (1-indexed)
    pub page: u32,
    /// Headings nested under this one
    pub children: Vec<OutlineNode>,
}

impl OutlineNode {
    /// Create a node without children.
    pub fn new(title: impl Into<String>, page: u32) -> Self {
        Self {
            title: title.into(),
            page,
            children: Vec::new(),
        }
    }

    /// Add a child node.
    pub fn add_child(&mut self, child: OutlineNode) {
        self.children.push(child);
    }

    /// Visit this node and its descendants in pre-order.
    pub fn preorder(&self) -> Vec<&OutlineNode> {
        let mut out = Vec::new();
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            out.push(node);
            pending.extend(node.children.iter().rev());
        }
        out
    }
}

/// The inferred headings, either flat or nested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Outline {
    /// Reading-ordered leveled headings
    Flat(Vec<LeveledHeading>),
    /// Forest of nested nodes
    Nested(Vec<OutlineNode>),
}

impl Outline {
    /// Check if the outline has no headings.
    pub fn is_empty(&self) -> bool {
        match self {
            Outline::Flat(headings) => headings.is_empty(),
            Outline::Nested(nodes) => nodes.is_empty(),
        }
    }

    /// Get the total number of headings (including nested).
    pub fn total_items(&self) -> usize {
        fn count_items(nodes: &[OutlineNode]) -> usize {
            nodes
                .iter()
                .map(|node| 1 + count_items(&node.children))
                .sum()
        }

        match self {
            Outline::Flat(headings) => headings.len(),
            Outline::Nested(nodes) => count_items(nodes),
        }
    }
}

impl Default for Outline {
    fn default() -> Self {
        Outline::Flat(Vec::new())
    }
}

/// The outcome of processing one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingResult {
    /// Inferred or metadata title
    pub title: String,
    /// Inferred headings
    pub outline: Outline,
    /// Document language tag
    pub language: String,
}

impl ProcessingResult {
    /// The degraded result used for empty input and failed runs.
    pub fn untitled() -> Self {
        Self {
            title: UNTITLED.to_string(),
            outline: Outline::default(),
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }

    /// Number of headings in the outline.
    pub fn heading_count(&self) -> usize {
        self.outline.total_items()
    }
}
