//! Nesting of the flat leveled outline.

use crate::model::{LeveledHeading, OutlineNode};

/// Turn reading-ordered leveled headings into a forest.
///
/// The stack holds the chain of open ancestors. A heading at depth `d`
/// pops the stack until fewer than `d` nodes remain, then becomes a child of
/// whatever is left on top. Missing intermediate levels are not filled in:
/// an H3 directly after an H1 is that H1's child, and a leading H3 stays open
/// for the H2 or H3 that follows it. A heading never nests deeper than its
/// own level.
pub fn build_hierarchy(headings: &[LeveledHeading]) -> Vec<OutlineNode> {
    let mut roots: Vec<OutlineNode> = Vec::new();
    let mut stack: Vec<OutlineNode> = Vec::with_capacity(3);

    for heading in headings {
        let depth = heading.level.depth();
        while stack.len() >= depth {
            close_top(&mut stack, &mut roots);
        }
        stack.push(OutlineNode::new(heading.text.clone(), heading.page));
    }

    while !stack.is_empty() {
        close_top(&mut stack, &mut roots);
    }

    roots
}

/// Pop the innermost open node and attach it to its parent, or to the roots.
fn close_top(stack: &mut Vec<OutlineNode>, roots: &mut Vec<OutlineNode>) {
    let Some(node) = stack.pop() else {
        return;
    };
    match stack.last_mut() {
        Some(parent) => parent.add_child(node),
        None => roots.push(node),
    }
}

/// Pre-order `(title, page)` pairs of a forest.
pub fn flatten(forest: &[OutlineNode]) -> Vec<(&str, u32)> {
    forest
        .iter()
        .flat_map(OutlineNode::preorder)
        .map(|node| (node.title.as_str(), node.page))
        .collect()
}
