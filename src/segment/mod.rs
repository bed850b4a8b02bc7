//! Section-tree construction and budgeted segmentation.
//!
//! The tree is built with a stack over the confirmed headings of the
//! flat block stream. Segmentation walks the tree greedily: a section
//! whose text fits the budget is emitted whole; an oversized section
//! with subsections is replaced by its subsections, with the heading
//! and any body before the first subsection riding along in the first
//! emitted segment. The emitted source ranges always partition the
//! stream.

mod restore;

pub use restore::restore_cross_references;

use crate::model::{Block, BlockKind, SectionNode, SectionTree, Segment};
use crate::pipeline::PipelineOptions;

/// Build the section tree over the confirmed headings.
///
/// A heading at level L closes every open section at level L or deeper;
/// the closed section ends just before the new heading. Sections still
/// open at stream end run to the end of the stream.
pub fn build_section_tree(blocks: &[Block]) -> SectionTree {
    let mut tree = SectionTree::new();
    // Indices of open sections, levels strictly increasing.
    let mut open: Vec<usize> = Vec::new();

    for (i, block) in blocks.iter().enumerate() {
        if block.kind != BlockKind::Title {
            continue;
        }
        let level = block.level.unwrap_or(1);
        while let Some(&top) = open.last() {
            if tree.nodes[top].level < level {
                break;
            }
            tree.nodes[top].end = i;
            open.pop();
        }
        let idx = tree.push(SectionNode {
            title: section_title(block),
            level,
            start: i,
            end: blocks.len(),
            children: Vec::new(),
        });
        match open.last() {
            Some(&parent) => tree.attach(parent, idx),
            None => tree.add_root(idx),
        }
        open.push(idx);
    }
    tree
}

fn section_title(block: &Block) -> String {
    block
        .canonical_title
        .clone()
        .unwrap_or_else(|| block.text.trim().to_string())
}

/// Emit budgeted segments for the block stream.
///
/// Without any section the whole stream becomes one segment. Front
/// matter before the first heading is carried by the first segment.
pub fn segment_blocks(
    blocks: &[Block],
    tree: &SectionTree,
    options: &PipelineOptions,
) -> Vec<Segment> {
    if blocks.is_empty() {
        return Vec::new();
    }
    if tree.roots.is_empty() {
        log::debug!("no sections found, emitting the whole stream as one segment");
        return vec![Segment::new(0, blocks.len())];
    }

    let mut segments = Vec::new();
    for &root in &tree.roots {
        emit_section(blocks, tree, root, options.segment_budget, &mut segments);
    }
    if let Some(first) = segments.first_mut() {
        first.start = 0;
    }
    log::debug!("emitted {} segments", segments.len());
    segments
}

fn emit_section(
    blocks: &[Block],
    tree: &SectionTree,
    idx: usize,
    budget: usize,
    out: &mut Vec<Segment>,
) {
    let node = tree.node(idx);
    if !node.children.is_empty() && range_char_len(blocks, node.start, node.end) > budget {
        let before = out.len();
        for &child in &node.children {
            emit_section(blocks, tree, child, budget, out);
        }
        // The heading and body before the first subsection ride along
        // with the first subsection's segment.
        if let Some(first) = out.get_mut(before) {
            first.start = node.start;
        }
        return;
    }
    out.push(Segment::new(node.start, node.end));
}

/// Character count of the newline-joined block texts in `start..end`.
fn range_char_len(blocks: &[Block], start: usize, end: usize) -> usize {
    let text: usize = blocks[start..end]
        .iter()
        .map(|b| b.text.chars().count())
        .sum();
    text + (end - start).saturating_sub(1)
}

// ==================== Tests ====================
