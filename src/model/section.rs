//! Section tree and segment types.
//!
//! The tree is an index arena: nodes live in one `Vec` and refer to each
//! other by index, children only. Block membership is expressed as
//! `start..end` ranges over the flat block stream, end exclusive.

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// One section of the document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionNode {
    /// Heading text of the section
    pub title: String,

    /// Heading level, 1 is top
    pub level: u32,

    /// Index of the heading block in the flat stream
    pub start: usize,

    /// One past the last block of the section
    pub end: usize,

    /// Child node indices in document order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<usize>,
}

impl SectionNode {
    /// Block-index range covered by the section.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Arena-backed section hierarchy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SectionTree {
    /// All nodes, in creation (document) order
    pub nodes: Vec<SectionNode>,

    /// Indices of top-level sections in document order
    pub roots: Vec<usize>,
}

impl SectionTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node and return its index.
    pub fn push(&mut self, node: SectionNode) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    /// Attach `child` under `parent`.
    pub fn attach(&mut self, parent: usize, child: usize) {
        self.nodes[parent].children.push(child);
    }

    /// Record a top-level section.
    pub fn add_root(&mut self, idx: usize) {
        self.roots.push(idx);
    }

    /// Node accessor.
    pub fn node(&self, idx: usize) -> &SectionNode {
        &self.nodes[idx]
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the tree holds no sections.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Depth-first pre-order walk over node indices.
    pub fn walk(&self) -> Vec<usize> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<usize> = self.roots.iter().rev().copied().collect();
        while let Some(idx) = stack.pop() {
            out.push(idx);
            for &child in self.nodes[idx].children.iter().rev() {
                stack.push(child);
            }
        }
        out
    }
}

/// A contiguous slice of the flat block stream, sized by the segmenter,
/// possibly extended with restored entity blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// First block index of the source range
    pub start: usize,

    /// One past the last block of the source range
    pub end: usize,

    /// Indices of entity blocks appended by cross-reference restoration
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub restored: Vec<usize>,
}

impl Segment {
    /// Create a segment over `start..end`.
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end,
            restored: Vec::new(),
        }
    }

    /// Source range of the segment.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Number of source blocks.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// True when the source range is empty.
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// All block indices belonging to the segment: the source range
    /// followed by restored entities.
    pub fn block_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.range().chain(self.restored.iter().copied())
    }
}
