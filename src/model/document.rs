//! Document-level types.

use super::{Block, BlockKind, OutlineEntry, OutlineSource, SectionTree, Segment};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A fully processed document: the annotated flat block stream plus the
/// structures recovered from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Document metadata
    pub meta: DocumentMeta,

    /// Flat block stream in reading order
    pub blocks: Vec<Block>,

    /// Recovered outline entries
    pub outline: Vec<OutlineEntry>,

    /// Section hierarchy over the block stream
    pub tree: SectionTree,

    /// Budgeted segments with restored entities
    pub segments: Vec<Segment>,

    /// Pipeline run statistics
    pub stats: RunStats,
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Self {
            meta: DocumentMeta::default(),
            blocks: Vec::new(),
            outline: Vec::new(),
            tree: SectionTree::new(),
            segments: Vec::new(),
            stats: RunStats::default(),
        }
    }

    /// Number of pages the input declared.
    pub fn page_count(&self) -> u32 {
        self.meta.page_count
    }

    /// True when the stream holds no blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Confirmed section headings in stream order.
    pub fn headings(&self) -> impl Iterator<Item = (usize, &Block)> {
        self.blocks
            .iter()
            .enumerate()
            .filter(|(_, b)| b.is_section_heading())
    }

    /// Plain text of the whole stream, blocks joined by blank lines.
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .filter(|b| !b.text.is_empty())
            .map(|b| b.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Concatenated block text over a range, newline-joined.
    /// This is the length the segmenter budgets against.
    pub fn range_text(&self, start: usize, end: usize) -> String {
        self.blocks[start..end.min(self.blocks.len())]
            .iter()
            .map(|b| b.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// Document metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentMeta {
    /// Source name (file stem or caller-supplied label)
    pub source: Option<String>,

    /// Total number of pages in the input
    pub page_count: u32,

    /// When the pipeline processed the document
    pub processed_at: Option<DateTime<Utc>>,

    /// Which strategy produced the outline, if any entries exist
    pub outline_source: Option<OutlineSource>,
}

impl DocumentMeta {
    /// Convert metadata to YAML frontmatter format.
    pub fn to_yaml_frontmatter(&self) -> String {
        let mut lines = vec!["---".to_string()];

        if let Some(ref source) = self.source {
            lines.push(format!("source: \"{}\"", escape_yaml(source)));
        }
        lines.push(format!("pages: {}", self.page_count));
        if let Some(ref processed) = self.processed_at {
            lines.push(format!("processed: {}", processed.to_rfc3339()));
        }
        if let Some(source) = self.outline_source {
            let label = match source {
                OutlineSource::Native => "native",
                OutlineSource::Inferred => "inferred",
            };
            lines.push(format!("outline: {}", label));
        }

        lines.push("---".to_string());
        lines.push(String::new());

        lines.join("\n")
    }
}

/// Escape special characters for YAML strings.
fn escape_yaml(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

/// Counters collected while a document runs through the pipeline.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct RunStats {
    /// Pages seen in the input
    pub pages: u32,

    /// Blocks in the assembled stream
    pub blocks: u32,

    /// Outline entries recovered
    pub outline_entries: u32,

    /// Heading candidates promoted by alignment
    pub headings_aligned: u32,

    /// Heading candidates left unresolved
    pub headings_unaligned: u32,

    /// Entity blocks (figures, tables, equations)
    pub entities: u32,

    /// Entities that received a generated placeholder id
    pub generated_ids: u32,

    /// Blocks tagged as bibliography entries
    pub reference_entries: u32,

    /// Segments emitted
    pub segments: u32,

    /// Entity blocks restored into segments
    pub restored_entities: u32,
}

impl RunStats {
    /// Recount the stream-derived fields from a finished document.
    pub fn collect(doc: &Document) -> Self {
        let mut stats = RunStats {
            pages: doc.meta.page_count,
            blocks: doc.blocks.len() as u32,
            outline_entries: doc.outline.len() as u32,
            segments: doc.segments.len() as u32,
            ..Default::default()
        };
        for block in &doc.blocks {
            if block.is_section_heading() {
                stats.headings_aligned += 1;
            } else if block.is_heading_candidate() {
                stats.headings_unaligned += 1;
            }
            if block.entity_kind().is_some() {
                stats.entities += 1;
                if block.generated_id {
                    stats.generated_ids += 1;
                }
            }
            if block.kind == BlockKind::Reference {
                stats.reference_entries += 1;
            }
        }
        stats.restored_entities = doc
            .segments
            .iter()
            .map(|s| s.restored.len() as u32)
            .sum();
        stats
    }

    /// Merge another run's counters into this one (batch totals).
    pub fn merge(&mut self, other: &RunStats) {
        self.pages += other.pages;
        self.blocks += other.blocks;
        self.outline_entries += other.outline_entries;
        self.headings_aligned += other.headings_aligned;
        self.headings_unaligned += other.headings_unaligned;
        self.entities += other.entities;
        self.generated_ids += other.generated_ids;
        self.reference_entries += other.reference_entries;
        self.segments += other.segments;
        self.restored_entities += other.restored_entities;
    }
}
