//! The annotated content block, unit of the flat document stream.

use super::{BBox, Line};
use serde::{Deserialize, Serialize};

/// Structural category of a block after assembly and alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    /// Body text (including unconfirmed heading candidates)
    Text,
    /// Confirmed section heading
    Title,
    /// List block, items one per line
    List,
    /// Figure region
    Image,
    /// Table region
    Table,
    /// Display formula region
    Equation,
    /// Caption that could not be attached to any entity
    Caption,
    /// Bibliography entry (tagged by reference alignment)
    Reference,
    /// Region excluded from structural classification
    Abandoned,
}

/// Entity family for identifier resolution and restoration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// Figures, charts, pictures
    Image,
    /// Tables
    Table,
    /// Display formulas
    Equation,
}

/// One block of the flat document stream.
///
/// Blocks start as plain assembly output and accumulate annotations as
/// the pipeline stages run: heading promotion, entity identifiers,
/// reference tags, restoration markers. Fields that a stage has not
/// touched keep their explicit unresolved defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    /// Structural category
    pub kind: BlockKind,

    /// Page number, 1-based
    pub page: u32,

    /// Region bounding box
    pub bbox: BBox,

    /// Assembled lines (text-bearing blocks)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lines: Vec<Line>,

    /// Serialized block text (markdown-ready)
    #[serde(default)]
    pub text: String,

    /// LaTeX source for equation blocks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latex: Option<String>,

    /// Caption text attached to an entity block
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub caption: Vec<String>,

    /// Footnote text attached to an entity block
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub footnote: Vec<String>,

    /// List items are numbered rather than bulleted
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub ordered: bool,

    /// Heading level: `Some(1)` marks an unconfirmed candidate,
    /// alignment overwrites it with the outline entry's level
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,

    /// Set when the block was matched to an outline entry or
    /// force-classified as an appendix heading
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub aligned: bool,

    /// Set when multiple outline entries tied for this block
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub low_confidence: bool,

    /// Outline title (with link-target hint prefix) for aligned headings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canonical_title: Option<String>,

    /// Heading belongs to the appendix tail of the document
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub appendix: bool,

    /// Collapse hint carried over from the outline entry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collapse: Option<bool>,

    /// Canonical entity identifier (extracted or generated)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,

    /// Further identifiers mentioned in the entity's caption
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_ids: Vec<String>,

    /// The canonical identifier is a generated placeholder
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub generated_id: bool,

    /// External bibliography identifier for reference entries;
    /// `None` marks an entry tagged without metadata support
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_ref: Option<String>,

    /// Entity was already pulled into some segment (document-wide)
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub restored: bool,
}

impl Block {
    /// Create an empty block of the given kind.
    pub fn new(kind: BlockKind, page: u32, bbox: BBox) -> Self {
        Self {
            kind,
            page,
            bbox,
            lines: Vec::new(),
            text: String::new(),
            latex: None,
            caption: Vec::new(),
            footnote: Vec::new(),
            ordered: false,
            level: None,
            aligned: false,
            low_confidence: false,
            canonical_title: None,
            appendix: false,
            collapse: None,
            entity_id: None,
            related_ids: Vec::new(),
            generated_id: false,
            external_ref: None,
            restored: false,
        }
    }

    /// Create a text block with pre-serialized content.
    pub fn text_block(page: u32, bbox: BBox, text: impl Into<String>) -> Self {
        let mut block = Self::new(BlockKind::Text, page, bbox);
        block.text = text.into();
        block
    }

    /// True for a confirmed section heading.
    pub fn is_section_heading(&self) -> bool {
        self.kind == BlockKind::Title
    }

    /// True for an unconfirmed heading candidate.
    pub fn is_heading_candidate(&self) -> bool {
        self.kind == BlockKind::Text && self.level.is_some()
    }

    /// Entity family of this block, if it is an entity block.
    pub fn entity_kind(&self) -> Option<EntityKind> {
        match self.kind {
            BlockKind::Image => Some(EntityKind::Image),
            BlockKind::Table => Some(EntityKind::Table),
            BlockKind::Equation => Some(EntityKind::Equation),
            _ => None,
        }
    }

    /// Caption and footnote text joined for identifier scanning.
    /// Equation blocks fall back to their LaTeX/body text when no
    /// caption was attached.
    pub fn entity_description(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        parts.extend(self.caption.iter().map(String::as_str));
        parts.extend(self.footnote.iter().map(String::as_str));
        if parts.is_empty() && self.kind == BlockKind::Equation {
            if let Some(latex) = &self.latex {
                return latex.clone();
            }
            return self.text.clone();
        }
        parts.join("\n")
    }

    /// Character count of the block text.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_candidate_vs_heading() {
        let mut block = Block::text_block(1, BBox::default(), "Introduction");
        assert!(!block.is_heading_candidate());
        block.level = Some(1);
        assert!(block.is_heading_candidate());
        assert!(!block.is_section_heading());

        block.kind = BlockKind::Title;
        assert!(block.is_section_heading());
        assert!(!block.is_heading_candidate());
    }

    #[test]
    fn test_entity_description_prefers_caption() {
        let mut block = Block::new(BlockKind::Equation, 1, BBox::default());
        block.latex = Some("E = mc^2".to_string());
        assert_eq!(block.entity_description(), "E = mc^2");

        block.caption.push("Equation 1: mass-energy".to_string());
        assert_eq!(block.entity_description(), "Equation 1: mass-energy");
    }

    #[test]
    fn test_serde_skips_defaults() {
        let block = Block::text_block(1, BBox::default(), "hi");
        let json = serde_json::to_string(&block).unwrap();
        assert!(!json.contains("aligned"));
        assert!(!json.contains("restored"));
        assert!(!json.contains("entity_id"));
    }

    #[test]
    fn test_entity_kind_mapping() {
        let img = Block::new(BlockKind::Image, 1, BBox::default());
        assert_eq!(img.entity_kind(), Some(EntityKind::Image));
        let txt = Block::new(BlockKind::Text, 1, BBox::default());
        assert_eq!(txt.entity_kind(), None);
    }
}
