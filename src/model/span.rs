//! Span and line types produced by layout detection.

use super::BBox;
use serde::{Deserialize, Serialize};

/// The kind of content a span carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpanKind {
    /// Ordinary text
    #[default]
    Text,
    /// Formula rendered inline with surrounding text
    #[serde(alias = "inline")]
    InlineFormula,
    /// Display formula occupying its own line
    #[serde(alias = "isolated")]
    BlockFormula,
    /// Footnote marker text, rendered as a superscript
    Footnote,
}

impl SpanKind {
    /// True for either formula kind.
    pub fn is_formula(&self) -> bool {
        matches!(self, SpanKind::InlineFormula | SpanKind::BlockFormula)
    }
}

/// Font metadata attached to a text span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontInfo {
    /// Font face name as reported by the extractor
    pub name: String,

    /// Font size in points
    pub size: f32,

    /// Text color packed as 0xRRGGBB
    #[serde(default)]
    pub color: u32,

    /// Bold style flag
    #[serde(default)]
    pub bold: bool,

    /// Italic style flag
    #[serde(default)]
    pub italic: bool,

    /// Serif typeface flag
    #[serde(default)]
    pub serif: bool,

    /// Monospace typeface flag
    #[serde(default)]
    pub monospace: bool,

    /// Superscript positioning flag
    #[serde(default)]
    pub superscript: bool,
}

impl FontInfo {
    /// Create font metadata with just a name and size.
    pub fn new(name: impl Into<String>, size: f32) -> Self {
        Self {
            name: name.into(),
            size,
            color: 0,
            bold: false,
            italic: false,
            serif: false,
            monospace: false,
            superscript: false,
        }
    }

    /// Font size rounded to a 0.1pt bucket, for grouping spans that
    /// nominally share a size but differ in float noise.
    pub fn size_key(&self) -> i32 {
        (self.size * 10.0).round() as i32
    }
}

/// An atomic positioned fragment of content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Span {
    /// Bounding box in page coordinates
    pub bbox: BBox,

    /// Content kind
    pub kind: SpanKind,

    /// Raw content: text, or LaTeX source for formula spans
    pub content: String,

    /// Font metadata, when the extractor reported it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<FontInfo>,
}

impl Span {
    /// Create a text span.
    pub fn text(bbox: BBox, content: impl Into<String>) -> Self {
        Self {
            bbox,
            kind: SpanKind::Text,
            content: content.into(),
            font: None,
        }
    }

    /// Create a span of the given kind.
    pub fn new(bbox: BBox, kind: SpanKind, content: impl Into<String>) -> Self {
        Self {
            bbox,
            kind,
            content: content.into(),
            font: None,
        }
    }

    /// Attach font metadata.
    pub fn with_font(mut self, font: FontInfo) -> Self {
        self.font = Some(font);
        self
    }
}

/// A horizontal run of spans sharing a baseline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Line {
    /// Spans ordered left to right
    pub spans: Vec<Span>,

    /// Hull of the span boxes
    pub bbox: BBox,
}

impl Line {
    /// Build a line from spans, sorting them left to right and taking
    /// the hull as the line box.
    pub fn from_spans(mut spans: Vec<Span>) -> Self {
        spans.sort_by(|a, b| {
            a.bbox
                .x0
                .partial_cmp(&b.bbox.x0)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        let bbox = spans
            .iter()
            .map(|s| s.bbox)
            .reduce(|acc, b| acc.hull(&b))
            .unwrap_or_default();
        Self { spans, bbox }
    }

    /// Concatenated raw text of the line's text spans.
    pub fn plain_text(&self) -> String {
        self.spans
            .iter()
            .filter(|s| s.kind == SpanKind::Text)
            .map(|s| s.content.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// True when any span in the line is a display formula.
    pub fn has_block_formula(&self) -> bool {
        self.spans.iter().any(|s| s.kind == SpanKind::BlockFormula)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_kind_aliases() {
        let k: SpanKind = serde_json::from_str("\"inline\"").unwrap();
        assert_eq!(k, SpanKind::InlineFormula);
        let k: SpanKind = serde_json::from_str("\"isolated\"").unwrap();
        assert_eq!(k, SpanKind::BlockFormula);
        let k: SpanKind = serde_json::from_str("\"text\"").unwrap();
        assert_eq!(k, SpanKind::Text);
    }

    #[test]
    fn test_line_from_spans_sorts() {
        let b = Span::text(BBox::new(50.0, 0.0, 90.0, 10.0), "world");
        let a = Span::text(BBox::new(0.0, 0.0, 40.0, 10.0), "hello");
        let line = Line::from_spans(vec![b, a]);
        assert_eq!(line.plain_text(), "hello world");
        assert_eq!(line.bbox, BBox::new(0.0, 0.0, 90.0, 10.0));
    }

    #[test]
    fn test_size_key_buckets_noise() {
        let a = FontInfo::new("F1", 11.999);
        let b = FontInfo::new("F2", 12.001);
        assert_eq!(a.size_key(), b.size_key());
    }
}
