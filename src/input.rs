//! Detection-layer input types.
//!
//! The structure-recovery pipeline does not read PDF files itself. An
//! upstream layout-detection step hands it, per page, a list of detected
//! regions (category plus polygon) and a list of recognized spans (bounding
//! box, kind, content, font attributes). This module defines the serde
//! surface for that hand-off, plus the optional embedded bookmarks and
//! bibliography metadata used by later stages.
//!
//! Deserialization is deliberately lenient: a region with a missing or
//! unrecognized category, or a span without geometry, still loads. Such
//! items are kept in the output stream verbatim but excluded from
//! structural classification.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{BBox, FontInfo, Point, SpanKind};

/// Category of a detected layout region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionCategory {
    /// Section heading candidate
    Title,
    /// Body paragraph
    #[serde(rename = "plain text", alias = "plain_text", alias = "text")]
    PlainText,
    /// Page furniture (headers, footers, page numbers)
    Abandon,
    /// Figure body
    Figure,
    /// Caption attached to a figure
    FigureCaption,
    /// Table body
    Table,
    /// Caption attached to a table
    TableCaption,
    /// Footnote text under a table
    TableFootnote,
    /// Display formula occupying its own region
    IsolateFormula,
    /// Caption or numbering next to a display formula
    FormulaCaption,
    /// Unordered list body
    List,
    /// Numbered list body
    OrderedList,
    /// Category string the detector emitted but this pipeline does not know
    #[serde(other)]
    Unknown,
}

impl RegionCategory {
    /// True for categories whose content arrives as recognized spans.
    /// Figures, tables and abandoned furniture carry no text of their own.
    pub fn is_span_host(&self) -> bool {
        !matches!(
            self,
            RegionCategory::Figure
                | RegionCategory::Table
                | RegionCategory::Abandon
                | RegionCategory::Unknown
        )
    }

    /// True for caption-like categories that attach to a figure, table or
    /// formula region rather than standing alone.
    pub fn is_caption(&self) -> bool {
        matches!(
            self,
            RegionCategory::FigureCaption
                | RegionCategory::TableCaption
                | RegionCategory::TableFootnote
                | RegionCategory::FormulaCaption
        )
    }
}

/// One detected layout region on a page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Region {
    /// Detected category; `None` when the detector omitted it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<RegionCategory>,

    /// Region outline as a flat `[x0, y0, x1, y1, ...]` 4-corner polygon
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub poly: Vec<f32>,

    /// Axis-aligned box, accepted as an alternative to `poly`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<[f32; 4]>,

    /// Detector confidence score
    #[serde(default)]
    pub score: f32,

    /// Pre-recognized text, for regions the detector already transcribed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Pre-recognized LaTeX source, for formula regions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latex: Option<String>,
}

impl Region {
    /// Create a region from a category and an axis-aligned box.
    pub fn new(category: RegionCategory, bbox: BBox) -> Self {
        Self {
            category: Some(category),
            poly: Vec::new(),
            bbox: Some([bbox.x0, bbox.y0, bbox.x1, bbox.y1]),
            score: 1.0,
            text: None,
            latex: None,
        }
    }

    /// Axis-aligned bounds, preferring the polygon when both are present.
    /// `None` when the region carries no usable geometry.
    pub fn bounds(&self) -> Option<BBox> {
        BBox::from_poly(&self.poly).or_else(|| {
            self.bbox
                .map(|[x0, y0, x1, y1]| BBox::new(x0, y0, x1, y1))
        })
    }
}

/// One recognized span, before assignment to a region.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawSpan {
    /// Bounding box as `[x0, y0, x1, y1]`; zeroed when the recognizer
    /// failed to report geometry
    #[serde(default)]
    pub bbox: [f32; 4],

    /// Content kind
    #[serde(default, rename = "type", alias = "kind")]
    pub kind: SpanKind,

    /// Recognized text, or LaTeX source for formula spans
    #[serde(default, alias = "text")]
    pub content: String,

    /// Font attributes, when the extractor reported them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<FontInfo>,
}

impl RawSpan {
    /// Create a span of the given kind.
    pub fn new(bbox: [f32; 4], kind: SpanKind, content: impl Into<String>) -> Self {
        Self {
            bbox,
            kind,
            content: content.into(),
            font: None,
        }
    }

    /// Attach font attributes.
    pub fn with_font(mut self, font: FontInfo) -> Self {
        self.font = Some(font);
        self
    }

    /// Bounding box as a [`BBox`].
    pub fn bounds(&self) -> BBox {
        let [x0, y0, x1, y1] = self.bbox;
        BBox::new(x0, y0, x1, y1)
    }
}

/// Detected layout of a single page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageLayout {
    /// Page index as emitted by the detector (0-based)
    #[serde(alias = "page_idx")]
    pub page_no: u32,

    /// Page width in points
    #[serde(default)]
    pub width: f32,

    /// Page height in points
    #[serde(default)]
    pub height: f32,

    /// Detected regions
    #[serde(default)]
    pub regions: Vec<Region>,

    /// Recognized spans, independent of region membership
    #[serde(default)]
    pub spans: Vec<RawSpan>,
}

impl PageLayout {
    /// Create an empty page layout.
    pub fn new(page_no: u32, width: f32, height: f32) -> Self {
        Self {
            page_no,
            width,
            height,
            regions: Vec::new(),
            spans: Vec::new(),
        }
    }
}

/// One embedded bookmark (table-of-contents record) from the source file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bookmark {
    /// Nesting depth, 1 for top-level entries
    pub level: u32,

    /// Entry title
    pub title: String,

    /// Target page (1-based); entries without one are dropped
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,

    /// Anchor point of the link target on the page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<Point>,

    /// Named link destination, e.g. `section.3`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nameddest: Option<String>,

    /// Whether the viewer shows this entry collapsed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collapse: Option<bool>,
}

impl Bookmark {
    /// Create a bookmark with just the required fields.
    pub fn new(level: u32, title: impl Into<String>, page: u32) -> Self {
        Self {
            level,
            title: title.into(),
            page: Some(page),
            to: None,
            nameddest: None,
            collapse: None,
        }
    }
}

/// One cited work from external bibliography metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CitedWork {
    /// Title of the cited work
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Identifier of the work in the external catalogue
    #[serde(
        default,
        alias = "paper_id",
        alias = "paperId",
        skip_serializing_if = "Option::is_none"
    )]
    pub external_id: Option<String>,
}

/// Complete detection output for one document, the pipeline's sole input.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentInput {
    /// Originating file name or identifier, for reporting only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// Per-page detection results, in page order
    #[serde(default)]
    pub pages: Vec<PageLayout>,

    /// Embedded bookmarks, when the source file carried any
    #[serde(default)]
    pub bookmarks: Vec<Bookmark>,

    /// External bibliography metadata for reference alignment
    #[serde(default)]
    pub bibliography: Vec<CitedWork>,
}

impl DocumentInput {
    /// Parse detection output from a JSON string.
    ///
    /// # Example
    ///
    /// ```
    /// use docweave::input::DocumentInput;
    ///
    /// let input = DocumentInput::from_json(r#"{"pages": []}"#).unwrap();
    /// assert!(input.pages.is_empty());
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse detection output from a JSON file. The file name
    /// becomes the document source when the payload does not name one.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let mut input = Self::from_json(&json)?;
        if input.source.is_none() {
            input.source = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned());
        }
        Ok(input)
    }

    /// Number of pages in the detection output.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// True when no page carries any region or span.
    pub fn is_empty(&self) -> bool {
        self.pages
            .iter()
            .all(|p| p.regions.is_empty() && p.spans.is_empty())
    }
}

// ==================== Tests ====================
