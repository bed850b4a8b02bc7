//! Recovered table-of-contents entries.

use super::Point;
use serde::{Deserialize, Serialize};

/// Where an outline entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutlineSource {
    /// Embedded bookmark carried by the document
    Native,
    /// Synthesized from a font-size signature scan
    Inferred,
}

/// One recovered table-of-contents row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutlineEntry {
    /// Nesting level, 1 is top
    pub level: u32,

    /// Entry title
    pub title: String,

    /// Target page, 1-based
    pub page: u32,

    /// Anchor position on the page, used for ordering and as the
    /// excerpt scan origin
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pos: Option<Point>,

    /// PDF link-target hint (nameddest), when the bookmark carried one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nameddest: Option<String>,

    /// Viewer collapse hint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collapse: Option<bool>,

    /// Entry belongs to the appendix tail
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub appendix: bool,

    /// Body text sampled from the target page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,

    /// Recovery strategy that produced this entry
    pub source: OutlineSource,

    /// Consumed by content alignment
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub matched: bool,
}

impl OutlineEntry {
    /// Create an entry with the required fields.
    pub fn new(level: u32, title: impl Into<String>, page: u32, source: OutlineSource) -> Self {
        Self {
            level,
            title: title.into(),
            page,
            pos: None,
            nameddest: None,
            collapse: None,
            appendix: false,
            excerpt: None,
            source,
            matched: false,
        }
    }

    /// Anchor position ordering: page first, then y, then x.
    pub fn cmp_position(&self, other: &OutlineEntry) -> std::cmp::Ordering {
        let (ax, ay) = self.pos.map(|p| (p.x, p.y)).unwrap_or((0.0, 0.0));
        let (bx, by) = other.pos.map(|p| (p.x, p.y)).unwrap_or((0.0, 0.0));
        self.page
            .cmp(&other.page)
            .then(ay.total_cmp(&by))
            .then(ax.total_cmp(&bx))
    }
}
