//! Document model types.
//!
//! This module defines the intermediate representation shared by all
//! pipeline stages: geometry, spans and lines, annotated blocks, outline
//! entries, the section tree, and the document wrapper. The model is
//! serde-serializable end to end, so any stage's output can be dumped
//! as JSON.

mod block;
mod document;
mod geometry;
mod outline;
mod section;
mod span;

pub use block::{Block, BlockKind, EntityKind};
pub use document::{Document, DocumentMeta, RunStats};
pub use geometry::{BBox, Point};
pub use outline::{OutlineEntry, OutlineSource};
pub use section::{SectionNode, SectionTree, Segment};
pub use span::{FontInfo, Line, Span, SpanKind};
