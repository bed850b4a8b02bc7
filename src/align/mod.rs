//! Annotation stages that run between assembly and segmentation.
//!
//! Three passes over the flat block stream: heading candidates are
//! matched against outline entries, figures/tables/equations get
//! canonical identifiers, and bibliography entries are tagged inside
//! the reference section.

mod entity;
mod reference;
mod toc;

pub use entity::{extract_entity_ids, resolve_entity_ids, EntityCounters};
pub use reference::align_references;
pub use toc::align_outline;
