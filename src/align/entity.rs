//! Canonical identifier resolution for figures, tables and equations.

use crate::model::{Block, EntityKind};
use crate::vocab::{entity_pattern, placeholder_prefix};

/// Per-document placeholder counters, one per entity kind.
///
/// Each counter only ever moves forward, so generated identifiers are
/// never reused within a document even when earlier ones get corrected
/// by hand later.
#[derive(Debug, Clone, Copy, Default)]
pub struct EntityCounters {
    image: usize,
    table: usize,
    equation: usize,
}

impl EntityCounters {
    /// Take the next placeholder number for `kind`.
    pub fn next(&mut self, kind: EntityKind) -> usize {
        let counter = match kind {
            EntityKind::Image => &mut self.image,
            EntityKind::Table => &mut self.table,
            EntityKind::Equation => &mut self.equation,
        };
        let value = *counter;
        *counter += 1;
        value
    }
}

/// All identifier mentions of `kind` in `text`, in match order.
/// The whole naming token (word plus number) is the identifier.
pub fn extract_entity_ids(kind: EntityKind, text: &str) -> Vec<String> {
    entity_pattern(kind)
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Assign canonical identifiers to every entity block.
///
/// The first naming token found in the block's caption, footnote or
/// formula text becomes the canonical identifier; further tokens in the
/// same description are kept as related identifiers. Blocks without any
/// naming token get a sequential placeholder and are marked generated.
pub fn resolve_entity_ids(blocks: &mut [Block]) {
    let mut counters = EntityCounters::default();
    let mut generated = 0usize;

    for block in blocks.iter_mut() {
        let Some(kind) = block.entity_kind() else {
            continue;
        };
        let description = block.entity_description();
        let mut ids = extract_entity_ids(kind, &description);
        if ids.is_empty() {
            let number = counters.next(kind);
            block.entity_id = Some(format!("{}{}", placeholder_prefix(kind), number));
            block.generated_id = true;
            generated += 1;
        } else {
            block.related_ids = ids.split_off(1);
            block.entity_id = ids.pop();
        }
    }
    if generated > 0 {
        log::debug!("assigned {generated} placeholder entity ids");
    }
}

// ==================== Tests ====================
