//! Cross-reference restoration: pull referenced entities into segments.

use std::collections::HashMap;

use crate::model::{Block, EntityKind, Segment};
use crate::vocab::entity_pattern;

const ENTITY_KINDS: [EntityKind; 3] = [EntityKind::Image, EntityKind::Table, EntityKind::Equation];

/// Reattach entities that segments reference but do not contain.
///
/// Segment text is scanned for entity naming tokens; a token that
/// resolves in the document-wide identifier index, names an entity
/// outside the segment's source range, and has not been pulled into any
/// earlier segment is appended to the segment's restored list. The
/// entity's document-wide restored flag then blocks every later pull,
/// so no entity appears in more than one restored list and a second
/// pass over the same segments changes nothing.
pub fn restore_cross_references(blocks: &mut [Block], segments: &mut [Segment]) {
    // Lowercased canonical id to first carrying block.
    let mut index: HashMap<String, usize> = HashMap::new();
    for (i, block) in blocks.iter().enumerate() {
        if block.entity_kind().is_none() {
            continue;
        }
        if let Some(id) = &block.entity_id {
            index.entry(id.to_ascii_lowercase()).or_insert(i);
        }
    }
    if index.is_empty() {
        return;
    }

    let mut pulled = 0usize;
    for segment in segments.iter_mut() {
        let mentions = referenced_entities(blocks, segment, &index);
        for entity_idx in mentions {
            if blocks[entity_idx].restored {
                continue;
            }
            blocks[entity_idx].restored = true;
            segment.restored.push(entity_idx);
            pulled += 1;
        }
    }
    if pulled > 0 {
        log::debug!("restored {pulled} entities into segments");
    }
}

/// Entity block indices referenced by the segment's source text but
/// located outside its source range, in first-mention order.
fn referenced_entities(
    blocks: &[Block],
    segment: &Segment,
    index: &HashMap<String, usize>,
) -> Vec<usize> {
    let mut found: Vec<usize> = Vec::new();
    for block_idx in segment.range() {
        let text = &blocks[block_idx].text;
        for kind in ENTITY_KINDS {
            for token in entity_pattern(kind).find_iter(text) {
                let Some(&entity_idx) = index.get(&token.as_str().to_ascii_lowercase()) else {
                    continue;
                };
                if !segment.range().contains(&entity_idx) && !found.contains(&entity_idx) {
                    found.push(entity_idx);
                }
            }
        }
    }
    found
}

// ==================== Tests ====================
