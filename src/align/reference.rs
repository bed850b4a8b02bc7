//! Reference-section detection and bibliography tagging.

use crate::input::CitedWork;
use crate::model::{Block, BlockKind};
use crate::pipeline::PipelineOptions;
use crate::text::{match_ratio, partial_match_ratio};
use crate::vocab::REFERENCES_TITLE;

/// Tag bibliography entries inside the reference section.
///
/// The section starts after the first level-1 heading whose text fuzzy
/// matches the references vocabulary and ends before the next level-1
/// heading. Without such a heading nothing is tagged. Entries are text
/// blocks shorter than the reference length cutoff:
///
/// * with bibliography metadata, each entry is matched against the
///   cited work titles and tagged with the work's external identifier,
/// * without metadata, every entry in the section is tagged untyped,
///   but only when the section is closed by a later heading.
pub fn align_references(
    blocks: &mut [Block],
    bibliography: &[CitedWork],
    options: &PipelineOptions,
) {
    let heading = blocks.iter().position(|b| {
        b.level == Some(1)
            && match_ratio(&b.text, REFERENCES_TITLE, false) > options.title_match_threshold
    });
    let Some(heading_idx) = heading else {
        log::debug!("no reference heading found, skipping reference tagging");
        return;
    };

    let start = heading_idx + 1;
    let next_heading = blocks[start..].iter().position(|b| b.level == Some(1));
    let bounded = next_heading.is_some();
    let end = next_heading.map_or(blocks.len(), |offset| start + offset);

    let mut tagged = 0usize;
    for block in &mut blocks[start..end] {
        if block.kind != BlockKind::Text || block.char_len() >= options.reference_max_len {
            continue;
        }
        if bibliography.is_empty() {
            if bounded {
                block.kind = BlockKind::Reference;
                tagged += 1;
            }
            continue;
        }
        for work in bibliography {
            let Some(title) = &work.title else { continue };
            if partial_match_ratio(title, &block.text, true) > options.reference_match_threshold {
                block.kind = BlockKind::Reference;
                block.external_ref = work.external_id.clone();
                tagged += 1;
                break;
            }
        }
    }
    log::debug!(
        "reference section at blocks {start}..{end}, tagged {tagged} entries"
    );
}

// ==================== Tests ====================
