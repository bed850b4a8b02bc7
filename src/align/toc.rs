//! Content-to-outline heading alignment.
//!
//! Heading candidates from assembly are matched against outline entries
//! by normalized similarity. A match promotes the block to a confirmed
//! title and copies the entry's level, appendix and collapse flags over;
//! each outline entry is consumed by at most one block. Blocks whose
//! text already names an appendix section are promoted directly, outline
//! or not.

use crate::model::{Block, BlockKind, OutlineEntry};
use crate::pipeline::PipelineOptions;
use crate::text::{match_ratio, strip_letter_dot_prefix};
use crate::vocab;

/// Align heading candidates with outline entries.
///
/// Candidates and entries are compared with enumeration prefixes ("A.")
/// stripped and letters only. A candidate may only match an entry whose
/// target page equals its own page or the page before it; among the
/// admissible entries the best ratio above the threshold wins, earliest
/// first on a tie, and a tie additionally marks the block low-confidence.
pub fn align_outline(
    blocks: &mut [Block],
    entries: &mut [OutlineEntry],
    options: &PipelineOptions,
) {
    let mut aligned = 0usize;
    for block in blocks.iter_mut() {
        if !block.is_heading_candidate() {
            continue;
        }
        let title = strip_letter_dot_prefix(&block.text).trim().to_string();

        // Appendix vocabulary wins outright, no outline entry needed.
        if vocab::contains_appendix_title(&title) {
            block.kind = BlockKind::Title;
            block.aligned = true;
            block.level = Some(1);
            block.canonical_title = Some(title);
            block.appendix = true;
            block.collapse = Some(false);
            aligned += 1;
            continue;
        }

        let mut best: Option<(usize, f64)> = None;
        let mut tied = false;
        for (ei, entry) in entries.iter().enumerate() {
            if entry.matched {
                continue;
            }
            // The block may render on the bookmark's page or trail it
            // by one, never precede it.
            if block.page != entry.page && block.page != entry.page + 1 {
                continue;
            }
            let entry_title = strip_letter_dot_prefix(&entry.title);
            let ratio = match_ratio(&title, entry_title, false);
            if ratio <= options.title_match_threshold {
                continue;
            }
            match best {
                None => best = Some((ei, ratio)),
                Some((_, best_ratio)) if ratio > best_ratio => {
                    best = Some((ei, ratio));
                    tied = false;
                }
                Some((_, best_ratio)) if ratio == best_ratio => tied = true,
                Some(_) => {}
            }
        }

        if let Some((ei, _)) = best {
            if tied {
                log::warn!(
                    "ambiguous outline match for {:?}, keeping the earliest entry",
                    block.text
                );
            }
            let entry = &mut entries[ei];
            entry.matched = true;

            let entry_title = strip_letter_dot_prefix(&entry.title).trim();
            block.kind = BlockKind::Title;
            block.aligned = true;
            block.low_confidence = tied;
            block.level = Some(entry.level);
            block.canonical_title = Some(match &entry.nameddest {
                Some(dest) => format!("{dest} {entry_title}"),
                None => entry_title.to_string(),
            });
            block.appendix = entry.appendix;
            block.collapse = entry.collapse;
            aligned += 1;
        }
    }
    log::debug!("aligned {aligned} headings against {} outline entries", entries.len());
}

// ==================== Tests ====================
