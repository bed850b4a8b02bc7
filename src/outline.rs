//! Outline recovery from embedded bookmarks or font-size inference.
//!
//! When the source document carries bookmarks they become the outline
//! directly. Without them, the document is scanned for spans containing
//! common section-title strings; the dominant font size among those spans
//! becomes the heading signature, a single-level recipe is synthesized
//! from it, and the heading engine re-scans the whole document. A
//! caller-supplied recipe takes the inference's place when given.
//!
//! All strategies finish with the appendix latch: once an entry looks
//! like appendix material, every later entry is flagged too.

use std::collections::BTreeSet;

use crate::error::Result;
use crate::input::DocumentInput;
use crate::model::{Block, OutlineEntry, OutlineSource, Point};
use crate::pipeline::PipelineOptions;
use crate::recipe::{FontRuleConfig, HeadingRuleConfig, Recipe, RecipeConfig};
use crate::vocab;

/// Size tolerance for synthesized rules, half the 0.1pt clustering
/// bucket, so every span of the clustered size is re-admitted.
const INFERRED_SIZE_TOLERANCE: f32 = 0.05;

/// Build the outline for a document.
///
/// Bookmarks win when present; otherwise the user recipe, when given;
/// otherwise font-size inference. The result may be empty when nothing
/// heading-like is found, which downstream stages treat as a degenerate
/// single-section document.
pub fn build_outline(
    input: &DocumentInput,
    blocks: &[Block],
    user_recipe: Option<&Recipe>,
    options: &PipelineOptions,
) -> Result<Vec<OutlineEntry>> {
    let mut entries = if !input.bookmarks.is_empty() {
        native_outline(input, blocks, options)
    } else if let Some(recipe) = user_recipe {
        engine_outline(recipe, blocks, options)
    } else {
        inferred_outline(blocks, options)?
    };
    apply_appendix_latch(&mut entries);
    log::debug!("outline has {} entries", entries.len());
    Ok(entries)
}

/// Outline from embedded bookmarks. Bookmarks without a target page are
/// dropped; everything else passes through with an excerpt attached.
fn native_outline(
    input: &DocumentInput,
    blocks: &[Block],
    options: &PipelineOptions,
) -> Vec<OutlineEntry> {
    let mut entries = Vec::new();
    for bookmark in &input.bookmarks {
        let Some(page) = bookmark.page else {
            log::warn!("bookmark {:?} has no target page, dropped", bookmark.title);
            continue;
        };
        let mut entry = OutlineEntry::new(
            bookmark.level,
            bookmark.title.clone(),
            page,
            OutlineSource::Native,
        );
        entry.pos = bookmark.to;
        entry.nameddest = bookmark.nameddest.clone();
        entry.collapse = bookmark.collapse;
        entry.excerpt = Some(page_excerpt(blocks, page, bookmark.to, options.excerpt_len));
        entries.push(entry);
    }
    entries
}

/// Outline synthesized from the document's own font-size signature.
fn inferred_outline(blocks: &[Block], options: &PipelineOptions) -> Result<Vec<OutlineEntry>> {
    // Every span whose text contains a known section title, keyed by
    // size bucket.
    let mut matches: Vec<(i32, String, f32)> = Vec::new();
    for block in blocks {
        for line in &block.lines {
            for span in &line.spans {
                let Some(font) = &span.font else { continue };
                if vocab::contains_section_title(&span.content) {
                    matches.push((font.size_key(), font.name.clone(), font.size));
                }
            }
        }
    }

    // The signature is the largest size bucket seen often enough.
    let mut buckets: Vec<i32> = matches.iter().map(|(k, _, _)| *k).collect();
    buckets.sort_unstable();
    buckets.dedup();
    let signature = buckets.into_iter().rev().find(|key| {
        matches.iter().filter(|(k, _, _)| k == key).count() > options.min_signature_count
    });
    let Some(signature) = signature else {
        log::debug!("no font-size signature found, outline stays empty");
        return Ok(Vec::new());
    };

    // One level-1 rule per distinct font name and size at the signature.
    let mut seen: BTreeSet<(String, i32)> = BTreeSet::new();
    let mut heading = Vec::new();
    for (key, name, size) in &matches {
        if *key != signature || !seen.insert((name.clone(), *key)) {
            continue;
        }
        heading.push(HeadingRuleConfig {
            level: 1,
            greedy: false,
            font: FontRuleConfig {
                name: Some(regex::escape(name)),
                size: Some(*size),
                size_tolerance: Some(INFERRED_SIZE_TOLERANCE),
                ..Default::default()
            },
            bbox: Default::default(),
        });
    }
    let recipe = Recipe::from_config(&RecipeConfig { heading })?;

    let mut entries = engine_outline(&recipe, blocks, options);
    for entry in &mut entries {
        entry.nameddest = Some("section.".to_string());
    }
    Ok(entries)
}

/// Run the heading engine over every block and collect the titles it
/// yields as outline entries, ordered by anchor position.
fn engine_outline(
    recipe: &Recipe,
    blocks: &[Block],
    options: &PipelineOptions,
) -> Vec<OutlineEntry> {
    let mut entries = Vec::new();
    for block in blocks {
        for (level, title) in recipe.headings_in(block) {
            let mut entry = OutlineEntry::new(level, title, block.page, OutlineSource::Inferred);
            // Bottom-right corner of the block is the anchor.
            entry.pos = Some(Point::new(block.bbox.x1, block.bbox.y1));
            entries.push(entry);
        }
    }
    entries.sort_by(|a, b| a.cmp_position(b));
    for entry in &mut entries {
        entry.excerpt = Some(page_excerpt(blocks, entry.page, entry.pos, options.excerpt_len));
    }
    entries
}

/// Sample body text for an outline entry: blocks on the target page with
/// their left edge at or right of the anchor, concatenated until the
/// budget is reached, then an ellipsis marker.
fn page_excerpt(blocks: &[Block], page: u32, pos: Option<Point>, budget: usize) -> String {
    let mut text = String::new();
    if let Some(pos) = pos {
        for block in blocks.iter().filter(|b| b.page == page && !b.text.is_empty()) {
            if text.chars().count() >= budget {
                break;
            }
            if block.bbox.x0 >= pos.x {
                if !text.is_empty() {
                    text.push('\n');
                }
                text.push_str(&block.text);
            }
        }
    }
    text.push_str("...");
    text
}

/// Flag appendix entries. An entry latches on a vocabulary title match
/// or an `appendix` link-target hint; once latched, every later entry is
/// appendix as well.
pub fn apply_appendix_latch(entries: &mut [OutlineEntry]) {
    let mut latched = false;
    for entry in entries.iter_mut() {
        let hit = vocab::contains_appendix_title(&entry.title)
            || entry
                .nameddest
                .as_deref()
                .is_some_and(|d| d.to_ascii_lowercase().contains(vocab::APPENDIX_DEST_HINT));
        if hit {
            latched = true;
        }
        entry.appendix = latched;
    }
}

// ==================== Tests ====================
