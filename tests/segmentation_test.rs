//! Integration tests for section-tree construction and segmentation.

use docweave::input::{Bookmark, DocumentInput, PageLayout, RawSpan, Region, RegionCategory};
use docweave::model::{BBox, Document, SpanKind};
use docweave::pipeline::{Pipeline, PipelineOptions};

fn push_heading(page: &mut PageLayout, y: f32, text: &str) {
    page.regions.push(Region::new(
        RegionCategory::Title,
        BBox::new(50.0, y, 300.0, y + 20.0),
    ));
    page.spans.push(RawSpan::new(
        [52.0, y + 2.0, 280.0, y + 18.0],
        SpanKind::Text,
        text,
    ));
}

fn push_paragraph(page: &mut PageLayout, y: f32, text: &str) {
    page.regions.push(Region::new(
        RegionCategory::PlainText,
        BBox::new(50.0, y, 545.0, y + 40.0),
    ));
    page.spans.push(RawSpan::new(
        [52.0, y + 2.0, 540.0, y + 18.0],
        SpanKind::Text,
        text,
    ));
}

/// Push a body region carrying `len` characters of recognizer text
/// without individual spans.
fn push_body(page: &mut PageLayout, y: f32, len: usize) {
    let mut region = Region::new(
        RegionCategory::PlainText,
        BBox::new(50.0, y, 545.0, y + 30.0),
    );
    region.text = Some("x".repeat(len));
    page.regions.push(region);
}

fn input(pages: Vec<PageLayout>, bookmarks: Vec<Bookmark>) -> DocumentInput {
    DocumentInput {
        source: Some("paper".to_string()),
        pages,
        bookmarks,
        bibliography: Vec::new(),
    }
}

/// Every block index must belong to exactly one segment, in order.
fn assert_partition(doc: &Document) {
    assert!(!doc.segments.is_empty());
    assert_eq!(doc.segments[0].start, 0);
    assert_eq!(doc.segments.last().unwrap().end, doc.blocks.len());
    for pair in doc.segments.windows(2) {
        assert_eq!(pair[0].end, pair[1].start);
    }
}

/// Children must nest inside their parent and not overlap each other.
fn assert_tree_valid(doc: &Document) {
    for idx in doc.tree.walk() {
        let node = doc.tree.node(idx);
        assert!(node.start < node.end, "empty node range");
        let mut cursor = node.start;
        for &child_idx in &node.children {
            let child = doc.tree.node(child_idx);
            assert!(child.start >= cursor, "overlapping siblings");
            assert!(child.end <= node.end, "child escapes parent");
            assert!(child.level > node.level, "child level not deeper");
            cursor = child.end;
        }
    }
    assert_eq!(doc.tree.walk().len(), doc.tree.len());
}

// ==================== Segmentation ====================

#[test]
fn test_oversized_root_splits_at_child_sections() {
    // A 25k-char section with two subsections against a 20k budget
    // must yield exactly one segment per subsection.
    let mut page = PageLayout::new(0, 612.0, 792.0);
    push_heading(&mut page, 40.0, "Methods");
    push_heading(&mut page, 80.0, "Data");
    push_body(&mut page, 120.0, 12_000);
    push_heading(&mut page, 300.0, "Training");
    push_body(&mut page, 340.0, 13_000);

    let bookmarks = vec![
        Bookmark::new(1, "Methods", 1),
        Bookmark::new(2, "Data", 1),
        Bookmark::new(2, "Training", 1),
    ];
    let doc = Pipeline::new().process(&input(vec![page], bookmarks)).unwrap();

    assert_eq!(doc.blocks.len(), 5);
    assert_eq!(doc.segments.len(), 2);
    assert_eq!(doc.segments[0].range(), 0..3);
    assert_eq!(doc.segments[1].range(), 3..5);
    assert_partition(&doc);

    // The parent heading rides along with its first subsection.
    let first = doc.range_text(doc.segments[0].start, doc.segments[0].end);
    assert!(first.starts_with("Methods"));
    assert!(first.contains("Data"));
}

#[test]
fn test_section_within_budget_stays_whole() {
    let mut page = PageLayout::new(0, 612.0, 792.0);
    push_heading(&mut page, 40.0, "Methods");
    push_heading(&mut page, 80.0, "Data");
    push_body(&mut page, 120.0, 200);
    push_heading(&mut page, 300.0, "Training");
    push_body(&mut page, 340.0, 300);

    let bookmarks = vec![
        Bookmark::new(1, "Methods", 1),
        Bookmark::new(2, "Data", 1),
        Bookmark::new(2, "Training", 1),
    ];
    let doc = Pipeline::new().process(&input(vec![page], bookmarks)).unwrap();

    assert_eq!(doc.segments.len(), 1);
    assert_eq!(doc.segments[0].range(), 0..5);
}

#[test]
fn test_split_recurses_through_nested_sections() {
    let mut page = PageLayout::new(0, 612.0, 792.0);
    push_heading(&mut page, 40.0, "Methods");
    push_heading(&mut page, 80.0, "Data");
    push_heading(&mut page, 120.0, "Sources");
    push_body(&mut page, 160.0, 9_000);
    push_heading(&mut page, 220.0, "Cleaning");
    push_body(&mut page, 260.0, 9_000);
    push_heading(&mut page, 320.0, "Training");
    push_body(&mut page, 360.0, 9_000);

    let bookmarks = vec![
        Bookmark::new(1, "Methods", 1),
        Bookmark::new(2, "Data", 1),
        Bookmark::new(3, "Sources", 1),
        Bookmark::new(3, "Cleaning", 1),
        Bookmark::new(2, "Training", 1),
    ];
    let options = PipelineOptions::new().with_segment_budget(8_000);
    let doc = Pipeline::with_options(options)
        .process(&input(vec![page], bookmarks))
        .unwrap();

    // Methods splits into Data and Training; Data splits again into
    // Sources and Cleaning. Leaves over budget still stay whole.
    assert_eq!(doc.segments.len(), 3);
    assert_eq!(doc.segments[0].range(), 0..4);
    assert_eq!(doc.segments[1].range(), 4..6);
    assert_eq!(doc.segments[2].range(), 6..8);
    assert_partition(&doc);
    assert_tree_valid(&doc);
}

#[test]
fn test_preamble_blocks_join_first_segment() {
    let mut page = PageLayout::new(0, 612.0, 792.0);
    push_paragraph(&mut page, 40.0, "Summary of the contributions.");
    push_heading(&mut page, 100.0, "Introduction");
    push_paragraph(&mut page, 140.0, "Opening paragraph.");
    push_heading(&mut page, 200.0, "Results");
    push_paragraph(&mut page, 240.0, "Closing paragraph.");

    let bookmarks = vec![
        Bookmark::new(1, "Introduction", 1),
        Bookmark::new(1, "Results", 1),
    ];
    let doc = Pipeline::new().process(&input(vec![page], bookmarks)).unwrap();

    // The first section starts at block 1; the segment still covers
    // the preamble.
    assert_eq!(doc.tree.node(doc.tree.roots[0]).start, 1);
    assert_eq!(doc.segments.len(), 2);
    assert_eq!(doc.segments[0].range(), 0..3);
    assert_eq!(doc.segments[1].range(), 3..5);
    assert_partition(&doc);
}

#[test]
fn test_partition_holds_under_tight_budget() {
    let mut page = PageLayout::new(0, 612.0, 792.0);
    push_heading(&mut page, 40.0, "Methods");
    push_heading(&mut page, 80.0, "Data");
    push_body(&mut page, 120.0, 1_500);
    push_heading(&mut page, 300.0, "Training");
    push_body(&mut page, 340.0, 1_500);

    let bookmarks = vec![
        Bookmark::new(1, "Methods", 1),
        Bookmark::new(2, "Data", 1),
        Bookmark::new(2, "Training", 1),
    ];
    let options = PipelineOptions::new().with_segment_budget(1_000);
    let doc = Pipeline::with_options(options)
        .process(&input(vec![page], bookmarks))
        .unwrap();

    assert_eq!(doc.segments.len(), 2);
    assert_partition(&doc);
}

#[test]
fn test_unconfirmed_candidates_do_not_open_sections() {
    // Title regions without any outline to confirm them: the document
    // stays one big segment.
    let mut page = PageLayout::new(0, 612.0, 792.0);
    push_heading(&mut page, 40.0, "Overview");
    push_paragraph(&mut page, 80.0, "Some body text.");
    push_heading(&mut page, 140.0, "Closing Notes");
    push_paragraph(&mut page, 180.0, "More body text.");

    let doc = Pipeline::new().process(&input(vec![page], Vec::new())).unwrap();

    assert!(doc.tree.is_empty());
    assert_eq!(doc.segments.len(), 1);
    assert_eq!(doc.segments[0].range(), 0..doc.blocks.len());
}

// ==================== Section Tree ====================

#[test]
fn test_nested_sections_form_a_valid_tree() {
    let mut page = PageLayout::new(0, 612.0, 792.0);
    push_heading(&mut page, 40.0, "Methods");
    push_heading(&mut page, 80.0, "Data");
    push_paragraph(&mut page, 120.0, "Corpus description.");
    push_heading(&mut page, 180.0, "Training");
    push_paragraph(&mut page, 220.0, "Schedule description.");
    push_heading(&mut page, 280.0, "Evaluation");
    push_paragraph(&mut page, 320.0, "Metric description.");

    let bookmarks = vec![
        Bookmark::new(1, "Methods", 1),
        Bookmark::new(2, "Data", 1),
        Bookmark::new(2, "Training", 1),
        Bookmark::new(1, "Evaluation", 1),
    ];
    let doc = Pipeline::new().process(&input(vec![page], bookmarks)).unwrap();

    assert_eq!(doc.tree.len(), 4);
    assert_eq!(doc.tree.roots.len(), 2);
    assert_tree_valid(&doc);

    let methods = doc.tree.node(doc.tree.roots[0]);
    assert_eq!(methods.title, "Methods");
    assert_eq!(methods.range(), 0..5);
    assert_eq!(methods.children.len(), 2);
    assert_eq!(doc.tree.node(methods.children[0]).range(), 1..3);
    assert_eq!(doc.tree.node(methods.children[1]).range(), 3..5);

    let evaluation = doc.tree.node(doc.tree.roots[1]);
    assert_eq!(evaluation.range(), 5..7);
    assert!(evaluation.children.is_empty());
}

#[test]
fn test_node_titles_prefer_canonical_form() {
    // The aligned block's canonical title names the node, not the raw
    // extracted text with its enumeration prefix.
    let mut page = PageLayout::new(0, 612.0, 792.0);
    push_heading(&mut page, 40.0, "A. Appendix: Proofs");
    push_paragraph(&mut page, 80.0, "Proof of the main claim.");

    let doc = Pipeline::new().process(&input(vec![page], Vec::new())).unwrap();

    assert_eq!(doc.tree.roots.len(), 1);
    let node = doc.tree.node(doc.tree.roots[0]);
    assert_eq!(node.title, "Appendix: Proofs");
}

// ==================== Cross-Reference Restoration ====================

#[test]
fn test_restored_entity_has_a_single_owner() {
    let mut page = PageLayout::new(0, 612.0, 792.0);
    push_heading(&mut page, 40.0, "Introduction");
    push_paragraph(&mut page, 80.0, "Table 2 anchors the comparison.");
    push_heading(&mut page, 140.0, "Discussion");
    push_paragraph(&mut page, 180.0, "Table 2 appears again here.");
    push_heading(&mut page, 240.0, "Results");
    page.regions.push(Region::new(
        RegionCategory::Table,
        BBox::new(50.0, 280.0, 400.0, 360.0),
    ));
    page.regions.push(Region::new(
        RegionCategory::TableCaption,
        BBox::new(50.0, 365.0, 400.0, 380.0),
    ));
    page.spans.push(RawSpan::new(
        [52.0, 366.0, 398.0, 379.0],
        SpanKind::Text,
        "Table 2: results across runs",
    ));

    let bookmarks = vec![
        Bookmark::new(1, "Introduction", 1),
        Bookmark::new(1, "Discussion", 1),
        Bookmark::new(1, "Results", 1),
    ];
    let doc = Pipeline::new().process(&input(vec![page], bookmarks)).unwrap();

    assert_eq!(doc.segments.len(), 3);
    // Both earlier sections mention the table; only the first pulls it.
    assert_eq!(doc.segments[0].restored, vec![5]);
    assert!(doc.segments[1].restored.is_empty());
    assert!(doc.segments[2].restored.is_empty());
    assert!(doc.blocks[5].restored);
    assert_eq!(doc.stats.restored_entities, 1);

    let mut owners: Vec<usize> = doc
        .segments
        .iter()
        .flat_map(|s| s.restored.iter().copied())
        .collect();
    owners.sort_unstable();
    owners.dedup();
    assert_eq!(owners.len(), 1);
}
