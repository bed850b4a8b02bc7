//! The structure-recovery pipeline.
//!
//! [`Pipeline::process`] runs every stage over one document's detection
//! output: geometric assembly, outline recovery, content and reference
//! alignment, identifier resolution, segmentation, and cross-reference
//! restoration. Stages run strictly in order; each consumes only the
//! previous stage's output. Independent documents share nothing, so
//! [`Pipeline::process_batch`] fans them out across a thread pool.

use chrono::Utc;
use rayon::prelude::*;

use crate::align;
use crate::assemble;
use crate::error::{Error, Result};
use crate::input::DocumentInput;
use crate::model::{Document, DocumentMeta, RunStats};
use crate::outline;
use crate::recipe::Recipe;
use crate::segment;

/// Tuning knobs for the pipeline stages.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Minimum fraction of a span's area a region must cover to claim it
    pub span_region_overlap: f32,

    /// Minimum vertical overlap (fraction of the shorter span's height)
    /// for two spans to share a line
    pub line_overlap: f32,

    /// Character budget for outline-entry excerpts
    pub excerpt_len: usize,

    /// Font-size cluster size the outline inference requires, exclusive
    pub min_signature_count: usize,

    /// Similarity ratio a heading must exceed to match an outline entry
    pub title_match_threshold: f64,

    /// Similarity ratio a reference entry must exceed to match a cited work
    pub reference_match_threshold: f64,

    /// Blocks at or above this character count are never reference entries
    pub reference_max_len: usize,

    /// Character budget per segment
    pub segment_budget: usize,

    /// Whether batch processing uses the thread pool
    pub parallel: bool,
}

impl PipelineOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the span-to-region area overlap ratio.
    pub fn with_span_region_overlap(mut self, ratio: f32) -> Self {
        self.span_region_overlap = ratio;
        self
    }

    /// Set the line-merge vertical overlap ratio.
    pub fn with_line_overlap(mut self, ratio: f32) -> Self {
        self.line_overlap = ratio;
        self
    }

    /// Set the excerpt character budget.
    pub fn with_excerpt_len(mut self, len: usize) -> Self {
        self.excerpt_len = len;
        self
    }

    /// Set the outline-inference cluster count requirement.
    pub fn with_min_signature_count(mut self, count: usize) -> Self {
        self.min_signature_count = count;
        self
    }

    /// Set the heading-to-outline similarity threshold.
    pub fn with_title_match_threshold(mut self, ratio: f64) -> Self {
        self.title_match_threshold = ratio;
        self
    }

    /// Set the reference-to-bibliography similarity threshold.
    pub fn with_reference_match_threshold(mut self, ratio: f64) -> Self {
        self.reference_match_threshold = ratio;
        self
    }

    /// Set the reference-entry length cutoff.
    pub fn with_reference_max_len(mut self, len: usize) -> Self {
        self.reference_max_len = len;
        self
    }

    /// Set the segment character budget.
    pub fn with_segment_budget(mut self, budget: usize) -> Self {
        self.segment_budget = budget;
        self
    }

    /// Enable or disable parallel batch processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel batch processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            span_region_overlap: 0.6,
            line_overlap: 0.8,
            excerpt_len: 300,
            min_signature_count: 2,
            title_match_threshold: 90.0,
            reference_match_threshold: 80.0,
            reference_max_len: 500,
            segment_budget: 20_000,
            parallel: true,
        }
    }
}

/// The configured pipeline.
///
/// # Example
///
/// ```
/// use docweave::input::DocumentInput;
/// use docweave::pipeline::Pipeline;
///
/// let input = DocumentInput::from_json(r#"{"pages": [{"page_no": 0}]}"#).unwrap();
/// let doc = Pipeline::new().process(&input).unwrap();
/// assert!(doc.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    options: PipelineOptions,
    recipe: Option<Recipe>,
}

impl Pipeline {
    /// Create a pipeline with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a pipeline with the given options.
    pub fn with_options(options: PipelineOptions) -> Self {
        Self {
            options,
            recipe: None,
        }
    }

    /// Use a caller-supplied heading recipe instead of outline inference.
    /// Embedded bookmarks still take precedence when present.
    pub fn with_recipe(mut self, recipe: Recipe) -> Self {
        self.recipe = Some(recipe);
        self
    }

    /// The active options.
    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Run all stages over one document's detection output.
    pub fn process(&self, input: &DocumentInput) -> Result<Document> {
        if input.pages.is_empty() {
            return Err(Error::EmptyInput);
        }
        let source = input.source.as_deref().unwrap_or("<unnamed>");
        log::debug!("processing {source}, {} pages", input.page_count());

        let mut blocks = assemble::assemble(input, &self.options);
        let mut entries =
            outline::build_outline(input, &blocks, self.recipe.as_ref(), &self.options)?;
        align::align_outline(&mut blocks, &mut entries, &self.options);
        align::resolve_entity_ids(&mut blocks);
        align::align_references(&mut blocks, &input.bibliography, &self.options);
        let tree = segment::build_section_tree(&blocks);
        let mut segments = segment::segment_blocks(&blocks, &tree, &self.options);
        segment::restore_cross_references(&mut blocks, &mut segments);

        let mut doc = Document {
            meta: DocumentMeta {
                source: input.source.clone(),
                page_count: input.page_count() as u32,
                processed_at: Some(Utc::now()),
                outline_source: entries.first().map(|e| e.source),
            },
            blocks,
            outline: entries,
            tree,
            segments,
            stats: RunStats::default(),
        };
        doc.stats = RunStats::collect(&doc);
        log::debug!(
            "{source}: {} blocks, {} outline entries, {} segments",
            doc.stats.blocks,
            doc.stats.outline_entries,
            doc.stats.segments
        );
        Ok(doc)
    }

    /// Process a batch of documents, in input order.
    ///
    /// Documents are independent, so with `parallel` enabled they run
    /// on the thread pool; each result is reported separately.
    pub fn process_batch(&self, inputs: &[DocumentInput]) -> Vec<Result<Document>> {
        if self.options.parallel {
            inputs.par_iter().map(|input| self.process(input)).collect()
        } else {
            inputs.iter().map(|input| self.process(input)).collect()
        }
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{Bookmark, PageLayout, RawSpan, Region, RegionCategory};
    use crate::model::{BBox, BlockKind, OutlineSource, Point, SpanKind};

    fn one_page_input() -> DocumentInput {
        let mut page = PageLayout::new(0, 612.0, 792.0);
        page.regions.push(Region::new(
            RegionCategory::Title,
            BBox::new(50.0, 40.0, 300.0, 60.0),
        ));
        page.regions.push(Region::new(
            RegionCategory::PlainText,
            BBox::new(50.0, 80.0, 300.0, 200.0),
        ));
        page.spans.push(RawSpan::new(
            [52.0, 42.0, 180.0, 58.0],
            SpanKind::Text,
            "Introduction",
        ));
        page.spans.push(RawSpan::new(
            [52.0, 82.0, 298.0, 100.0],
            SpanKind::Text,
            "Opening paragraph of the paper.",
        ));

        let mut bookmark = Bookmark::new(1, "Introduction", 1);
        bookmark.to = Some(Point::new(300.0, 60.0));
        DocumentInput {
            source: Some("sample".to_string()),
            pages: vec![page],
            bookmarks: vec![bookmark],
            bibliography: Vec::new(),
        }
    }

    #[test]
    fn test_options_builder() {
        let options = PipelineOptions::new()
            .with_segment_budget(1_000)
            .with_title_match_threshold(85.0)
            .sequential();
        assert_eq!(options.segment_budget, 1_000);
        assert_eq!(options.title_match_threshold, 85.0);
        assert!(!options.parallel);
    }

    #[test]
    fn test_default_options() {
        let options = PipelineOptions::default();
        assert_eq!(options.span_region_overlap, 0.6);
        assert_eq!(options.line_overlap, 0.8);
        assert_eq!(options.excerpt_len, 300);
        assert_eq!(options.reference_max_len, 500);
        assert_eq!(options.segment_budget, 20_000);
        assert!(options.parallel);
    }

    #[test]
    fn test_process_rejects_pageless_input() {
        let result = Pipeline::new().process(&DocumentInput::default());
        assert!(matches!(result, Err(Error::EmptyInput)));
    }

    #[test]
    fn test_process_end_to_end() {
        let doc = Pipeline::new().process(&one_page_input()).unwrap();

        assert_eq!(doc.blocks.len(), 2);
        assert_eq!(doc.blocks[0].kind, BlockKind::Title);
        assert!(doc.blocks[0].aligned);
        assert_eq!(doc.blocks[1].kind, BlockKind::Text);

        assert_eq!(doc.outline.len(), 1);
        assert_eq!(doc.meta.outline_source, Some(OutlineSource::Native));
        assert_eq!(doc.meta.source.as_deref(), Some("sample"));
        assert!(doc.meta.processed_at.is_some());

        assert_eq!(doc.tree.roots.len(), 1);
        assert_eq!(doc.segments.len(), 1);
        assert_eq!(doc.segments[0].range(), 0..2);

        assert_eq!(doc.stats.blocks, 2);
        assert_eq!(doc.stats.headings_aligned, 1);
        assert_eq!(doc.stats.segments, 1);
    }

    #[test]
    fn test_process_batch_reports_each_result() {
        let inputs = vec![one_page_input(), DocumentInput::default()];
        let results = Pipeline::new().process_batch(&inputs);
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(Error::EmptyInput)));
    }

    #[test]
    fn test_process_batch_sequential() {
        let pipeline = Pipeline::with_options(PipelineOptions::new().sequential());
        let results = pipeline.process_batch(&[one_page_input(), one_page_input()]);
        assert!(results.iter().all(|r| r.is_ok()));
    }
}
