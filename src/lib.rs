//! # docweave
//!
//! Document structure recovery for PDF layout-detection output.
//!
//! This library takes the per-page output of a layout-detection model
//! (regions, recognized spans, embedded bookmarks) and recovers a
//! hierarchical document: reading-ordered blocks, a section outline, a
//! section tree, and budget-bounded segments with cross-references
//! restored.
//!
//! ## Quick Start
//!
//! ```no_run
//! use docweave::{process_file, render};
//!
//! fn main() -> docweave::Result<()> {
//!     // Recover structure from a layout-detection dump
//!     let doc = process_file("paper.layout.json")?;
//!
//!     // Convert to Markdown
//!     let markdown = render::to_markdown(&doc);
//!     println!("{}", markdown);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Geometric assembly**: spans to lines to reading-ordered blocks
//! - **Outline recovery**: embedded bookmarks, declarative recipes, or font-size inference
//! - **Content alignment**: fuzzy title matching between outline and body
//! - **Entity identity**: stable identifiers for figures, tables, and formulas
//! - **Hierarchical segmentation**: segments that respect section boundaries
//! - **Parallel processing**: Uses Rayon for document batches

pub mod align;
pub mod assemble;
pub mod error;
pub mod input;
pub mod model;
pub mod outline;
pub mod pipeline;
pub mod recipe;
pub mod render;
pub mod segment;
pub mod text;
pub mod vocab;

// Re-export commonly used types
pub use error::{Error, Result};
pub use input::{Bookmark, CitedWork, DocumentInput, PageLayout, RawSpan, Region, RegionCategory};
pub use model::{
    BBox, Block, BlockKind, Document, DocumentMeta, EntityKind, FontInfo, Line, OutlineEntry,
    OutlineSource, Point, RunStats, SectionNode, SectionTree, Segment, Span, SpanKind,
};
pub use pipeline::{Pipeline, PipelineOptions};
pub use recipe::{Recipe, RecipeConfig};
pub use render::{JsonFormat, RenderOptions};

use std::path::Path;

/// Process a layout-detection output file and return a structured document.
///
/// # Arguments
///
/// * `path` - Path to the detection output (JSON)
///
/// # Returns
///
/// A `Result` containing the recovered `Document` or an error.
///
/// # Example
///
/// ```no_run
/// use docweave::process_file;
///
/// let doc = process_file("paper.layout.json").unwrap();
/// println!("Pages: {}", doc.page_count());
/// ```
pub fn process_file<P: AsRef<Path>>(path: P) -> Result<Document> {
    let input = DocumentInput::from_file(path)?;
    Pipeline::new().process(&input)
}

/// Process a layout-detection output file with custom options.
///
/// # Arguments
///
/// * `path` - Path to the detection output (JSON)
/// * `options` - Pipeline options
///
/// # Example
///
/// ```no_run
/// use docweave::{process_file_with_options, PipelineOptions};
///
/// let options = PipelineOptions::new()
///     .with_segment_budget(8_000)
///     .sequential();
/// let doc = process_file_with_options("paper.layout.json", options).unwrap();
/// ```
pub fn process_file_with_options<P: AsRef<Path>>(
    path: P,
    options: PipelineOptions,
) -> Result<Document> {
    let input = DocumentInput::from_file(path)?;
    Pipeline::with_options(options).process(&input)
}

/// Process layout-detection output from a JSON string.
///
/// # Example
///
/// ```
/// let doc = docweave::process_str(r#"{"pages": [{"page_no": 0}]}"#).unwrap();
/// assert_eq!(doc.page_count(), 1);
/// ```
pub fn process_str(json: &str) -> Result<Document> {
    let input = DocumentInput::from_json(json)?;
    Pipeline::new().process(&input)
}

/// Process layout-detection output from a JSON string with custom options.
pub fn process_str_with_options(json: &str, options: PipelineOptions) -> Result<Document> {
    let input = DocumentInput::from_json(json)?;
    Pipeline::with_options(options).process(&input)
}

/// Process an already-deserialized detection output.
///
/// # Example
///
/// ```no_run
/// use docweave::{process_input, DocumentInput};
///
/// let input = DocumentInput::from_file("paper.layout.json").unwrap();
/// let doc = process_input(&input).unwrap();
/// ```
pub fn process_input(input: &DocumentInput) -> Result<Document> {
    Pipeline::new().process(input)
}

/// Process an already-deserialized detection output with custom options.
pub fn process_input_with_options(
    input: &DocumentInput,
    options: PipelineOptions,
) -> Result<Document> {
    Pipeline::with_options(options).process(input)
}

/// Extract plain text from a layout-detection output file.
///
/// # Example
///
/// ```no_run
/// use docweave::extract_text;
///
/// let text = extract_text("paper.layout.json").unwrap();
/// println!("{}", text);
/// ```
pub fn extract_text<P: AsRef<Path>>(path: P) -> Result<String> {
    let doc = process_file(path)?;
    Ok(doc.plain_text())
}

/// Convert a layout-detection output file to Markdown.
///
/// # Example
///
/// ```no_run
/// use docweave::to_markdown;
///
/// let markdown = to_markdown("paper.layout.json").unwrap();
/// std::fs::write("paper.md", markdown).unwrap();
/// ```
pub fn to_markdown<P: AsRef<Path>>(path: P) -> Result<String> {
    let doc = process_file(path)?;
    Ok(render::to_markdown(&doc))
}

/// Convert a layout-detection output file to Markdown with custom options.
///
/// # Example
///
/// ```no_run
/// use docweave::{to_markdown_with_options, RenderOptions};
///
/// let options = RenderOptions::new().with_frontmatter(true);
/// let markdown = to_markdown_with_options("paper.layout.json", &options).unwrap();
/// ```
pub fn to_markdown_with_options<P: AsRef<Path>>(
    path: P,
    options: &RenderOptions,
) -> Result<String> {
    let doc = process_file(path)?;
    Ok(render::to_markdown_with_options(&doc, options))
}

/// Convert a layout-detection output file to JSON.
///
/// # Example
///
/// ```no_run
/// use docweave::{to_json, JsonFormat};
///
/// let json = to_json("paper.layout.json", JsonFormat::Pretty).unwrap();
/// std::fs::write("paper.doc.json", json).unwrap();
/// ```
pub fn to_json<P: AsRef<Path>>(path: P, format: JsonFormat) -> Result<String> {
    let doc = process_file(path)?;
    render::to_json(&doc, format)
}

/// Builder for processing and rendering detection output.
///
/// # Example
///
/// ```no_run
/// use docweave::Docweave;
///
/// let markdown = Docweave::new()
///     .with_frontmatter()
///     .with_segment_budget(10_000)
///     .sequential()
///     .process("paper.layout.json")?
///     .to_markdown();
/// # Ok::<(), docweave::Error>(())
/// ```
pub struct Docweave {
    pipeline_options: PipelineOptions,
    render_options: RenderOptions,
    recipe: Option<Recipe>,
}

impl Docweave {
    /// Create a new Docweave builder.
    pub fn new() -> Self {
        Self {
            pipeline_options: PipelineOptions::default(),
            render_options: RenderOptions::default(),
            recipe: None,
        }
    }

    /// Disable parallel batch processing.
    pub fn sequential(mut self) -> Self {
        self.pipeline_options = self.pipeline_options.sequential();
        self
    }

    /// Use a compiled heading recipe instead of bookmark or size inference.
    pub fn with_recipe(mut self, recipe: Recipe) -> Self {
        self.recipe = Some(recipe);
        self
    }

    /// Enable frontmatter in Markdown output.
    pub fn with_frontmatter(mut self) -> Self {
        self.render_options = self.render_options.with_frontmatter(true);
        self
    }

    /// Cap rendered heading depth.
    pub fn with_max_heading(mut self, level: u8) -> Self {
        self.render_options = self.render_options.with_max_heading(level);
        self
    }

    /// Set the segment character budget.
    pub fn with_segment_budget(mut self, chars: usize) -> Self {
        self.pipeline_options = self.pipeline_options.with_segment_budget(chars);
        self
    }

    /// Set the outline excerpt length budget.
    pub fn with_excerpt_len(mut self, chars: usize) -> Self {
        self.pipeline_options = self.pipeline_options.with_excerpt_len(chars);
        self
    }

    /// Set the heading-to-title match threshold (0-100).
    pub fn with_title_match_threshold(mut self, ratio: f64) -> Self {
        self.pipeline_options = self.pipeline_options.with_title_match_threshold(ratio);
        self
    }

    /// Process a detection output file and return a result wrapper.
    pub fn process<P: AsRef<Path>>(self, path: P) -> Result<DocweaveResult> {
        let input = DocumentInput::from_file(path)?;
        self.process_input(&input)
    }

    /// Process detection output from a JSON string.
    pub fn process_str(self, json: &str) -> Result<DocweaveResult> {
        let input = DocumentInput::from_json(json)?;
        self.process_input(&input)
    }

    /// Process an already-deserialized detection output.
    pub fn process_input(self, input: &DocumentInput) -> Result<DocweaveResult> {
        let mut pipeline = Pipeline::with_options(self.pipeline_options);
        if let Some(recipe) = self.recipe {
            pipeline = pipeline.with_recipe(recipe);
        }
        let document = pipeline.process(input)?;
        Ok(DocweaveResult {
            document,
            render_options: self.render_options,
        })
    }
}

impl Default for Docweave {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of processing a detection output.
pub struct DocweaveResult {
    /// The recovered document
    pub document: Document,
    /// Render options to use
    render_options: RenderOptions,
}

impl DocweaveResult {
    /// Convert to Markdown.
    pub fn to_markdown(&self) -> String {
        render::to_markdown_with_options(&self.document, &self.render_options)
    }

    /// Convert to JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.document, format)
    }

    /// Get the plain text of all body blocks.
    pub fn plain_text(&self) -> String {
        self.document.plain_text()
    }

    /// Get the document.
    pub fn document(&self) -> &Document {
        &self.document
    }
}
