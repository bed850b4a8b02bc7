//! Markdown rendering for processed documents.

use crate::model::{Block, BlockKind, Document, Segment};

use super::RenderOptions;

/// Convert a document to Markdown with default options.
pub fn to_markdown(doc: &Document) -> String {
    MarkdownRenderer::new(RenderOptions::default()).render(doc)
}

/// Convert a document to Markdown.
pub fn to_markdown_with_options(doc: &Document, options: &RenderOptions) -> String {
    MarkdownRenderer::new(options.clone()).render(doc)
}

/// Render one segment to Markdown: its source blocks followed by the
/// entities restored into it.
pub fn segment_markdown(doc: &Document, segment: &Segment) -> String {
    let renderer = MarkdownRenderer::new(RenderOptions::default());
    let mut out = String::new();
    for idx in segment.block_indices() {
        if let Some(block) = doc.blocks.get(idx) {
            renderer.render_block(&mut out, block);
        }
    }
    out.trim().to_string()
}

/// Markdown renderer.
pub struct MarkdownRenderer {
    options: RenderOptions,
}

impl MarkdownRenderer {
    /// Create a new Markdown renderer.
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Render a document to Markdown, pages separated by blank lines.
    pub fn render(&self, doc: &Document) -> String {
        let mut output = String::new();
        if self.options.include_frontmatter {
            output.push_str(&doc.meta.to_yaml_frontmatter());
        }

        let mut pages: Vec<String> = Vec::new();
        let mut current_page = None;
        for block in &doc.blocks {
            if current_page != Some(block.page) {
                pages.push(String::new());
                current_page = Some(block.page);
            }
            if let Some(page) = pages.last_mut() {
                self.render_block(page, block);
            }
        }

        let body = pages
            .iter()
            .map(|page| page.trim())
            .filter(|page| !page.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n");
        output.push_str(&body);
        output.trim_end().to_string()
    }

    fn render_block(&self, out: &mut String, block: &Block) {
        match block.kind {
            BlockKind::Title => {
                let level = block
                    .level
                    .unwrap_or(1)
                    .min(u32::from(self.options.max_heading.max(1)))
                    as usize;
                out.push('\n');
                out.push_str(&"#".repeat(level));
                out.push(' ');
                out.push_str(&block.text);
                out.push('\n');
            }
            BlockKind::Text | BlockKind::Caption | BlockKind::Reference => {
                if !block.text.is_empty() {
                    out.push(' ');
                    out.push_str(&block.text);
                    out.push(' ');
                }
            }
            BlockKind::List | BlockKind::Equation => {
                if !block.text.is_empty() {
                    out.push('\n');
                    out.push_str(&block.text);
                    out.push('\n');
                }
            }
            BlockKind::Image | BlockKind::Table => {
                let description = block
                    .caption
                    .iter()
                    .chain(block.footnote.iter())
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join("\n");
                if !description.is_empty() {
                    out.push('\n');
                    out.push_str(&description);
                    out.push('\n');
                }
            }
            BlockKind::Abandoned => {}
        }
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BBox;

    fn title(page: u32, level: u32, text: &str) -> Block {
        let mut block = Block::text_block(page, BBox::default(), text);
        block.kind = BlockKind::Title;
        block.level = Some(level);
        block
    }

    fn para(page: u32, text: &str) -> Block {
        Block::text_block(page, BBox::default(), text)
    }

    fn doc_of(blocks: Vec<Block>) -> Document {
        let mut doc = Document::new();
        doc.blocks = blocks;
        doc
    }

    #[test]
    fn test_heading_markers_follow_level() {
        let doc = doc_of(vec![
            title(1, 1, "Introduction"),
            para(1, "Opening words."),
            title(1, 2, "Motivation"),
        ]);
        let md = to_markdown(&doc);
        assert!(md.starts_with("# Introduction"));
        assert!(md.contains("\n## Motivation"));
    }

    #[test]
    fn test_heading_level_clamped() {
        let doc = doc_of(vec![title(1, 9, "Deep")]);
        let options = RenderOptions::new().with_max_heading(3);
        let md = to_markdown_with_options(&doc, &options);
        assert_eq!(md, "### Deep");
    }

    #[test]
    fn test_pages_joined_by_blank_line() {
        let doc = doc_of(vec![para(1, "first page"), para(2, "second page")]);
        assert_eq!(to_markdown(&doc), "first page\n\nsecond page");
    }

    #[test]
    fn test_equation_block_keeps_fences() {
        let mut eq = Block::new(BlockKind::Equation, 1, BBox::default());
        eq.text = "$\nE=mc^2\n$".to_string();
        let doc = doc_of(vec![para(1, "before"), eq, para(1, "after")]);
        let md = to_markdown(&doc);
        assert!(md.contains("\n$\nE=mc^2\n$\n"));
    }

    #[test]
    fn test_entity_blocks_render_captions() {
        let mut image = Block::new(BlockKind::Image, 1, BBox::default());
        image.caption.push("Figure 1: overview".to_string());
        let mut table = Block::new(BlockKind::Table, 1, BBox::default());
        table.caption.push("Table 2: results".to_string());
        table.footnote.push("* averaged over 3 runs".to_string());
        let doc = doc_of(vec![image, table]);
        let md = to_markdown(&doc);
        assert!(md.contains("Figure 1: overview"));
        assert!(md.contains("Table 2: results\n* averaged over 3 runs"));
    }

    #[test]
    fn test_abandoned_blocks_skipped() {
        let mut furniture = Block::new(BlockKind::Abandoned, 1, BBox::default());
        furniture.text = "page 3 of 12".to_string();
        let doc = doc_of(vec![para(1, "kept"), furniture]);
        assert_eq!(to_markdown(&doc), "kept");
    }

    #[test]
    fn test_frontmatter_prepended() {
        let mut doc = doc_of(vec![para(1, "body")]);
        doc.meta.source = Some("paper.json".to_string());
        doc.meta.page_count = 1;
        let options = RenderOptions::new().with_frontmatter(true);
        let md = to_markdown_with_options(&doc, &options);
        assert!(md.starts_with("---\n"));
        assert!(md.contains("source: \"paper.json\""));
        assert!(md.ends_with("body"));
    }

    #[test]
    fn test_segment_markdown_appends_restored() {
        let mut image = Block::new(BlockKind::Image, 2, BBox::default());
        image.caption.push("Figure 4: far away".to_string());
        let doc = doc_of(vec![
            title(1, 1, "Results"),
            para(1, "see Figure 4"),
            image,
        ]);
        let mut segment = Segment::new(0, 2);
        segment.restored.push(2);
        let md = segment_markdown(&doc, &segment);
        assert!(md.starts_with("# Results"));
        assert!(md.contains("see Figure 4"));
        assert!(md.ends_with("Figure 4: far away"));
    }
}
