//! Geometric assembly: spans and regions in, ordered content blocks out.
//!
//! The first pipeline stage. Each page's recognized spans are claimed by
//! the detected region that covers them best, grouped into lines by
//! vertical overlap, and serialized into markdown-ready block text.
//! Caption regions are folded into their nearest figure, table or formula
//! on the same page. The output is the flat block stream every later
//! stage annotates, ordered top-to-bottom, left-to-right per page.

use crate::input::{DocumentInput, PageLayout, Region, RegionCategory};
use crate::model::{BBox, Block, BlockKind, EntityKind, Line, Span, SpanKind};
use crate::pipeline::PipelineOptions;
use crate::text::{contains_cjk, escape_markdown, normalize_content, tidy_latex};

/// Assemble the flat block stream for a whole document.
///
/// Pages are processed independently and concatenated in page order.
/// Page numbers in the output are 1-based regardless of the 0-based
/// indices the detection layer emits.
pub fn assemble(input: &DocumentInput, options: &PipelineOptions) -> Vec<Block> {
    let mut pages: Vec<&PageLayout> = input.pages.iter().collect();
    pages.sort_by_key(|p| p.page_no);

    let mut blocks = Vec::new();
    for page in pages {
        blocks.extend(assemble_page(page, options));
    }
    log::debug!(
        "assembled {} blocks from {} pages",
        blocks.len(),
        input.pages.len()
    );
    blocks
}

/// Assemble one page: claim spans, build region blocks, attach captions,
/// keep leftovers, then order everything top-to-bottom.
fn assemble_page(page: &PageLayout, options: &PipelineOptions) -> Vec<Block> {
    let page_no = page.page_no + 1;

    // Usable geometry per region; regions without any are malformed.
    let bounds: Vec<Option<BBox>> = page.regions.iter().map(|r| r.bounds()).collect();

    let claims = claim_spans(page, &bounds, options.span_region_overlap);

    // Spans grouped per claiming region, in span order.
    let mut region_spans: Vec<Vec<Span>> = vec![Vec::new(); page.regions.len()];
    for (si, claim) in claims.iter().enumerate() {
        if let Some(ri) = claim {
            region_spans[*ri].push(to_span(&page.spans[si]));
        }
    }

    let mut blocks: Vec<Block> = Vec::new();
    let mut captions: Vec<(usize, EntityKind, bool)> = Vec::new();

    for (ri, region) in page.regions.iter().enumerate() {
        let category = match region.category {
            Some(c) if c != RegionCategory::Unknown => c,
            _ => {
                log::warn!("page {page_no}: region without usable category kept verbatim");
                blocks.push(verbatim_block(region, page_no, bounds[ri]));
                continue;
            }
        };
        let bbox = match bounds[ri] {
            Some(b) => b,
            None => {
                log::warn!("page {page_no}: {category:?} region without geometry kept verbatim");
                blocks.push(verbatim_block(region, page_no, None));
                continue;
            }
        };

        let spans = std::mem::take(&mut region_spans[ri]);
        let block = build_region_block(region, category, page_no, bbox, spans, options);
        if let Some((kind, footnote)) = caption_target(category) {
            captions.push((blocks.len(), kind, footnote));
        }
        blocks.push(block);
    }

    // Spans no region claimed still enter the stream as their own blocks.
    for (si, claim) in claims.iter().enumerate() {
        if claim.is_none() {
            blocks.push(orphan_span_block(&page.spans[si], page_no));
        }
    }

    let mut blocks = attach_captions(blocks, captions);
    blocks.sort_by(|a, b| {
        a.bbox
            .y0
            .total_cmp(&b.bbox.y0)
            .then(a.bbox.x0.total_cmp(&b.bbox.x0))
    });
    blocks
}

/// Assign each span to the host region covering the largest fraction of
/// the span's area, provided that fraction exceeds the overlap threshold.
/// Every span is claimed at most once; ties keep the earlier region.
fn claim_spans(
    page: &PageLayout,
    bounds: &[Option<BBox>],
    overlap: f32,
) -> Vec<Option<usize>> {
    let hosts: Vec<(usize, BBox)> = page
        .regions
        .iter()
        .enumerate()
        .filter_map(|(ri, region)| match (region.category, bounds[ri]) {
            (Some(c), Some(b)) if c.is_span_host() => Some((ri, b)),
            _ => None,
        })
        .collect();

    page.spans
        .iter()
        .map(|span| {
            let sb = span.bounds();
            let mut best: Option<(usize, f32)> = None;
            for &(ri, rb) in &hosts {
                let coverage = sb.coverage_by(&rb);
                if coverage > overlap && best.map_or(true, |(_, c)| coverage > c) {
                    best = Some((ri, coverage));
                }
            }
            best.map(|(ri, _)| ri)
        })
        .collect()
}

fn to_span(raw: &crate::input::RawSpan) -> Span {
    // Formula content stays byte-exact; NFKC would fold math glyphs.
    let content = match raw.kind {
        SpanKind::InlineFormula | SpanKind::BlockFormula => raw.content.clone(),
        _ => normalize_content(&raw.content),
    };
    let mut span = Span::new(raw.bounds(), raw.kind, content);
    if let Some(font) = &raw.font {
        span = span.with_font(font.clone());
    }
    span
}

/// Build the block for one well-formed region.
fn build_region_block(
    region: &Region,
    category: RegionCategory,
    page_no: u32,
    bbox: BBox,
    mut spans: Vec<Span>,
    options: &PipelineOptions,
) -> Block {
    match category {
        RegionCategory::Figure => Block::new(BlockKind::Image, page_no, bbox),
        RegionCategory::Table => Block::new(BlockKind::Table, page_no, bbox),
        RegionCategory::Abandon => {
            let mut block = Block::new(BlockKind::Abandoned, page_no, bbox);
            block.text = region.text.clone().unwrap_or_default();
            block
        }
        RegionCategory::IsolateFormula => {
            let mut block = Block::new(BlockKind::Equation, page_no, bbox);
            if spans.is_empty() {
                let raw = region
                    .latex
                    .as_deref()
                    .or(region.text.as_deref())
                    .unwrap_or_default();
                block.latex = Some(tidy_latex(raw.trim_matches('$')));
            } else {
                block.lines = merge_spans_into_lines(spans, options.line_overlap);
                let raw: Vec<String> = block
                    .lines
                    .iter()
                    .flat_map(|l| l.spans.iter())
                    .filter(|s| s.kind == SpanKind::BlockFormula)
                    .map(|s| s.content.trim_matches('$').to_string())
                    .collect();
                block.latex = Some(tidy_latex(&raw.join(" ")));
            }
            block.text = match &block.latex {
                Some(latex) if !latex.is_empty() => format!("$$\n{latex}\n$$"),
                _ => String::new(),
            };
            block
        }
        _ => {
            // Text-bearing host: title, plain text, lists, captions.
            let kind = match category {
                RegionCategory::Title => BlockKind::Text,
                RegionCategory::List | RegionCategory::OrderedList => BlockKind::List,
                c if c.is_caption() => BlockKind::Caption,
                _ => BlockKind::Text,
            };
            let mut block = Block::new(kind, page_no, bbox);
            block.ordered = category == RegionCategory::OrderedList;
            if category == RegionCategory::Title {
                block.level = Some(1);
            }
            if spans.is_empty() {
                if let Some(text) = &region.text {
                    block.text = escape_markdown(&normalize_content(text))
                        .trim()
                        .to_string();
                }
            } else {
                // Display formulas are only legal as their own regions;
                // inside a text host they become inline before line merge.
                for span in &mut spans {
                    if span.kind == SpanKind::BlockFormula {
                        span.kind = SpanKind::InlineFormula;
                    }
                }
                block.lines = merge_spans_into_lines(spans, options.line_overlap);
                block.text = if kind == BlockKind::List {
                    serialize_list(&block.lines, block.ordered)
                } else {
                    serialize_lines(&block.lines).trim().to_string()
                };
            }
            block
        }
    }
}

/// Caption categories and the entity list they feed into.
/// Returns `(entity kind, goes into footnote list)`.
fn caption_target(category: RegionCategory) -> Option<(EntityKind, bool)> {
    match category {
        RegionCategory::FigureCaption => Some((EntityKind::Image, false)),
        RegionCategory::TableCaption => Some((EntityKind::Table, false)),
        RegionCategory::TableFootnote => Some((EntityKind::Table, true)),
        RegionCategory::FormulaCaption => Some((EntityKind::Equation, false)),
        _ => None,
    }
}

/// Fold caption blocks into the nearest same-page entity of the matching
/// kind. Captions with no such entity stay in the stream as-is.
fn attach_captions(blocks: Vec<Block>, captions: Vec<(usize, EntityKind, bool)>) -> Vec<Block> {
    let mut consumed = vec![false; blocks.len()];
    let mut attachments: Vec<(usize, usize, bool)> = Vec::new();

    for (ci, kind, footnote) in captions {
        if blocks[ci].text.is_empty() {
            continue;
        }
        let target = blocks
            .iter()
            .enumerate()
            .filter(|(_, b)| b.entity_kind() == Some(kind))
            .min_by(|(_, a), (_, b)| {
                blocks[ci]
                    .bbox
                    .center_distance_sq(&a.bbox)
                    .total_cmp(&blocks[ci].bbox.center_distance_sq(&b.bbox))
            })
            .map(|(ti, _)| ti);
        if let Some(ti) = target {
            consumed[ci] = true;
            attachments.push((ci, ti, footnote));
        } else {
            log::warn!(
                "page {}: caption with no {kind:?} target kept as its own block",
                blocks[ci].page
            );
        }
    }

    let mut blocks = blocks;
    for (ci, ti, footnote) in attachments {
        let text = blocks[ci].text.clone();
        if footnote {
            blocks[ti].footnote.push(text);
        } else {
            blocks[ti].caption.push(text);
        }
    }

    blocks
        .into_iter()
        .enumerate()
        .filter(|(i, _)| !consumed[*i])
        .map(|(_, b)| b)
        .collect()
}

/// Block for a span no region claimed. Display formulas become their own
/// equation blocks, everything else a single-line text block.
fn orphan_span_block(raw: &crate::input::RawSpan, page_no: u32) -> Block {
    let span = to_span(raw);
    let bbox = span.bbox;
    if span.kind == SpanKind::BlockFormula {
        let mut block = Block::new(BlockKind::Equation, page_no, bbox);
        let latex = tidy_latex(span.content.trim_matches('$'));
        block.text = if latex.is_empty() {
            String::new()
        } else {
            format!("$$\n{latex}\n$$")
        };
        block.lines = vec![Line::from_spans(vec![span])];
        block.latex = Some(latex);
        return block;
    }
    let line = Line::from_spans(vec![span]);
    let text = serialize_lines(std::slice::from_ref(&line))
        .trim()
        .to_string();
    let mut block = Block::text_block(page_no, bbox, text);
    block.lines = vec![line];
    block
}

/// Verbatim block for a region missing category or geometry. Kept in the
/// stream, excluded from all structural classification.
fn verbatim_block(region: &Region, page_no: u32, bbox: Option<BBox>) -> Block {
    let mut block = Block::new(BlockKind::Text, page_no, bbox.unwrap_or_default());
    block.text = region
        .text
        .clone()
        .or_else(|| region.latex.clone())
        .unwrap_or_default();
    block
}

/// Group spans into lines.
///
/// Spans are first ordered by top edge. A span joins the current line
/// when its vertical overlap with the line's last span exceeds the
/// threshold fraction of the shorter span's height. A display formula,
/// or a line that already holds one, always forces a line break.
pub fn merge_spans_into_lines(mut spans: Vec<Span>, line_overlap: f32) -> Vec<Line> {
    if spans.is_empty() {
        return Vec::new();
    }
    spans.sort_by(|a, b| a.bbox.y0.total_cmp(&b.bbox.y0));

    let mut lines: Vec<Line> = Vec::new();
    let mut current: Vec<Span> = Vec::new();
    for span in spans {
        if current.is_empty() {
            current.push(span);
            continue;
        }
        let force_break = span.kind == SpanKind::BlockFormula
            || current.iter().any(|s| s.kind == SpanKind::BlockFormula);
        let joins = !force_break
            && current
                .last()
                .map(|last| span.bbox.vertical_overlap_ratio(&last.bbox) > line_overlap)
                .unwrap_or(false);
        if joins {
            current.push(span);
        } else {
            lines.push(Line::from_spans(std::mem::take(&mut current)));
            current.push(span);
        }
    }
    if !current.is_empty() {
        lines.push(Line::from_spans(current));
    }
    lines
}

/// Serialize assembled lines into flat markdown-ready text.
///
/// Formula spans are wrapped in `$`/`$$` fences, footnote spans become
/// superscripts, text spans get markdown specials escaped. Tokens are
/// joined with single spaces unless the line's dominant script is
/// logographic, in which case they are concatenated directly.
pub fn serialize_lines(lines: &[Line]) -> String {
    let mut out = String::new();
    for line in lines {
        let probe: String = line
            .spans
            .iter()
            .filter(|s| s.kind == SpanKind::Text)
            .map(|s| s.content.trim())
            .collect();
        let logographic = contains_cjk(&probe);

        for span in &line.spans {
            let content = render_span(span);
            if content.is_empty() {
                continue;
            }
            out.push_str(content.trim());
            if !logographic {
                out.push(' ');
            }
        }
    }
    out
}

fn render_span(span: &Span) -> String {
    match span.kind {
        SpanKind::Text => escape_markdown(&span.content),
        SpanKind::InlineFormula => format!(" ${}$ ", span.content.trim_matches('$')),
        SpanKind::BlockFormula => {
            format!("\n$$\n{}\n$$\n", span.content.trim_matches('$'))
        }
        SpanKind::Footnote => {
            let content = span.content.trim_matches('$');
            if content.contains('^') {
                format!(" ${content}$ ")
            } else {
                format!(" $^{content}$ ")
            }
        }
    }
}

/// Serialize list lines, one item per line with a bullet or index prefix.
fn serialize_list(lines: &[Line], ordered: bool) -> String {
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let body = serialize_lines(std::slice::from_ref(line));
            if ordered {
                format!("{}. {}", i + 1, body.trim())
            } else {
                format!("- {}", body.trim())
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::RawSpan;

    fn text_span(x0: f32, y0: f32, x1: f32, y1: f32, content: &str) -> RawSpan {
        RawSpan::new([x0, y0, x1, y1], SpanKind::Text, content)
    }

    fn page_with(regions: Vec<Region>, spans: Vec<RawSpan>) -> PageLayout {
        let mut page = PageLayout::new(0, 612.0, 792.0);
        page.regions = regions;
        page.spans = spans;
        page
    }

    fn run(page: PageLayout) -> Vec<Block> {
        let input = DocumentInput {
            pages: vec![page],
            ..Default::default()
        };
        assemble(&input, &PipelineOptions::default())
    }

    // ==================== Line merging ====================

    #[test]
    fn test_merge_lines_by_vertical_overlap() {
        // Heights 10, overlap 8.5 of the shorter: one line.
        let spans = vec![
            Span::text(BBox::new(0.0, 0.0, 40.0, 10.0), "hello"),
            Span::text(BBox::new(50.0, 1.5, 90.0, 11.5), "world"),
        ];
        let lines = merge_spans_into_lines(spans, 0.8);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].plain_text(), "hello world");
    }

    #[test]
    fn test_merge_lines_split_below_threshold() {
        // Overlap 7.5 of height 10: two lines.
        let spans = vec![
            Span::text(BBox::new(0.0, 0.0, 40.0, 10.0), "hello"),
            Span::text(BBox::new(50.0, 2.5, 90.0, 12.5), "world"),
        ];
        let lines = merge_spans_into_lines(spans, 0.8);
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_block_formula_always_breaks_line() {
        let spans = vec![
            Span::text(BBox::new(0.0, 0.0, 40.0, 10.0), "before"),
            Span::new(
                BBox::new(0.0, 0.5, 90.0, 10.5),
                SpanKind::BlockFormula,
                "x^2",
            ),
            Span::text(BBox::new(0.0, 1.0, 40.0, 11.0), "after"),
        ];
        let lines = merge_spans_into_lines(spans, 0.8);
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_merge_lines_sorts_within_line() {
        let spans = vec![
            Span::text(BBox::new(50.0, 0.0, 90.0, 10.0), "world"),
            Span::text(BBox::new(0.0, 0.5, 40.0, 10.5), "hello"),
        ];
        let lines = merge_spans_into_lines(spans, 0.8);
        assert_eq!(lines[0].plain_text(), "hello world");
    }

    // ==================== Span claiming ====================

    #[test]
    fn test_span_claimed_by_best_covering_region() {
        let narrow = Region::new(RegionCategory::PlainText, BBox::new(0.0, 0.0, 70.0, 20.0));
        let wide = Region::new(RegionCategory::PlainText, BBox::new(0.0, 0.0, 200.0, 20.0));
        let blocks = run(page_with(
            vec![narrow, wide],
            vec![text_span(0.0, 5.0, 100.0, 15.0, "claimed")],
        ));
        // Both admit the span (0.7 and 1.0 coverage); the wide one wins.
        let with_text: Vec<&Block> = blocks.iter().filter(|b| !b.text.is_empty()).collect();
        assert_eq!(with_text.len(), 1);
        assert_eq!(with_text[0].bbox.x1, 200.0);
        assert_eq!(with_text[0].text, "claimed");
    }

    #[test]
    fn test_unclaimed_span_kept_as_own_block() {
        let region = Region::new(RegionCategory::PlainText, BBox::new(0.0, 0.0, 50.0, 20.0));
        let blocks = run(page_with(
            vec![region],
            vec![text_span(300.0, 300.0, 400.0, 310.0, "stray note")],
        ));
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[1].text, "stray note");
        assert_eq!(blocks[1].kind, BlockKind::Text);
        assert!(blocks[1].level.is_none());
    }

    // ==================== Region blocks ====================

    #[test]
    fn test_title_region_becomes_heading_candidate() {
        let region = Region::new(RegionCategory::Title, BBox::new(0.0, 0.0, 200.0, 20.0));
        let blocks = run(page_with(
            vec![region],
            vec![text_span(0.0, 2.0, 150.0, 18.0, "Introduction")],
        ));
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].kind, BlockKind::Text);
        assert_eq!(blocks[0].level, Some(1));
        assert!(blocks[0].is_heading_candidate());
        assert_eq!(blocks[0].text, "Introduction");
        assert_eq!(blocks[0].page, 1);
    }

    #[test]
    fn test_block_formula_demoted_inside_text_region() {
        let region = Region::new(RegionCategory::PlainText, BBox::new(0.0, 0.0, 200.0, 20.0));
        let formula = RawSpan::new([60.0, 2.0, 100.0, 18.0], SpanKind::BlockFormula, "$x+y$");
        let blocks = run(page_with(
            vec![region],
            vec![text_span(0.0, 2.0, 50.0, 18.0, "sum is"), formula],
        ));
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].lines.len(), 1);
        assert_eq!(blocks[0].text, "sum is $x+y$");
    }

    #[test]
    fn test_isolate_formula_region() {
        let mut region =
            Region::new(RegionCategory::IsolateFormula, BBox::new(0.0, 0.0, 200.0, 30.0));
        region.score = 0.95;
        let formula = RawSpan::new(
            [10.0, 5.0, 190.0, 25.0],
            SpanKind::BlockFormula,
            "$E = m c ^ { 2 }$",
        );
        let blocks = run(page_with(vec![region], vec![formula]));
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].kind, BlockKind::Equation);
        let latex = blocks[0].latex.as_deref().unwrap();
        assert!(!latex.contains("  "));
        assert!(blocks[0].text.starts_with("$$\n"));
        assert!(blocks[0].text.ends_with("\n$$"));
    }

    #[test]
    fn test_formula_region_fallback_to_recognized_latex() {
        let mut region =
            Region::new(RegionCategory::IsolateFormula, BBox::new(0.0, 0.0, 200.0, 30.0));
        region.latex = Some("\\sum_{i} x_i".to_string());
        let blocks = run(page_with(vec![region], vec![]));
        assert_eq!(blocks[0].latex.as_deref(), Some("\\sum_{i}x_i"));
    }

    #[test]
    fn test_host_without_spans_uses_recognized_text() {
        let mut region = Region::new(RegionCategory::Title, BBox::new(0.0, 0.0, 200.0, 20.0));
        region.text = Some("Related Work".to_string());
        let blocks = run(page_with(vec![region], vec![]));
        assert_eq!(blocks[0].text, "Related Work");
        assert_eq!(blocks[0].level, Some(1));
    }

    #[test]
    fn test_abandon_region_excluded_from_classification() {
        let mut region = Region::new(RegionCategory::Abandon, BBox::new(0.0, 780.0, 200.0, 790.0));
        region.text = Some("Page 3 of 12".to_string());
        let blocks = run(page_with(vec![region], vec![]));
        assert_eq!(blocks[0].kind, BlockKind::Abandoned);
        assert!(blocks[0].level.is_none());
    }

    #[test]
    fn test_malformed_region_retained_verbatim() {
        let region: Region =
            serde_json::from_str(r#"{"text": "no category here"}"#).unwrap();
        let blocks = run(page_with(vec![region], vec![]));
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].kind, BlockKind::Text);
        assert_eq!(blocks[0].text, "no category here");
        assert!(blocks[0].level.is_none());
    }

    // ==================== Serialization ====================

    #[test]
    fn test_serialize_escapes_markdown_specials() {
        let region = Region::new(RegionCategory::PlainText, BBox::new(0.0, 0.0, 200.0, 20.0));
        let blocks = run(page_with(
            vec![region],
            vec![text_span(0.0, 2.0, 150.0, 18.0, "a*b and c$d")],
        ));
        assert_eq!(blocks[0].text, r"a\*b and c\$d");
    }

    #[test]
    fn test_serialize_footnote_superscript() {
        let region = Region::new(RegionCategory::PlainText, BBox::new(0.0, 0.0, 200.0, 20.0));
        let note = RawSpan::new([60.0, 2.0, 70.0, 18.0], SpanKind::Footnote, "3");
        let blocks = run(page_with(
            vec![region],
            vec![text_span(0.0, 2.0, 50.0, 18.0, "result"), note],
        ));
        assert_eq!(blocks[0].text, "result $^3$");
    }

    #[test]
    fn test_serialize_cjk_line_concatenates() {
        let region = Region::new(RegionCategory::PlainText, BBox::new(0.0, 0.0, 200.0, 20.0));
        let blocks = run(page_with(
            vec![region],
            vec![
                text_span(0.0, 2.0, 20.0, 18.0, "文档"),
                text_span(25.0, 2.0, 45.0, 18.0, "结构"),
            ],
        ));
        assert_eq!(blocks[0].text, "文档结构");
    }

    #[test]
    fn test_ordered_list_prefixes() {
        let region = Region::new(RegionCategory::OrderedList, BBox::new(0.0, 0.0, 200.0, 40.0));
        let blocks = run(page_with(
            vec![region],
            vec![
                text_span(0.0, 0.0, 150.0, 10.0, "first step"),
                text_span(0.0, 20.0, 150.0, 30.0, "second step"),
            ],
        ));
        assert_eq!(blocks[0].kind, BlockKind::List);
        assert!(blocks[0].ordered);
        assert_eq!(blocks[0].text, "1. first step\n2. second step");
    }

    #[test]
    fn test_unordered_list_prefixes() {
        let region = Region::new(RegionCategory::List, BBox::new(0.0, 0.0, 200.0, 40.0));
        let blocks = run(page_with(
            vec![region],
            vec![
                text_span(0.0, 0.0, 150.0, 10.0, "apples"),
                text_span(0.0, 20.0, 150.0, 30.0, "pears"),
            ],
        ));
        assert_eq!(blocks[0].text, "- apples\n- pears");
    }

    // ==================== Caption attachment ====================

    #[test]
    fn test_caption_attached_to_nearest_figure() {
        let figure_a = Region::new(RegionCategory::Figure, BBox::new(0.0, 0.0, 100.0, 100.0));
        let figure_b = Region::new(RegionCategory::Figure, BBox::new(0.0, 300.0, 100.0, 400.0));
        let mut caption =
            Region::new(RegionCategory::FigureCaption, BBox::new(0.0, 110.0, 100.0, 130.0));
        caption.text = Some("Figure 2: overview".to_string());
        let blocks = run(page_with(vec![figure_a, figure_b, caption], vec![]));
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].caption, vec!["Figure 2: overview".to_string()]);
        assert!(blocks[1].caption.is_empty());
    }

    #[test]
    fn test_table_footnote_goes_to_footnote_list() {
        let table = Region::new(RegionCategory::Table, BBox::new(0.0, 0.0, 100.0, 100.0));
        let mut note =
            Region::new(RegionCategory::TableFootnote, BBox::new(0.0, 110.0, 100.0, 120.0));
        note.text = Some("averaged over 5 runs".to_string());
        let blocks = run(page_with(vec![table, note], vec![]));
        assert_eq!(blocks.len(), 1);
        assert!(blocks[0].caption.is_empty());
        assert_eq!(blocks[0].footnote, vec!["averaged over 5 runs".to_string()]);
    }

    #[test]
    fn test_orphan_caption_stays_in_stream() {
        let mut caption =
            Region::new(RegionCategory::TableCaption, BBox::new(0.0, 110.0, 100.0, 130.0));
        caption.text = Some("Table 1: results".to_string());
        let blocks = run(page_with(vec![caption], vec![]));
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].kind, BlockKind::Caption);
        assert_eq!(blocks[0].text, "Table 1: results");
    }

    // ==================== Ordering ====================

    #[test]
    fn test_blocks_ordered_top_to_bottom_then_left_to_right() {
        let lower = Region::new(RegionCategory::PlainText, BBox::new(0.0, 100.0, 200.0, 120.0));
        let right = Region::new(RegionCategory::PlainText, BBox::new(220.0, 10.0, 400.0, 30.0));
        let left = Region::new(RegionCategory::PlainText, BBox::new(0.0, 10.0, 200.0, 30.0));
        let blocks = run(page_with(vec![lower, right, left], vec![]));
        let ys: Vec<(f32, f32)> = blocks.iter().map(|b| (b.bbox.y0, b.bbox.x0)).collect();
        assert_eq!(ys, vec![(10.0, 0.0), (10.0, 220.0), (100.0, 0.0)]);
    }

    #[test]
    fn test_pages_concatenated_in_page_order() {
        let mut second = PageLayout::new(1, 612.0, 792.0);
        second
            .regions
            .push(Region::new(RegionCategory::PlainText, BBox::new(0.0, 0.0, 10.0, 10.0)));
        let mut first = PageLayout::new(0, 612.0, 792.0);
        first
            .regions
            .push(Region::new(RegionCategory::PlainText, BBox::new(0.0, 0.0, 10.0, 10.0)));
        let input = DocumentInput {
            pages: vec![second, first],
            ..Default::default()
        };
        let blocks = assemble(&input, &PipelineOptions::default());
        let pages: Vec<u32> = blocks.iter().map(|b| b.page).collect();
        assert_eq!(pages, vec![1, 2]);
    }
}
