//! Declarative heading rules and the span classification engine.
//!
//! A recipe is an ordered list of rules. Each rule pairs a heading level
//! with font and bounding-box constraints; the first rule that admits a
//! span wins, so rule order is the tie-breaker. A rule marked greedy
//! claims its whole enclosing region as one heading instead of emitting
//! per-span fragments.
//!
//! Recipes arrive as structured config (JSON or any serde format) and are
//! compiled once; compilation validates levels and font-name patterns.

use std::collections::BTreeMap;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{BBox, Block, BlockKind, Span};

/// Tolerance applied to size and bounding-box comparisons when the rule
/// does not name one.
pub const DEFAULT_TOLERANCE: f32 = 1e-5;

/// Recipe as supplied by the user, before compilation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecipeConfig {
    /// Ordered heading rules
    #[serde(default)]
    pub heading: Vec<HeadingRuleConfig>,
}

/// One declarative heading rule.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HeadingRuleConfig {
    /// Heading level this rule emits, must be >= 1
    pub level: i64,

    /// Claim the whole region on any span match
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub greedy: bool,

    /// Font constraints
    #[serde(default)]
    pub font: FontRuleConfig,

    /// Bounding-box constraints
    #[serde(default)]
    pub bbox: BBoxRuleConfig,
}

/// Font constraints of a rule. Unset fields admit anything; set fields
/// require the span to carry a matching attribute.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FontRuleConfig {
    /// Regex matched anywhere in the font name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Expected size in points
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f32>,

    /// Size comparison tolerance
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_tolerance: Option<f32>,

    /// Expected color, packed 0xRRGGBB
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,

    /// Tri-state style flags: `None` ignores, `Some` requires equality
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serif: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monospace: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub superscript: Option<bool>,
}

/// Bounding-box constraints of a rule, one optional expectation per edge.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BBoxRuleConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom: Option<f32>,

    /// Edge comparison tolerance, shared by all four edges
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tolerance: Option<f32>,
}

/// A heading fragment extracted from one span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    /// Fragment text, already trimmed
    pub text: String,
    /// Level of the rule that produced it
    pub level: u32,
}

/// Outcome of classifying a single span.
///
/// Greedy matches are an explicit variant rather than an unwound error,
/// so the region loop consumes them by pattern matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpanVerdict {
    /// No rule admitted the span, or the admitted text was empty
    Miss,
    /// A rule matched; one heading fragment
    Fragment(Fragment),
    /// A greedy rule matched; the whole region is one heading at `level`
    Greedy {
        /// Level of the greedy rule
        level: u32,
    },
}

/// One compiled heading rule.
#[derive(Debug, Clone)]
pub struct HeadingRule {
    /// Heading level this rule emits
    pub level: u32,
    /// Whole-region claim on match
    pub greedy: bool,
    name: Option<Regex>,
    size: Option<f32>,
    size_tolerance: f32,
    color: Option<u32>,
    bold: Option<bool>,
    italic: Option<bool>,
    serif: Option<bool>,
    monospace: Option<bool>,
    superscript: Option<bool>,
    left: Option<f32>,
    top: Option<f32>,
    right: Option<f32>,
    bottom: Option<f32>,
    bbox_tolerance: f32,
}

impl HeadingRule {
    fn compile(config: &HeadingRuleConfig) -> Result<Self> {
        if config.level < 1 {
            return Err(Error::InvalidRuleLevel(config.level));
        }
        let name = match &config.font.name {
            Some(pattern) => Some(Regex::new(pattern).map_err(|e| {
                Error::InvalidRulePattern {
                    pattern: pattern.clone(),
                    message: e.to_string(),
                }
            })?),
            None => None,
        };
        Ok(Self {
            level: config.level as u32,
            greedy: config.greedy,
            name,
            size: config.font.size,
            size_tolerance: config.font.size_tolerance.unwrap_or(DEFAULT_TOLERANCE),
            color: config.font.color,
            bold: config.font.bold,
            italic: config.font.italic,
            serif: config.font.serif,
            monospace: config.font.monospace,
            superscript: config.font.superscript,
            left: config.bbox.left,
            top: config.bbox.top,
            right: config.bbox.right,
            bottom: config.bbox.bottom,
            bbox_tolerance: config.bbox.tolerance.unwrap_or(DEFAULT_TOLERANCE),
        })
    }

    /// Check whether every set constraint admits the span. A constraint
    /// on an attribute the span does not carry rejects it.
    pub fn admits(&self, span: &Span) -> bool {
        let font = span.font.as_ref();

        if let Some(re) = &self.name {
            let name = font.map(|f| f.name.as_str()).unwrap_or("");
            if !re.is_match(name) {
                return false;
            }
        }
        if let Some(color) = self.color {
            if font.map(|f| f.color) != Some(color) {
                return false;
            }
        }
        if let Some(size) = self.size {
            match font {
                Some(f) if (f.size - size).abs() <= self.size_tolerance => {}
                _ => return false,
            }
        }
        let flags = [
            (self.bold, font.map(|f| f.bold)),
            (self.italic, font.map(|f| f.italic)),
            (self.serif, font.map(|f| f.serif)),
            (self.monospace, font.map(|f| f.monospace)),
            (self.superscript, font.map(|f| f.superscript)),
        ];
        for (expected, actual) in flags {
            if let Some(expected) = expected {
                if actual != Some(expected) {
                    return false;
                }
            }
        }
        self.admits_bbox(&span.bbox)
    }

    fn admits_bbox(&self, bbox: &BBox) -> bool {
        admits_float(self.left, bbox.x0, self.bbox_tolerance)
            && admits_float(self.top, bbox.y0, self.bbox_tolerance)
            && admits_float(self.right, bbox.x1, self.bbox_tolerance)
            && admits_float(self.bottom, bbox.y1, self.bbox_tolerance)
    }
}

fn admits_float(expected: Option<f32>, actual: f32, tolerance: f32) -> bool {
    match expected {
        Some(e) => (e - actual).abs() <= tolerance,
        None => true,
    }
}

/// A compiled, validated recipe.
#[derive(Debug, Clone)]
pub struct Recipe {
    rules: Vec<HeadingRule>,
}

impl Recipe {
    /// Compile a recipe from its configuration.
    ///
    /// # Example
    ///
    /// ```
    /// use docweave::recipe::Recipe;
    ///
    /// let recipe = Recipe::from_json(
    ///     r#"{"heading": [{"level": 1, "font": {"name": "Bold", "size": 16.0}}]}"#,
    /// )
    /// .unwrap();
    /// assert_eq!(recipe.len(), 1);
    /// ```
    pub fn from_config(config: &RecipeConfig) -> Result<Self> {
        if config.heading.is_empty() {
            return Err(Error::EmptyRecipe);
        }
        let rules = config
            .heading
            .iter()
            .map(HeadingRule::compile)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    /// Compile a recipe from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: RecipeConfig = serde_json::from_str(json)?;
        Self::from_config(&config)
    }

    /// Number of compiled rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True when the recipe holds no rules. Compiled recipes never are.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Classify one span: the first rule that admits it decides.
    /// An admitted span whose trimmed text is empty is a miss, even for
    /// greedy rules.
    pub fn classify_span(&self, span: &Span) -> SpanVerdict {
        for rule in &self.rules {
            if rule.admits(span) {
                let text = span.content.trim();
                if text.is_empty() {
                    return SpanVerdict::Miss;
                }
                if rule.greedy {
                    return SpanVerdict::Greedy { level: rule.level };
                }
                return SpanVerdict::Fragment(Fragment {
                    text: text.to_string(),
                    level: rule.level,
                });
            }
        }
        SpanVerdict::Miss
    }

    /// Extract the heading titles a block yields, as a level-ascending
    /// `(level, title)` list.
    ///
    /// Fragments of the same level are space-joined into one title. A
    /// greedy match short-circuits the whole block: its entire span text
    /// becomes a single title at the greedy rule's level.
    pub fn headings_in(&self, block: &Block) -> Vec<(u32, String)> {
        if block.kind != BlockKind::Text {
            return Vec::new();
        }

        let mut acc: BTreeMap<u32, Vec<String>> = BTreeMap::new();
        for line in &block.lines {
            for span in &line.spans {
                match self.classify_span(span) {
                    SpanVerdict::Miss => {}
                    SpanVerdict::Fragment(frag) => {
                        acc.entry(frag.level).or_default().push(frag.text);
                    }
                    SpanVerdict::Greedy { level } => {
                        return vec![(level, block_span_text(block))];
                    }
                }
            }
        }
        acc.into_iter()
            .map(|(level, parts)| (level, parts.join(" ")))
            .collect()
    }
}

/// All span text of a block, trimmed and space-joined. Used when a
/// greedy rule claims the block.
fn block_span_text(block: &Block) -> String {
    block
        .lines
        .iter()
        .flat_map(|line| line.spans.iter())
        .map(|span| span.content.trim())
        .collect::<Vec<_>>()
        .join(" ")
}

// ==================== Tests ====================
