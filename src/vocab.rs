//! Fixed vocabularies and naming patterns.
//!
//! Section-title strings drive outline inference for documents without
//! embedded bookmarks; the appendix vocabulary drives the appendix latch
//! and force-classification; the entity naming patterns extract figure,
//! table, and equation identifiers from caption text.

use crate::model::EntityKind;
use regex::Regex;
use std::sync::LazyLock;

/// Section titles commonly used in papers and reports. Outline inference
/// counts font sizes over spans containing any of these.
pub const SECTION_TITLES: &[&str] = &[
    "Abstract",
    "Introduction",
    "Related Work",
    "Background",
    "Introduction and Motivation",
    "Computation Function",
    "Routing Function",
    "Preliminary",
    "Problem Formulation",
    "Methods",
    "Methodology",
    "Method",
    "Approach",
    "Approaches",
    "Materials and Methods",
    "Experiment Settings",
    "Experiment",
    "Experimental Results",
    "Evaluation",
    "Experiments",
    "Results",
    "Findings",
    "Data Analysis",
    "Discussion",
    "Results and Discussion",
    "Conclusion",
    "References",
    "Acknowledgments",
    "Appendix",
    "FAQ",
    "Frequently Asked Questions",
];

/// Titles that mark the appendix tail of a document. Matched as
/// case-insensitive substrings, so "Acknowledgment" also covers
/// "Acknowledgments".
pub const APPENDIX_TITLES: &[&str] = &[
    "Reference",
    "Acknowledgment",
    "Appendix",
    "FAQ",
    "Frequently Asked Question",
];

/// Substring expected in the link-target hint of appendix bookmarks.
pub const APPENDIX_DEST_HINT: &str = "appendix";

/// Title the reference-section search fuzzy-matches against.
pub const REFERENCES_TITLE: &str = "Reference";

/// Identifier number part: decimal (possibly dotted), Roman, or an
/// alphabetic token.
const ID_NUMBER: &str = r"[0-9]+(?:\.[0-9]+)?|[0-9]+|[IVXLCDM]+|[a-zA-Z]+";

static SECTION_TITLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    let alternation = SECTION_TITLES
        .iter()
        .map(|t| regex::escape(t))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!("(?i){}", alternation)).unwrap()
});

static APPENDIX_TITLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    let alternation = APPENDIX_TITLES
        .iter()
        .map(|t| regex::escape(t))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!("(?i){}", alternation)).unwrap()
});

static IMAGE_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)(pic|picture|img|image|chart|figure|fig|table|tbl)\s*({})",
        ID_NUMBER
    ))
    .unwrap()
});

static TABLE_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)(tbl|table|chart|figure|fig)\s*({})",
        ID_NUMBER
    ))
    .unwrap()
});

static EQUATION_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)(formula|equation|notation|syntax)\s*({})",
        ID_NUMBER
    ))
    .unwrap()
});

/// True when the text contains any section-title string.
pub fn contains_section_title(text: &str) -> bool {
    SECTION_TITLE_RE.is_match(text)
}

/// True when the text contains any appendix-vocabulary string.
pub fn contains_appendix_title(text: &str) -> bool {
    APPENDIX_TITLE_RE.is_match(text)
}

/// The naming pattern for one entity family.
pub fn entity_pattern(kind: EntityKind) -> &'static Regex {
    match kind {
        EntityKind::Image => &IMAGE_ID_RE,
        EntityKind::Table => &TABLE_ID_RE,
        EntityKind::Equation => &EQUATION_ID_RE,
    }
}

/// Prefix used for generated placeholder identifiers of one family.
pub fn placeholder_prefix(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Image => "Image_Number_",
        EntityKind::Table => "Table_Number_",
        EntityKind::Equation => "Equation_Number_",
    }
}
