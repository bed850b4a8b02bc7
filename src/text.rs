//! Text utilities shared across stages: markdown escaping, LaTeX
//! whitespace cleanup, script detection, and the normalized fuzzy
//! matching used by alignment.

use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

/// Characters with markdown meaning that must be escaped in body text.
const MARKDOWN_SPECIALS: [char; 4] = ['*', '`', '~', '$'];

/// Escape markdown-significant characters in extracted text.
pub fn escape_markdown(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    for ch in content.chars() {
        if MARKDOWN_SPECIALS.contains(&ch) {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Compatibility-normalize span content coming out of OCR/extraction.
/// Folds ligatures (ﬁ → fi) and width variants so downstream fuzzy
/// matching sees plain ASCII where possible.
pub fn normalize_content(content: &str) -> String {
    content.nfkc().collect()
}

/// True when the text contains CJK ideographs. Lines with CJK content
/// join without separators; Latin lines join with single spaces.
pub fn contains_cjk(text: &str) -> bool {
    text.chars()
        .any(|ch| ('\u{4e00}'..='\u{9fff}').contains(&ch))
}

static LATEX_TEXT_CMD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\(operatorname|mathrm|text|mathbf)\s?\*? \{.*?\}").unwrap()
});

/// Remove unnecessary whitespace from LaTeX code.
///
/// Text-mode commands written with a space before their brace are
/// compacted first; then whitespace between any pair of characters that
/// are not both ASCII letters is dropped. Escaped spaces (`\ `) and
/// letter-letter gaps survive.
pub fn tidy_latex(latex: &str) -> String {
    let compacted = LATEX_TEXT_CMD_RE.replace_all(latex, |caps: &regex::Captures| {
        caps[0].replace(' ', "")
    });

    let chars: Vec<char> = compacted.chars().collect();
    let mut out = String::with_capacity(chars.len());
    let mut i = 0;
    while i < chars.len() {
        if chars[i].is_whitespace() {
            let mut j = i;
            while j < chars.len() && chars[j].is_whitespace() {
                j += 1;
            }
            let prev = out.chars().last();
            let next = chars.get(j).copied();
            let keep = match (prev, next) {
                (Some(p), Some(n)) => {
                    p == '\\' || (p.is_ascii_alphabetic() && n.is_ascii_alphabetic())
                }
                _ => true,
            };
            if keep {
                out.extend(&chars[i..j]);
            }
            i = j;
        } else {
            out.push(chars[i]);
            i += 1;
        }
    }
    out
}

/// Strip one leading single-letter-dot prefix ("A.") from a title.
pub fn strip_letter_dot_prefix(title: &str) -> &str {
    let mut chars = title.chars();
    match (chars.next(), chars.next()) {
        (Some(first), Some('.')) if first.is_ascii_alphabetic() => chars.as_str(),
        _ => title,
    }
}

/// Reduce text to lowercase ASCII letters, keeping digits on request.
/// This is the normal form all fuzzy comparisons run on.
pub fn normalize_for_match(text: &str, with_digits: bool) -> String {
    text.chars()
        .filter(|ch| ch.is_ascii_alphabetic() || (with_digits && ch.is_ascii_digit()))
        .map(|ch| ch.to_ascii_lowercase())
        .collect()
}

/// Similarity of two strings in normal form, scaled to 0..=100.
///
/// Bigram-overlap similarity tolerates small insertions like plural
/// endings: "References" still scores above 90 against "Reference".
pub fn match_ratio(a: &str, b: &str, with_digits: bool) -> f64 {
    let a = normalize_for_match(a, with_digits);
    let b = normalize_for_match(b, with_digits);
    if a.is_empty() && b.is_empty() {
        return 100.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    strsim::sorensen_dice(&a, &b) * 100.0
}

/// Best similarity of the shorter string against any equal-length
/// window of the longer, in normal form, scaled to 0..=100.
pub fn partial_match_ratio(a: &str, b: &str, with_digits: bool) -> f64 {
    let a = normalize_for_match(a, with_digits);
    let b = normalize_for_match(b, with_digits);
    if a.is_empty() && b.is_empty() {
        return 100.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let (shorter, longer) = if a.chars().count() <= b.chars().count() {
        (a, b)
    } else {
        (b, a)
    };
    let short_len = shorter.chars().count();
    let long_chars: Vec<char> = longer.chars().collect();

    let mut best: f64 = 0.0;
    for start in 0..=(long_chars.len() - short_len) {
        let window: String = long_chars[start..start + short_len].iter().collect();
        let score = strsim::normalized_levenshtein(&shorter, &window);
        if score > best {
            best = score;
            if best >= 1.0 {
                break;
            }
        }
    }
    best * 100.0
}
