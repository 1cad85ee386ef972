//! Text normalization (pipeline stage 1)
//!
//! Resume text keeps its line structure; job postings are flattened to a
//! single line because nothing downstream parses their layout.

use once_cell::sync::Lazy;
use regex::Regex;

static HORIZONTAL_WS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[ \t\u{00A0}\u{2000}-\u{200B}\u{202F}\u{205F}\u{3000}\x0B\x0C]+").expect("valid regex"));
static ANY_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Glyphs that introduce a list item when they lead a line
pub const BULLET_GLYPHS: &[char] = &[
    '•', '●', '○', '◦', '▪', '▫', '■', '□', '►', '▸', '▹', '➢', '➤', '✓', '✔', '-', '*', '·', '‣', '∙', '–', '—', 'o',
];

/// A trimmed, whitespace-collapsed resume line with its position in the input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedLine {
    pub ordinal: usize,
    pub text: String,
}

/// Canonicalize resume text while preserving line breaks.
///
/// CRLF and lone CR become LF, horizontal whitespace inside a line collapses
/// to one space, runs of 3+ blank lines become a single blank line and the
/// whole text is trimmed. No non-blank line is dropped.
pub fn normalize_resume(raw: &str) -> String {
    let unified = raw.replace("\r\n", "\n").replace('\r', "\n");

    let mut out: Vec<String> = Vec::new();
    let mut blank_run = 0usize;

    for line in unified.split('\n') {
        let collapsed = HORIZONTAL_WS.replace_all(line, " ");
        let trimmed = collapsed.trim();

        if trimmed.is_empty() {
            blank_run += 1;
            continue;
        }

        if !out.is_empty() && blank_run > 0 {
            // Short gaps survive as-is, long gaps shrink to one blank line
            let keep = if blank_run >= 3 { 1 } else { blank_run };
            out.extend(std::iter::repeat(String::new()).take(keep));
        }
        blank_run = 0;
        out.push(trimmed.to_string());
    }

    out.join("\n")
}

/// Flatten a job posting to one whitespace-collapsed line
pub fn normalize_job(raw: &str) -> String {
    ANY_WS.replace_all(raw, " ").trim().to_string()
}

/// Non-blank lines of normalized text, tagged with their line index
pub fn normalized_lines(text: &str) -> Vec<NormalizedLine> {
    text.lines()
        .enumerate()
        .map(|(ordinal, line)| NormalizedLine {
            ordinal,
            text: line.trim().to_string(),
        })
        .filter(|line| !line.text.is_empty())
        .collect()
}

/// Strip a leading bullet glyph, returning the remaining text.
///
/// `o` only counts as a glyph when followed by whitespace, and `-`/`*` must
/// not be part of a number such as `-5%`.
pub fn strip_bullet_glyph(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();
    let mut chars = trimmed.chars();
    let first = chars.next()?;
    if !BULLET_GLYPHS.contains(&first) {
        return None;
    }

    let rest = &trimmed[first.len_utf8()..];
    let requires_space = matches!(first, 'o' | '-' | '*');
    match rest.chars().next() {
        None => Some(""),
        Some(c) if requires_space && !c.is_whitespace() => None,
        Some(_) => Some(rest.trim()),
    }
}

/// Lowercase, collapse whitespace and trim; the comparison form for dedup and guardrails
pub fn comparison_form(text: &str) -> String {
    ANY_WS.replace_all(&text.to_lowercase(), " ").trim().to_string()
}
