//! Deterministic text cleanup shared by the extractor and the renderer.
//!
//! Two entry points:
//!
//! * [`clean_inline`]: one block's worth of text: invisible Unicode removed,
//!   all whitespace runs (including newlines) collapsed to a single space.
//! * [`clean_document`]: a whole rendered brochure: line endings unified,
//!   trailing spaces trimmed, blank-line runs collapsed, one final newline.
//!
//! Each rule is a pure `&str → String` function and tested on its own.

use once_cell::sync::Lazy;
use regex::Regex;

/// Normalise a single block of extracted text.
pub fn clean_inline(input: &str) -> String {
    collapse_whitespace(&remove_invisible_chars(input))
}

/// Normalise a multi-line document.
///
/// Rules (applied in order):
/// 1. Normalise line endings (CRLF → LF)
/// 2. Strip invisible Unicode (zero-width spaces, BOM, soft hyphens)
/// 3. Trim trailing whitespace per line
/// 4. Collapse 2+ consecutive blank lines down to 1
/// 5. Trim leading blank lines and end with exactly one newline
pub fn clean_document(input: &str) -> String {
    let s = normalise_line_endings(input);
    let s = remove_invisible_chars(&s);
    let s = trim_trailing_whitespace(&s);
    let s = collapse_blank_lines(&s);
    ensure_final_newline(s.trim_start_matches('\n'))
}

// ── Rule: line endings ───────────────────────────────────────────────────────

pub fn normalise_line_endings(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}

// ── Rule: invisible Unicode ──────────────────────────────────────────────────

pub fn remove_invisible_chars(input: &str) -> String {
    input.replace(
        [
            '\u{200B}', '\u{FEFF}', '\u{00AD}', '\u{200C}', '\u{200D}', '\u{2060}',
        ],
        "",
    )
}

// ── Rule: inline whitespace ──────────────────────────────────────────────────

fn collapse_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ── Rule: trailing whitespace ────────────────────────────────────────────────

fn trim_trailing_whitespace(input: &str) -> String {
    input
        .lines()
        .map(|line| line.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}

// ── Rule: blank lines ────────────────────────────────────────────────────────

static RE_BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

fn collapse_blank_lines(input: &str) -> String {
    RE_BLANK_LINES.replace_all(input, "\n\n").to_string()
}

// ── Rule: final newline ──────────────────────────────────────────────────────

fn ensure_final_newline(input: &str) -> String {
    let trimmed = input.trim_end();
    if trimmed.is_empty() {
        String::from("\n")
    } else {
        format!("{}\n", trimmed)
    }
}
