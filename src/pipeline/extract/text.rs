//! Free-form text → content blocks.
//!
//! Blank lines separate blocks. The first line of the input is the title. A
//! later block is a heading when it reads like one: a single short line with
//! no terminal punctuation. Lines starting with Markdown `#` markers are
//! headings at the level the markers give.

use super::is_meaningful;
use crate::config::ExtractorConfig;
use crate::model::ContentBlock;
use crate::pipeline::normalize::{clean_inline, normalise_line_endings, remove_invisible_chars};
use once_cell::sync::Lazy;
use regex::Regex;

/// Heading used when the input has no text at all.
pub const FALLBACK_TITLE: &str = "Company Overview";

static RE_BLANK_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n[ \t]*\n").unwrap());

static RE_MARKDOWN_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(#{1,6})\s+(.+?)\s*#*$").unwrap());

const TERMINAL_PUNCTUATION: &[char] = &['.', '!', '?', ',', ':', ';'];

/// Extract blocks from raw text. Never returns an empty vector.
pub fn extract_text(raw: &str, config: &ExtractorConfig) -> Vec<ContentBlock> {
    let text = remove_invisible_chars(&normalise_line_endings(raw));
    let mut blocks = Vec::new();

    for chunk in RE_BLANK_LINE.split(&text) {
        let lines: Vec<&str> = chunk
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        let Some((first, rest)) = lines.split_first() else {
            continue;
        };

        if blocks.is_empty() {
            let (level, title) = markdown_heading(first).unwrap_or((1, *first));
            blocks.push(ContentBlock::heading(clean_inline(title), level));
            push_chunk(rest, config, &mut blocks);
        } else {
            push_chunk(&lines, config, &mut blocks);
        }
    }

    if blocks.is_empty() {
        blocks.push(ContentBlock::heading(FALLBACK_TITLE, 1));
    }
    blocks
}

/// Classify the non-empty, trimmed lines of one chunk.
fn push_chunk(mut lines: &[&str], config: &ExtractorConfig, blocks: &mut Vec<ContentBlock>) {
    while let Some((first, rest)) = lines.split_first() {
        let Some((level, heading)) = markdown_heading(first) else {
            break;
        };
        let heading = clean_inline(heading);
        if is_meaningful(&heading, config) {
            blocks.push(ContentBlock::heading(heading, level));
        }
        lines = rest;
    }

    match lines {
        [] => {}
        [line] if reads_as_heading(line, config) => {
            let heading = clean_inline(line);
            if is_meaningful(&heading, config) {
                blocks.push(ContentBlock::heading(heading, 2));
            }
        }
        _ => {
            let paragraph = clean_inline(&lines.join(" "));
            if is_meaningful(&paragraph, config) {
                blocks.push(ContentBlock::paragraph(paragraph));
            }
        }
    }
}

fn reads_as_heading(line: &str, config: &ExtractorConfig) -> bool {
    line.chars().count() < config.heading_max_chars && !line.ends_with(TERMINAL_PUNCTUATION)
}

fn markdown_heading(line: &str) -> Option<(u8, &str)> {
    let caps = RE_MARKDOWN_HEADING.captures(line)?;
    let level = caps.get(1)?.as_str().len() as u8;
    Some((level, caps.get(2)?.as_str()))
}
