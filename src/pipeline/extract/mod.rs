//! Content extraction: loaded input → ordered content blocks + metadata.
//!
//! One submodule per input kind. Each returns blocks in document order; this
//! module enforces the shared invariant (never return an empty sequence) and
//! computes the metadata that does not depend on the input kind.

pub mod html;
pub mod image;
pub mod text;

use crate::config::ExtractorConfig;
use crate::error::BrochureError;
use crate::model::ContentBlock;
use crate::output::{Extraction, InputMetadata};
use crate::pipeline::input::LoadedInput;
use crate::pipeline::keywords::words;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

/// Extract content blocks from a loaded input.
///
/// # Errors
/// * [`BrochureError::EmptyContent`]: HTML whose body has no usable text.
/// * [`BrochureError::InvalidImage`]: image header could not be read.
pub fn extract(input: &LoadedInput, config: &ExtractorConfig) -> Result<Extraction, BrochureError> {
    let (blocks, title, image) = match input {
        LoadedInput::Html(doc) => {
            let content = html::extract_html(doc, config);
            (content.blocks, content.title, None)
        }
        LoadedInput::Text(raw) => (text::extract_text(raw, config), None, None),
        LoadedInput::Image {
            bytes,
            format,
            name,
        } => {
            let content = image::extract_image(bytes, *format, name.as_deref(), config)?;
            (content.blocks, None, Some(content.metadata))
        }
    };

    if blocks.is_empty() {
        return Err(BrochureError::EmptyContent {
            input: input.kind().to_string(),
        });
    }

    let title = title.or_else(|| {
        blocks
            .iter()
            .find(|b| b.is_heading())
            .map(|b| b.text().to_string())
    });
    let dominant_words = dominant_words(&blocks, config);

    info!(
        "Extracted {} blocks from {} input ({} headings)",
        blocks.len(),
        input.kind(),
        blocks.iter().filter(|b| b.is_heading()).count()
    );
    debug!("Dominant words: {:?}", dominant_words);

    Ok(Extraction {
        blocks,
        metadata: InputMetadata {
            source: input.kind(),
            title,
            dominant_words,
            image,
        },
    })
}

/// The most frequent words of three or more letters that are not stopwords,
/// most frequent first, ties broken alphabetically.
pub fn dominant_words(blocks: &[ContentBlock], config: &ExtractorConfig) -> Vec<String> {
    let stopwords: HashSet<String> = config.stopwords.iter().map(|s| s.to_lowercase()).collect();
    let mut counts: HashMap<String, usize> = HashMap::new();

    for word in blocks.iter().flat_map(|b| words(b.text())) {
        if word.chars().count() < 3
            || word.chars().all(|c| c.is_numeric())
            || stopwords.contains(&word)
        {
            continue;
        }
        *counts.entry(word).or_insert(0) += 1;
    }

    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    ranked.sort_by(|(wa, ca), (wb, cb)| cb.cmp(ca).then_with(|| wa.cmp(wb)));
    ranked
        .into_iter()
        .take(config.dominant_word_count)
        .map(|(w, _)| w)
        .collect()
}

/// Whether a candidate block's text is worth keeping.
pub(crate) fn is_meaningful(text: &str, config: &ExtractorConfig) -> bool {
    let trimmed = text.trim();
    if trimmed.chars().count() < config.min_block_chars {
        return false;
    }
    let lower = trimmed.to_lowercase();
    !config
        .boilerplate_phrases
        .iter()
        .any(|p| lower.contains(&p.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::input::InputKind;

    #[test]
    fn html_title_wins_over_first_heading() {
        let input = LoadedInput::Html(
            "<html><head><title>Acme Inc</title></head><body><h1>Welcome</h1></body></html>"
                .into(),
        );
        let out = extract(&input, &ExtractorConfig::default()).unwrap();
        assert_eq!(out.metadata.title.as_deref(), Some("Acme Inc"));
        assert_eq!(out.metadata.source, InputKind::Html);
    }

    #[test]
    fn text_title_is_first_heading() {
        let input = LoadedInput::Text("Great Coffee\n\nWe serve coffee.".into());
        let out = extract(&input, &ExtractorConfig::default()).unwrap();
        assert_eq!(out.metadata.title.as_deref(), Some("Great Coffee"));
        assert!(out.metadata.image.is_none());
    }

    #[test]
    fn title_only_html_is_empty_content() {
        let input = LoadedInput::Html(
            "<html><head><title>Acme</title></head><body></body></html>".into(),
        );
        let err = extract(&input, &ExtractorConfig::default()).unwrap_err();
        assert!(matches!(err, BrochureError::EmptyContent { .. }), "{err}");
    }

    #[test]
    fn empty_html_is_empty_content() {
        let input = LoadedInput::Html("<html><body></body></html>".into());
        let err = extract(&input, &ExtractorConfig::default()).unwrap_err();
        assert!(
            matches!(err, BrochureError::EmptyContent { ref input } if input == "html"),
            "{err}"
        );
    }

    #[test]
    fn dominant_words_rank_by_frequency_then_alphabet() {
        let blocks = vec![
            ContentBlock::heading("Cloud Storage", 1),
            ContentBlock::paragraph("Cloud backup and cloud sync for storage teams in 2024."),
        ];
        let words = dominant_words(&blocks, &ExtractorConfig::default());
        assert_eq!(words, ["cloud", "storage", "backup", "sync", "teams"]);
    }

    #[test]
    fn boilerplate_is_not_meaningful() {
        let config = ExtractorConfig::default();
        assert!(!is_meaningful("© 2024 Acme. All rights reserved.", &config));
        assert!(!is_meaningful(" x ", &config));
        assert!(is_meaningful("Hi", &config));
    }
}
