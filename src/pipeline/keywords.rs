//! Word tokenising and keyword matching.
//!
//! Keywords match at word starts, case-insensitively: `product` matches
//! "Products", `enterprise` matches "enterprises", but `fast` does not match
//! "breakfast". A multi-word keyword (`machine learning`) matches a run of
//! consecutive words; every word but the last must match exactly.

use once_cell::sync::Lazy;
use regex::Regex;

static RE_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\p{L}\p{N}]+(?:['’][\p{L}]+)?").unwrap());

static RE_SENTENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^.!?]+[.!?]*").unwrap());

/// Lower-cased words of `text`, in order.
pub fn words(text: &str) -> Vec<String> {
    RE_WORD
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .collect()
}

/// Sentences of `text`, trimmed, terminal punctuation kept.
pub fn sentences(text: &str) -> Vec<&str> {
    RE_SENTENCE
        .find_iter(text)
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Pre-tokenised text that keywords can be matched against repeatedly.
#[derive(Debug, Clone, Default)]
pub struct WordIndex {
    words: Vec<String>,
}

impl WordIndex {
    pub fn new(text: &str) -> Self {
        Self { words: words(text) }
    }

    /// Index the concatenation of several texts.
    pub fn from_texts<'a>(texts: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            words: texts.into_iter().flat_map(words).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Whether `keyword` occurs at least once.
    pub fn contains(&self, keyword: &str) -> bool {
        self.count(keyword) > 0
    }

    /// Whether any of `keywords` occurs.
    pub fn contains_any<S: AsRef<str>>(&self, keywords: &[S]) -> bool {
        keywords.iter().any(|k| self.contains(k.as_ref()))
    }

    /// Number of occurrences of `keyword`.
    pub fn count(&self, keyword: &str) -> usize {
        let needle = words(keyword);
        let Some((last, init)) = needle.split_last() else {
            return 0;
        };
        if self.words.len() < needle.len() {
            return 0;
        }
        self.words
            .windows(needle.len())
            .filter(|window| {
                window[..init.len()] == *init && window[init.len()].starts_with(last.as_str())
            })
            .count()
    }

    /// Total occurrences of all `keywords`.
    pub fn count_all<S: AsRef<str>>(&self, keywords: &[S]) -> usize {
        keywords.iter().map(|k| self.count(k.as_ref())).sum()
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }
}
