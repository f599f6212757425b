//! HTML → content blocks.
//!
//! The document is parsed with `scraper` (html5ever underneath), which never
//! fails: malformed markup is repaired the way a browser would. The walk is
//! in document order; `h1`–`h6` become headings, paragraph-like tags become
//! paragraphs, and everything else is descended into. Noise subtrees (scripts,
//! navigation, cookie banners, ...) are skipped wholesale, including when they
//! sit inside an element that is being turned into a block.

use super::is_meaningful;
use crate::config::ExtractorConfig;
use crate::model::ContentBlock;
use crate::pipeline::normalize::clean_inline;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Node, Selector};
use tracing::debug;

static TITLE_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("title").unwrap());
static MAIN_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("main").unwrap());
static BODY_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("body").unwrap());

/// Elements whose boundaries do not separate words.
const INLINE_TAGS: &[&str] = &[
    "a", "abbr", "b", "bdi", "bdo", "cite", "code", "data", "dfn", "em", "i", "kbd", "mark",
    "q", "s", "samp", "small", "span", "strong", "sub", "sup", "time", "u", "var",
];

/// Blocks and `<title>` text found in one HTML document.
#[derive(Debug, Clone, PartialEq)]
pub struct HtmlContent {
    pub blocks: Vec<ContentBlock>,
    pub title: Option<String>,
}

/// Extract blocks from an HTML document.
///
/// Only `<main>` / `<body>` content becomes blocks; the `<title>` is returned
/// separately and never stands in for an empty body.
pub fn extract_html(html: &str, config: &ExtractorConfig) -> HtmlContent {
    let document = Html::parse_document(html);

    let title = document
        .select(&TITLE_SELECTOR)
        .next()
        .map(|t| clean_inline(&t.text().collect::<String>()))
        .filter(|t| !t.is_empty());

    let walker = Walker { config };
    let mut blocks = Vec::new();

    if let Some(main) = document.select(&MAIN_SELECTOR).next() {
        walker.visit(main, &mut blocks);
        debug!("<main> yielded {} blocks", blocks.len());
    }
    if blocks.is_empty() {
        let root = document
            .select(&BODY_SELECTOR)
            .next()
            .unwrap_or_else(|| document.root_element());
        walker.visit(root, &mut blocks);
    }

    HtmlContent { blocks, title }
}

struct Walker<'c> {
    config: &'c ExtractorConfig,
}

impl Walker<'_> {
    fn visit(&self, parent: ElementRef<'_>, blocks: &mut Vec<ContentBlock>) {
        for child in parent.children().filter_map(ElementRef::wrap) {
            if self.is_noise(child) {
                continue;
            }
            let name = child.value().name();
            if let Some(level) = heading_level(name) {
                let text = self.block_text(child);
                if is_meaningful(&text, self.config) {
                    blocks.push(ContentBlock::heading(text, level));
                }
            } else if self
                .config
                .paragraph_tags
                .iter()
                .any(|t| t.eq_ignore_ascii_case(name))
            {
                let text = self.block_text(child);
                if is_meaningful(&text, self.config) {
                    blocks.push(ContentBlock::paragraph(text));
                }
            } else {
                self.visit(child, blocks);
            }
        }
    }

    /// Whether `el` and its subtree should be ignored.
    fn is_noise(&self, el: ElementRef<'_>) -> bool {
        let element = el.value();
        if self
            .config
            .noise_tags
            .iter()
            .any(|t| t.eq_ignore_ascii_case(element.name()))
        {
            return true;
        }
        element
            .id()
            .into_iter()
            .chain(element.classes())
            .any(|attr| self.attribute_is_noise(attr))
    }

    /// `id`/`class` values are split into tokens on non-alphanumerics; a token
    /// that starts with a noise keyword marks the element as noise. This keeps
    /// `cookie-banner` and `privacyNotice` out without catching `headshot`.
    fn attribute_is_noise(&self, value: &str) -> bool {
        value
            .split(|c: char| !c.is_alphanumeric())
            .filter(|token| !token.is_empty())
            .map(str::to_lowercase)
            .any(|token| {
                self.config
                    .noise_attribute_keywords
                    .iter()
                    .any(|k| token.starts_with(&k.to_lowercase()))
            })
    }

    /// Whitespace-collapsed text of `el`, skipping noise descendants.
    fn block_text(&self, el: ElementRef<'_>) -> String {
        let mut raw = String::new();
        self.collect_text(el, &mut raw);
        clean_inline(&raw)
    }

    fn collect_text(&self, el: ElementRef<'_>, out: &mut String) {
        for node in el.children() {
            match node.value() {
                Node::Text(text) => out.push_str(text),
                Node::Element(element) => {
                    let Some(child) = ElementRef::wrap(node) else {
                        continue;
                    };
                    if self.is_noise(child) {
                        continue;
                    }
                    let inline = INLINE_TAGS.contains(&element.name());
                    if !inline {
                        out.push(' ');
                    }
                    self.collect_text(child, out);
                    if !inline {
                        out.push(' ');
                    }
                }
                _ => {}
            }
        }
    }
}

fn heading_level(name: &str) -> Option<u8> {
    name.strip_prefix('h')
        .and_then(|digit| digit.parse::<u8>().ok())
        .filter(|level| (1..=6).contains(level))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BlockKind;

    fn extract(html: &str) -> HtmlContent {
        extract_html(html, &ExtractorConfig::default())
    }

    fn texts(content: &HtmlContent) -> Vec<&str> {
        content.blocks.iter().map(|b| b.text()).collect()
    }

    #[test]
    fn headings_and_paragraphs_in_order() {
        let out = extract(
            "<html><body><h1>Acme Cloud</h1><p>We offer storage.</p>\
             <h2>Pricing</h2><ul><li>Free tier</li><li>Pro tier</li></ul></body></html>",
        );
        assert_eq!(
            texts(&out),
            ["Acme Cloud", "We offer storage.", "Pricing", "Free tier", "Pro tier"]
        );
        assert_eq!(out.blocks[0].level(), Some(1));
        assert_eq!(out.blocks[2].level(), Some(2));
        assert_eq!(out.blocks[1].kind(), BlockKind::Paragraph);
    }

    #[test]
    fn noise_tags_are_dropped() {
        let out = extract(
            "<body><nav><p>Home About</p></nav><script>var x = 1;</script>\
             <p>Real content here.</p><footer><p>Footer text</p></footer></body>",
        );
        assert_eq!(texts(&out), ["Real content here."]);
    }

    #[test]
    fn noise_attributes_are_dropped() {
        let out = extract(
            r#"<body><div id="cookie-banner"><p>We use cookies.</p></div>
               <div class="hero privacyNotice"><p>Read this.</p></div>
               <div class="headshot"><p>Our founder.</p></div></body>"#,
        );
        assert_eq!(texts(&out), ["Our founder."]);
    }

    #[test]
    fn nested_noise_inside_block_is_skipped() {
        let out = extract("<p>Fast <script>track()</script>setup<br>and <b>secure</b>.</p>");
        assert_eq!(texts(&out), ["Fast setup and secure."]);
    }

    #[test]
    fn inline_tags_do_not_split_words() {
        let out = extract("<p>Acme<b>Cloud</b> rocks</p>");
        assert_eq!(texts(&out), ["AcmeCloud rocks"]);
    }

    #[test]
    fn classified_elements_are_not_descended_into() {
        let out = extract("<ul><li>Outer<ul><li>Inner</li></ul></li></ul>");
        assert_eq!(texts(&out), ["Outer Inner"]);
    }

    #[test]
    fn main_is_preferred_when_it_has_content() {
        let out = extract(
            "<body><p>Sidebar promo text</p><main><h1>Acme</h1><p>Main text.</p></main></body>",
        );
        assert_eq!(texts(&out), ["Acme", "Main text."]);
    }

    #[test]
    fn without_main_the_whole_body_is_walked() {
        let out = extract(
            "<body><h1>Acme</h1><p>Short intro.</p>\
             <div class=\"content\"><p>A much longer paragraph that holds most of the \
             page text, far more than anything around it.</p></div></body>",
        );
        let texts = texts(&out);
        assert_eq!(texts.len(), 3);
        assert_eq!(&texts[..2], ["Acme", "Short intro."]);
    }

    #[test]
    fn empty_main_falls_back_to_body() {
        let out = extract("<body><main></main><p>Body text.</p></body>");
        assert_eq!(texts(&out), ["Body text."]);
    }

    #[test]
    fn short_and_boilerplate_blocks_are_skipped() {
        let out = extract("<p>x</p><p>Copyright 2024. All Rights Reserved.</p><p>Keep me</p>");
        assert_eq!(texts(&out), ["Keep me"]);
    }

    #[test]
    fn title_does_not_fill_an_empty_body() {
        let out = extract("<html><head><title> Acme   Inc </title></head><body></body></html>");
        assert_eq!(out.title.as_deref(), Some("Acme Inc"));
        assert!(out.blocks.is_empty());
    }

    #[test]
    fn nothing_at_all() {
        let out = extract("<html><body><script>x()</script></body></html>");
        assert!(out.blocks.is_empty());
        assert!(out.title.is_none());
    }

    #[test]
    fn malformed_markup_is_tolerated() {
        let out = extract("<h1>Acme<p>Unclosed paragraph<p>Another");
        assert!(!out.blocks.is_empty());
        assert!(texts(&out).iter().any(|t| t.contains("Another")));
    }

    #[test]
    fn heading_levels() {
        assert_eq!(heading_level("h1"), Some(1));
        assert_eq!(heading_level("h6"), Some(6));
        assert_eq!(heading_level("h7"), None);
        assert_eq!(heading_level("header"), None);
        assert_eq!(heading_level("hr"), None);
    }
}
