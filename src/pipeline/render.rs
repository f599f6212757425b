//! Brochure rendering: profile + audience template → Markdown-subset text.
//!
//! Pure substitution, no inference. Output markup is limited to `## `
//! headline, `### ` section headings, `**bold**`, `- ` bullets and `1. `
//! numbered items, so any Markdown renderer (or none) displays it sensibly.

use crate::model::{Audience, Brochure, BusinessProfile};
use crate::pipeline::normalize::{clean_document, clean_inline};
use crate::templates::{ItemStyle, ProfileField, SectionTemplate, TemplateSet};
use tracing::debug;

/// Render the brochure for one audience.
///
/// Never fails and never produces an empty section: a section whose backing
/// fields hold nothing but blank strings prints its fallback sentence.
pub fn render(profile: &BusinessProfile, audience: Audience, templates: &TemplateSet) -> Brochure {
    let template = templates.for_audience(audience);

    let positioning = match clean_inline(&profile.positioning) {
        p if p.is_empty() => templates.default_positioning.clone(),
        p => p,
    };

    let mut lines: Vec<String> = vec![
        format!("## {}", template.headline),
        String::new(),
        format!("**{}**", positioning),
    ];

    for section in &template.sections {
        lines.push(String::new());
        lines.push(format!("### {}", section.title));
        lines.push(String::new());
        lines.extend(render_section(profile, section));
    }

    if let Some(closing) = &template.closing {
        lines.push(String::new());
        lines.push(format!("### {}", closing.title));
        lines.push(String::new());
        lines.push(closing.body.clone());
    }

    let text = clean_document(&lines.join("\n"));
    debug!("Rendered {} brochure: {} chars", audience, text.len());
    Brochure { audience, text }
}

fn render_section(profile: &BusinessProfile, section: &SectionTemplate) -> Vec<String> {
    let items: Vec<String> = section
        .fields
        .iter()
        .flat_map(|field| field_items(profile, *field))
        .map(|item| clean_inline(&item))
        .filter(|item| !item.is_empty())
        .take(section.limit)
        .collect();

    if items.is_empty() {
        return vec![section.fallback.clone()];
    }

    items
        .iter()
        .enumerate()
        .map(|(i, item)| match section.style {
            ItemStyle::Bullet => format!("- {item}"),
            ItemStyle::BoldBullet => format!("- **{item}**"),
            ItemStyle::Numbered => format!("{}. {item}", i + 1),
        })
        .collect()
}

fn field_items(profile: &BusinessProfile, field: ProfileField) -> Vec<String> {
    match field {
        ProfileField::Positioning => vec![profile.positioning.clone()],
        ProfileField::Offerings => profile.offerings.clone(),
        ProfileField::Audience => vec![profile.audience.clone()],
        ProfileField::ValueProps => profile.value_props.clone(),
        ProfileField::Tone => vec![format!("{} communication style", profile.tone.label())],
    }
}
