//! Brochure templates, one per audience.
//!
//! Centralising every template here serves two purposes:
//!
//! 1. **Single source of truth**: changing a section title or a fallback
//!    sentence requires editing exactly one place.
//!
//! 2. **Testability**: tests can inspect the templates directly, and swap in
//!    a substitute [`TemplateSet`] via [`crate::config::GenerationConfig`].
//!
//! A template is data, not code: an ordered list of sections, each naming the
//! profile field(s) it pulls from and the sentence to print when those fields
//! are empty. The renderer does straight substitution.

use crate::error::BrochureError;
use crate::model::Audience;
use serde::{Deserialize, Serialize};

/// A profile field a section can draw items from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileField {
    Positioning,
    Offerings,
    Audience,
    ValueProps,
    Tone,
}

/// How each item of a section is marked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStyle {
    /// `- item`
    #[default]
    Bullet,
    /// `- **item**`
    BoldBullet,
    /// `1. item`
    Numbered,
}

/// One titled section of a brochure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionTemplate {
    pub title: String,
    pub fields: Vec<ProfileField>,
    #[serde(default)]
    pub style: ItemStyle,
    /// Maximum items rendered.
    pub limit: usize,
    /// Printed instead of items when the backing fields are empty.
    pub fallback: String,
}

impl SectionTemplate {
    pub fn new(
        title: &str,
        fields: &[ProfileField],
        style: ItemStyle,
        limit: usize,
        fallback: &str,
    ) -> Self {
        Self {
            title: title.to_string(),
            fields: fields.to_vec(),
            style,
            limit,
            fallback: fallback.to_string(),
        }
    }
}

/// Fixed call-to-action closing a brochure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosingSection {
    pub title: String,
    pub body: String,
}

/// Full template for one audience.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrochureTemplate {
    pub headline: String,
    pub sections: Vec<SectionTemplate>,
    #[serde(default)]
    pub closing: Option<ClosingSection>,
}

/// Templates for all three audiences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateSet {
    pub customers: BrochureTemplate,
    pub investors: BrochureTemplate,
    pub partners: BrochureTemplate,
    /// Printed under the headline when the profile's positioning is blank.
    pub default_positioning: String,
}

impl TemplateSet {
    pub fn for_audience(&self, audience: Audience) -> &BrochureTemplate {
        match audience {
            Audience::Customers => &self.customers,
            Audience::Investors => &self.investors,
            Audience::Partners => &self.partners,
        }
    }

    /// Reject any template that could render a blank headline or an empty
    /// section.
    pub fn validate(&self) -> Result<(), BrochureError> {
        if self.default_positioning.trim().is_empty() {
            return Err(BrochureError::InvalidConfig(
                "templates: default_positioning is blank".into(),
            ));
        }
        for audience in Audience::ALL {
            let template = self.for_audience(audience);
            let invalid =
                |what: String| BrochureError::InvalidConfig(format!("{audience} template: {what}"));

            if template.headline.trim().is_empty() {
                return Err(invalid("headline is blank".into()));
            }
            for (i, section) in template.sections.iter().enumerate() {
                let name = if section.title.trim().is_empty() {
                    return Err(invalid(format!("section {} has a blank title", i + 1)));
                } else {
                    section.title.trim()
                };
                if section.fields.is_empty() {
                    return Err(invalid(format!("section '{name}' names no fields")));
                }
                if section.limit == 0 {
                    return Err(invalid(format!("section '{name}' has limit 0")));
                }
                if section.fallback.trim().is_empty() {
                    return Err(invalid(format!("section '{name}' has a blank fallback")));
                }
            }
            if let Some(closing) = &template.closing {
                if closing.title.trim().is_empty() || closing.body.trim().is_empty() {
                    return Err(invalid("closing section needs a title and a body".into()));
                }
            }
        }
        Ok(())
    }
}

impl Default for TemplateSet {
    fn default() -> Self {
        Self {
            customers: customers_template(),
            investors: investors_template(),
            partners: partners_template(),
            default_positioning: "Innovative solutions for modern businesses".to_string(),
        }
    }
}

fn closing(title: &str, body: &str) -> Option<ClosingSection> {
    Some(ClosingSection {
        title: title.to_string(),
        body: body.to_string(),
    })
}

fn customers_template() -> BrochureTemplate {
    use ProfileField::*;
    BrochureTemplate {
        headline: "Transform Your Business Today".to_string(),
        sections: vec![
            SectionTemplate::new(
                "Why Choose Us",
                &[ValueProps],
                ItemStyle::BoldBullet,
                4,
                "We focus on excellence in delivery, every time.",
            ),
            SectionTemplate::new(
                "What We Offer",
                &[Offerings],
                ItemStyle::Numbered,
                4,
                "Quality products and services built around your needs.",
            ),
            SectionTemplate::new(
                "Who We Serve",
                &[Audience],
                ItemStyle::Bullet,
                3,
                "Forward-thinking organisations of every size.",
            ),
        ],
        closing: closing(
            "Ready to Get Started?",
            "Join the customers who trust us to deliver exceptional results.",
        ),
    }
}

fn investors_template() -> BrochureTemplate {
    use ProfileField::*;
    BrochureTemplate {
        headline: "Investment Opportunity".to_string(),
        sections: vec![
            SectionTemplate::new(
                "Market Positioning",
                &[Positioning, Audience],
                ItemStyle::Bullet,
                3,
                "A focused company with a clear place in its market.",
            ),
            SectionTemplate::new(
                "Traction Signals",
                &[ValueProps],
                ItemStyle::BoldBullet,
                5,
                "A strong market position built on consistent delivery.",
            ),
            SectionTemplate::new(
                "Growth Levers",
                &[Offerings],
                ItemStyle::BoldBullet,
                4,
                "Scalable solutions ready to expand into adjacent markets.",
            ),
        ],
        closing: closing(
            "Growth Potential",
            "A scalable business model, strong customer retention and an expanding market \
             opportunity.",
        ),
    }
}

fn partners_template() -> BrochureTemplate {
    use ProfileField::*;
    BrochureTemplate {
        headline: "Let's Build Something Great Together".to_string(),
        sections: vec![
            SectionTemplate::new(
                "Collaboration Fit",
                &[Tone, Audience],
                ItemStyle::Bullet,
                4,
                "A collaborative, trustworthy team that is easy to work with.",
            ),
            SectionTemplate::new(
                "Mutual Value",
                &[ValueProps],
                ItemStyle::BoldBullet,
                4,
                "Shared goals and mutual success at the heart of every partnership.",
            ),
            SectionTemplate::new(
                "Offerings",
                &[Offerings],
                ItemStyle::BoldBullet,
                4,
                "Quality solutions partners can build on.",
            ),
        ],
        closing: closing(
            "Ready to Partner?",
            "Let's explore how we can create mutual value and drive success together.",
        ),
    }
}
