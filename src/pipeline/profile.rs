//! Business profiling: content blocks → [`BusinessProfile`].
//!
//! The stage sits behind the [`Profiler`] trait so the keyword heuristics can
//! be replaced (for example by a model-backed implementation) without the
//! extractor or renderer noticing. [`HeuristicProfiler`] is the default and
//! is pure: the same blocks and rules always give the same profile.
//!
//! ## Heuristic rules, in order
//!
//! 1. **Positioning**: the first heading, else a configured fallback.
//! 2. **Offerings**: paragraphs that mention an offering keyword.
//! 3. **Audience**: the first keyword family with a match anywhere.
//! 4. **Value props**: sentences that contain a benefit marker.
//! 5. **Tone**: marker-word vote, ties resolved by [`Tone::PRIORITY`].
//!
//! Every field has a fallback, so a profile is never partially empty.

use crate::config::ProfileRules;
use crate::error::BrochureError;
use crate::model::{BusinessProfile, ContentBlock, Tone};
use crate::pipeline::keywords::{sentences, WordIndex};
use std::collections::HashSet;
use tracing::debug;

/// Turns content blocks into a business profile.
///
/// Implementations must be deterministic for a given input and must not
/// return a profile with an empty `positioning`, `offerings`, `audience` or
/// `value_props`.
pub trait Profiler: Send + Sync {
    /// Short name used in logs and errors.
    fn name(&self) -> &str;

    /// Build a profile from blocks in document order.
    fn profile(&self, blocks: &[ContentBlock]) -> Result<BusinessProfile, BrochureError>;
}

/// Keyword-driven profiler configured by [`ProfileRules`].
#[derive(Debug, Clone, Default)]
pub struct HeuristicProfiler {
    rules: ProfileRules,
}

impl HeuristicProfiler {
    pub fn new(rules: ProfileRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &ProfileRules {
        &self.rules
    }

    fn positioning(&self, blocks: &[ContentBlock]) -> String {
        blocks
            .iter()
            .filter(|b| b.is_heading())
            .map(|b| b.text().trim())
            .find(|t| !t.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| self.rules.fallback_positioning.clone())
    }

    fn offerings(&self, blocks: &[ContentBlock]) -> Vec<String> {
        let mut seen = HashSet::new();
        let offerings: Vec<String> = blocks
            .iter()
            .filter(|b| b.is_paragraph())
            .map(|b| b.text().trim())
            .filter(|t| WordIndex::new(t).contains_any(&self.rules.offering_keywords))
            .filter(|t| seen.insert(t.to_lowercase()))
            .take(self.rules.max_offerings)
            .map(str::to_string)
            .collect();

        if offerings.is_empty() {
            vec![self.rules.fallback_offering.clone()]
        } else {
            offerings
        }
    }

    fn audience(&self, index: &WordIndex) -> String {
        self.rules
            .audience_families
            .iter()
            .find(|family| index.contains_any(&family.keywords))
            .map(|family| family.name.clone())
            .unwrap_or_else(|| self.rules.default_audience.clone())
    }

    fn value_props(&self, blocks: &[ContentBlock]) -> Vec<String> {
        let mut seen = HashSet::new();
        let props: Vec<String> = blocks
            .iter()
            .flat_map(|b| sentences(b.text()))
            .filter(|s| WordIndex::new(s).contains_any(&self.rules.value_prop_markers))
            .filter(|s| seen.insert(s.to_lowercase()))
            .take(self.rules.max_value_props)
            .map(str::to_string)
            .collect();

        if props.is_empty() {
            vec![self.rules.fallback_value_prop.clone()]
        } else {
            props
        }
    }

    fn tone(&self, index: &WordIndex) -> Tone {
        let markers = &self.rules.tone_markers;
        let mut best = (Tone::PRIORITY[0], 0usize);
        for tone in Tone::PRIORITY {
            let keywords = match tone {
                Tone::Formal => &markers.formal,
                Tone::Technical => &markers.technical,
                Tone::Friendly => &markers.friendly,
                Tone::Casual => &markers.casual,
            };
            let count = index.count_all(keywords);
            debug!("Tone {}: {} marker hits", tone, count);
            // Strictly greater: on a tie the earlier tone keeps the lead.
            if count > best.1 {
                best = (tone, count);
            }
        }
        best.0
    }
}

impl Profiler for HeuristicProfiler {
    fn name(&self) -> &str {
        "heuristic"
    }

    fn profile(&self, blocks: &[ContentBlock]) -> Result<BusinessProfile, BrochureError> {
        if blocks.is_empty() {
            return Err(BrochureError::EmptyContent {
                input: "content blocks".to_string(),
            });
        }

        let index = WordIndex::from_texts(blocks.iter().map(|b| b.text()));
        let profile = BusinessProfile {
            positioning: self.positioning(blocks),
            offerings: self.offerings(blocks),
            audience: self.audience(&index),
            value_props: self.value_props(blocks),
            tone: self.tone(&index),
        };

        debug!(
            "Profile: audience={}, tone={}, {} offerings, {} value props",
            profile.audience,
            profile.tone,
            profile.offerings.len(),
            profile.value_props.len()
        );
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AudienceFamily, ToneMarkers};

    fn profile(blocks: &[ContentBlock]) -> BusinessProfile {
        HeuristicProfiler::default().profile(blocks).unwrap()
    }

    #[test]
    fn cloud_storage_page() {
        let p = profile(&[
            ContentBlock::heading("Acme Cloud", 1),
            ContentBlock::paragraph(
                "We offer the best cloud storage service, trusted by enterprises.",
            ),
        ]);
        assert_eq!(p.positioning, "Acme Cloud");
        assert_eq!(p.audience, "enterprise");
        assert_eq!(p.offerings.len(), 1);
        assert!(p.offerings[0].contains("cloud storage service"));
        assert!(p.value_props.iter().any(|v| v.contains("trusted")));
        assert!(matches!(p.tone, Tone::Technical | Tone::Formal));
    }

    #[test]
    fn coffee_shop_text() {
        let p = profile(&[
            ContentBlock::heading("Great Coffee", 1),
            ContentBlock::paragraph("We serve fast, friendly coffee daily."),
        ]);
        assert_eq!(p.positioning, "Great Coffee");
        assert_eq!(p.tone, Tone::Friendly);
        assert_eq!(p.audience, "general audience");
        // "serve" is not "service"; nothing qualifies as an offering.
        assert_eq!(p.offerings, ["Software products and related services"]);
        assert_eq!(p.value_props, ["We serve fast, friendly coffee daily."]);
    }

    #[test]
    fn fallbacks_fill_every_field() {
        let p = profile(&[ContentBlock::paragraph("Hello there")]);
        assert_eq!(p.positioning, ProfileRules::default().fallback_positioning);
        assert_eq!(p.offerings.len(), 1);
        assert_eq!(p.value_props.len(), 1);
        assert_eq!(p.audience, "general audience");
        assert_eq!(p.tone, Tone::Formal, "no markers at all means formal");
    }

    #[test]
    fn empty_blocks_are_rejected() {
        let err = HeuristicProfiler::default().profile(&[]).unwrap_err();
        assert!(matches!(err, BrochureError::EmptyContent { .. }), "{err}");
    }

    #[test]
    fn offerings_are_deduplicated_and_capped() {
        let mut blocks = vec![ContentBlock::heading("Acme", 1)];
        for i in 0..8 {
            blocks.push(ContentBlock::paragraph(format!("Product line number {i}")));
        }
        blocks.push(ContentBlock::paragraph("Product line number 0"));
        let p = profile(&blocks);
        assert_eq!(p.offerings.len(), 5);
        assert_eq!(p.offerings[0], "Product line number 0");
        assert_eq!(p.offerings[4], "Product line number 4");
    }

    #[test]
    fn offerings_ignore_headings() {
        let p = profile(&[
            ContentBlock::heading("Our Products", 2),
            ContentBlock::paragraph("Handmade pottery."),
        ]);
        assert_eq!(p.offerings, ["Software products and related services"]);
    }

    #[test]
    fn value_props_are_case_insensitively_unique() {
        let p = profile(&[
            ContentBlock::paragraph("Fast delivery. FAST DELIVERY. Reliable support!"),
            ContentBlock::paragraph("fast delivery."),
        ]);
        assert_eq!(p.value_props, ["Fast delivery.", "Reliable support!"]);
    }

    #[test]
    fn audience_family_order_decides() {
        let p = profile(&[ContentBlock::paragraph(
            "Built for investors and for every household.",
        )]);
        assert_eq!(p.audience, "consumer");
    }

    #[test]
    fn tone_tie_prefers_formal_then_technical() {
        let p = profile(&[ContentBlock::paragraph("Trusted cloud.")]);
        assert_eq!(p.tone, Tone::Formal);

        let p = profile(&[ContentBlock::paragraph("Happy cloud api.")]);
        assert_eq!(p.tone, Tone::Technical);

        let p = profile(&[ContentBlock::paragraph("Awesome community.")]);
        assert_eq!(p.tone, Tone::Friendly);
    }

    #[test]
    fn substitute_rules() {
        let rules = ProfileRules {
            audience_families: vec![AudienceFamily::new("gamers", &["game"])],
            default_audience: "everyone".into(),
            tone_markers: ToneMarkers {
                casual: vec!["game".into()],
                ..ToneMarkers::default()
            },
            max_value_props: 1,
            ..ProfileRules::default()
        };
        let profiler = HeuristicProfiler::new(rules);
        let p = profiler
            .profile(&[ContentBlock::paragraph(
                "Best games. Fast servers. Secure accounts.",
            )])
            .unwrap();
        assert_eq!(p.audience, "gamers");
        assert_eq!(p.tone, Tone::Casual);
        assert_eq!(p.value_props, ["Best games."]);
        assert_eq!(profiler.name(), "heuristic");
    }

    #[test]
    fn profiler_is_object_safe() {
        let boxed: Box<dyn Profiler> = Box::new(HeuristicProfiler::default());
        let p = boxed.profile(&[ContentBlock::heading("Acme", 1)]).unwrap();
        assert_eq!(p.positioning, "Acme");
    }
}
