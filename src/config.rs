//! Configuration types for brochure generation.
//!
//! Every rule the pipeline applies (noise blocklists, keyword families, tone
//! markers, palettes, templates) lives in an explicit, immutable config struct
//! that is handed to the stage that needs it. Nothing is a process-wide
//! singleton, so tests can run a stage against a substitute rule set.
//!
//! [`GenerationConfig`] groups the four stage configs and is built via
//! [`GenerationConfigBuilder`] or loaded from JSON with
//! [`GenerationConfig::from_json`]. Every sub-struct is `#[serde(default)]`, so
//! a config file only needs to name the fields it overrides.

use crate::error::BrochureError;
use crate::model::{Audience, Color, ColorStop};
use crate::pipeline::profile::Profiler;
use crate::templates::TemplateSet;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Smallest and largest accepted canvas edge, in pixels.
pub const MIN_CANVAS_EDGE: u32 = 16;
pub const MAX_CANVAS_EDGE: u32 = 4096;

/// Configuration for one generation run.
///
/// # Example
/// ```rust
/// use site2brochure::{GenerationConfig, OutputFormat};
///
/// let config = GenerationConfig::builder()
///     .canvas(600, 848)
///     .output_format(OutputFormat::Jpeg)
///     .max_offerings(3)
///     .build()
///     .unwrap();
/// assert_eq!(config.background.width, 600);
/// ```
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Rules for turning raw input into content blocks.
    pub extractor: ExtractorConfig,

    /// Keyword rules used by the built-in heuristic profiler.
    pub profile: ProfileRules,

    /// Per-audience brochure templates.
    pub templates: TemplateSet,

    /// Canvas, palette and encoding settings for background images.
    pub background: BackgroundConfig,

    /// Pre-constructed profiler. Takes precedence over the heuristic built
    /// from [`GenerationConfig::profile`].
    #[serde(skip)]
    pub profiler: Option<Arc<dyn Profiler>>,
}

impl fmt::Debug for GenerationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationConfig")
            .field("extractor", &self.extractor)
            .field("profile", &self.profile)
            .field("templates", &self.templates)
            .field("background", &self.background)
            .field("profiler", &self.profiler.as_ref().map(|p| p.name().to_string()))
            .finish()
    }
}

impl GenerationConfig {
    /// Create a new builder for `GenerationConfig`.
    pub fn builder() -> GenerationConfigBuilder {
        GenerationConfigBuilder {
            config: Self::default(),
        }
    }

    /// Continue building from this configuration, e.g. to apply CLI flags on
    /// top of a config file.
    pub fn into_builder(self) -> GenerationConfigBuilder {
        GenerationConfigBuilder { config: self }
    }

    /// Parse a (possibly partial) JSON config and validate it.
    pub fn from_json(json: &str) -> Result<Self, BrochureError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| BrochureError::InvalidConfig(format!("config JSON: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints the setters cannot enforce alone.
    pub fn validate(&self) -> Result<(), BrochureError> {
        let bg = &self.background;
        for (name, edge) in [("width", bg.width), ("height", bg.height)] {
            if !(MIN_CANVAS_EDGE..=MAX_CANVAS_EDGE).contains(&edge) {
                return Err(BrochureError::InvalidConfig(format!(
                    "canvas {name} must be {MIN_CANVAS_EDGE}–{MAX_CANVAS_EDGE}, got {edge}"
                )));
            }
        }
        if bg.jpeg_quality == 0 || bg.jpeg_quality > 100 {
            return Err(BrochureError::InvalidConfig(format!(
                "JPEG quality must be 1–100, got {}",
                bg.jpeg_quality
            )));
        }
        if self.profile.max_offerings == 0 || self.profile.max_value_props == 0 {
            return Err(BrochureError::InvalidConfig(
                "max_offerings and max_value_props must be ≥ 1".into(),
            ));
        }
        if self.extractor.min_block_chars == 0 {
            return Err(BrochureError::InvalidConfig(
                "min_block_chars must be ≥ 1".into(),
            ));
        }
        if let Some(family) = self
            .profile
            .audience_families
            .iter()
            .find(|f| f.name.trim().is_empty())
        {
            return Err(BrochureError::InvalidConfig(format!(
                "audience family with keywords {:?} has an empty name",
                family.keywords
            )));
        }
        self.templates.validate()
    }
}

/// Builder for [`GenerationConfig`].
#[derive(Debug)]
pub struct GenerationConfigBuilder {
    config: GenerationConfig,
}

impl GenerationConfigBuilder {
    pub fn extractor(mut self, extractor: ExtractorConfig) -> Self {
        self.config.extractor = extractor;
        self
    }

    pub fn profile_rules(mut self, rules: ProfileRules) -> Self {
        self.config.profile = rules;
        self
    }

    pub fn templates(mut self, templates: TemplateSet) -> Self {
        self.config.templates = templates;
        self
    }

    pub fn background(mut self, background: BackgroundConfig) -> Self {
        self.config.background = background;
        self
    }

    pub fn profiler(mut self, profiler: Arc<dyn Profiler>) -> Self {
        self.config.profiler = Some(profiler);
        self
    }

    pub fn canvas(mut self, width: u32, height: u32) -> Self {
        self.config.background.width = width.clamp(MIN_CANVAS_EDGE, MAX_CANVAS_EDGE);
        self.config.background.height = height.clamp(MIN_CANVAS_EDGE, MAX_CANVAS_EDGE);
        self
    }

    pub fn gradient(mut self, kind: GradientKind) -> Self {
        self.config.background.gradient = kind;
        self
    }

    pub fn pattern(mut self, pattern: Pattern) -> Self {
        self.config.background.pattern = pattern;
        self
    }

    pub fn brightness(mut self, factor: f32) -> Self {
        self.config.background.brightness = factor.clamp(0.5, 1.5);
        self
    }

    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.config.background.format = format;
        self
    }

    pub fn jpeg_quality(mut self, quality: u8) -> Self {
        self.config.background.jpeg_quality = quality.clamp(1, 100);
        self
    }

    pub fn min_block_chars(mut self, n: usize) -> Self {
        self.config.extractor.min_block_chars = n.max(1);
        self
    }

    pub fn heading_max_chars(mut self, n: usize) -> Self {
        self.config.extractor.heading_max_chars = n.max(1);
        self
    }

    pub fn max_offerings(mut self, n: usize) -> Self {
        self.config.profile.max_offerings = n.max(1);
        self
    }

    pub fn max_value_props(mut self, n: usize) -> Self {
        self.config.profile.max_value_props = n.max(1);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<GenerationConfig, BrochureError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

// ── Extractor ────────────────────────────────────────────────────────────────

/// Rules for the content extractor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Tags whose whole subtree is discarded.
    pub noise_tags: Vec<String>,

    /// Words that mark an element as noise when a token of its `id` or
    /// `class` attribute starts with one (`cookie-banner`, `adsBox`).
    pub noise_attribute_keywords: Vec<String>,

    /// Tags whose text becomes a paragraph block.
    pub paragraph_tags: Vec<String>,

    /// Blocks containing any of these phrases (case-insensitive) are dropped.
    pub boilerplate_phrases: Vec<String>,

    /// Minimum trimmed length for a block to be kept. Default: 2.
    pub min_block_chars: usize,

    /// Text input: lines at least this long are never headings. Default: 60.
    pub heading_max_chars: usize,

    /// How many dominant words to report in the metadata. Default: 5.
    pub dominant_word_count: usize,

    /// Words ignored when counting dominant words.
    pub stopwords: Vec<String>,

    /// Industry terms looked for in an image's file name.
    pub industry_keywords: Vec<String>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            noise_tags: strings(&[
                "script", "style", "noscript", "nav", "footer", "form", "aside",
            ]),
            noise_attribute_keywords: strings(&[
                "cookie",
                "banner",
                "consent",
                "gdpr",
                "newsletter",
                "signup",
                "subscribe",
                "modal",
                "popup",
                "promo",
                "advert",
                "ads",
                "legal",
                "terms",
                "privacy",
            ]),
            paragraph_tags: strings(&["p", "li", "blockquote"]),
            boilerplate_phrases: strings(&[
                "all rights reserved",
                "terms of use",
                "privacy policy",
                "cookie policy",
            ]),
            min_block_chars: 2,
            heading_max_chars: 60,
            dominant_word_count: 5,
            stopwords: strings(&[
                "the", "and", "for", "with", "our", "you", "your", "are", "that", "this",
                "from", "have", "has", "was", "were", "will", "can", "all", "not", "but",
                "its", "into", "more", "than", "they", "them", "their", "who", "what",
                "when", "where", "which", "while", "about", "over", "also", "just", "been",
                "being", "each", "only", "very", "out", "use", "how", "any", "per", "via",
            ]),
            industry_keywords: strings(&[
                "company", "business", "startup", "enterprise", "tech", "ai", "cloud",
                "software", "service", "solutions", "platform", "app", "digital",
            ]),
        }
    }
}

// ── Profiler ─────────────────────────────────────────────────────────────────

/// A named group of keywords that identifies a target audience.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudienceFamily {
    pub name: String,
    pub keywords: Vec<String>,
}

impl AudienceFamily {
    pub fn new(name: impl Into<String>, keywords: &[&str]) -> Self {
        Self {
            name: name.into(),
            keywords: strings(keywords),
        }
    }
}

/// Marker words voting for each tone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToneMarkers {
    pub formal: Vec<String>,
    pub technical: Vec<String>,
    pub friendly: Vec<String>,
    pub casual: Vec<String>,
}

impl Default for ToneMarkers {
    fn default() -> Self {
        Self {
            formal: strings(&[
                "trusted",
                "professional",
                "enterprise",
                "compliance",
                "excellence",
                "committed",
                "expertise",
                "industry",
                "regulated",
                "governance",
                "established",
                "comprehensive",
            ]),
            technical: strings(&[
                "cloud",
                "storage",
                "api",
                "infrastructure",
                "data",
                "software",
                "deploy",
                "integration",
                "scalable",
                "latency",
                "automation",
                "machine learning",
            ]),
            friendly: strings(&[
                "friendly",
                "welcome",
                "happy",
                "together",
                "community",
                "love",
                "enjoy",
                "care",
                "family",
                "smile",
                "warm",
            ]),
            casual: strings(&[
                "hey", "awesome", "cool", "fun", "easy", "chill", "stuff", "vibe", "grab",
                "yum",
            ]),
        }
    }
}

/// Keyword rules for [`crate::pipeline::profile::HeuristicProfiler`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileRules {
    /// Positioning used when the content has no heading.
    pub fallback_positioning: String,

    /// A paragraph mentioning any of these is an offering.
    pub offering_keywords: Vec<String>,

    /// Maximum offerings kept. Default: 5.
    pub max_offerings: usize,

    /// Offering used when no paragraph qualifies.
    pub fallback_offering: String,

    /// Audience families, checked in order; the first with a match wins.
    pub audience_families: Vec<AudienceFamily>,

    /// Audience used when no family matches.
    pub default_audience: String,

    /// A sentence containing any of these is a value proposition.
    pub value_prop_markers: Vec<String>,

    /// Maximum value propositions kept. Default: 5.
    pub max_value_props: usize,

    /// Value proposition used when no sentence qualifies.
    pub fallback_value_prop: String,

    pub tone_markers: ToneMarkers,
}

impl Default for ProfileRules {
    fn default() -> Self {
        Self {
            fallback_positioning: "The company provides pragmatic solutions for teams that want \
                the benefits of modern tooling without the complexity of running it themselves."
                .to_string(),
            offering_keywords: strings(&["product", "service", "solution", "platform", "tool"]),
            max_offerings: 5,
            fallback_offering: "Software products and related services".to_string(),
            audience_families: vec![
                AudienceFamily::new(
                    "consumer",
                    &[
                        "consumer",
                        "shopper",
                        "household",
                        "families",
                        "individuals",
                        "homeowner",
                        "parents",
                    ],
                ),
                AudienceFamily::new(
                    "enterprise",
                    &[
                        "enterprise",
                        "business",
                        "b2b",
                        "saas",
                        "corporate",
                        "organization",
                        "organisation",
                    ],
                ),
                AudienceFamily::new(
                    "investor",
                    &[
                        "investor",
                        "investment",
                        "funding",
                        "shareholder",
                        "venture",
                        "fundraising",
                    ],
                ),
            ],
            default_audience: "general audience".to_string(),
            value_prop_markers: strings(&[
                "best",
                "fast",
                "save",
                "saving",
                "trusted",
                "reliable",
                "secure",
                "security",
                "proven",
                "affordable",
                "guarantee",
                "award",
            ]),
            max_value_props: 5,
            fallback_value_prop: "Focused on reliable delivery and practical outcomes".to_string(),
            tone_markers: ToneMarkers::default(),
        }
    }
}

// ── Background ───────────────────────────────────────────────────────────────

/// Shape of the background gradient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradientKind {
    /// Top-to-bottom blend (default).
    #[default]
    Linear,
    /// Centre-to-corner blend.
    Radial,
}

/// Subtle overlay drawn over the gradient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pattern {
    None,
    /// Faint white dots on a 50 px grid (default).
    #[default]
    Dots,
    /// Faint white vertical lines every 80 px.
    Lines,
}

/// Encoding of the generated background image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Lossless; byte-identical across runs (default).
    #[default]
    Png,
    Jpeg,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpg",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            OutputFormat::Png => "image/png",
            OutputFormat::Jpeg => "image/jpeg",
        }
    }
}

/// Colour stops per audience.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palettes {
    /// Warm: apricot, peach, rose.
    pub customers: Vec<ColorStop>,
    /// Cool and confident: sky, steel, slate.
    pub investors: Vec<ColorStop>,
    /// Neutral and balanced: warm grey, sage, stone.
    pub partners: Vec<ColorStop>,
}

impl Palettes {
    pub fn for_audience(&self, audience: Audience) -> &[ColorStop] {
        match audience {
            Audience::Customers => &self.customers,
            Audience::Investors => &self.investors,
            Audience::Partners => &self.partners,
        }
    }
}

impl Default for Palettes {
    fn default() -> Self {
        Self {
            customers: vec![
                ColorStop::new(0.0, Color::new(255, 244, 230)),
                ColorStop::new(0.55, Color::new(255, 218, 185)),
                ColorStop::new(1.0, Color::new(250, 200, 190)),
            ],
            investors: vec![
                ColorStop::new(0.0, Color::new(240, 246, 255)),
                ColorStop::new(0.5, Color::new(200, 222, 245)),
                ColorStop::new(1.0, Color::new(170, 190, 220)),
            ],
            partners: vec![
                ColorStop::new(0.0, Color::new(245, 244, 240)),
                ColorStop::new(0.5, Color::new(225, 232, 220)),
                ColorStop::new(1.0, Color::new(210, 205, 195)),
            ],
        }
    }
}

/// Settings for the background image generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundConfig {
    /// Canvas width in pixels. Default: 1200.
    pub width: u32,

    /// Canvas height in pixels. Default: 1697 (A4 ratio at 1200 px wide).
    pub height: u32,

    pub gradient: GradientKind,

    pub pattern: Pattern,

    /// Multiplier applied to every channel after drawing. Default: 1.05.
    pub brightness: f32,

    pub format: OutputFormat,

    /// JPEG quality, 1–100. Default: 85. Ignored for PNG.
    pub jpeg_quality: u8,

    pub palettes: Palettes,

    /// Used when an audience's palette has fewer than two stops.
    pub default_palette: Vec<ColorStop>,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 1697,
            gradient: GradientKind::default(),
            pattern: Pattern::default(),
            brightness: 1.05,
            format: OutputFormat::default(),
            jpeg_quality: 85,
            palettes: Palettes::default(),
            default_palette: vec![
                ColorStop::new(0.0, Color::new(250, 250, 250)),
                ColorStop::new(1.0, Color::new(240, 240, 240)),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        GenerationConfig::default().validate().expect("defaults are valid");
    }

    #[test]
    fn builder_clamps_canvas() {
        let config = GenerationConfig::builder()
            .canvas(1, 100_000)
            .build()
            .unwrap();
        assert_eq!(config.background.width, MIN_CANVAS_EDGE);
        assert_eq!(config.background.height, MAX_CANVAS_EDGE);
    }

    #[test]
    fn builder_clamps_counts_to_one() {
        let config = GenerationConfig::builder()
            .max_offerings(0)
            .max_value_props(0)
            .min_block_chars(0)
            .build()
            .unwrap();
        assert_eq!(config.profile.max_offerings, 1);
        assert_eq!(config.profile.max_value_props, 1);
        assert_eq!(config.extractor.min_block_chars, 1);
    }

    #[test]
    fn from_json_partial_override() {
        let config = GenerationConfig::from_json(
            r#"{ "background": { "width": 300, "format": "jpeg" },
                 "profile": { "default_audience": "everyone" } }"#,
        )
        .unwrap();
        assert_eq!(config.background.width, 300);
        assert_eq!(config.background.height, 1697);
        assert_eq!(config.background.format, OutputFormat::Jpeg);
        assert_eq!(config.profile.default_audience, "everyone");
        assert_eq!(config.profile.max_offerings, 5);
        assert!(config.profile.offering_keywords.contains(&"service".to_string()));
    }

    #[test]
    fn into_builder_keeps_existing_values() {
        let base = GenerationConfig::from_json(r#"{ "background": { "pattern": "lines" } }"#)
            .unwrap();
        let config = base.into_builder().canvas(400, 500).build().unwrap();
        assert_eq!(config.background.pattern, Pattern::Lines);
        assert_eq!((config.background.width, config.background.height), (400, 500));
    }

    #[test]
    fn from_json_rejects_bad_canvas() {
        let err = GenerationConfig::from_json(r#"{ "background": { "width": 5 } }"#).unwrap_err();
        assert!(matches!(err, BrochureError::InvalidConfig(_)), "{err}");
    }

    #[test]
    fn from_json_rejects_section_that_would_render_empty() {
        let json = r#"{ "templates": { "customers": {
            "headline": "Hi",
            "sections": [
                { "title": "Why Choose Us", "fields": ["value_props"], "limit": 0, "fallback": "" }
            ]
        } } }"#;
        let err = GenerationConfig::from_json(json).unwrap_err();
        assert!(matches!(err, BrochureError::InvalidConfig(_)), "{err}");
        assert!(err.to_string().contains("customers"), "{err}");
    }

    #[test]
    fn from_json_accepts_complete_custom_template() {
        let json = r#"{ "templates": { "customers": {
            "headline": "Hi",
            "sections": [
                { "title": "Why Choose Us", "fields": ["value_props"], "limit": 2,
                  "fallback": "We care." }
            ]
        } } }"#;
        let config = GenerationConfig::from_json(json).unwrap();
        assert_eq!(config.templates.customers.sections[0].limit, 2);
    }

    #[test]
    fn from_json_rejects_malformed() {
        let err = GenerationConfig::from_json("{ not json").unwrap_err();
        assert!(err.to_string().contains("config JSON"));
    }

    #[test]
    fn empty_family_name_rejected() {
        let mut rules = ProfileRules::default();
        rules.audience_families.push(AudienceFamily::new(" ", &["x"]));
        let err = GenerationConfig::builder()
            .profile_rules(rules)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("empty name"));
    }

    #[test]
    fn palettes_cover_every_audience() {
        let palettes = Palettes::default();
        for audience in Audience::ALL {
            assert!(palettes.for_audience(audience).len() >= 2);
        }
    }

    #[test]
    fn output_format_metadata() {
        assert_eq!(OutputFormat::Png.extension(), "png");
        assert_eq!(OutputFormat::Jpeg.extension(), "jpg");
        assert_eq!(OutputFormat::Jpeg.mime_type(), "image/jpeg");
    }
}
