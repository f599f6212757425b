//! Result types returned by the generation entry points.

use crate::config::OutputFormat;
use crate::model::{Audience, Brochure, BusinessProfile, Color, ContentBlock};
use crate::pipeline::encode::encode_base64;
use crate::pipeline::input::InputKind;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// Coarse brightness class of an uploaded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Brightness {
    Bright,
    Balanced,
    Dark,
}

/// Basic facts read from an uploaded image.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageMetadata {
    pub width: u32,
    pub height: u32,
    /// Lower-case format name, e.g. `"png"`.
    pub format: String,
    /// Most common colour in a downsampled copy, if the pixels decoded.
    pub dominant_color: Option<Color>,
    pub brightness: Option<Brightness>,
}

/// Coarse metadata gathered alongside the content blocks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InputMetadata {
    pub source: InputKind,
    /// `<title>` text for HTML, otherwise the first heading.
    pub title: Option<String>,
    /// Most frequent meaningful words, most frequent first.
    pub dominant_words: Vec<String>,
    pub image: Option<ImageMetadata>,
}

/// What the extractor produced: ordered blocks plus metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Extraction {
    pub blocks: Vec<ContentBlock>,
    pub metadata: InputMetadata,
}

/// An encoded background image for one audience.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackgroundImage {
    pub audience: Audience,
    pub format: OutputFormat,
    pub width: u32,
    pub height: u32,
    /// Encoded image bytes; serialised as base64.
    #[serde(serialize_with = "as_base64")]
    pub bytes: Vec<u8>,
}

impl BackgroundImage {
    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    pub fn extension(&self) -> &'static str {
        self.format.extension()
    }

    /// `data:` URI suitable for inlining into HTML or CSS.
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type(), encode_base64(&self.bytes))
    }
}

fn as_base64<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&encode_base64(bytes))
}

/// Counts and per-stage timings for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerationStats {
    pub block_count: usize,
    pub offering_count: usize,
    pub value_prop_count: usize,
    pub brochure_count: usize,
    pub image_count: usize,
    pub extract_duration_ms: u64,
    pub profile_duration_ms: u64,
    pub render_duration_ms: u64,
    pub image_duration_ms: u64,
    pub total_duration_ms: u64,
}

/// Everything one successful run produces.
///
/// `brochures` and `images` always hold exactly one entry per [`Audience`].
#[derive(Debug, Clone, Serialize)]
pub struct GenerationOutput {
    pub metadata: InputMetadata,
    pub blocks: Vec<ContentBlock>,
    pub profile: BusinessProfile,
    pub brochures: BTreeMap<Audience, Brochure>,
    pub images: BTreeMap<Audience, BackgroundImage>,
    pub stats: GenerationStats,
}

impl GenerationOutput {
    /// Brochure text for `audience`.
    pub fn brochure_text(&self, audience: Audience) -> Option<&str> {
        self.brochures.get(&audience).map(|b| b.text.as_str())
    }
}
