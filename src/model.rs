//! Core data model shared by every pipeline stage.
//!
//! All types here are plain immutable values: stages build them once and hand
//! them forward, never mutating what an earlier stage produced.

use serde::{Deserialize, Serialize};
use std::fmt;

// ── Content blocks ───────────────────────────────────────────────────────────

/// Whether a block is a heading or body text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Heading,
    Paragraph,
}

/// A unit of extracted text, in document order.
///
/// Fields are private so a block cannot change after the extractor built it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentBlock {
    kind: BlockKind,
    text: String,
    level: Option<u8>,
}

impl ContentBlock {
    /// A heading block. `level` is clamped to 1–6.
    pub fn heading(text: impl Into<String>, level: u8) -> Self {
        Self {
            kind: BlockKind::Heading,
            text: text.into(),
            level: Some(level.clamp(1, 6)),
        }
    }

    /// A paragraph block (no level).
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self {
            kind: BlockKind::Paragraph,
            text: text.into(),
            level: None,
        }
    }

    pub fn kind(&self) -> BlockKind {
        self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn level(&self) -> Option<u8> {
        self.level
    }

    pub fn is_heading(&self) -> bool {
        self.kind == BlockKind::Heading
    }

    pub fn is_paragraph(&self) -> bool {
        self.kind == BlockKind::Paragraph
    }
}

// ── Business profile ─────────────────────────────────────────────────────────

/// Brand voice inferred from marker-word frequencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Formal,
    Casual,
    Technical,
    Friendly,
}

impl Tone {
    /// Tie-break order for the tone vote: earlier wins.
    pub const PRIORITY: [Tone; 4] = [Tone::Formal, Tone::Technical, Tone::Friendly, Tone::Casual];

    pub fn as_str(self) -> &'static str {
        match self {
            Tone::Formal => "formal",
            Tone::Casual => "casual",
            Tone::Technical => "technical",
            Tone::Friendly => "friendly",
        }
    }

    /// Capitalised label for display in brochures.
    pub fn label(self) -> &'static str {
        match self {
            Tone::Formal => "Formal",
            Tone::Casual => "Casual",
            Tone::Technical => "Technical",
            Tone::Friendly => "Friendly",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured summary of the business, built once per request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessProfile {
    pub positioning: String,
    pub offerings: Vec<String>,
    pub audience: String,
    pub value_props: Vec<String>,
    pub tone: Tone,
}

// ── Audiences & brochures ────────────────────────────────────────────────────

/// A rendering target for both brochure text and background palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Audience {
    Customers,
    Investors,
    Partners,
}

impl Audience {
    /// Every audience, in output order.
    pub const ALL: [Audience; 3] = [Audience::Customers, Audience::Investors, Audience::Partners];

    pub fn as_str(self) -> &'static str {
        match self {
            Audience::Customers => "customers",
            Audience::Investors => "investors",
            Audience::Partners => "partners",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Audience::Customers => "Customers",
            Audience::Investors => "Investors",
            Audience::Partners => "Partners",
        }
    }
}

impl fmt::Display for Audience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rendered brochure text for one audience.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brochure {
    pub audience: Audience,
    pub text: String,
}

// ── Colours & gradients ──────────────────────────────────────────────────────

/// An 8-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `#rrggbb` notation.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Perceived luminance in 0–255 (Rec. 601 weights).
    pub fn luminance(self) -> f32 {
        0.299 * self.r as f32 + 0.587 * self.g as f32 + 0.114 * self.b as f32
    }
}

/// A colour anchored at a relative position along the gradient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    pub position: f32,
    pub color: Color,
}

impl ColorStop {
    pub const fn new(position: f32, color: Color) -> Self {
        Self { position, color }
    }
}

/// Ordered colour stops defining the background for one audience.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientSpec {
    pub audience: Audience,
    pub stops: Vec<ColorStop>,
}
