//! # site2brochure
//!
//! Turn a company's web page, a logo or a short pitch into three marketing
//! brochures (customers, investors, partners), each with a matching
//! background image.
//!
//! ## Pipeline Overview
//!
//! ```text
//! HTML / image / text
//!  │
//!  ├─ 1. Input     read the file or take the bytes as given
//!  ├─ 2. Extract   ordered heading/paragraph blocks + metadata
//!  ├─ 3. Profile   positioning, offerings, audience, value props, tone
//!  ├─ 4. Render    one Markdown-subset brochure per audience
//!  └─ 5. Paint     one gradient background per audience (spawn_blocking)
//! ```
//!
//! Every stage is deterministic: the same input and configuration always
//! produce the same brochures and byte-identical PNG backgrounds.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use site2brochure::{generate, Audience, GenerationConfig, Input};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let input = Input::Text("Great Coffee\n\nWe serve fast, friendly coffee daily.".into());
//!     let output = generate(&input, &GenerationConfig::default()).await?;
//!     for audience in Audience::ALL {
//!         println!("{}", output.brochure_text(audience).unwrap_or_default());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Plugging in a profiler
//!
//! The keyword heuristics live behind the [`Profiler`] trait. Any
//! `Send + Sync` implementation can be injected with
//! [`GenerationConfigBuilder::profiler`]; extraction and rendering are
//! unaffected.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `site2brochure` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! site2brochure = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod generate;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod templates;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{
    AudienceFamily, BackgroundConfig, ExtractorConfig, GenerationConfig, GenerationConfigBuilder,
    GradientKind, OutputFormat, Palettes, Pattern, ProfileRules, ToneMarkers,
};
pub use error::{BrochureError, ErrorKind};
pub use generate::{generate, generate_sync, generate_to_dir, inspect};
pub use model::{
    Audience, BlockKind, Brochure, BusinessProfile, Color, ColorStop, ContentBlock, GradientSpec,
    Tone,
};
pub use output::{
    BackgroundImage, Brightness, Extraction, GenerationOutput, GenerationStats, ImageMetadata,
    InputMetadata,
};
pub use pipeline::input::{Input, InputKind};
pub use pipeline::profile::{HeuristicProfiler, Profiler};
pub use templates::{
    BrochureTemplate, ClosingSection, ItemStyle, ProfileField, SectionTemplate, TemplateSet,
};
