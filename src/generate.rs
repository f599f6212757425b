//! Generation entry points.
//!
//! One request runs the whole pipeline once: load → extract → profile →
//! render ×3 → background ×3. Everything up to rendering is cheap and runs
//! inline; the three background canvases are CPU-bound and run concurrently
//! on tokio's blocking pool. There is no shared mutable state between
//! requests, so concurrent calls need no coordination.

use crate::config::{BackgroundConfig, GenerationConfig};
use crate::error::BrochureError;
use crate::model::{Audience, Brochure, BusinessProfile};
use crate::output::{BackgroundImage, Extraction, GenerationOutput, GenerationStats};
use crate::pipeline::profile::{HeuristicProfiler, Profiler};
use crate::pipeline::{
    background, extract,
    input::{self, Input},
    render,
};
use futures::future::try_join_all;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Generate brochures and backgrounds for every audience.
///
/// This is the primary entry point for the library.
///
/// # Returns
/// A [`GenerationOutput`] with exactly one brochure and one background image
/// per [`Audience`].
///
/// # Errors
/// * Input errors (missing file, unreadable image, unknown format)
/// * [`BrochureError::EmptyContent`] when nothing usable was extracted
/// * [`BrochureError::InvalidConfig`] when `config` fails validation
/// * [`BrochureError::ProfilerFailed`] when an injected profiler misbehaves
///
/// No partial output is ever returned.
///
/// # Example
/// ```rust,no_run
/// use site2brochure::{generate, Audience, GenerationConfig, Input};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let input = Input::HtmlFile("site/index.html".into());
/// let output = generate(&input, &GenerationConfig::default()).await?;
/// println!("{}", output.brochure_text(Audience::Investors).unwrap_or_default());
/// # Ok(())
/// # }
/// ```
pub async fn generate(
    input: &Input,
    config: &GenerationConfig,
) -> Result<GenerationOutput, BrochureError> {
    let total_start = Instant::now();
    config.validate()?;
    info!("Starting generation: {} input", input.kind());

    // ── Step 1: Load input ───────────────────────────────────────────────
    let loaded = input::load(input).await?;

    // ── Step 2: Extract content blocks ───────────────────────────────────
    let extract_start = Instant::now();
    let Extraction { blocks, metadata } = extract::extract(&loaded, &config.extractor)?;
    let extract_duration_ms = extract_start.elapsed().as_millis() as u64;

    // ── Step 3: Profile the business ─────────────────────────────────────
    let profile_start = Instant::now();
    let profiler = resolve_profiler(config);
    let profile = profiler.profile(&blocks)?;
    check_profile(profiler.name(), &profile)?;
    let profile_duration_ms = profile_start.elapsed().as_millis() as u64;
    info!(
        "Profiled with '{}': audience={}, tone={}",
        profiler.name(),
        profile.audience,
        profile.tone
    );

    // ── Step 4: Render brochures ─────────────────────────────────────────
    let render_start = Instant::now();
    let brochures: BTreeMap<Audience, Brochure> = Audience::ALL
        .into_iter()
        .map(|audience| {
            (
                audience,
                render::render(&profile, audience, &config.templates),
            )
        })
        .collect();
    let render_duration_ms = render_start.elapsed().as_millis() as u64;

    // ── Step 5: Generate backgrounds ─────────────────────────────────────
    let image_start = Instant::now();
    let images = generate_backgrounds(&config.background).await?;
    let image_duration_ms = image_start.elapsed().as_millis() as u64;
    info!(
        "Generated {} backgrounds in {}ms",
        images.len(),
        image_duration_ms
    );

    // ── Step 6: Compute stats ────────────────────────────────────────────
    let stats = GenerationStats {
        block_count: blocks.len(),
        offering_count: profile.offerings.len(),
        value_prop_count: profile.value_props.len(),
        brochure_count: brochures.len(),
        image_count: images.len(),
        extract_duration_ms,
        profile_duration_ms,
        render_duration_ms,
        image_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    info!(
        "Generation complete: {} blocks → {} brochures, {}ms total",
        stats.block_count, stats.brochure_count, stats.total_duration_ms
    );

    Ok(GenerationOutput {
        metadata,
        blocks,
        profile,
        brochures,
        images,
        stats,
    })
}

/// Synchronous wrapper around [`generate`].
///
/// Creates a temporary tokio runtime internally. Do not call from inside an
/// async context.
pub fn generate_sync(
    input: &Input,
    config: &GenerationConfig,
) -> Result<GenerationOutput, BrochureError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| BrochureError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(generate(input, config))
}

/// Generate and write everything into `dir`.
///
/// Writes `brochure_<audience>.md` (with a `# <Audience> Brochure` title
/// line) and `brochure_bg_<audience>.<ext>` for each audience. Each file is
/// written to a temp path and renamed, so readers never see a partial file.
pub async fn generate_to_dir(
    input: &Input,
    dir: impl AsRef<Path>,
    config: &GenerationConfig,
) -> Result<GenerationStats, BrochureError> {
    let output = generate(input, config).await?;
    let dir = dir.as_ref();

    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| BrochureError::OutputWriteFailed {
            path: dir.to_path_buf(),
            source: e,
        })?;

    for (audience, brochure) in &output.brochures {
        let path = brochure_path(dir, *audience);
        let text = format!("# {} Brochure\n\n{}", audience.label(), brochure.text);
        write_atomic(&path, text.as_bytes()).await?;
        debug!("Wrote {}", path.display());
    }
    for (audience, image) in &output.images {
        let path = background_path(dir, *audience, image.extension());
        write_atomic(&path, &image.bytes).await?;
        debug!("Wrote {}", path.display());
    }

    Ok(output.stats)
}

/// Load and extract only; no profiling, rendering or image work.
pub async fn inspect(input: &Input, config: &GenerationConfig) -> Result<Extraction, BrochureError> {
    let loaded = input::load(input).await?;
    extract::extract(&loaded, &config.extractor)
}

/// `<dir>/brochure_<audience>.md`
pub fn brochure_path(dir: &Path, audience: Audience) -> PathBuf {
    dir.join(format!("brochure_{}.md", audience))
}

/// `<dir>/brochure_bg_<audience>.<ext>`
pub fn background_path(dir: &Path, audience: Audience, extension: &str) -> PathBuf {
    dir.join(format!("brochure_bg_{}.{}", audience, extension))
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// The injected profiler if there is one, else the heuristic built from
/// `config.profile`.
fn resolve_profiler(config: &GenerationConfig) -> Arc<dyn Profiler> {
    match &config.profiler {
        Some(profiler) => Arc::clone(profiler),
        None => Arc::new(HeuristicProfiler::new(config.profile.clone())),
    }
}

/// Reject a profile that leaves a required field empty.
fn check_profile(profiler: &str, profile: &BusinessProfile) -> Result<(), BrochureError> {
    let empty = if profile.positioning.trim().is_empty() {
        Some("positioning")
    } else if profile.offerings.is_empty() {
        Some("offerings")
    } else if profile.audience.trim().is_empty() {
        Some("audience")
    } else if profile.value_props.is_empty() {
        Some("value_props")
    } else {
        None
    };
    match empty {
        Some(field) => Err(BrochureError::ProfilerFailed {
            profiler: profiler.to_string(),
            detail: format!("returned an empty {field}"),
        }),
        None => Ok(()),
    }
}

/// Render all three backgrounds concurrently on the blocking pool.
async fn generate_backgrounds(
    config: &BackgroundConfig,
) -> Result<BTreeMap<Audience, BackgroundImage>, BrochureError> {
    let config = Arc::new(config.clone());
    let tasks = Audience::ALL.map(|audience| {
        let config = Arc::clone(&config);
        async move {
            tokio::task::spawn_blocking(move || {
                background::generate_background(audience, &config)
            })
            .await
            .map_err(|e| {
                BrochureError::Internal(format!("{} background task panicked: {}", audience, e))
            })?
        }
    });

    let images = try_join_all(tasks).await?;
    Ok(images.into_iter().map(|img| (img.audience, img)).collect())
}

/// Write `bytes` to `path` via a sibling temp file and rename.
async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), BrochureError> {
    let write_err = |e| BrochureError::OutputWriteFailed {
        path: path.to_path_buf(),
        source: e,
    };

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);

    if let Err(e) = tokio::fs::write(&tmp_path, bytes).await {
        let _ = tokio::fs::remove_file(&tmp_path).await;
        return Err(write_err(e));
    }
    if let Err(e) = tokio::fs::rename(&tmp_path, path).await {
        let _ = tokio::fs::remove_file(&tmp_path).await;
        return Err(write_err(e));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ContentBlock, Tone};

    struct Blank;

    impl Profiler for Blank {
        fn name(&self) -> &str {
            "blank"
        }

        fn profile(&self, _: &[ContentBlock]) -> Result<BusinessProfile, BrochureError> {
            Ok(BusinessProfile {
                positioning: "Acme".into(),
                offerings: vec![],
                audience: "everyone".into(),
                value_props: vec!["Fast".into()],
                tone: Tone::Casual,
            })
        }
    }

    #[test]
    fn output_paths() {
        let dir = Path::new("out");
        assert_eq!(
            brochure_path(dir, Audience::Investors),
            Path::new("out/brochure_investors.md")
        );
        assert_eq!(
            background_path(dir, Audience::Partners, "jpg"),
            Path::new("out/brochure_bg_partners.jpg")
        );
    }

    #[test]
    fn injected_profiler_takes_precedence() {
        let config = GenerationConfig::builder()
            .profiler(Arc::new(Blank))
            .build()
            .unwrap();
        assert_eq!(resolve_profiler(&config).name(), "blank");
        assert_eq!(
            resolve_profiler(&GenerationConfig::default()).name(),
            "heuristic"
        );
    }

    #[test]
    fn empty_profile_field_is_profiler_failure() {
        let profile = Blank.profile(&[]).unwrap();
        let err = check_profile("blank", &profile).unwrap_err();
        assert!(
            matches!(err, BrochureError::ProfilerFailed { ref detail, .. } if detail.contains("offerings")),
            "{err}"
        );
    }

    #[tokio::test]
    async fn write_atomic_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("brochure_customers.md");
        write_atomic(&path, b"hello").await.unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"hello");
        assert!(!dir.path().join("brochure_customers.md.tmp").exists());
    }

    #[tokio::test]
    async fn failed_rename_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        // A non-empty directory at the target path makes the rename fail.
        let path = dir.path().join("brochure_customers.md");
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("keep"), b"x").unwrap();

        let err = write_atomic(&path, b"hello").await.unwrap_err();
        assert!(matches!(err, BrochureError::OutputWriteFailed { .. }), "{err}");
        assert!(!dir.path().join("brochure_customers.md.tmp").exists());
        assert!(path.join("keep").exists());
    }

    #[tokio::test]
    async fn write_atomic_reports_output_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("file.md");
        let err = write_atomic(&path, b"x").await.unwrap_err();
        assert!(matches!(err, BrochureError::OutputWriteFailed { .. }), "{err}");
    }
}
