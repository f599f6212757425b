//! CLI binary for site2brochure.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `GenerationConfig` and prints or writes the results.

use anyhow::{bail, Context, Result};
use clap::Parser;
use site2brochure::{
    generate, generate_to_dir, inspect, Audience, GenerationConfig, GradientKind, Input,
    InputKind, OutputFormat, Pattern,
};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Brochures from a saved web page, printed to stdout
  site2brochure site/index.html

  # Write brochures and background images to a directory
  site2brochure site/index.html -o out/

  # From a logo or screenshot
  site2brochure acme_cloud-logo.png -o out/

  # From a short pitch, inline or on stdin
  site2brochure --kind text "Great Coffee

  We serve fast, friendly coffee daily."
  cat pitch.txt | site2brochure --kind text -

  # Radial JPEG backgrounds at half size
  site2brochure --format jpeg --gradient radial --width 600 --height 848 page.html -o out/

  # Show what was extracted, nothing else
  site2brochure --inspect-only --json page.html

  # Full structured output (brochures, profile, base64 images)
  site2brochure --json page.html > output.json

OUTPUT FILES (-o DIR):
  brochure_customers.md   brochure_bg_customers.png
  brochure_investors.md   brochure_bg_investors.png
  brochure_partners.md    brochure_bg_partners.png

CONFIG FILE (--config):
  JSON with any subset of: extractor, profile, templates, background.
  Flags given on the command line override values from the file.

ENVIRONMENT VARIABLES:
  Every flag has a SITE2BROCHURE_* equivalent (e.g. SITE2BROCHURE_FORMAT=jpeg).
  RUST_LOG overrides the log filter chosen by -v / -q.
"#;

/// Turn a web page, an image or a short pitch into audience-tailored brochures.
#[derive(Parser, Debug)]
#[command(
    name = "site2brochure",
    version,
    about = "Turn a web page, an image or a short pitch into audience-tailored brochures",
    long_about = "Extracts the content of an HTML page, an image or free text, builds a business \
profile from it, and renders three brochures (customers, investors, partners), each with a \
generated gradient background image.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// HTML file, image file, text file, literal text, or `-` for stdin.
    input: String,

    /// Input kind; inferred from the file extension when omitted.
    #[arg(long, env = "SITE2BROCHURE_KIND", value_enum)]
    kind: Option<KindArg>,

    /// Write brochures and backgrounds into this directory instead of stdout.
    #[arg(short, long, env = "SITE2BROCHURE_OUTPUT")]
    output: Option<PathBuf>,

    /// Output structured JSON (GenerationOutput) instead of Markdown.
    #[arg(long, env = "SITE2BROCHURE_JSON")]
    json: bool,

    /// Print the extracted content blocks only; no brochures or images.
    #[arg(long)]
    inspect_only: bool,

    /// Background image format.
    #[arg(long, env = "SITE2BROCHURE_FORMAT", value_enum)]
    format: Option<FormatArg>,

    /// Background width in pixels (16–4096).
    #[arg(long, env = "SITE2BROCHURE_WIDTH",
          value_parser = clap::value_parser!(u32).range(16..=4096))]
    width: Option<u32>,

    /// Background height in pixels (16–4096).
    #[arg(long, env = "SITE2BROCHURE_HEIGHT",
          value_parser = clap::value_parser!(u32).range(16..=4096))]
    height: Option<u32>,

    /// Gradient shape.
    #[arg(long, env = "SITE2BROCHURE_GRADIENT", value_enum)]
    gradient: Option<GradientArg>,

    /// Overlay pattern.
    #[arg(long, env = "SITE2BROCHURE_PATTERN", value_enum)]
    pattern: Option<PatternArg>,

    /// JSON config file; flags override its values.
    #[arg(long, env = "SITE2BROCHURE_CONFIG")]
    config: Option<PathBuf>,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "SITE2BROCHURE_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "SITE2BROCHURE_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum KindArg {
    Html,
    Image,
    Text,
}

impl From<KindArg> for InputKind {
    fn from(v: KindArg) -> Self {
        match v {
            KindArg::Html => InputKind::Html,
            KindArg::Image => InputKind::Image,
            KindArg::Text => InputKind::Text,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum FormatArg {
    Png,
    Jpeg,
}

impl From<FormatArg> for OutputFormat {
    fn from(v: FormatArg) -> Self {
        match v {
            FormatArg::Png => OutputFormat::Png,
            FormatArg::Jpeg => OutputFormat::Jpeg,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum GradientArg {
    Linear,
    Radial,
}

impl From<GradientArg> for GradientKind {
    fn from(v: GradientArg) -> Self {
        match v {
            GradientArg::Linear => GradientKind::Linear,
            GradientArg::Radial => GradientKind::Radial,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum PatternArg {
    None,
    Dots,
    Lines,
}

impl From<PatternArg> for Pattern {
    fn from(v: PatternArg) -> Self {
        match v {
            PatternArg::None => Pattern::None,
            PatternArg::Dots => Pattern::Dots,
            PatternArg::Lines => Pattern::Lines,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || cli.json {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let config = build_config(&cli).await?;
    let input = resolve_input(&cli).await?;

    // ── Inspect-only mode ────────────────────────────────────────────────
    if cli.inspect_only {
        let extraction = inspect(&input, &config)
            .await
            .context("Failed to extract content")?;

        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&extraction)
                    .context("Failed to serialise extraction")?
            );
        } else {
            let meta = &extraction.metadata;
            println!("Source:          {}", meta.source);
            if let Some(ref t) = meta.title {
                println!("Title:           {}", t);
            }
            println!("Dominant words:  {}", meta.dominant_words.join(", "));
            if let Some(ref img) = meta.image {
                println!(
                    "Image:           {}x{} {}",
                    img.width, img.height, img.format
                );
                if let Some(color) = img.dominant_color {
                    println!("Dominant colour: {}", color.to_hex());
                }
            }
            println!("Blocks:          {}", extraction.blocks.len());
            for block in &extraction.blocks {
                match block.level() {
                    Some(level) => println!("  {} {}", dim(&format!("H{level}")), block.text()),
                    None => println!("  {} {}", dim("P "), block.text()),
                }
            }
        }
        return Ok(());
    }

    // ── Run generation ───────────────────────────────────────────────────
    if let Some(ref dir) = cli.output {
        let stats = generate_to_dir(&input, dir, &config)
            .await
            .context("Generation failed")?;

        if !cli.quiet {
            eprintln!(
                "{}  {} brochures + {} backgrounds  {}ms  →  {}",
                green("✔"),
                stats.brochure_count,
                stats.image_count,
                stats.total_duration_ms,
                bold(&dir.display().to_string()),
            );
            eprintln!(
                "   {} blocks, {} offerings, {} value props",
                dim(&stats.block_count.to_string()),
                dim(&stats.offering_count.to_string()),
                dim(&stats.value_prop_count.to_string()),
            );
        }
    } else {
        let output = generate(&input, &config)
            .await
            .context("Generation failed")?;

        if cli.json {
            let json =
                serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
            println!("{json}");
        } else {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            for audience in Audience::ALL {
                let Some(text) = output.brochure_text(audience) else {
                    continue;
                };
                write!(handle, "# {} Brochure\n\n{}\n", audience.label(), text)
                    .context("Failed to write to stdout")?;
            }

            if !cli.quiet {
                eprintln!(
                    "{}  {} brochures in {}ms  {}",
                    cyan("◆"),
                    output.stats.brochure_count,
                    output.stats.total_duration_ms,
                    dim("(backgrounds not written; use -o DIR or --json)"),
                );
            }
        }
    }

    Ok(())
}

/// Map CLI args to `GenerationConfig`, starting from `--config` if given.
async fn build_config(cli: &Cli) -> Result<GenerationConfig> {
    let base = match cli.config {
        Some(ref path) => {
            let json = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read config from {:?}", path))?;
            GenerationConfig::from_json(&json)
                .with_context(|| format!("Invalid config file {:?}", path))?
        }
        None => GenerationConfig::default(),
    };

    let width = cli.width.unwrap_or(base.background.width);
    let height = cli.height.unwrap_or(base.background.height);
    let mut builder = base.into_builder().canvas(width, height);

    if let Some(format) = cli.format {
        builder = builder.output_format(format.into());
    }
    if let Some(gradient) = cli.gradient {
        builder = builder.gradient(gradient.into());
    }
    if let Some(pattern) = cli.pattern {
        builder = builder.pattern(pattern.into());
    }

    builder.build().context("Invalid configuration")
}

/// Turn the positional argument into an [`Input`].
async fn resolve_input(cli: &Cli) -> Result<Input> {
    let kind = match cli.kind {
        Some(kind) => kind.into(),
        None => infer_kind(&cli.input)?,
    };

    Ok(match kind {
        InputKind::Html => Input::HtmlFile(PathBuf::from(&cli.input)),
        InputKind::Image => Input::ImageFile(PathBuf::from(&cli.input)),
        InputKind::Text => Input::Text(read_text(&cli.input).await?),
    })
}

/// Guess the input kind from the argument's extension.
///
/// An argument that is not an existing file and has no known extension is
/// taken as literal text.
fn infer_kind(arg: &str) -> Result<InputKind> {
    if arg == "-" {
        return Ok(InputKind::Text);
    }
    let path = Path::new(arg);
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("html" | "htm" | "xhtml") => Ok(InputKind::Html),
        Some("png" | "jpg" | "jpeg") => Ok(InputKind::Image),
        Some("txt" | "md" | "text") => Ok(InputKind::Text),
        _ if !path.is_file() => Ok(InputKind::Text),
        _ => bail!(
            "Cannot infer the input kind of {:?}; pass --kind html|image|text",
            arg
        ),
    }
}

/// Text input: stdin for `-`, the file's contents for an existing path,
/// otherwise the argument itself.
async fn read_text(arg: &str) -> Result<String> {
    if arg == "-" {
        let mut text = String::new();
        tokio::io::stdin()
            .read_to_string(&mut text)
            .await
            .context("Failed to read text from stdin")?;
        return Ok(text);
    }
    let path = Path::new(arg);
    if path.is_file() {
        return tokio::fs::read_to_string(arg)
            .await
            .with_context(|| format!("Failed to read text from {:?}", arg));
    }
    if !arg.contains(char::is_whitespace) && path.extension().is_some() {
        bail!("Text file not found: {:?}", arg);
    }
    Ok(arg.to_string())
}
