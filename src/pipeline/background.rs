//! Background image generation: audience → gradient canvas → encoded bytes.
//!
//! Three steps, each public so they can be tested and reused separately:
//!
//! 1. [`gradient_spec`]: pick and sanitise the audience's colour stops.
//! 2. [`render_gradient`]: paint the gradient, pattern overlay and
//!    brightness boost onto an `RgbImage`. Pure, so the same spec and config
//!    always give the same pixels.
//! 3. [`generate_background`]: steps 1–2 plus encoding.
//!
//! Painting a full 1200×1697 canvas is CPU-bound; the orchestrator runs one
//! call per audience on tokio's blocking pool.

use crate::config::{BackgroundConfig, GradientKind, Pattern};
use crate::error::BrochureError;
use crate::model::{Audience, Color, ColorStop, GradientSpec};
use crate::output::BackgroundImage;
use crate::pipeline::encode::encode_image;
use image::{Rgb, RgbImage};
use tracing::{debug, warn};

/// Grid spacing and radius of the dot overlay.
const DOT_SPACING: u32 = 50;
const DOT_RADIUS: f32 = 1.5;
/// Opacity of a dot, out of 255.
const DOT_ALPHA: u8 = 15;

/// Spacing and opacity of the line overlay.
const LINE_SPACING: u32 = 80;
const LINE_ALPHA: u8 = 12;

/// Last-resort palette when both the audience palette and the configured
/// default are unusable.
const FALLBACK_STOPS: [ColorStop; 2] = [
    ColorStop::new(0.0, Color::new(250, 250, 250)),
    ColorStop::new(1.0, Color::new(240, 240, 240)),
];

/// Colour stops for `audience`, clamped to `[0, 1]` and sorted by position.
///
/// Palettes with fewer than two usable stops fall back to
/// [`BackgroundConfig::default_palette`].
pub fn gradient_spec(audience: Audience, config: &BackgroundConfig) -> GradientSpec {
    let mut stops = sanitise(config.palettes.for_audience(audience));
    if stops.len() < 2 {
        warn!("{} palette has fewer than 2 stops; using default palette", audience);
        stops = sanitise(&config.default_palette);
    }
    if stops.len() < 2 {
        stops = FALLBACK_STOPS.to_vec();
    }
    GradientSpec { audience, stops }
}

fn sanitise(stops: &[ColorStop]) -> Vec<ColorStop> {
    let mut out: Vec<ColorStop> = stops
        .iter()
        .filter(|s| s.position.is_finite())
        .map(|s| ColorStop::new(s.position.clamp(0.0, 1.0), s.color))
        .collect();
    out.sort_by(|a, b| a.position.total_cmp(&b.position));
    out
}

/// Paint `spec` onto a `config.width` × `config.height` canvas.
pub fn render_gradient(spec: &GradientSpec, config: &BackgroundConfig) -> RgbImage {
    let (width, height) = (config.width.max(1), config.height.max(1));
    let mut img = match config.gradient {
        GradientKind::Linear => {
            let span = (height - 1).max(1) as f32;
            let mut img = RgbImage::new(width, height);
            for y in 0..height {
                let pixel = to_rgb(color_at(&spec.stops, y as f32 / span));
                for x in 0..width {
                    img.put_pixel(x, y, pixel);
                }
            }
            img
        }
        GradientKind::Radial => {
            let cx = (width - 1) as f32 / 2.0;
            let cy = (height - 1) as f32 / 2.0;
            let max_dist = (cx * cx + cy * cy).sqrt().max(f32::EPSILON);
            RgbImage::from_fn(width, height, |x, y| {
                let (dx, dy) = (x as f32 - cx, y as f32 - cy);
                to_rgb(color_at(&spec.stops, (dx * dx + dy * dy).sqrt() / max_dist))
            })
        }
    };

    match config.pattern {
        Pattern::None => {}
        Pattern::Dots => draw_dots(&mut img),
        Pattern::Lines => draw_lines(&mut img),
    }

    if (config.brightness - 1.0).abs() > f32::EPSILON {
        let factor = config.brightness.max(0.0);
        for pixel in img.pixels_mut() {
            for channel in pixel.0.iter_mut() {
                *channel = (*channel as f32 * factor).round().clamp(0.0, 255.0) as u8;
            }
        }
    }

    img
}

/// Render and encode the background for `audience`.
///
/// # Errors
/// [`BrochureError::ImageEncodeFailed`] if the encoder rejects the canvas.
pub fn generate_background(
    audience: Audience,
    config: &BackgroundConfig,
) -> Result<BackgroundImage, BrochureError> {
    let spec = gradient_spec(audience, config);
    let img = render_gradient(&spec, config);
    let bytes = encode_image(&img, config.format, config.jpeg_quality).map_err(|e| {
        BrochureError::ImageEncodeFailed {
            audience: audience.to_string(),
            detail: e.to_string(),
        }
    })?;
    debug!(
        "{} background: {}x{} {} ({} bytes)",
        audience,
        img.width(),
        img.height(),
        config.format.extension(),
        bytes.len()
    );

    Ok(BackgroundImage {
        audience,
        format: config.format,
        width: img.width(),
        height: img.height(),
        bytes,
    })
}

/// Interpolated colour at `t` in `[0, 1]`; stops must be sorted.
fn color_at(stops: &[ColorStop], t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    let (Some(first), Some(last)) = (stops.first(), stops.last()) else {
        return FALLBACK_STOPS[0].color;
    };
    if t <= first.position {
        return first.color;
    }
    if t >= last.position {
        return last.color;
    }
    for pair in stops.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if t <= b.position {
            let span = b.position - a.position;
            if span <= f32::EPSILON {
                return b.color;
            }
            return lerp(a.color, b.color, (t - a.position) / span);
        }
    }
    last.color
}

fn lerp(a: Color, b: Color, t: f32) -> Color {
    let mix = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * t).round() as u8;
    Color::new(mix(a.r, b.r), mix(a.g, b.g), mix(a.b, b.b))
}

fn to_rgb(c: Color) -> Rgb<u8> {
    Rgb([c.r, c.g, c.b])
}

/// Blend white over `pixel` at `alpha` / 255 opacity.
fn blend_white(pixel: &mut Rgb<u8>, alpha: u8) {
    let a = alpha as f32 / 255.0;
    for channel in pixel.0.iter_mut() {
        *channel = (*channel as f32 + (255.0 - *channel as f32) * a).round() as u8;
    }
}

fn draw_dots(img: &mut RgbImage) {
    let reach = DOT_RADIUS.floor() as i64;
    let (w, h) = (img.width() as i64, img.height() as i64);
    for cy in (0..h).step_by(DOT_SPACING as usize) {
        for cx in (0..w).step_by(DOT_SPACING as usize) {
            for dy in -reach..=reach {
                for dx in -reach..=reach {
                    let (x, y) = (cx + dx, cy + dy);
                    let inside = ((dx * dx + dy * dy) as f32) <= DOT_RADIUS * DOT_RADIUS;
                    if inside && (0..w).contains(&x) && (0..h).contains(&y) {
                        blend_white(img.get_pixel_mut(x as u32, y as u32), DOT_ALPHA);
                    }
                }
            }
        }
    }
}

fn draw_lines(img: &mut RgbImage) {
    let height = img.height();
    for x in (0..img.width()).step_by(LINE_SPACING as usize) {
        for y in 0..height {
            blend_white(img.get_pixel_mut(x, y), LINE_ALPHA);
        }
    }
}
