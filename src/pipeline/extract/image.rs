//! Uploaded image → synthetic content blocks.
//!
//! There is no OCR: the blocks are written from what can be measured
//! (dimensions, format, a dominant colour and overall brightness from a
//! downsampled copy) plus industry words found in the file name.

use super::text::FALLBACK_TITLE;
use crate::config::ExtractorConfig;
use crate::error::BrochureError;
use crate::model::{Color, ContentBlock};
use crate::output::{Brightness, ImageMetadata};
use crate::pipeline::keywords::words;
use image::{DynamicImage, ImageFormat, ImageReader};
use std::collections::BTreeMap;
use std::io::Cursor;
use tracing::{debug, warn};

/// Edge of the thumbnail used for colour analysis.
const THUMBNAIL_EDGE: u32 = 32;

/// Mean luminance above which an image is bright, and below which it is dark.
const BRIGHT_LUMINANCE: f32 = 170.0;
const DARK_LUMINANCE: f32 = 85.0;

const OVERVIEW: &str = "A forward-thinking company dedicated to delivering exceptional \
                        products and services to its customers.";

/// Blocks and measurements for one image.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageContent {
    pub blocks: Vec<ContentBlock>,
    pub metadata: ImageMetadata,
}

/// Analyse an image and describe it as content blocks.
///
/// # Errors
/// [`BrochureError::InvalidImage`] when the header cannot be read. A pixel
/// decode failure after that is logged and only drops the colour analysis.
pub fn extract_image(
    bytes: &[u8],
    format: ImageFormat,
    name: Option<&str>,
    config: &ExtractorConfig,
) -> Result<ImageContent, BrochureError> {
    let (width, height) = ImageReader::with_format(Cursor::new(bytes), format)
        .into_dimensions()
        .map_err(|e| BrochureError::InvalidImage {
            detail: e.to_string(),
        })?;
    debug!("Image header: {}x{} {:?}", width, height, format);

    let (dominant_color, brightness) = match image::load_from_memory_with_format(bytes, format) {
        Ok(img) => {
            let (color, brightness) = analyse_colours(&img);
            (Some(color), Some(brightness))
        }
        Err(e) => {
            warn!("Could not decode image pixels, skipping colour analysis: {}", e);
            (None, None)
        }
    };

    let metadata = ImageMetadata {
        width,
        height,
        format: format_name(format),
        dominant_color,
        brightness,
    };
    let blocks = describe(&metadata, name, config);
    Ok(ImageContent { blocks, metadata })
}

/// Most common quantised colour and overall brightness of `img`.
pub fn analyse_colours(img: &DynamicImage) -> (Color, Brightness) {
    let thumb = if img.width() > THUMBNAIL_EDGE || img.height() > THUMBNAIL_EDGE {
        img.thumbnail(THUMBNAIL_EDGE, THUMBNAIL_EDGE).to_rgb8()
    } else {
        img.to_rgb8()
    };

    let mut counts: BTreeMap<(u8, u8, u8), usize> = BTreeMap::new();
    let mut luminance_sum = 0.0f32;
    for pixel in thumb.pixels() {
        let [r, g, b] = pixel.0;
        luminance_sum += Color::new(r, g, b).luminance();
        *counts
            .entry((quantise(r), quantise(g), quantise(b)))
            .or_insert(0) += 1;
    }

    // Highest count wins; equal counts go to the smallest colour.
    let (r, g, b) = counts
        .into_iter()
        .max_by(|(ka, ca), (kb, cb)| ca.cmp(cb).then_with(|| kb.cmp(ka)))
        .map(|(key, _)| key)
        .unwrap_or((0, 0, 0));

    let pixel_count = (thumb.width() * thumb.height()).max(1) as f32;
    let mean = luminance_sum / pixel_count;
    let brightness = if mean > BRIGHT_LUMINANCE {
        Brightness::Bright
    } else if mean < DARK_LUMINANCE {
        Brightness::Dark
    } else {
        Brightness::Balanced
    };

    (Color::new(r, g, b), brightness)
}

/// Snap a channel to the centre of its 32-wide bucket.
fn quantise(channel: u8) -> u8 {
    (channel & 0xE0) | 0x10
}

fn format_name(format: ImageFormat) -> String {
    format!("{format:?}").to_lowercase()
}

fn describe(
    meta: &ImageMetadata,
    name: Option<&str>,
    config: &ExtractorConfig,
) -> Vec<ContentBlock> {
    let mut blocks = vec![
        ContentBlock::heading(title_from_name(name), 1),
        ContentBlock::paragraph(OVERVIEW),
    ];

    if let Some(brightness) = meta.brightness {
        let mut text = match brightness {
            Brightness::Bright => "The company presents a modern, bright brand identity \
                                   suggesting innovation and clarity."
                .to_string(),
            Brightness::Balanced => "The brand balances light and dark tones for a steady, \
                                     approachable identity."
                .to_string(),
            Brightness::Dark => "The brand uses a deep, dark palette that conveys confidence \
                                 and sophistication."
                .to_string(),
        };
        if let Some(color) = meta.dominant_color {
            text.push_str(&format!(" Its dominant colour is {}.", color.to_hex()));
        }
        blocks.push(ContentBlock::heading("Visual Identity", 2));
        blocks.push(ContentBlock::paragraph(text));
    }

    let layout = if meta.width > meta.height {
        "The visual style emphasizes breadth and comprehensive solutions."
    } else if meta.width < meta.height {
        "The vertical format suggests focus and depth."
    } else {
        "The square format suggests balance and consistency."
    };
    blocks.push(ContentBlock::heading("Format and Layout", 2));
    blocks.push(ContentBlock::paragraph(format!(
        "{layout} The source image is {}x{} {}.",
        meta.width,
        meta.height,
        meta.format.to_uppercase()
    )));

    let industries = industry_terms(name.unwrap_or_default(), config);
    if !industries.is_empty() {
        blocks.push(ContentBlock::paragraph(format!(
            "The company operates in the {} space, focusing on delivering value to clients.",
            industries.join(", ")
        )));
    }

    blocks
}

/// `acme_cloud-logo` → `Acme Cloud Logo`.
fn title_from_name(name: Option<&str>) -> String {
    let title = name
        .unwrap_or_default()
        .split(|c: char| c == '_' || c == '-' || c.is_whitespace())
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ");
    if title.is_empty() {
        FALLBACK_TITLE.to_string()
    } else {
        title
    }
}

/// Configured industry keywords that appear as whole words in `name`, in
/// configured order.
fn industry_terms<'c>(name: &str, config: &'c ExtractorConfig) -> Vec<&'c str> {
    let name_words = words(name);
    config
        .industry_keywords
        .iter()
        .filter(|k| name_words.iter().any(|w| w.eq_ignore_ascii_case(k)))
        .map(String::as_str)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn encode(img: RgbImage, format: ImageFormat) -> Vec<u8> {
        let mut buf = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut buf), format)
            .unwrap();
        buf
    }

    #[test]
    fn bright_landscape_png() {
        let bytes = encode(RgbImage::from_pixel(80, 40, Rgb([250, 250, 250])), ImageFormat::Png);
        let out = extract_image(
            &bytes,
            ImageFormat::Png,
            Some("acme_cloud-software"),
            &ExtractorConfig::default(),
        )
        .unwrap();

        assert_eq!(out.metadata.width, 80);
        assert_eq!(out.metadata.height, 40);
        assert_eq!(out.metadata.format, "png");
        assert_eq!(out.metadata.brightness, Some(Brightness::Bright));
        assert_eq!(out.metadata.dominant_color, Some(Color::new(240, 240, 240)));

        let texts: Vec<&str> = out.blocks.iter().map(|b| b.text()).collect();
        assert_eq!(texts[0], "Acme Cloud Software");
        assert!(texts.contains(&"Visual Identity"));
        assert!(texts.iter().any(|t| t.contains("bright brand identity")));
        assert!(texts.iter().any(|t| t.contains("breadth") && t.contains("80x40 PNG")));
        assert!(texts
            .iter()
            .any(|t| t.contains("operates in the cloud, software space")));
    }

    #[test]
    fn dark_portrait_jpeg_without_name() {
        let bytes = encode(RgbImage::from_pixel(30, 60, Rgb([10, 20, 30])), ImageFormat::Jpeg);
        let out =
            extract_image(&bytes, ImageFormat::Jpeg, None, &ExtractorConfig::default()).unwrap();

        assert_eq!(out.metadata.format, "jpeg");
        assert_eq!(out.metadata.brightness, Some(Brightness::Dark));
        assert_eq!(out.blocks[0], ContentBlock::heading(FALLBACK_TITLE, 1));
        assert!(out.blocks.iter().any(|b| b.text().contains("vertical format")));
        assert!(!out.blocks.iter().any(|b| b.text().contains("operates in")));
    }

    #[test]
    fn garbage_bytes_are_invalid_image() {
        let err = extract_image(
            b"definitely not a png",
            ImageFormat::Png,
            None,
            &ExtractorConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, BrochureError::InvalidImage { .. }), "{err}");
    }

    #[test]
    fn dominant_colour_prefers_majority() {
        let mut img = RgbImage::from_pixel(10, 10, Rgb([200, 30, 30]));
        for x in 0..3 {
            img.put_pixel(x, 0, Rgb([0, 0, 255]));
        }
        let (color, brightness) = analyse_colours(&DynamicImage::ImageRgb8(img));
        assert_eq!(color, Color::new(208, 16, 16));
        assert_eq!(brightness, Brightness::Dark);
    }

    #[test]
    fn title_casing() {
        assert_eq!(title_from_name(Some("ACME-cloud_inc")), "Acme Cloud Inc");
        assert_eq!(title_from_name(Some("__")), FALLBACK_TITLE);
        assert_eq!(title_from_name(None), FALLBACK_TITLE);
    }

    #[test]
    fn industry_terms_need_whole_words() {
        let config = ExtractorConfig::default();
        assert_eq!(industry_terms("acme-ai-platform", &config), ["ai", "platform"]);
        assert!(industry_terms("mountain", &config).is_empty());
    }
}
