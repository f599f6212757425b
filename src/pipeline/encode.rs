//! Image encoding: `RgbImage` → PNG or JPEG bytes.
//!
//! PNG is the default because it is lossless and the encoder is
//! deterministic, so the same canvas always yields the same bytes. JPEG is
//! offered for callers that care more about file size; the quality setting
//! comes from [`crate::config::BackgroundConfig::jpeg_quality`].

use crate::config::OutputFormat;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::codecs::jpeg::JpegEncoder;
use image::{ImageFormat, RgbImage};
use std::io::Cursor;
use tracing::debug;

/// Encode `img` in the requested format.
pub fn encode_image(
    img: &RgbImage,
    format: OutputFormat,
    jpeg_quality: u8,
) -> Result<Vec<u8>, image::ImageError> {
    let mut buf = Vec::new();
    match format {
        OutputFormat::Png => {
            img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
        }
        OutputFormat::Jpeg => {
            let encoder = JpegEncoder::new_with_quality(&mut buf, jpeg_quality.clamp(1, 100));
            img.write_with_encoder(encoder)?;
        }
    }
    debug!(
        "Encoded {}x{} image → {} bytes {}",
        img.width(),
        img.height(),
        buf.len(),
        format.extension()
    );
    Ok(buf)
}

/// Base64-wrap encoded image bytes, for embedding in JSON or a `data:` URI.
pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}
