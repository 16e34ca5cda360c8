//! Image normalization: every embedded image becomes a bounded-size JPEG.

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};

use crate::error::{MoblogError, Result};

/// Largest width or height an asset may have.
pub const MAX_DIMENSION: u32 = 800;

/// Encoder quality (the JPEG encoder's customary default).
pub const JPEG_QUALITY: u8 = 75;

/// File extension matching the normalized encoding.
pub const EXTENSION: &str = "jpg";

/// Decode `bytes` (format auto-detected), shrink it so neither side exceeds
/// `max_dimension`, and re-encode it as JPEG.
///
/// Images already within bounds keep their pixel dimensions. Larger images
/// are scaled with Lanczos3 so the longer side is exactly `max_dimension`
/// and the aspect ratio is kept. `name` only labels errors.
pub fn normalize_image(name: &str, bytes: &[u8], max_dimension: u32) -> Result<Vec<u8>> {
    let img = image::load_from_memory(bytes).map_err(|source| MoblogError::ImageDecode {
        name: name.to_string(),
        source,
    })?;

    let (width, height) = img.dimensions();
    let img = if width > max_dimension || height > max_dimension {
        let resized = img.resize(max_dimension, max_dimension, FilterType::Lanczos3);
        tracing::debug!(
            name,
            from = %format!("{width}x{height}"),
            to = %format!("{}x{}", resized.width(), resized.height()),
            "Downscaled image"
        );
        resized
    } else {
        img
    };

    // JPEG has no alpha channel.
    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());

    let mut out = Vec::new();
    rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY))
        .map_err(|source| MoblogError::ImageEncode {
            name: name.to_string(),
            source,
        })?;
    Ok(out)
}
