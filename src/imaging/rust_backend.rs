//! Pure Rust image processing backend.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG) | `image` crate (pure Rust decoders) |
//! | Resize | `image::DynamicImage::resize_exact` with `Lanczos3` |
//! | Encode → WebP | `webp::Encoder` (lossy at quality) |
//! | Re-encode → JPEG | `image::codecs::jpeg::JpegEncoder` (quality) |
//! | Re-encode → PNG | `image::codecs::png::PngEncoder` (best compression) |
//!
//! The `image` crate's own WebP encoder is lossless-only, so lossy WebP
//! goes through libwebp via the `webp` crate. The JPEG encoder emits
//! baseline (not progressive) scans; PNG has no scalar quality, so the
//! configured PNG quality only participates in config validation.

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::params::{ReencodeParams, ScaleParams};
use crate::naming::SourceFormat;
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader};
use std::path::Path;

/// Pure Rust backend using the `image` crate ecosystem plus libwebp.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Load and decode an image from disk.
fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    ImageReader::open(path)
        .map_err(BackendError::Io)?
        .decode()
        .map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to decode {}: {}", path.display(), e))
        })
}

/// Encode and save as lossy WebP at the given quality.
///
/// libwebp accepts RGB8/RGBA8 only; other pixel layouts are converted first.
fn save_webp(img: &DynamicImage, path: &Path, quality: u32) -> Result<(), BackendError> {
    let converted;
    let source = match img {
        DynamicImage::ImageRgb8(_) | DynamicImage::ImageRgba8(_) => img,
        _ => {
            converted = DynamicImage::ImageRgba8(img.to_rgba8());
            &converted
        }
    };
    let encoder = webp::Encoder::from_image(source)
        .map_err(|e| BackendError::ProcessingFailed(format!("WebP encode failed: {e}")))?;
    let encoded = encoder.encode(quality as f32);
    std::fs::write(path, &*encoded).map_err(BackendError::Io)
}

/// Re-encode in the source's own format.
fn save_reencoded(
    img: &DynamicImage,
    path: &Path,
    format: SourceFormat,
    quality: u32,
) -> Result<(), BackendError> {
    let file = std::fs::File::create(path).map_err(BackendError::Io)?;
    let writer = std::io::BufWriter::new(file);
    match format {
        SourceFormat::Jpeg => {
            let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(writer, quality as u8);
            // JPEG has no alpha channel
            let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
            rgb.write_with_encoder(encoder)
                .map_err(|e| BackendError::ProcessingFailed(format!("JPEG encode failed: {e}")))
        }
        SourceFormat::Png => {
            let encoder = image::codecs::png::PngEncoder::new_with_quality(
                writer,
                image::codecs::png::CompressionType::Best,
                image::codecs::png::FilterType::Adaptive,
            );
            img.write_with_encoder(encoder)
                .map_err(|e| BackendError::ProcessingFailed(format!("PNG encode failed: {e}")))
        }
    }
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        let (width, height) = image::image_dimensions(path).map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to read dimensions: {}", e))
        })?;
        Ok(Dimensions { width, height })
    }

    fn scale(&self, params: &ScaleParams) -> Result<(), BackendError> {
        let img = load_image(&params.source)?;
        let resized = img.resize_exact(params.width, params.height, FilterType::Lanczos3);
        save_webp(&resized, &params.output, params.quality.value())
    }

    fn reencode(&self, params: &ReencodeParams) -> Result<(), BackendError> {
        let img = load_image(&params.source)?;
        save_reencoded(&img, &params.output, params.format, params.quality.value())
    }
}
