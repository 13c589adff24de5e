//! Canvas → bytes, one encoder per format with fixed settings.
//!
//! | Format | Crate | Settings |
//! |---|---|---|
//! | PNG | `image::codecs::png` | lossless, `CompressionType::Default`, adaptive filter |
//! | JPEG (`jpg`, `jpeg`) | `image::codecs::jpeg` | encoder's default quality (75) |
//! | TIFF | `tiff` | Deflate (balanced level), horizontal predictor |
//! | WebP | `webp` (libwebp) | lossy, quality 90, exact mode |
//!
//! Every setting is fixed, so encoding the same canvas twice yields the
//! same bytes.

use super::backend::SynthesisError;
use crate::format::ImageFormat;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder, RgbImage};
use std::io::Cursor;
use tiff::encoder::compression::DeflateLevel;
use tiff::encoder::{Compression, TiffEncoder, colortype};
use tiff::tags::Predictor;

/// Lossy WebP quality (0-100).
pub const WEBP_QUALITY: f32 = 90.0;

/// Encode the canvas in the requested format.
pub fn encode(canvas: &RgbImage, format: ImageFormat) -> Result<Vec<u8>, SynthesisError> {
    match format {
        ImageFormat::Png => encode_png(canvas),
        ImageFormat::Jpg | ImageFormat::Jpeg => encode_jpeg(canvas),
        ImageFormat::Tiff => encode_tiff(canvas),
        ImageFormat::Webp => encode_webp(canvas),
    }
    .map_err(|message| SynthesisError::Encode { format, message })
}

fn encode_png(canvas: &RgbImage) -> Result<Vec<u8>, String> {
    let mut buf = Vec::new();
    // PngEncoder::new picks the crate's default level, which is Fast
    PngEncoder::new_with_quality(&mut buf, CompressionType::Default, FilterType::Adaptive)
        .write_image(
            canvas.as_raw(),
            canvas.width(),
            canvas.height(),
            ExtendedColorType::Rgb8,
        )
        .map_err(|e| e.to_string())?;
    Ok(buf)
}

fn encode_jpeg(canvas: &RgbImage) -> Result<Vec<u8>, String> {
    let mut buf = Vec::new();
    JpegEncoder::new(&mut buf)
        .write_image(
            canvas.as_raw(),
            canvas.width(),
            canvas.height(),
            ExtendedColorType::Rgb8,
        )
        .map_err(|e| e.to_string())?;
    Ok(buf)
}

fn encode_tiff(canvas: &RgbImage) -> Result<Vec<u8>, String> {
    let mut buf = Vec::new();
    let mut encoder = TiffEncoder::new(Cursor::new(&mut buf))
        .map_err(|e| e.to_string())?
        .with_compression(Compression::Deflate(DeflateLevel::Balanced))
        .with_predictor(Predictor::Horizontal);
    encoder
        .write_image::<colortype::RGB8>(canvas.width(), canvas.height(), canvas.as_raw())
        .map_err(|e| e.to_string())?;
    Ok(buf)
}

/// Lossy, quality 90, exact mode.
fn webp_config() -> Result<webp::WebPConfig, String> {
    let mut config =
        webp::WebPConfig::new().map_err(|()| "failed to initialise WebP config".to_string())?;
    config.lossless = 0;
    config.quality = WEBP_QUALITY;
    config.exact = 1;
    Ok(config)
}

fn encode_webp(canvas: &RgbImage) -> Result<Vec<u8>, String> {
    let config = webp_config()?;
    let encoded = webp::Encoder::from_rgb(canvas.as_raw(), canvas.width(), canvas.height())
        .encode_advanced(&config)
        .map_err(|e| format!("{e:?}"))?;
    Ok(encoded.to_vec())
}
