//! Pure Rust synthesis backend.
//!
//! ## Pipeline
//!
//! | Step | Crate / function |
//! |---|---|
//! | Canvas | `image::RgbImage`, `scaled_width × scaled_height` |
//! | Background | `ImageBuffer::from_pixel` (whole canvas, opaque) |
//! | Text | `rusttype` glyph coverage, see [`text`](super::text) |
//! | Encode | see [`encode`](super::encode) |
//!
//! Font data and the canvas are acquired per call and dropped on return.

use super::backend::{ImageBackend, ImageResult, SynthesisError};
use super::encode::encode;
use super::text::{FontSource, draw_text};
use crate::color::Color;
use crate::params::ImageParameters;
use image::RgbImage;
use tracing::debug;

/// Backend built on the `image`, `rusttype`, `tiff` and `webp` crates.
#[derive(Debug, Clone, Default)]
pub struct RustBackend {
    font: FontSource,
}

impl RustBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_font(font: FontSource) -> Self {
        Self { font }
    }
}

/// Allocate a canvas filled edge to edge with `color`.
fn filled_canvas(width: u32, height: u32, color: Color) -> Result<RgbImage, SynthesisError> {
    let bytes = (width as usize)
        .checked_mul(height as usize)
        .and_then(|px| px.checked_mul(3));
    if bytes.is_none() {
        return Err(SynthesisError::Canvas(format!(
            "{width}x{height} canvas exceeds addressable memory"
        )));
    }
    Ok(RgbImage::from_pixel(width, height, color.to_rgb()))
}

impl ImageBackend for RustBackend {
    fn generate(&self, params: &ImageParameters) -> Result<ImageResult, SynthesisError> {
        let scaled = params.scaled_size().ok_or_else(|| {
            SynthesisError::Canvas(format!(
                "{}x{} at scale {} is not a drawable size",
                params.size.width, params.size.height, params.scale
            ))
        })?;
        debug!(
            width = scaled.width,
            height = scaled.height,
            format = %params.format,
            "rendering placeholder"
        );

        let mut canvas = filled_canvas(scaled.width, scaled.height, params.background_color)?;
        let font = self.font.load()?;
        draw_text(&mut canvas, &font, &params.text, params.text_color);

        let bytes = encode(&canvas, params.format)?;
        Ok(ImageResult::new(bytes, params.format))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::ImageFormat;
    use crate::params::Size;
    use crate::test_helpers::{decode, params};

    #[test]
    fn canvas_is_filled_with_background() {
        let canvas = filled_canvas(30, 20, Color::new(0x35, 0x6E, 0xF3)).unwrap();
        assert_eq!(canvas.dimensions(), (30, 20));
        assert!(canvas.pixels().all(|p| p.0 == [0x35, 0x6E, 0xF3]));
    }

    #[test]
    fn oversized_canvas_is_rejected_before_allocating() {
        // (2^32 - 1)^2 * 3 overflows a 64-bit usize
        assert!(matches!(
            filled_canvas(u32::MAX, u32::MAX, Color::new(0, 0, 0)),
            Err(SynthesisError::Canvas(_))
        ));
    }

    #[test]
    fn undrawable_scale_is_canvas_error() {
        let mut p = params(ImageFormat::Png, 10, 10);
        p.scale = 0.0;
        assert!(matches!(
            RustBackend::new().generate(&p),
            Err(SynthesisError::Canvas(_))
        ));
    }

    #[test]
    fn unscaled_jpg_with_no_text() {
        let mut p = params(ImageFormat::Jpg, 100, 100);
        p.background_color = Color::new(0x2D, 0x64, 0xDD);
        p.text_color = Color::new(0, 0, 0);
        p.text = String::new();

        let result = RustBackend::new().generate(&p).unwrap();
        assert!(!result.bytes.is_empty());
        assert_eq!(result.length, result.bytes.len());
        assert_eq!(result.mime_type, "image/jpg");

        let img = decode(&result).to_rgb8();
        assert_eq!(img.dimensions(), (100, 100));
        // JPEG is lossy but a flat fill stays close to the requested color
        let center = img.get_pixel(50, 50).0;
        for (got, want) in center.iter().zip([0x2D, 0x64, 0xDD]) {
            assert!((*got as i32 - want as i32).abs() <= 4, "{center:?}");
        }
    }

    #[test]
    fn scaled_png_with_text() {
        let p = ImageParameters {
            format: ImageFormat::Png,
            size: Size::new(110, 80),
            background_color: Color::new(0x5E, 0xF3, 0xAB),
            text_color: Color::new(0xFF, 0x23, 0x6D),
            scale: 2.0,
            text: "Hello World".into(),
        };

        let result = RustBackend::new().generate(&p).unwrap();
        assert_eq!(result.mime_type, "image/png");

        let img = decode(&result).to_rgb8();
        assert_eq!(img.dimensions(), (220, 160));
        // Corners are background, some pixel carries the exact text color
        assert_eq!(img.get_pixel(0, 0).0, [0x5E, 0xF3, 0xAB]);
        assert_eq!(img.get_pixel(219, 159).0, [0x5E, 0xF3, 0xAB]);
        assert!(img.pixels().any(|px| px.0 == [0xFF, 0x23, 0x6D]));
    }

    #[test]
    fn every_format_round_trips_to_scaled_dimensions() {
        for format in ImageFormat::ALL {
            let mut p = params(format, 45, 31);
            p.scale = 1.5;
            let result = RustBackend::new().generate(&p).unwrap();
            assert_eq!(result.mime_type, format.mime_type());
            let img = decode(&result);
            // ceil(45 * 1.5) = 68, ceil(31 * 1.5) = 47
            assert_eq!((img.width(), img.height()), (68, 47), "{format}");
        }
    }

    #[test]
    fn generate_is_deterministic() {
        let backend = RustBackend::new();
        for format in ImageFormat::ALL {
            let p = params(format, 64, 48);
            let first = backend.generate(&p).unwrap();
            let second = backend.generate(&p).unwrap();
            assert_eq!(first, second, "{format}");
        }
    }

    #[test]
    fn unusable_font_aborts_synthesis() {
        let backend = RustBackend::with_font(FontSource::File("/nonexistent/font.ttf".into()));
        let result = backend.generate(&params(ImageFormat::Png, 10, 10));
        assert!(matches!(result, Err(SynthesisError::Font(_))));
    }

    #[test]
    fn text_changes_the_output() {
        let backend = RustBackend::new();
        let mut blank = params(ImageFormat::Png, 100, 100);
        blank.text = String::new();
        let mut lettered = blank.clone();
        lettered.text = "Hi".into();

        assert_ne!(
            backend.generate(&blank).unwrap().bytes,
            backend.generate(&lettered).unwrap().bytes
        );
    }
}
