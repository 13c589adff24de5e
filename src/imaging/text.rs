//! Font acquisition and text rasterization.
//!
//! Font data is loaded fresh on every render; nothing is cached between
//! calls. The default face is DejaVu Sans, compiled into the binary from
//! `assets/fonts/`. A TrueType file on disk can be configured instead.

use super::backend::SynthesisError;
use super::calculations::{centered_x, font_size, line_baselines, wrap_width, wrap_words};
use crate::color::Color;
use image::RgbImage;
use rusttype::{Font, Scale, point};
use std::path::PathBuf;
use tracing::debug;

static EMBEDDED_FONT: &[u8] = include_bytes!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/assets/fonts/DejaVuSans.ttf"
));

/// Where the overlay text's font comes from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FontSource {
    /// DejaVu Sans, bundled with the binary.
    #[default]
    Embedded,
    /// A TrueType/OpenType file read at render time.
    File(PathBuf),
}

impl FontSource {
    /// Read and parse the font.
    pub fn load(&self) -> Result<Font<'static>, SynthesisError> {
        match self {
            FontSource::Embedded => Font::try_from_bytes(EMBEDDED_FONT)
                .ok_or_else(|| SynthesisError::Font("embedded font is not a valid font".into())),
            FontSource::File(path) => {
                let data = std::fs::read(path).map_err(|e| {
                    SynthesisError::Font(format!("failed to read {}: {e}", path.display()))
                })?;
                Font::try_from_vec(data).ok_or_else(|| {
                    SynthesisError::Font(format!("{} is not a valid font", path.display()))
                })
            }
        }
    }
}

/// Advance width of `text` at `scale`, kerning included.
fn measure(font: &Font<'_>, scale: Scale, text: &str) -> f32 {
    font.layout(text, scale, point(0.0, 0.0))
        .last()
        .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
        .unwrap_or(0.0)
}

/// Draw `text` centered on the canvas, word-wrapped to 80% of its width.
///
/// Glyph coverage is blended over whatever is already on the canvas; the text
/// color itself is fully opaque.
pub fn draw_text(canvas: &mut RgbImage, font: &Font<'_>, text: &str, color: Color) {
    let (width, height) = canvas.dimensions();
    let scale = Scale::uniform(font_size(height));
    let v_metrics = font.v_metrics(scale);
    let line_height = v_metrics.ascent - v_metrics.descent + v_metrics.line_gap;

    let lines = wrap_words(text, wrap_width(width), |s| measure(font, scale, s));
    let baselines = line_baselines(height, lines.len(), line_height, v_metrics.ascent);
    debug!(lines = lines.len(), font_px = scale.y, "laying out text");

    for (line, baseline) in lines.iter().zip(baselines) {
        let x = centered_x(width, measure(font, scale, line));
        for glyph in font.layout(line, scale, point(x, baseline)) {
            let Some(bb) = glyph.pixel_bounding_box() else {
                continue;
            };
            glyph.draw(|gx, gy, coverage| {
                let px = gx as i32 + bb.min.x;
                let py = gy as i32 + bb.min.y;
                if px < 0 || py < 0 || px as u32 >= width || py as u32 >= height {
                    return;
                }
                blend(canvas.get_pixel_mut(px as u32, py as u32), color, coverage);
            });
        }
    }
}

fn blend(dst: &mut image::Rgb<u8>, color: Color, coverage: f32) {
    let a = coverage.clamp(0.0, 1.0);
    let mix = |src: u8, dst: u8| (src as f32 * a + dst as f32 * (1.0 - a)).round() as u8;
    dst.0 = [
        mix(color.r, dst.0[0]),
        mix(color.g, dst.0[1]),
        mix(color.b, dst.0[2]),
    ];
}
