//! Pure calculation functions for canvas geometry and text layout.
//!
//! All functions here are pure and testable without fonts, pixels or encoders.
//! Text measurement is passed in as a closure so word wrapping can be checked
//! with a fixed-width stand-in. Canvas scaling lives with the parameters, in
//! [`crate::params::scale_dimension`].

/// Pixel-to-point factor (1px = 0.75pt).
pub const PX_TO_PT: f32 = 0.75;

/// Text height as a fraction of the canvas height.
pub const TEXT_HEIGHT_RATIO: f32 = 0.2;

/// Widest a line of text may get, as a fraction of the canvas width.
pub const WRAP_WIDTH_RATIO: f32 = 0.8;

/// Font size in pixels for a canvas of the given height.
pub fn font_size(canvas_height: u32) -> f32 {
    canvas_height as f32 * PX_TO_PT * TEXT_HEIGHT_RATIO
}

/// Maximum line width in pixels for a canvas of the given width.
pub fn wrap_width(canvas_width: u32) -> f32 {
    canvas_width as f32 * WRAP_WIDTH_RATIO
}

/// Greedily word-wrap `text` so no line is wider than `max_width`.
///
/// Explicit newlines always break. Words are separated by single spaces in
/// the output regardless of the whitespace in the input. A single word wider
/// than `max_width` gets a line of its own rather than being split.
/// Empty text produces no lines.
pub fn wrap_words(text: &str, max_width: f32, measure: impl Fn(&str) -> f32) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }

    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut words = paragraph.split_whitespace();
        let Some(first) = words.next() else {
            lines.push(String::new());
            continue;
        };

        let mut current = first.to_string();
        for word in words {
            let candidate = format!("{current} {word}");
            if measure(&candidate) <= max_width {
                current = candidate;
            } else {
                lines.push(std::mem::replace(&mut current, word.to_string()));
            }
        }
        lines.push(current);
    }
    lines
}

/// Baseline y-coordinate of each line in a vertically centered text block.
///
/// Lines are stacked with single spacing (`line_height` apart); the block as
/// a whole is centered on the canvas.
pub fn line_baselines(
    canvas_height: u32,
    line_count: usize,
    line_height: f32,
    ascent: f32,
) -> Vec<f32> {
    let block_height = line_count as f32 * line_height;
    let top = (canvas_height as f32 - block_height) / 2.0;
    (0..line_count)
        .map(|i| top + i as f32 * line_height + ascent)
        .collect()
}

/// Left x-coordinate that horizontally centers a line of `line_width` pixels.
pub fn centered_x(canvas_width: u32, line_width: f32) -> f32 {
    (canvas_width as f32 - line_width) / 2.0
}
