//! Request parameter resolution.
//!
//! Turns the raw, untrusted string values of a request into a fully
//! defaulted [`ImageParameters`]. Every resolver is a pure function of its
//! raw input: an empty string means "use the default", anything else is
//! parsed and validated.
//!
//! | Key | Resolver | Default | Error |
//! |---|---|---|---|
//! | path | [`ImageFormat::from_token`] | none | [`ResolveError::UnsupportedFormat`] |
//! | `s` | [`resolve_size`] | `100x100` | [`ResolveError::InvalidSize`] |
//! | `b` | [`resolve_color`] | `#CCCCCC` | [`ResolveError::InvalidBackgroundColor`] |
//! | `c` | [`resolve_color`] | `#969696` | [`ResolveError::InvalidTextColor`] |
//! | `x` | [`resolve_scale`] | `1.0` | [`ResolveError::InvalidScale`] |
//! | `t` | [`resolve_text`] | `"<w> x <h>"` of the scaled size | never fails |
//!
//! Non-positive sizes and scales are rejected: they could only ever produce
//! an empty or negative canvas.

use crate::color::{Color, HexColorError};
use crate::format::ImageFormat;
use thiserror::Error;

pub const KEY_SIZE: &str = "s";
pub const KEY_BACKGROUND: &str = "b";
pub const KEY_TEXT_COLOR: &str = "c";
pub const KEY_TEXT: &str = "t";
pub const KEY_SCALE: &str = "x";

/// Separates width from height in the size parameter (`120x80`).
const DIMENSION_DELIMITER: char = 'x';

pub const DEFAULT_SCALE: f64 = 1.0;

/// Validation failures. Each maps to a client error at the HTTP boundary;
/// the `Display` text is what the client sees.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolveError {
    #[error("unsupported image format")]
    UnsupportedFormat(String),
    #[error("invalid size (s) value")]
    InvalidSize(String),
    #[error("invalid scale (x) value")]
    InvalidScale(String),
    #[error("invalid background color (b) value")]
    InvalidBackgroundColor(HexColorError),
    #[error("invalid text color (c) value")]
    InvalidTextColor(HexColorError),
}

/// Requested logical dimensions, before scaling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const DEFAULT: Size = Size::new(100, 100);

    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Both dimensions scaled with [`scale_dimension`], or `None` if either
    /// does not fit in a `u32`.
    pub fn scaled(self, scale: f64) -> Option<Size> {
        Some(Size {
            width: scale_dimension(self.width, scale)?,
            height: scale_dimension(self.height, scale)?,
        })
    }
}

/// Scale a logical dimension to pixels, rounding up.
///
/// Rounding up guarantees the canvas is never smaller than the nominal
/// request. Returns `None` when the result is not a positive `u32`.
///
/// # Examples
/// ```
/// # use placeholdr::params::scale_dimension;
/// assert_eq!(scale_dimension(10, 2.0), Some(20));
/// assert_eq!(scale_dimension(15, 1.5), Some(23));
/// ```
pub fn scale_dimension(dimension: u32, scale: f64) -> Option<u32> {
    let scaled = (f64::from(dimension) * scale).ceil();
    if scaled.is_finite() && scaled >= 1.0 && scaled <= f64::from(u32::MAX) {
        Some(scaled as u32)
    } else {
        None
    }
}

/// Which color parameter is being resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorField {
    Background,
    Text,
}

impl ColorField {
    pub fn default_color(self) -> Color {
        match self {
            ColorField::Background => Color::DEFAULT_BACKGROUND,
            ColorField::Text => Color::DEFAULT_TEXT,
        }
    }

    fn error(self, cause: HexColorError) -> ResolveError {
        match self {
            ColorField::Background => ResolveError::InvalidBackgroundColor(cause),
            ColorField::Text => ResolveError::InvalidTextColor(cause),
        }
    }
}

/// Everything the synthesis engine needs, validated and defaulted.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageParameters {
    pub format: ImageFormat,
    pub size: Size,
    pub background_color: Color,
    pub text_color: Color,
    pub scale: f64,
    pub text: String,
}

impl ImageParameters {
    /// Pixel dimensions of the rendered canvas.
    pub fn scaled_size(&self) -> Option<Size> {
        self.size.scaled(self.scale)
    }
}

/// Raw request values, one per query key.
///
/// Missing keys are empty strings, which every resolver treats as "use the
/// default".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawParams {
    pub size: String,
    pub background: String,
    pub text_color: String,
    pub text: String,
    pub scale: String,
}

impl RawParams {
    /// Collect decoded query pairs. When a key repeats, its first value wins;
    /// unknown keys are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut slots: [Option<String>; 5] = Default::default();
        for (key, value) in pairs {
            let index = match key.as_ref() {
                KEY_SIZE => 0,
                KEY_BACKGROUND => 1,
                KEY_TEXT_COLOR => 2,
                KEY_TEXT => 3,
                KEY_SCALE => 4,
                _ => continue,
            };
            slots[index].get_or_insert_with(|| value.into());
        }
        let [size, background, text_color, text, scale] = slots.map(Option::unwrap_or_default);
        Self {
            size,
            background,
            text_color,
            text,
            scale,
        }
    }

    /// Resolve every parameter for the given format token.
    ///
    /// Checks run in a fixed order and the first failure wins: format, size,
    /// background color, text color, scale. The text default is derived from
    /// the scaled size, so it is resolved last.
    pub fn resolve(&self, format: &str) -> Result<ImageParameters, ResolveError> {
        let format = ImageFormat::from_token(format)
            .ok_or_else(|| ResolveError::UnsupportedFormat(format.to_string()))?;
        let size = resolve_size(&self.size)?;
        let background_color = resolve_color(&self.background, ColorField::Background)?;
        let text_color = resolve_color(&self.text_color, ColorField::Text)?;
        let scale = resolve_scale(&self.scale)?;
        let scaled = size
            .scaled(scale)
            .ok_or_else(|| ResolveError::InvalidScale(self.scale.clone()))?;
        let text = resolve_text(&self.text, &default_text(scaled));

        Ok(ImageParameters {
            format,
            size,
            background_color,
            text_color,
            scale,
            text,
        })
    }
}

/// Parse the size parameter: `"120x80"`, `"120X80"` or a square `"120"`.
///
/// Only the first two `x`-separated parts are read; anything after a second
/// delimiter is ignored.
pub fn resolve_size(raw: &str) -> Result<Size, ResolveError> {
    if raw.is_empty() {
        return Ok(Size::DEFAULT);
    }

    let value = raw.to_lowercase();
    let (w, h) = if value.contains(DIMENSION_DELIMITER) {
        let mut parts = value.split(DIMENSION_DELIMITER);
        (parts.next().unwrap_or(""), parts.next().unwrap_or(""))
    } else {
        (value.as_str(), value.as_str())
    };

    let parse = |s: &str| -> Result<u32, ResolveError> {
        match s.parse::<u32>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(ResolveError::InvalidSize(raw.to_string())),
        }
    };
    Ok(Size::new(parse(w)?, parse(h)?))
}

/// Parse a color parameter, falling back to the field's default when empty.
pub fn resolve_color(raw: &str, field: ColorField) -> Result<Color, ResolveError> {
    if raw.is_empty() {
        return Ok(field.default_color());
    }
    Color::from_hex(raw).map_err(|e| field.error(e))
}

/// Parse the scale parameter. Must be a finite number greater than zero.
pub fn resolve_scale(raw: &str) -> Result<f64, ResolveError> {
    if raw.is_empty() {
        return Ok(DEFAULT_SCALE);
    }
    match raw.parse::<f64>() {
        Ok(scale) if scale.is_finite() && scale > 0.0 => Ok(scale),
        _ => Err(ResolveError::InvalidScale(raw.to_string())),
    }
}

/// The text parameter, or `fallback` when it is empty.
pub fn resolve_text(raw: &str, fallback: &str) -> String {
    if raw.is_empty() {
        fallback.to_string()
    } else {
        raw.to_string()
    }
}

/// Default overlay text: the scaled dimensions, e.g. `"120 x 80"`.
pub fn default_text(scaled: Size) -> String {
    format!("{} {DIMENSION_DELIMITER} {}", scaled.width, scaled.height)
}
