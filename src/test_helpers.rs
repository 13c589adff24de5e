//! Shared test utilities.
//!
//! Builders for fully-resolved parameters and a decoder for backend output.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let p = params(ImageFormat::Png, 110, 80);
//! let result = RustBackend::new().generate(&p).unwrap();
//! assert_eq!(decode(&result).width(), 110);
//! ```

use crate::color::Color;
use crate::format::ImageFormat;
use crate::imaging::ImageResult;
use crate::params::{ImageParameters, Size, default_text};

// =========================================================================
// Parameter builders
// =========================================================================

/// Parameters as the resolver would produce them for `{format}?s={w}x{h}`.
pub fn params(format: ImageFormat, width: u32, height: u32) -> ImageParameters {
    let size = Size::new(width, height);
    ImageParameters {
        format,
        size,
        background_color: Color::DEFAULT_BACKGROUND,
        text_color: Color::DEFAULT_TEXT,
        scale: 1.0,
        text: default_text(size),
    }
}

// =========================================================================
// Output inspection
// =========================================================================

/// Decode backend output, sniffing the container. Panics on failure.
pub fn decode(result: &ImageResult) -> image::DynamicImage {
    image::load_from_memory(&result.bytes).unwrap_or_else(|e| {
        panic!(
            "{} output ({} bytes) failed to decode: {e}",
            result.mime_type, result.length
        )
    })
}
