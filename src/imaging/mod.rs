//! Image synthesis: a solid canvas, centered text, one encoder per format.
//!
//! | Stage | Crate / function |
//! |---|---|
//! | **Canvas** | `image::RgbImage::from_pixel` |
//! | **Text** | `rusttype` layout + coverage blending |
//! | **Encode** | `image` (PNG, JPEG), `tiff` (Deflate), `webp` (lossy) |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for text geometry (unit testable)
//! - **Text**: Font loading and glyph rasterization
//! - **Encode**: Canvas → bytes per [`ImageFormat`](crate::format::ImageFormat)
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]

pub mod backend;
mod calculations;
pub mod encode;
pub mod rust_backend;
pub mod text;

pub use backend::{ImageBackend, ImageResult, SynthesisError};
pub use rust_backend::RustBackend;
pub use text::FontSource;
