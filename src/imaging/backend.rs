//! Image synthesis backend trait and shared types.
//!
//! The [`ImageBackend`] trait is the seam between the HTTP layer (or CLI) and
//! the pixel work. The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend); tests swap in a mock to
//! exercise error mapping without rendering anything.

use crate::format::ImageFormat;
use crate::params::ImageParameters;
use thiserror::Error;

/// Anything that can go wrong after parameters were validated.
///
/// All variants are server-side failures; none is the client's fault.
#[derive(Error, Debug)]
pub enum SynthesisError {
    #[error("Canvas allocation failed: {0}")]
    Canvas(String),
    #[error("Font unavailable: {0}")]
    Font(String),
    #[error("Encoding {format} failed: {message}")]
    Encode {
        format: ImageFormat,
        message: String,
    },
}

/// Encoded image bytes plus what a client needs to interpret them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageResult {
    pub bytes: Vec<u8>,
    /// Always `bytes.len()`.
    pub length: usize,
    /// `image/<token>`, taken from the requested format, never sniffed.
    pub mime_type: &'static str,
}

impl ImageResult {
    pub fn new(bytes: Vec<u8>, format: ImageFormat) -> Self {
        Self {
            length: bytes.len(),
            bytes,
            mime_type: format.mime_type(),
        }
    }
}

/// Trait for image synthesis backends.
///
/// Implementations must be stateless across calls: the same parameters always
/// produce the same bytes, and concurrent calls never observe each other.
pub trait ImageBackend: Send + Sync {
    /// Render and encode an image.
    fn generate(&self, params: &ImageParameters) -> Result<ImageResult, SynthesisError>;
}
