//! # Placeholdr
//!
//! A placeholder image service. Ask for a format, a size and a couple of
//! colors; get back a solid canvas with centered text, encoded on the fly.
//!
//! # Architecture: Resolve, Then Synthesize
//!
//! Every request passes through two stages:
//!
//! ```text
//! 1. Resolve     raw strings      →  ImageParameters   (validated, defaulted)
//! 2. Synthesize  ImageParameters  →  ImageResult       (bytes + MIME type)
//! ```
//!
//! Resolution is pure and never touches pixels, so every validation rule is
//! unit testable on its own. Synthesis never sees unvalidated input, so its
//! only failures are server-side ones (font, allocation, encoder).
//!
//! Both the HTTP server and the `render` command drive the same two stages.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`color`] | Hex color parsing and the default palette |
//! | [`format`] | The closed set of output formats and their MIME types |
//! | [`params`] | Parameter resolution: raw strings → [`params::ImageParameters`] |
//! | [`imaging`] | Canvas, text rasterization and per-format encoding |
//! | [`server`] | axum router, error → status mapping, CORS |
//! | [`render`] | Offline rendering of placeholders to files |
//! | [`config`] | `placeholdr.toml` loading, validation and the stock template |
//! | [`output`] | CLI output formatting for `render` |
//! | [`logging`] | `tracing` subscriber setup |
//!
//! # Design Decisions
//!
//! ## Stateless Rendering
//!
//! Nothing is cached between requests: the font is parsed and the canvas
//! allocated per call. Identical parameters produce identical bytes, so any
//! caching belongs in front of the service, not inside it.
//!
//! ## Embedded Font
//!
//! DejaVu Sans is compiled into the binary, so the service runs without any
//! fonts installed. A different TrueType file can be configured under
//! `[render] font`.
//!
//! ## Fixed Encoder Settings
//!
//! Each format has exactly one set of encoder settings (see
//! [`imaging::encode`]). Clients choose the format, never the quality.

pub mod color;
pub mod config;
pub mod format;
pub mod imaging;
pub mod logging;
pub mod output;
pub mod params;
pub mod render;
pub mod server;

#[cfg(test)]
pub(crate) mod test_helpers;
