//! Offline rendering: placeholders written straight to disk.
//!
//! Parameters go through the same resolver as HTTP requests, so the CLI and
//! the server agree on defaults and on what is invalid. Every format is
//! validated before anything is rendered; rendering then fans out over the
//! rayon pool, one format per task, with no shared mutable state.

use crate::format::ImageFormat;
use crate::imaging::{ImageBackend, SynthesisError};
use crate::params::{ImageParameters, RawParams, ResolveError, Size};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("{0}")]
    Resolve(#[from] ResolveError),
    #[error("Rendering failed: {0}")]
    Synthesis(#[from] SynthesisError),
    #[error("Failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// One file produced by [`render_to_dir`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    pub path: PathBuf,
    pub format: ImageFormat,
    /// Pixel dimensions, after scaling.
    pub size: Size,
    pub bytes: usize,
}

/// `placeholder-<w>x<h>.<token>`, using the scaled pixel size.
pub fn output_file_name(size: Size, format: ImageFormat) -> String {
    format!("placeholder-{}x{}.{}", size.width, size.height, format.token())
}

/// Resolve `raw` once per format token, dropping repeated formats.
pub fn resolve_jobs(
    raw: &RawParams,
    formats: &[String],
) -> Result<Vec<ImageParameters>, ResolveError> {
    let mut jobs: Vec<ImageParameters> = Vec::with_capacity(formats.len());
    for token in formats {
        let params = raw.resolve(token)?;
        if !jobs.iter().any(|j| j.format == params.format) {
            jobs.push(params);
        }
    }
    Ok(jobs)
}

/// Render every requested format into `out_dir`, creating it if needed.
///
/// Results come back in the order the formats were given.
pub fn render_to_dir(
    backend: &dyn ImageBackend,
    raw: &RawParams,
    formats: &[String],
    out_dir: &Path,
) -> Result<Vec<RenderedFile>, RenderError> {
    let jobs = resolve_jobs(raw, formats)?;
    fs::create_dir_all(out_dir).map_err(|source| RenderError::Io {
        path: out_dir.to_path_buf(),
        source,
    })?;

    jobs.par_iter()
        .map(|params| render_one(backend, params, out_dir))
        .collect()
}

fn render_one(
    backend: &dyn ImageBackend,
    params: &ImageParameters,
    out_dir: &Path,
) -> Result<RenderedFile, RenderError> {
    let result = backend.generate(params)?;
    let size = params.scaled_size().unwrap_or(params.size);
    let path = out_dir.join(output_file_name(size, params.format));
    debug!(path = %path.display(), bytes = result.length, "writing placeholder");

    fs::write(&path, &result.bytes).map_err(|source| RenderError::Io {
        path: path.clone(),
        source,
    })?;
    Ok(RenderedFile {
        path,
        format: params.format,
        size,
        bytes: result.length,
    })
}
