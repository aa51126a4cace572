//! PDF Renderer: sanitizes generated text, lays it out on branded A4 pages,
//! and serializes the result.
//!
//! Layout and serialization are CPU-bound and synchronous; async callers run
//! them inside `tokio::task::spawn_blocking`.

pub mod encoding;
pub mod font_metrics;
pub mod layout;
pub mod pdf;
pub mod sanitize;

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

pub use encoding::EncodingError;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Encoding(#[from] EncodingError),

    #[error("PDF serialization failed: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("Failed to write PDF to {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Renders a titled document with a body section and an optional rubric
/// section, returning the PDF bytes.
pub fn render(title: &str, body: &str, rubric: Option<&str>) -> Result<Vec<u8>, RenderError> {
    // An empty rubric gets no section.
    let rubric = rubric.filter(|r| !r.is_empty());
    let layout = layout::layout_document(title, body, rubric)?;
    let bytes = pdf::write_pdf(&layout)?;
    info!(
        pages = layout.page_count(),
        bytes = bytes.len(),
        with_rubric = rubric.is_some(),
        "Rendered PDF"
    );
    Ok(bytes)
}

/// Renders and writes the PDF to `path`, replacing whatever export was there.
/// Two concurrent exports to the same path race; the later write wins.
pub fn export_to_file(
    path: &Path,
    title: &str,
    body: &str,
    rubric: Option<&str>,
) -> Result<Vec<u8>, RenderError> {
    let bytes = render(title, body, rubric)?;
    std::fs::write(path, &bytes).map_err(|source| RenderError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(bytes)
}
