//! Top-level entry points wiring pdfium and the PDF encoder together.
//!
//! pdfium is CPU-bound and not async-safe, so the async variants move the
//! whole batch onto one `spawn_blocking` thread. Documents are still
//! processed strictly one after another.

use crate::batch::BatchRunner;
use crate::config::StitchConfig;
use crate::error::{DocumentError, StitchError};
use crate::output::{BatchReport, DocumentOutcome};
use crate::pipeline::encode::PdfEncoder;
use crate::pipeline::render::PdfiumRasterizer;
use crate::stitcher::PageStitcher;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Stitch every matching PDF in `input_folder` into `output_folder`.
///
/// # Errors
/// Returns `Err(StitchError)` only for fatal errors (pdfium unavailable,
/// unreadable input folder, output folder not creatable). Individual
/// document failures are reported in [`BatchReport::failed`].
pub async fn stitch_folder(
    input_folder: impl AsRef<Path>,
    output_folder: impl AsRef<Path>,
    config: &StitchConfig,
) -> Result<BatchReport, StitchError> {
    let input = input_folder.as_ref().to_path_buf();
    let output = output_folder.as_ref().to_path_buf();
    let config = config.clone();

    tokio::task::spawn_blocking(move || stitch_folder_sync(&input, &output, &config))
        .await
        .map_err(|e| StitchError::Internal(format!("Stitch task panicked: {}", e)))?
}

/// Blocking twin of [`stitch_folder`].
pub fn stitch_folder_sync(
    input_folder: impl AsRef<Path>,
    output_folder: impl AsRef<Path>,
    config: &StitchConfig,
) -> Result<BatchReport, StitchError> {
    let runner = BatchRunner::new(default_stitcher()?, config);
    runner.process_folder(input_folder.as_ref(), output_folder.as_ref(), config.dpi)
}

/// Stitch a single PDF into `output`.
///
/// The outer `Result` carries fatal errors; the inner one the document's own
/// outcome, exactly as the batch runner would see it.
pub async fn stitch_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    dpi: u32,
) -> Result<Result<DocumentOutcome, DocumentError>, StitchError> {
    let input: PathBuf = input.as_ref().to_path_buf();
    let output: PathBuf = output.as_ref().to_path_buf();

    tokio::task::spawn_blocking(move || stitch_file_sync(&input, &output, dpi))
        .await
        .map_err(|e| StitchError::Internal(format!("Stitch task panicked: {}", e)))?
}

/// Blocking twin of [`stitch_file`].
pub fn stitch_file_sync(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    dpi: u32,
) -> Result<Result<DocumentOutcome, DocumentError>, StitchError> {
    if dpi == 0 {
        return Err(StitchError::InvalidConfig("DPI must be ≥ 1, got 0".into()));
    }
    let stitcher = default_stitcher()?;
    Ok(stitcher.process_document(input.as_ref(), output.as_ref(), dpi))
}

fn default_stitcher() -> Result<PageStitcher<PdfiumRasterizer, PdfEncoder>, StitchError> {
    let rasterizer = PdfiumRasterizer::bind()?;
    debug!("pdfium bound");
    Ok(PageStitcher::new(rasterizer, PdfEncoder::default()))
}
