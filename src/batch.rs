//! Folder-level driver: select documents, run each through [`PageStitcher`],
//! keep going when one fails.

use crate::config::StitchConfig;
use crate::error::StitchError;
use crate::output::{BatchReport, FailedDocument};
use crate::pipeline::encode::Encoder;
use crate::pipeline::render::Rasterizer;
use crate::progress::ProgressCallback;
use crate::stitcher::PageStitcher;
use std::ffi::OsString;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Runs a [`PageStitcher`] over every matching file in a folder.
pub struct BatchRunner<R, E> {
    stitcher: PageStitcher<R, E>,
    suffix: String,
    sorted: bool,
    progress: Option<ProgressCallback>,
}

impl<R: Rasterizer, E: Encoder> BatchRunner<R, E> {
    /// Take file selection and progress reporting from `config`.
    ///
    /// The resolution is passed to [`BatchRunner::process_folder`] instead.
    pub fn new(stitcher: PageStitcher<R, E>, config: &StitchConfig) -> Self {
        Self {
            stitcher,
            suffix: config.extension_suffix(),
            sorted: config.sorted,
            progress: config.progress_callback.clone(),
        }
    }

    /// Stitch every matching document in `input` into `output` at `dpi`.
    ///
    /// `output` is created (with parents) if missing. Subfolders of `input`
    /// are not descended into. Output files keep their input file names.
    ///
    /// # Errors
    /// Only folder-level failures are returned; per-document failures are
    /// logged and collected in [`BatchReport::failed`].
    pub fn process_folder(
        &self,
        input: &Path,
        output: &Path,
        dpi: u32,
    ) -> Result<BatchReport, StitchError> {
        let start = Instant::now();

        std::fs::create_dir_all(output).map_err(|e| StitchError::OutputDirCreate {
            path: output.to_path_buf(),
            source: e,
        })?;

        let names = self.select_documents(input)?;
        let total = names.len();
        info!(
            "Stitching {} document(s) from '{}' into '{}' at {} DPI",
            total,
            input.display(),
            output.display(),
            dpi
        );

        if let Some(ref cb) = self.progress {
            cb.on_batch_start(total);
        }

        let mut report = BatchReport {
            selected: total,
            ..BatchReport::default()
        };

        for (i, name) in names.iter().enumerate() {
            let index = i + 1;
            let display_name = name.to_string_lossy();

            if let Some(ref cb) = self.progress {
                cb.on_document_start(index, total, &display_name);
            }

            let result =
                self.stitcher
                    .process_document(&input.join(name), &output.join(name), dpi);

            match result {
                Ok(outcome) => {
                    if outcome.is_written() {
                        report.written += 1;
                    } else {
                        report.empty += 1;
                    }
                    if let Some(ref cb) = self.progress {
                        cb.on_document_complete(index, total, &display_name, &outcome);
                    }
                }
                Err(e) => {
                    if let Some(ref cb) = self.progress {
                        cb.on_document_error(index, total, &display_name, &e);
                    }
                    report.failed.push(FailedDocument {
                        name: display_name.into_owned(),
                        error: e.to_string(),
                    });
                }
            }
        }

        report.duration_ms = start.elapsed().as_millis() as u64;
        info!(
            "Batch complete: {} written, {} empty, {} failed in {}ms",
            report.written,
            report.empty,
            report.failed_count(),
            report.duration_ms
        );

        if let Some(ref cb) = self.progress {
            cb.on_batch_complete(&report);
        }

        Ok(report)
    }

    /// List `input` and keep regular files whose name ends with the extension.
    fn select_documents(&self, input: &Path) -> Result<Vec<OsString>, StitchError> {
        let read_err = |e: std::io::Error| StitchError::InputDirRead {
            path: input.to_path_buf(),
            source: e,
        };

        let mut names = Vec::new();
        for entry in std::fs::read_dir(input).map_err(read_err)? {
            let entry = entry.map_err(read_err)?;
            let name = entry.file_name();

            if !matches_extension(&name, &self.suffix) {
                continue;
            }
            if !entry.path().is_file() {
                debug!("Skipping '{}': not a regular file", entry.path().display());
                continue;
            }
            names.push(name);
        }

        if self.sorted {
            names.sort();
        }
        Ok(names)
    }
}

/// Case-insensitive `name.ends_with(suffix)`; `suffix` is already lower-case.
pub fn matches_extension(name: &std::ffi::OsStr, suffix: &str) -> bool {
    name.to_string_lossy().to_lowercase().ends_with(suffix)
}
