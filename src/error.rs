//! Error types for the pdfstitch library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`StitchError`] (**fatal**): the batch cannot proceed at all (input
//!   folder unreadable, output folder cannot be created, pdfium missing).
//!   Returned as `Err(StitchError)` from the top-level `stitch_*` functions.
//!
//! * [`DocumentError`] (**non-fatal**): a single document failed (corrupt
//!   file, encoder failure) but its siblings are fine. The batch runner logs
//!   it, records it in [`crate::output::BatchReport`] and moves on.
//!
//! A document that decodes to zero pages is neither: it is reported as
//! [`crate::output::DocumentOutcome::Empty`].

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the pdfstitch library.
#[derive(Debug, Error)]
pub enum StitchError {
    // ── Folder errors ─────────────────────────────────────────────────────
    /// The input folder could not be listed.
    #[error("Cannot read input folder '{path}': {source}")]
    InputDirRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The output folder (or one of its parents) could not be created.
    #[error("Cannot create output folder '{path}': {source}")]
    OutputDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
You can:\n\
  • Set PDFIUM_LIB_PATH=/path/to/libpdfium (or its directory).\n\
  • Place libpdfium next to the working directory.\n\
  • Install pdfium system-wide.\n"
    )]
    PdfiumBindingFailed(String),

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single document.
///
/// No output file exists for a document that failed with one of these.
#[derive(Debug, Error)]
pub enum DocumentError {
    // ── Decode errors ─────────────────────────────────────────────────────
    /// Source file was not found at the given path.
    #[error("PDF file not found: '{path}'")]
    NotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but carries no PDF header.
    #[error("File is not a valid PDF: '{path}' (first bytes: {magic:?})")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    /// pdfium could not open or rasterise the document.
    #[error("Error converting '{path}' to images: {detail}")]
    Decode { path: PathBuf, detail: String },

    // ── Compose errors ────────────────────────────────────────────────────
    /// The stitched canvas would not fit in an image buffer.
    #[error("Stitched canvas for '{path}' is too large: {width}x{height} px")]
    CanvasTooLarge { path: PathBuf, width: u64, height: u64 },

    // ── Encode errors ─────────────────────────────────────────────────────
    /// The canvas could not be serialised as a PDF.
    #[error("Failed to encode '{path}': {detail}")]
    Encode { path: PathBuf, detail: String },

    /// The encoded PDF could not be written to disk.
    #[error("Failed to write output file '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DocumentError {
    /// `true` when the source document itself could not be read or rasterised.
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            DocumentError::NotFound { .. }
                | DocumentError::PermissionDenied { .. }
                | DocumentError::NotAPdf { .. }
                | DocumentError::Decode { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_display_names_file_and_cause() {
        let e = DocumentError::Decode {
            path: PathBuf::from("in/broken.pdf"),
            detail: "PdfiumLibraryInternalError(FormatError)".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("in/broken.pdf"), "got: {msg}");
        assert!(msg.contains("FormatError"), "got: {msg}");
        assert!(e.is_decode_error());
    }

    #[test]
    fn write_error_is_not_decode_class() {
        let e = DocumentError::Write {
            path: PathBuf::from("out/a.pdf"),
            source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
        };
        assert!(!e.is_decode_error());
        assert!(e.to_string().contains("disk full"));
    }

    #[test]
    fn canvas_too_large_display() {
        let e = DocumentError::CanvasTooLarge {
            path: PathBuf::from("huge.pdf"),
            width: 10,
            height: 5_000_000_000,
        };
        assert!(e.to_string().contains("10x5000000000"));
    }

    #[test]
    fn output_dir_display() {
        let e = StitchError::OutputDirCreate {
            path: PathBuf::from("/readonly/out"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(e.to_string().contains("/readonly/out"));
    }
}
