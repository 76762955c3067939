//! Source validation: make sure a path is a readable PDF before pdfium sees it.
//!
//! pdfium reports every failure as an opaque format error. Checking existence,
//! permissions and the `%PDF` header up front gives the status line a cause a
//! person can act on.

use crate::error::DocumentError;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;
use tracing::debug;

/// Readers accept junk before the header as long as it starts within this window.
const HEADER_SEARCH_WINDOW: usize = 1024;

/// Validate that `path` exists, is readable and carries a PDF header.
pub fn validate_source(path: &Path) -> Result<(), DocumentError> {
    let mut file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => DocumentError::NotFound {
            path: path.to_path_buf(),
        },
        ErrorKind::PermissionDenied => DocumentError::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => DocumentError::Decode {
            path: path.to_path_buf(),
            detail: e.to_string(),
        },
    })?;

    let mut head = Vec::with_capacity(HEADER_SEARCH_WINDOW);
    file.by_ref()
        .take(HEADER_SEARCH_WINDOW as u64)
        .read_to_end(&mut head)
        .map_err(|e| DocumentError::Decode {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;

    if !has_pdf_header(&head) {
        let mut magic = [0u8; 4];
        let n = head.len().min(4);
        magic[..n].copy_from_slice(&head[..n]);
        return Err(DocumentError::NotAPdf {
            path: path.to_path_buf(),
            magic,
        });
    }

    debug!("Validated source PDF: {}", path.display());
    Ok(())
}

fn has_pdf_header(head: &[u8]) -> bool {
    head.windows(4).any(|w| w == b"%PDF")
}
