//! Result types produced by the document and batch stages.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// What happened to one document that did not fail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentOutcome {
    /// A stitched single-page PDF was written.
    Written {
        output: PathBuf,
        page_count: usize,
        /// Canvas width in pixels (widest page).
        width: u32,
        /// Canvas height in pixels (sum of page heights).
        height: u32,
    },
    /// The document decoded to zero pages; nothing was written.
    Empty,
}

impl DocumentOutcome {
    pub fn is_written(&self) -> bool {
        matches!(self, DocumentOutcome::Written { .. })
    }
}

/// A document that failed, as recorded in [`BatchReport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedDocument {
    /// File name inside the input folder.
    pub name: String,
    /// Human-readable cause.
    pub error: String,
}

/// Summary of one [`crate::batch::BatchRunner::process_folder`] run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    /// Entries whose name matched the document extension.
    pub selected: usize,
    /// Documents that produced an output file.
    pub written: usize,
    /// Documents that decoded to zero pages.
    pub empty: usize,
    /// Documents that failed, in processing order.
    pub failed: Vec<FailedDocument>,
    /// Wall-clock time for the whole batch.
    pub duration_ms: u64,
}

impl BatchReport {
    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }

    /// `true` when every selected document was written or was empty.
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}
