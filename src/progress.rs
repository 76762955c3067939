//! Progress-callback trait for per-document batch events.
//!
//! Inject an [`Arc<dyn BatchProgressCallback>`] via
//! [`crate::config::StitchConfigBuilder::progress_callback`] to receive
//! events as the batch runner walks the input folder.
//!
//! # Example
//!
//! ```rust
//! use pdfstitch::{BatchProgressCallback, DocumentOutcome, StitchConfig};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     written: AtomicUsize,
//! }
//!
//! impl BatchProgressCallback for CountingCallback {
//!     fn on_document_complete(&self, _index: usize, _total: usize, name: &str, outcome: &DocumentOutcome) {
//!         if outcome.is_written() {
//!             self.written.fetch_add(1, Ordering::SeqCst);
//!             eprintln!("stitched {name}");
//!         }
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback { written: AtomicUsize::new(0) });
//!
//! let config = StitchConfig::builder()
//!     .progress_callback(counter as Arc<dyn BatchProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use crate::error::DocumentError;
use crate::output::{BatchReport, DocumentOutcome};
use std::sync::Arc;

/// Called by the batch runner as it processes each document.
///
/// Documents are processed one at a time, so calls never overlap. The trait
/// is still `Send + Sync` because the batch runs on a blocking worker thread
/// when driven through the async entry points. All methods default to no-ops.
///
/// `index` is 1-based; `total` is the number of selected documents.
pub trait BatchProgressCallback: Send + Sync {
    /// Called once after the input folder has been listed and filtered.
    fn on_batch_start(&self, total_documents: usize) {
        let _ = total_documents;
    }

    /// Called just before a document is rasterised.
    fn on_document_start(&self, index: usize, total: usize, name: &str) {
        let _ = (index, total, name);
    }

    /// Called when a document was written or turned out to be empty.
    fn on_document_complete(
        &self,
        index: usize,
        total: usize,
        name: &str,
        outcome: &DocumentOutcome,
    ) {
        let _ = (index, total, name, outcome);
    }

    /// Called when a document failed; the batch continues afterwards.
    fn on_document_error(&self, index: usize, total: usize, name: &str, error: &DocumentError) {
        let _ = (index, total, name, error);
    }

    /// Called once after the last document.
    fn on_batch_complete(&self, report: &BatchReport) {
        let _ = report;
    }
}

/// A no-op implementation, handy as a default.
pub struct NoopProgressCallback;

impl BatchProgressCallback for NoopProgressCallback {}

/// Shared, thread-safe handle to a progress callback.
pub type ProgressCallback = Arc<dyn BatchProgressCallback>;
