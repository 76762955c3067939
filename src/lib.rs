//! # pdfstitch
//!
//! Turn every multi-page PDF in a folder into a single-page PDF whose one
//! page is all of the original pages stacked top to bottom.
//!
//! ## Pipeline Overview
//!
//! ```text
//! folder
//!  │
//!  ├─ 1. Select   *.pdf entries, case-insensitive, non-recursive
//!  ├─ 2. Render   rasterise each page via pdfium at the chosen DPI
//!  ├─ 3. Compose  canvas = (max width, Σ heights), white, pages flush-left
//!  └─ 4. Encode   one-page PDF, page size = pixels × 72 / DPI
//! ```
//!
//! A document that fails to decode or encode is logged and skipped; the rest
//! of the batch carries on. A document with no pages is skipped without
//! writing anything.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdfstitch::{stitch_folder, StitchConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = StitchConfig::builder().dpi(200).build()?;
//!     let report = stitch_folder("scans", "stitched", &config).await?;
//!     eprintln!("{} written, {} failed", report.written, report.failed_count());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdfstitch` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod batch;
pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pdfium;
pub mod pipeline;
pub mod progress;
pub mod stitcher;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use batch::BatchRunner;
pub use config::{StitchConfig, StitchConfigBuilder, DEFAULT_DPI, DEFAULT_EXTENSION};
pub use convert::{stitch_file, stitch_file_sync, stitch_folder, stitch_folder_sync};
pub use error::{DocumentError, StitchError};
pub use output::{BatchReport, DocumentOutcome, FailedDocument};
pub use pipeline::encode::{Encoder, PdfEncoder};
pub use pipeline::render::{PdfiumRasterizer, Rasterizer};
pub use progress::{BatchProgressCallback, NoopProgressCallback, ProgressCallback};
pub use stitcher::PageStitcher;
