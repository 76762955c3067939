//! Pipeline stages for stitching one document.
//!
//! ```text
//! input ──▶ render ──▶ compose ──▶ encode
//! (%PDF?)   (pdfium)   (canvas)    (lopdf)
//! ```
//!
//! 1. [`input`]: reject missing, unreadable or non-PDF files early
//! 2. [`render`]: rasterise every page at the requested DPI
//! 3. [`compose`]: stack pages flush-left on a white canvas
//! 4. [`encode`]: write the canvas as a single-page PDF, atomically
//!
//! [`render::Rasterizer`] and [`encode::Encoder`] are the seams: tests drive
//! the pipeline with synthetic pages and inspect what the encoder wrote.

pub mod compose;
pub mod encode;
pub mod input;
pub mod render;
