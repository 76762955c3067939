//! PDF rasterisation: render every page to a `DynamicImage` via pdfium.
//!
//! Pages are rendered at `points × dpi / 72` pixels on each side, rounded up,
//! so a US-Letter page at 200 DPI comes out at 1700 × 2200 px.

use crate::error::{DocumentError, StitchError};
use crate::pipeline::input;
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::path::Path;
use tracing::{debug, info};

/// Points per inch in PDF user space.
pub const POINTS_PER_INCH: f32 = 72.0;

/// Turns a document on disk into its page images, in page order.
///
/// Implementations return an empty vector for a document with no pages and a
/// decode-class [`DocumentError`] when the source cannot be rasterised.
pub trait Rasterizer {
    fn rasterize(&self, path: &Path, dpi: u32) -> Result<Vec<DynamicImage>, DocumentError>;
}

/// The production [`Rasterizer`], backed by a bound pdfium library.
pub struct PdfiumRasterizer {
    pdfium: Pdfium,
}

impl PdfiumRasterizer {
    pub fn new(pdfium: Pdfium) -> Self {
        Self { pdfium }
    }

    /// Bind pdfium using [`crate::pdfium::bind_pdfium`] and wrap it.
    pub fn bind() -> Result<Self, StitchError> {
        crate::pdfium::bind_pdfium().map(Self::new)
    }
}

impl Rasterizer for PdfiumRasterizer {
    fn rasterize(&self, pdf_path: &Path, dpi: u32) -> Result<Vec<DynamicImage>, DocumentError> {
        input::validate_source(pdf_path)?;

        let decode_err = |e: PdfiumError| DocumentError::Decode {
            path: pdf_path.to_path_buf(),
            detail: format!("{:?}", e),
        };

        let document = self
            .pdfium
            .load_pdf_from_file(pdf_path, None)
            .map_err(decode_err)?;

        let pages = document.pages();
        let total_pages = pages.len() as usize;
        info!("PDF loaded: {} pages", total_pages);

        let mut images = Vec::with_capacity(total_pages);

        for (idx, page) in pages.iter().enumerate() {
            let target_width = points_to_pixels(page.width().value, dpi);
            let target_height = points_to_pixels(page.height().value, dpi);

            let render_config = PdfRenderConfig::new()
                .set_target_width(target_width)
                .set_target_height(target_height);

            let bitmap = page
                .render_with_config(&render_config)
                .map_err(|e| DocumentError::Decode {
                    path: pdf_path.to_path_buf(),
                    detail: format!("page {}: {:?}", idx + 1, e),
                })?;

            let image = bitmap.as_image();
            debug!(
                "Rendered page {} → {}x{} px",
                idx + 1,
                image.width(),
                image.height()
            );

            images.push(image);
        }

        Ok(images)
    }
}

/// Pixel length of `points` at `dpi`, rounded up and never below 1.
pub fn points_to_pixels(points: f32, dpi: u32) -> i32 {
    let px = (points * dpi as f32 / POINTS_PER_INCH).ceil();
    if px.is_finite() && px >= 1.0 {
        px.min(i32::MAX as f32) as i32
    } else {
        1
    }
}
