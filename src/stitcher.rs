//! One document through the pipeline: rasterise → measure → compose → encode.

use crate::error::DocumentError;
use crate::output::DocumentOutcome;
use crate::pipeline::compose;
use crate::pipeline::encode::Encoder;
use crate::pipeline::render::Rasterizer;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Stitches the pages of one document into a single tall page.
///
/// Holds no per-document state; every call allocates and drops its own page
/// images and canvas.
pub struct PageStitcher<R, E> {
    rasterizer: R,
    encoder: E,
}

impl<R: Rasterizer, E: Encoder> PageStitcher<R, E> {
    pub fn new(rasterizer: R, encoder: E) -> Self {
        Self {
            rasterizer,
            encoder,
        }
    }

    /// Rasterise `input` at `dpi`, stack its pages and write the result to `output`.
    ///
    /// Exactly one file is written on `Ok(DocumentOutcome::Written { .. })`;
    /// nothing is written for `Ok(DocumentOutcome::Empty)` or any `Err`.
    /// One status event is logged per call.
    pub fn process_document(
        &self,
        input: &Path,
        output: &Path,
        dpi: u32,
    ) -> Result<DocumentOutcome, DocumentError> {
        let result = self.stitch(input, output, dpi);

        match &result {
            Ok(DocumentOutcome::Written { .. }) => {
                info!("Processed '{}' -> '{}'", input.display(), output.display())
            }
            Ok(DocumentOutcome::Empty) => info!("No pages found in '{}'", input.display()),
            Err(e) => warn!("{}", e),
        }

        result
    }

    fn stitch(&self, input: &Path, output: &Path, dpi: u32) -> Result<DocumentOutcome, DocumentError> {
        let start = Instant::now();

        let pages = self.rasterizer.rasterize(input, dpi)?;

        let Some((width, height)) = compose::canvas_size(&pages) else {
            return Ok(DocumentOutcome::Empty);
        };

        let too_large = || DocumentError::CanvasTooLarge {
            path: input.to_path_buf(),
            width,
            height,
        };
        let canvas_width = u32::try_from(width).map_err(|_| too_large())?;
        let canvas_height = u32::try_from(height).map_err(|_| too_large())?;
        debug!(
            "Stitching {} pages into {}x{} px",
            pages.len(),
            canvas_width,
            canvas_height
        );

        let canvas = compose::stitch_pages(&pages, canvas_width, canvas_height);
        let page_count = pages.len();
        drop(pages);

        self.encoder.encode(&canvas, output, dpi)?;

        debug!(
            "'{}' stitched in {}ms",
            input.display(),
            start.elapsed().as_millis()
        );

        Ok(DocumentOutcome::Written {
            output: output.to_path_buf(),
            page_count,
            width: canvas_width,
            height: canvas_height,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, Rgb, RgbImage};
    use std::cell::RefCell;
    use std::path::PathBuf;

    struct Pages(Vec<(u32, u32)>);

    impl Rasterizer for Pages {
        fn rasterize(&self, _path: &Path, _dpi: u32) -> Result<Vec<DynamicImage>, DocumentError> {
            Ok(self
                .0
                .iter()
                .map(|&(w, h)| DynamicImage::ImageRgb8(RgbImage::from_pixel(w, h, Rgb([0, 0, 0]))))
                .collect())
        }
    }

    struct Broken;

    impl Rasterizer for Broken {
        fn rasterize(&self, path: &Path, _dpi: u32) -> Result<Vec<DynamicImage>, DocumentError> {
            Err(DocumentError::Decode {
                path: path.to_path_buf(),
                detail: "bad xref".into(),
            })
        }
    }

    #[derive(Default)]
    struct Recorder {
        calls: RefCell<Vec<(PathBuf, (u32, u32), u32)>>,
    }

    impl Encoder for &Recorder {
        fn encode(&self, canvas: &RgbImage, path: &Path, dpi: u32) -> Result<(), DocumentError> {
            self.calls
                .borrow_mut()
                .push((path.to_path_buf(), canvas.dimensions(), dpi));
            Ok(())
        }
    }

    #[test]
    fn written_outcome_carries_canvas_size() {
        let rec = Recorder::default();
        let stitcher = PageStitcher::new(Pages(vec![(100, 200), (150, 300)]), &rec);

        let outcome = stitcher
            .process_document(Path::new("a.pdf"), Path::new("out/a.pdf"), 200)
            .unwrap();

        assert_eq!(
            outcome,
            DocumentOutcome::Written {
                output: PathBuf::from("out/a.pdf"),
                page_count: 2,
                width: 150,
                height: 500,
            }
        );
        assert_eq!(
            *rec.calls.borrow(),
            vec![(PathBuf::from("out/a.pdf"), (150, 500), 200)]
        );
    }

    #[test]
    fn empty_document_skips_encoder() {
        let rec = Recorder::default();
        let stitcher = PageStitcher::new(Pages(vec![]), &rec);

        let outcome = stitcher
            .process_document(Path::new("e.pdf"), Path::new("out/e.pdf"), 200)
            .unwrap();

        assert_eq!(outcome, DocumentOutcome::Empty);
        assert!(rec.calls.borrow().is_empty());
    }

    #[test]
    fn decode_failure_skips_encoder() {
        let rec = Recorder::default();
        let stitcher = PageStitcher::new(Broken, &rec);

        let err = stitcher
            .process_document(Path::new("x.pdf"), Path::new("out/x.pdf"), 200)
            .unwrap_err();

        assert!(err.is_decode_error());
        assert!(rec.calls.borrow().is_empty());
    }

    #[test]
    fn dpi_is_threaded_to_encoder() {
        let rec = Recorder::default();
        let stitcher = PageStitcher::new(Pages(vec![(1, 1)]), &rec);
        stitcher
            .process_document(Path::new("a.pdf"), Path::new("a_out.pdf"), 96)
            .unwrap();
        assert_eq!(rec.calls.borrow()[0].2, 96);
    }
}
