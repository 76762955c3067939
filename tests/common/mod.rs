//! Shared helpers for the integration tests.

#![allow(dead_code)]

use flate2::read::ZlibDecoder;
use image::{DynamicImage, Rgb, RgbImage};
use lopdf::{Document, Object};
use pdfstitch::{DocumentError, Rasterizer};
use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};

pub const RED: [u8; 3] = [255, 0, 0];
pub const GREEN: [u8; 3] = [0, 255, 0];
pub const BLUE: [u8; 3] = [0, 0, 255];
pub const WHITE: [u8; 3] = [255, 255, 255];

/// What the synthetic rasterizer returns for one file name.
#[derive(Clone)]
pub enum FakeDoc {
    /// Solid-colour pages: `(width, height, colour)`.
    Pages(Vec<(u32, u32, [u8; 3])>),
    /// Simulated decode failure.
    Corrupt,
}

/// A [`Rasterizer`] that serves pre-programmed pages keyed by file name and
/// records every path it was asked to decode.
#[derive(Default)]
pub struct FakeRasterizer {
    docs: HashMap<String, FakeDoc>,
    pub calls: RefCell<Vec<PathBuf>>,
}

impl FakeRasterizer {
    pub fn with(mut self, name: &str, doc: FakeDoc) -> Self {
        self.docs.insert(name.to_string(), doc);
        self
    }
}

impl Rasterizer for &FakeRasterizer {
    fn rasterize(&self, path: &Path, _dpi: u32) -> Result<Vec<DynamicImage>, DocumentError> {
        self.calls.borrow_mut().push(path.to_path_buf());
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        match self.docs.get(&name) {
            Some(FakeDoc::Pages(pages)) => Ok(pages
                .iter()
                .map(|&(w, h, c)| DynamicImage::ImageRgb8(RgbImage::from_pixel(w, h, Rgb(c))))
                .collect()),
            Some(FakeDoc::Corrupt) | None => Err(DocumentError::Decode {
                path: path.to_path_buf(),
                detail: "synthetic decode failure".into(),
            }),
        }
    }
}

/// Create placeholder files so the batch runner can list them.
pub fn touch_all(dir: &Path, names: &[&str]) {
    for name in names {
        std::fs::write(dir.join(name), b"%PDF-1.4\n").unwrap();
    }
}

/// The single page of a stitched PDF, read back from disk.
pub struct Stitched {
    /// `[llx, lly, urx, ury]` in user units.
    pub media_box: Vec<f32>,
    pub user_unit: Option<f32>,
    pub image: RgbImage,
}

pub fn read_stitched(path: &Path) -> Stitched {
    let doc = Document::load(path).expect("output should be a readable PDF");
    let pages = doc.get_pages();
    assert_eq!(pages.len(), 1, "output must have exactly one page");
    let page_id = *pages.values().next().unwrap();
    let page = doc.get_dictionary(page_id).unwrap();

    let media_box = page
        .get(b"MediaBox")
        .and_then(Object::as_array)
        .unwrap()
        .iter()
        .map(|o| o.as_float().unwrap())
        .collect();
    let user_unit = page.get(b"UserUnit").ok().map(|o| o.as_float().unwrap());

    let image_id = page
        .get(b"Resources")
        .and_then(Object::as_dict)
        .and_then(|r| r.get(b"XObject"))
        .and_then(Object::as_dict)
        .and_then(|x| x.get(b"Im0"))
        .and_then(Object::as_reference)
        .unwrap();
    let stream = doc.get_object(image_id).and_then(Object::as_stream).unwrap();
    let width = stream.dict.get(b"Width").unwrap().as_i64().unwrap() as u32;
    let height = stream.dict.get(b"Height").unwrap().as_i64().unwrap() as u32;

    let mut raw = Vec::new();
    ZlibDecoder::new(stream.content.as_slice())
        .read_to_end(&mut raw)
        .unwrap();

    Stitched {
        media_box,
        user_unit,
        image: RgbImage::from_raw(width, height, raw).expect("pixel data matches dimensions"),
    }
}

/// Assert every pixel in the rectangle `[x0, x1) × [y0, y1)` equals `colour`.
pub fn assert_region(img: &RgbImage, x0: u32, x1: u32, y0: u32, y1: u32, colour: [u8; 3]) {
    for y in y0..y1 {
        for x in x0..x1 {
            assert_eq!(
                img.get_pixel(x, y).0,
                colour,
                "pixel ({x}, {y}) expected {colour:?}"
            );
        }
    }
}

pub fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}
