//! PDF encoding: stitched `RgbImage` → single-page PDF on disk.
//!
//! The page holds exactly one `DeviceRGB` image XObject, Flate-compressed so
//! the pixels survive losslessly. The page size follows the resolution:
//! `points = pixels × 72 / dpi`, so printing the output at 100 % reproduces the
//! physical size of the source pages.
//!
//! Stitched pages get tall quickly. PDF readers refuse page sides longer than
//! 14 400 units, so oversize pages declare a `/UserUnit` larger than one
//! point and shrink the MediaBox by the same factor.
//!
//! Nothing time-dependent goes into the file: encoding the same canvas twice
//! yields identical bytes.

use crate::error::DocumentError;
use crate::pipeline::render::POINTS_PER_INCH;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use image::RgbImage;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

/// Largest page side, in user-space units, that PDF readers accept.
pub const MAX_PAGE_UNITS: f32 = 14_400.0;

/// Resource name of the stitched image on the output page.
pub const IMAGE_NAME: &str = "Im0";

/// Writes a stitched canvas to `path` as a single-page document.
///
/// Implementations must leave nothing at `path` when they fail.
pub trait Encoder {
    fn encode(&self, canvas: &RgbImage, path: &Path, dpi: u32) -> Result<(), DocumentError>;
}

/// Physical layout of the output page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    /// MediaBox width in user units.
    pub width: f32,
    /// MediaBox height in user units.
    pub height: f32,
    /// Size of one user unit in points (1.0 unless the page is oversize).
    pub user_unit: f32,
}

impl PageGeometry {
    pub fn for_canvas(width_px: u32, height_px: u32, dpi: u32) -> Self {
        let scale = POINTS_PER_INCH / dpi as f32;
        let width_pt = width_px as f32 * scale;
        let height_pt = height_px as f32 * scale;
        let longest = width_pt.max(height_pt);

        let user_unit = if longest > MAX_PAGE_UNITS {
            longest / MAX_PAGE_UNITS
        } else {
            1.0
        };

        Self {
            width: width_pt / user_unit,
            height: height_pt / user_unit,
            user_unit,
        }
    }

    pub fn needs_user_unit(&self) -> bool {
        self.user_unit > 1.0
    }
}

/// The production [`Encoder`], built on `lopdf`.
#[derive(Debug, Clone, Copy)]
pub struct PdfEncoder {
    compression: Compression,
}

impl Default for PdfEncoder {
    fn default() -> Self {
        Self {
            compression: Compression::default(),
        }
    }
}

impl PdfEncoder {
    pub fn new(compression: Compression) -> Self {
        Self { compression }
    }

    /// Serialise `canvas` as a complete PDF file in memory.
    pub fn to_bytes(&self, canvas: &RgbImage, dpi: u32) -> Result<Vec<u8>, lopdf::Error> {
        let (width_px, height_px) = canvas.dimensions();
        let geometry = PageGeometry::for_canvas(width_px, height_px, dpi);

        let mut encoder = ZlibEncoder::new(Vec::new(), self.compression);
        encoder.write_all(canvas.as_raw())?;
        let pixels = encoder.finish()?;

        let version = if geometry.needs_user_unit() { "1.6" } else { "1.5" };
        let mut doc = Document::with_version(version);
        let pages_id = doc.new_object_id();

        let image = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => width_px as i64,
                "Height" => height_px as i64,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
                "Filter" => "FlateDecode",
            },
            pixels,
        )
        .with_compression(false);
        let image_id = doc.add_object(image);

        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        geometry.width.into(),
                        0.into(),
                        0.into(),
                        geometry.height.into(),
                        0.into(),
                        0.into(),
                    ],
                ),
                Operation::new("Do", vec![Object::Name(IMAGE_NAME.as_bytes().to_vec())]),
                Operation::new("Q", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));

        let mut page = dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), geometry.width.into(), geometry.height.into()],
            "Contents" => content_id,
            "Resources" => dictionary! {
                "XObject" => dictionary! { IMAGE_NAME => image_id },
            },
        };
        if geometry.needs_user_unit() {
            page.set("UserUnit", geometry.user_unit);
        }
        let page_id = doc.add_object(page);

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        let info_id = doc.add_object(dictionary! {
            "Producer" => Object::string_literal(concat!("pdfstitch ", env!("CARGO_PKG_VERSION"))),
        });
        doc.trailer.set("Root", catalog_id);
        doc.trailer.set("Info", info_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)?;

        debug!(
            "Encoded {}x{} px canvas → {:.1}x{:.1} units (UserUnit {:.3}), {} bytes",
            width_px,
            height_px,
            geometry.width,
            geometry.height,
            geometry.user_unit,
            bytes.len()
        );

        Ok(bytes)
    }
}

impl Encoder for PdfEncoder {
    fn encode(&self, canvas: &RgbImage, path: &Path, dpi: u32) -> Result<(), DocumentError> {
        let bytes = self.to_bytes(canvas, dpi).map_err(|e| DocumentError::Encode {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;
        write_atomic(path, &bytes)
    }
}

/// Write `bytes` to a temp file beside `path`, then rename it into place.
///
/// The temp file is removed on every error path, so a failed write leaves
/// `path` untouched.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), DocumentError> {
    let write_err = |source: std::io::Error| DocumentError::Write {
        path: path.to_path_buf(),
        source,
    };

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::Builder::new()
        .prefix(".pdfstitch-")
        .suffix(".tmp")
        .tempfile_in(parent)
        .map_err(write_err)?;
    tmp.write_all(bytes).map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;
    relax_permissions(&tmp).map_err(write_err)?;

    tmp.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}

// Temp files are created owner-only; the output should look like any other file.
#[cfg(unix)]
fn relax_permissions(tmp: &NamedTempFile) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    tmp.as_file()
        .set_permissions(std::fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn relax_permissions(_tmp: &NamedTempFile) -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::ZlibDecoder;
    use image::Rgb;
    use std::io::Read;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn geometry_follows_dpi() {
        let g = PageGeometry::for_canvas(150, 500, 200);
        assert!(approx(g.width, 54.0));
        assert!(approx(g.height, 180.0));
        assert_eq!(g.user_unit, 1.0);
        assert!(!g.needs_user_unit());
    }

    #[test]
    fn oversize_page_uses_user_unit() {
        // 100 pages of 2200 px at 200 DPI = 79 200 pt tall
        let g = PageGeometry::for_canvas(1700, 220_000, 200);
        assert!(g.needs_user_unit());
        assert!(approx(g.height, MAX_PAGE_UNITS));
        assert!(approx(g.height * g.user_unit, 79_200.0));
        assert!(approx(g.width * g.user_unit, 612.0));
    }

    #[test]
    fn round_trips_pixels_and_media_box() {
        let mut canvas = RgbImage::from_pixel(2, 3, Rgb([255, 255, 255]));
        canvas.put_pixel(1, 2, Rgb([7, 8, 9]));

        let bytes = PdfEncoder::default().to_bytes(&canvas, 72).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();

        let pages = doc.get_pages();
        assert_eq!(pages.len(), 1);
        let page = doc.get_dictionary(pages[&1]).unwrap();

        let media_box: Vec<f32> = page
            .get(b"MediaBox")
            .unwrap()
            .as_array()
            .unwrap()
            .iter()
            .map(|o| o.as_float().unwrap())
            .collect();
        assert_eq!(media_box, vec![0.0, 0.0, 2.0, 3.0]);

        let image_id = page
            .get(b"Resources")
            .and_then(Object::as_dict)
            .and_then(|r| r.get(b"XObject"))
            .and_then(Object::as_dict)
            .and_then(|x| x.get(IMAGE_NAME.as_bytes()))
            .and_then(Object::as_reference)
            .unwrap();
        let image = doc.get_object(image_id).and_then(Object::as_stream).unwrap();
        assert_eq!(image.dict.get(b"Width").unwrap().as_i64().unwrap(), 2);
        assert_eq!(image.dict.get(b"Height").unwrap().as_i64().unwrap(), 3);

        let mut raw = Vec::new();
        ZlibDecoder::new(image.content.as_slice())
            .read_to_end(&mut raw)
            .unwrap();
        assert_eq!(raw, canvas.into_raw());
    }

    #[test]
    fn same_canvas_same_bytes() {
        let canvas = RgbImage::from_pixel(5, 5, Rgb([1, 2, 3]));
        let enc = PdfEncoder::default();
        assert_eq!(enc.to_bytes(&canvas, 200).unwrap(), enc.to_bytes(&canvas, 200).unwrap());
    }

    #[test]
    fn failed_write_leaves_nothing_behind() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("missing").join("out.pdf");
        let canvas = RgbImage::from_pixel(1, 1, Rgb([0, 0, 0]));

        let err = PdfEncoder::default()
            .encode(&canvas, &target, 200)
            .unwrap_err();
        assert!(matches!(err, DocumentError::Write { .. }));
        assert!(!target.exists());
    }

    #[test]
    fn encode_writes_only_the_target() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.pdf");
        let canvas = RgbImage::from_pixel(4, 4, Rgb([0, 0, 0]));

        PdfEncoder::default().encode(&canvas, &target, 200).unwrap();

        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("out.pdf")]);
        assert!(std::fs::read(&target).unwrap().starts_with(b"%PDF-1.5"));
    }
}
