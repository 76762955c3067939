//! Compositing: stack page images top-to-bottom on one white canvas.
//!
//! The canvas is as wide as the widest page and exactly as tall as all pages
//! together. Every page is pasted at x = 0; narrower pages leave white to
//! their right. Paste overwrites the destination region with the page's RGB
//! pixels, so any alpha channel is dropped rather than blended.

use image::{imageops, DynamicImage, Rgb, RgbImage};

/// Canvas background.
pub const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);

/// Canvas dimensions for `pages`: `(max width, sum of heights)`.
///
/// Computed in `u64` so the caller can reject canvases that do not fit an
/// image buffer. Returns `None` for an empty slice.
pub fn canvas_size(pages: &[DynamicImage]) -> Option<(u64, u64)> {
    if pages.is_empty() {
        return None;
    }
    let width = pages.iter().map(|p| p.width() as u64).max().unwrap_or(0);
    let height = pages.iter().map(|p| p.height() as u64).sum();
    Some((width, height))
}

/// Vertical offset of each page on the canvas.
pub fn page_offsets(pages: &[DynamicImage]) -> Vec<u64> {
    pages
        .iter()
        .scan(0u64, |y, page| {
            let top = *y;
            *y += page.height() as u64;
            Some(top)
        })
        .collect()
}

/// Paste `pages` onto a fresh white canvas of `width × height`.
///
/// `width`/`height` must come from [`canvas_size`]; the caller has already
/// checked they fit in `u32`.
pub fn stitch_pages(pages: &[DynamicImage], width: u32, height: u32) -> RgbImage {
    let mut canvas = RgbImage::from_pixel(width, height, BACKGROUND);

    for (page, y) in pages.iter().zip(page_offsets(pages)) {
        let rgb = page.to_rgb8();
        imageops::replace(&mut canvas, &rgb, 0, y as i64);
    }

    canvas
}
