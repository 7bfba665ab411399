//! Shared test utilities for the passport-photo test suite.
//!
//! Provides synthetic image builders and fixture directory setup so module
//! tests never depend on real photos or real models.
//!
//! # Usage
//!
//! ```text
//! use crate::test_helpers::*;
//!
//! let tmp = setup_workspace();
//! let cutout = cutout_rgba(200, 300, (60, 80, 80, 120));
//! write_png(&tmp.path().join("original/me.png"), &DynamicImage::ImageRgba8(cutout));
//! ```

use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use std::path::Path;
use tempfile::TempDir;

use crate::imaging::codec;

// =========================================================================
// Synthetic images
// =========================================================================

/// Deterministic RGB gradient, useful wherever pixel content just needs to
/// be non-uniform.
pub fn gradient_rgb(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    })
}

/// A "matted" subject: fully transparent everywhere except an opaque
/// rectangle `(x, y, w, h)` painted mid-grey.
pub fn cutout_rgba(width: u32, height: u32, subject: (u32, u32, u32, u32)) -> RgbaImage {
    let (sx, sy, sw, sh) = subject;
    RgbaImage::from_fn(width, height, |x, y| {
        if x >= sx && x < sx + sw && y >= sy && y < sy + sh {
            Rgba([90, 90, 90, 255])
        } else {
            Rgba([0, 0, 0, 0])
        }
    })
}

/// PNG bytes of [`cutout_rgba`], the shape a matting backend returns.
pub fn cutout_png(width: u32, height: u32, subject: (u32, u32, u32, u32)) -> Vec<u8> {
    let image = DynamicImage::ImageRgba8(cutout_rgba(width, height, subject));
    codec::encode_png(&image).unwrap()
}

/// Write an image as PNG, creating parent directories.
pub fn write_png(path: &Path, img: &DynamicImage) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    img.save_with_format(path, ImageFormat::Png).unwrap();
}

/// Bounding box of all pixels with non-zero alpha, as `(left, top, right, bottom)`
/// half-open bounds. Panics on a fully transparent image.
pub fn opaque_bounds(img: &RgbaImage) -> (u32, u32, u32, u32) {
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for (x, y, px) in img.enumerate_pixels() {
        if px[3] == 0 {
            continue;
        }
        bounds = Some(match bounds {
            None => (x, y, x + 1, y + 1),
            Some((l, t, r, b)) => (l.min(x), t.min(y), r.max(x + 1), b.max(y + 1)),
        });
    }
    bounds.unwrap_or_else(|| panic!("image is fully transparent"))
}

// =========================================================================
// Fixture setup
// =========================================================================

/// Temp working directory with `original/` and `bg/` populated:
///
/// ```text
/// original/portrait.png   300x400 opaque gradient
/// original/wide.jpg       640x360 opaque gradient
/// bg/blue.png             64x64 solid blue
/// ```
pub fn setup_workspace() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();

    write_png(
        &root.join("original/portrait.png"),
        &DynamicImage::ImageRgb8(gradient_rgb(300, 400)),
    );
    std::fs::write(
        root.join("original/wide.jpg"),
        codec::encode_jpeg(&gradient_rgb(640, 360), Default::default()).unwrap(),
    )
    .unwrap();
    write_png(
        &root.join("bg/blue.png"),
        &DynamicImage::ImageRgb8(RgbImage::from_pixel(64, 64, Rgb([0, 0, 255]))),
    );

    tmp
}
