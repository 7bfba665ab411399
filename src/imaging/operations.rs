//! High-level image operations.
//!
//! These functions combine calculations with pixel work. They take decoded
//! images and parameters and return new buffers; nothing here touches the
//! filesystem.

use super::calculations::{PaddedCrop, calculate_fill_dimensions, center_offset};
use super::params::TargetSize;
use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgb, RgbImage, Rgba, RgbaImage};

/// Cut the padded face region out of an RGBA image, alpha included.
pub fn crop_region(image: &RgbaImage, crop: PaddedCrop) -> RgbaImage {
    imageops::crop_imm(image, crop.left, crop.top, crop.width(), crop.height()).to_image()
}

/// Fill-resize `image` to cover `target`, then center it on a transparent
/// canvas of exactly `target`.
///
/// Whichever axis overflows is cropped evenly by the canvas edges. Source
/// pixels are alpha-blended onto the canvas, so transparent regions of the
/// matted subject stay transparent.
pub fn resize_and_center(image: &RgbaImage, target: TargetSize) -> RgbaImage {
    let (new_w, new_h) = calculate_fill_dimensions(image.dimensions(), target.as_tuple());
    let resized = imageops::resize(image, new_w, new_h, FilterType::Lanczos3);

    let mut canvas = RgbaImage::from_pixel(target.width, target.height, Rgba([0, 0, 0, 0]));
    let x = center_offset(target.width, new_w);
    let y = center_offset(target.height, new_h);
    imageops::overlay(&mut canvas, &resized, x, y);
    canvas
}

/// Composite `foreground` over a flat color canvas of `target` size.
pub fn composite_over_color(
    foreground: &RgbaImage,
    color: Rgb<u8>,
    target: TargetSize,
) -> RgbImage {
    let [r, g, b] = color.0;
    let mut canvas = RgbaImage::from_pixel(target.width, target.height, Rgba([r, g, b, 255]));
    imageops::overlay(&mut canvas, foreground, 0, 0);
    flatten(canvas)
}

/// Composite `foreground` over `background`, which is stretched to exactly
/// `target` first (aspect ratio not preserved).
pub fn composite_over_image(
    foreground: &RgbaImage,
    background: &DynamicImage,
    target: TargetSize,
) -> RgbImage {
    let mut canvas = imageops::resize(
        &opaque(background.to_rgba8()),
        target.width,
        target.height,
        FilterType::Lanczos3,
    );
    imageops::overlay(&mut canvas, foreground, 0, 0);
    flatten(canvas)
}

/// Force every pixel fully opaque. Backdrop transparency is discarded.
fn opaque(mut img: RgbaImage) -> RgbaImage {
    for px in img.pixels_mut() {
        px[3] = 255;
    }
    img
}

fn flatten(img: RgbaImage) -> RgbImage {
    DynamicImage::ImageRgba8(img).to_rgb8()
}
