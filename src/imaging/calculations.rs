//! Pure calculation functions for crop and canvas geometry.
//!
//! All functions here are pure and testable without any I/O or images.

use super::backend::BoundingBox;

/// Calculate dimensions needed to fill a target area.
///
/// Returns dimensions that completely cover the target area while maintaining
/// the source aspect ratio. One dimension matches the target exactly, the
/// other may exceed it. The overflowing dimension is truncated, then raised
/// to the target if float error left it one pixel short.
///
/// # Arguments
/// * `source` - Original image dimensions (width, height)
/// * `target` - Target area dimensions (width, height)
///
/// # Returns
/// * `(width, height)` - Fill dimensions (at least one matches target)
pub fn calculate_fill_dimensions(source: (u32, u32), target: (u32, u32)) -> (u32, u32) {
    let (src_w, src_h) = source;
    let (tgt_w, tgt_h) = target;

    let src_aspect = src_w as f64 / src_h as f64;
    let tgt_aspect = tgt_w as f64 / tgt_h as f64;

    if src_aspect > tgt_aspect {
        // Source is wider: height will match, width will exceed
        let h = tgt_h;
        let w = (h as f64 * src_aspect) as u32;
        (w.max(tgt_w), h)
    } else {
        // Source is taller: width will match, height will exceed
        let w = tgt_w;
        let h = (w as f64 / src_aspect) as u32;
        (w, h.max(tgt_h))
    }
}

/// Offset that centers `content` inside `canvas` along one axis.
///
/// Floor division, so content larger than the canvas gets a negative offset
/// and overflows evenly (the odd pixel goes past the far edge).
pub fn center_offset(canvas: u32, content: u32) -> i64 {
    (canvas as i64 - content as i64).div_euclid(2)
}

/// Crop rectangle as half-open bounds: `left ≤ x < right`, `top ≤ y < bottom`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaddedCrop {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl PaddedCrop {
    pub fn width(&self) -> u32 {
        self.right - self.left
    }

    pub fn height(&self) -> u32 {
        self.bottom - self.top
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }
}

/// Expand a face box by `padding` × its own size on every side and clamp the
/// result to the image.
///
/// The pad is truncated to whole pixels: a 100px-tall face at padding 0.9
/// gains 90px above and 90px below. Every bound ends up in
/// `[0, image dimension]` with `lower ≤ upper`, even for boxes that start or
/// end outside the frame.
pub fn calculate_padded_crop(bbox: BoundingBox, image: (u32, u32), padding: f64) -> PaddedCrop {
    let (img_w, img_h) = (image.0 as i64, image.1 as i64);
    let pad_w = (bbox.width as f64 * padding) as i64;
    let pad_h = (bbox.height as f64 * padding) as i64;

    let x = bbox.x as i64;
    let y = bbox.y as i64;

    let left = (x - pad_w).clamp(0, img_w);
    let right = (x + bbox.width as i64 + pad_w).clamp(left, img_w);
    let top = (y - pad_h).clamp(0, img_h);
    let bottom = (y + bbox.height as i64 + pad_h).clamp(top, img_h);

    PaddedCrop {
        left: left as u32,
        top: top as u32,
        right: right as u32,
        bottom: bottom as u32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bbox(x: i32, y: i32, width: u32, height: u32) -> BoundingBox {
        BoundingBox {
            x,
            y,
            width,
            height,
        }
    }

    // =========================================================================
    // calculate_fill_dimensions tests
    // =========================================================================

    #[test]
    fn fill_wider_source_to_passport_canvas() {
        // 1000x600 (5:3) → 350x450
        // Source is wider, height matches: 450, width = trunc(450 * 5/3) = 750
        assert_eq!(
            calculate_fill_dimensions((1000, 600), (350, 450)),
            (750, 450)
        );
    }

    #[test]
    fn fill_taller_source_to_passport_canvas() {
        // 300x900 (1:3) → 350x450
        // Source is taller, width matches: 350, height = 350 * 3 = 1050
        assert_eq!(
            calculate_fill_dimensions((300, 900), (350, 450)),
            (350, 1050)
        );
    }

    #[test]
    fn fill_same_aspect_ratio() {
        assert_eq!(calculate_fill_dimensions((700, 900), (350, 450)), (350, 450));
    }

    #[test]
    fn fill_truncates_overflowing_dimension() {
        // 1000x999 → 350x450: width = trunc(450 * 1.001001...) = 450
        assert_eq!(
            calculate_fill_dimensions((1000, 999), (350, 450)),
            (450, 450)
        );
    }

    #[test]
    fn fill_always_covers_target() {
        for source in [(1, 1), (3, 7), (351, 449), (1000, 1), (1, 1000), (35, 45)] {
            let (w, h) = calculate_fill_dimensions(source, (350, 450));
            assert!(w >= 350 && h >= 450, "{source:?} -> {w}x{h}");
            assert!(w == 350 || h == 450, "{source:?} -> {w}x{h}");
        }
    }

    // =========================================================================
    // center_offset tests
    // =========================================================================

    #[test]
    fn center_offset_exact_fit_is_zero() {
        assert_eq!(center_offset(350, 350), 0);
    }

    #[test]
    fn center_offset_overflow_is_negative_floor() {
        // (350 - 401) / 2 floors to -26, not -25
        assert_eq!(center_offset(350, 401), -26);
        assert_eq!(center_offset(350, 400), -25);
    }

    #[test]
    fn center_offset_smaller_content() {
        assert_eq!(center_offset(450, 101), 174);
    }

    // =========================================================================
    // calculate_padded_crop tests
    // =========================================================================

    #[test]
    fn padded_crop_inside_image() {
        // 100x100 face at (200, 200), pad 90 each side
        let crop = calculate_padded_crop(bbox(200, 200, 100, 100), (1000, 1000), 0.9);
        assert_eq!(
            crop,
            PaddedCrop {
                left: 110,
                top: 110,
                right: 390,
                bottom: 390,
            }
        );
        assert_eq!(crop.width(), 280);
    }

    #[test]
    fn padded_crop_clamps_at_left_edge() {
        let crop = calculate_padded_crop(bbox(0, 300, 80, 100), (640, 800), 0.9);
        assert_eq!(crop.left, 0);
        assert_eq!(crop.right, 80 + 72);
        assert_eq!(crop.top, 210);
    }

    #[test]
    fn padded_crop_clamps_at_far_edges() {
        let crop = calculate_padded_crop(bbox(550, 700, 80, 90), (640, 800), 0.9);
        assert_eq!(crop.right, 640);
        assert_eq!(crop.bottom, 800);
    }

    #[test]
    fn padded_crop_negative_origin_clamps_to_zero() {
        let crop = calculate_padded_crop(bbox(-15, -4, 60, 60), (200, 200), 0.9);
        assert_eq!(crop.left, 0);
        assert_eq!(crop.top, 0);
        assert_eq!(crop.right, 99);
        assert_eq!(crop.bottom, 110);
    }

    #[test]
    fn padded_crop_truncates_padding() {
        // 15 * 0.9 = 13.5 → 13
        let crop = calculate_padded_crop(bbox(50, 50, 15, 15), (200, 200), 0.9);
        assert_eq!(crop.left, 37);
        assert_eq!(crop.right, 78);
    }

    #[test]
    fn padded_crop_box_outside_frame_is_empty() {
        let crop = calculate_padded_crop(bbox(500, 10, 20, 20), (100, 100), 0.9);
        assert!(crop.left <= crop.right);
        assert!(crop.is_empty());
    }

    #[test]
    fn padded_crop_zero_padding_is_the_box() {
        let crop = calculate_padded_crop(bbox(10, 20, 30, 40), (100, 100), 0.0);
        assert_eq!(
            crop,
            PaddedCrop {
                left: 10,
                top: 20,
                right: 40,
                bottom: 60,
            }
        );
    }
}
