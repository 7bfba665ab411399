//! Whole-frame fallback detector.

use super::backend::{BackendError, BoundingBox, Detection, FaceDetector};
use image::RgbImage;

/// Detector used when no face model is configured: reports the whole frame
/// as a single certain "face". After padding and clamping the crop is the
/// full image, so the subject is kept uncropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct FullFrameDetector;

impl FaceDetector for FullFrameDetector {
    fn detect(&self, image: &RgbImage) -> Result<Vec<Detection>, BackendError> {
        Ok(vec![Detection {
            bbox: BoundingBox {
                x: 0,
                y: 0,
                width: image.width(),
                height: image.height(),
            },
            confidence: 1.0,
        }])
    }
}
