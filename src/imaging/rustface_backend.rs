//! Face detection with SeetaFace through `rustface`.
//!
//! Raw detector scores are unbounded; they are mapped into `[0, 1]` so the
//! confidence threshold means the same thing for every detector.

use super::backend::{BackendError, BoundingBox, Detection, FaceDetector};
use image::{DynamicImage, RgbImage};
use std::io::BufReader;
use std::path::Path;

/// Detector tuning passed straight to the SeetaFace engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RustfaceSettings {
    pub min_face_size: u32,
    /// Raw score that maps to confidence `1 − 1/e` (≈ 0.63).
    pub score_scale: f64,
}

impl Default for RustfaceSettings {
    fn default() -> Self {
        Self {
            min_face_size: 20,
            score_scale: 5.0,
        }
    }
}

/// Face detector backed by the `rustface` crate (SeetaFace engine).
///
/// The model file (`seeta_fd_frontal_v1.0.bin`) is loaded once on
/// construction. SeetaFace scores are unbounded, so they are squashed into
/// `[0, 1]` with `1 − exp(−score / score_scale)` before leaving the backend.
pub struct RustfaceDetector {
    model: rustface::Model,
    settings: RustfaceSettings,
}

impl RustfaceDetector {
    pub fn from_path(path: &Path, settings: RustfaceSettings) -> Result<Self, BackendError> {
        let file = std::fs::File::open(path).map_err(|e| {
            BackendError::Unavailable(format!("face model {}: {e}", path.display()))
        })?;
        let model = rustface::read_model(BufReader::new(file)).map_err(|e| {
            BackendError::ProcessingFailed(format!(
                "failed to load face model {}: {e}",
                path.display()
            ))
        })?;
        Ok(Self { model, settings })
    }
}

/// Map a raw SeetaFace score into `[0, 1]`.
pub fn score_to_confidence(score: f64, scale: f64) -> f32 {
    if score <= 0.0 {
        return 0.0;
    }
    (1.0 - (-score / scale).exp()) as f32
}

impl FaceDetector for RustfaceDetector {
    fn detect(&self, image: &RgbImage) -> Result<Vec<Detection>, BackendError> {
        let gray = DynamicImage::ImageRgb8(image.clone()).to_luma8();
        let (width, height) = gray.dimensions();

        // Detector state is per-call; the model is shared.
        let mut detector = rustface::create_detector_with_model(self.model.clone());
        detector.set_min_face_size(self.settings.min_face_size);
        detector.set_score_thresh(2.0);
        detector.set_pyramid_scale_factor(0.8);
        detector.set_slide_window_step(4, 4);

        let faces = detector.detect(&rustface::ImageData::new(gray.as_raw(), width, height));

        Ok(faces
            .iter()
            .map(|face| {
                let bbox = face.bbox();
                Detection {
                    bbox: BoundingBox {
                        x: bbox.x(),
                        y: bbox.y(),
                        width: bbox.width(),
                        height: bbox.height(),
                    },
                    confidence: score_to_confidence(face.score(), self.settings.score_scale),
                }
            })
            .collect())
    }
}
