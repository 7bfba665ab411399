//! Model backend traits and shared types.
//!
//! The two expensive steps of the pipeline are delegated to black-box models:
//!
//! | Trait | Input | Output |
//! |---|---|---|
//! | [`MatteBackend`] | encoded image bytes | encoded image bytes with alpha |
//! | [`FaceDetector`] | RGB pixel grid | ordered detections (box + confidence) |
//!
//! Production implementations live in
//! [`command_backend`](super::command_backend) (the `rembg` tool) and
//! [`rustface_backend`](super::rustface_backend) (SeetaFace). Everything
//! downstream only sees these traits, so the pipeline runs against
//! fixture-returning fakes in tests.

use image::RgbImage;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Backend unavailable: {0}")]
    Unavailable(String),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Integer rectangle in source-image pixel coordinates.
///
/// `x` and `y` are signed: detectors may report boxes that begin outside the
/// frame. Clamping happens when the crop is computed, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// One face reported by a [`FaceDetector`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detection {
    pub bbox: BoundingBox,
    /// Confidence in `[0, 1]`.
    pub confidence: f32,
}

/// Foreground/background segmentation model.
pub trait MatteBackend: Send + Sync {
    /// Matte an encoded image, returning encoded bytes (PNG) whose alpha
    /// channel marks the background as transparent.
    fn matte(&self, input: &[u8]) -> Result<Vec<u8>, BackendError>;
}

/// Face detection model.
///
/// Detections are returned in the detector's own order. Callers trust that
/// order and never re-rank.
pub trait FaceDetector: Send + Sync {
    fn detect(&self, image: &RgbImage) -> Result<Vec<Detection>, BackendError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Matte backend that records calls and returns canned PNG bytes.
    /// Uses Mutex (not RefCell) so it satisfies the `Sync` bound.
    #[derive(Default)]
    pub struct MockMatte {
        pub output: Vec<u8>,
        pub fail_with: Option<String>,
        pub calls: Mutex<Vec<usize>>,
    }

    impl MockMatte {
        pub fn returning(output: Vec<u8>) -> Self {
            Self {
                output,
                ..Default::default()
            }
        }

        pub fn failing(message: &str) -> Self {
            Self {
                fail_with: Some(message.to_string()),
                ..Default::default()
            }
        }

        /// Byte length of each input seen, in call order.
        pub fn get_calls(&self) -> Vec<usize> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl MatteBackend for MockMatte {
        fn matte(&self, input: &[u8]) -> Result<Vec<u8>, BackendError> {
            self.calls.lock().unwrap().push(input.len());
            match &self.fail_with {
                Some(msg) => Err(BackendError::ProcessingFailed(msg.clone())),
                None => Ok(self.output.clone()),
            }
        }
    }

    /// Detector that hands out one scripted answer per call, in order.
    /// Once the script runs out every call reports no faces.
    #[derive(Default)]
    pub struct MockDetector {
        pub script: Mutex<Vec<Vec<Detection>>>,
        pub seen: Mutex<Vec<(u32, u32)>>,
    }

    impl MockDetector {
        pub fn with_script(mut script: Vec<Vec<Detection>>) -> Self {
            script.reverse();
            Self {
                script: Mutex::new(script),
                seen: Mutex::new(Vec::new()),
            }
        }

        pub fn always(detections: Vec<Detection>, calls: usize) -> Self {
            Self::with_script(vec![detections; calls])
        }

        /// Dimensions of each image passed to `detect`, in call order.
        pub fn get_seen(&self) -> Vec<(u32, u32)> {
            self.seen.lock().unwrap().clone()
        }
    }

    impl FaceDetector for MockDetector {
        fn detect(&self, image: &RgbImage) -> Result<Vec<Detection>, BackendError> {
            self.seen
                .lock()
                .unwrap()
                .push((image.width(), image.height()));
            Ok(self.script.lock().unwrap().pop().unwrap_or_default())
        }
    }

    pub fn detection(x: i32, y: i32, width: u32, height: u32, confidence: f32) -> Detection {
        Detection {
            bbox: BoundingBox {
                x,
                y,
                width,
                height,
            },
            confidence,
        }
    }

    #[test]
    fn mock_matte_records_input_sizes() {
        let backend = MockMatte::returning(vec![1, 2, 3]);
        let out = backend.matte(&[0u8; 10]).unwrap();
        assert_eq!(out, vec![1, 2, 3]);
        assert_eq!(backend.get_calls(), vec![10]);
    }

    #[test]
    fn mock_matte_failure_is_processing_error() {
        let backend = MockMatte::failing("model crashed");
        let err = backend.matte(&[1]).unwrap_err();
        assert!(matches!(err, BackendError::ProcessingFailed(m) if m == "model crashed"));
    }

    #[test]
    fn mock_detector_follows_script_then_runs_dry() {
        let detector = MockDetector::with_script(vec![vec![detection(1, 2, 3, 4, 0.9)], vec![]]);
        let img = RgbImage::new(8, 6);

        assert_eq!(detector.detect(&img).unwrap().len(), 1);
        assert!(detector.detect(&img).unwrap().is_empty());
        assert!(detector.detect(&img).unwrap().is_empty());
        assert_eq!(detector.get_seen(), vec![(8, 6); 3]);
    }
}
