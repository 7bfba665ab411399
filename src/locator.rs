//! Stage 2: face location and padded crop.
//!
//! Only the detector's first result is considered. Its order is trusted as-is;
//! there is no re-ranking by size or position, so with several people in
//! frame the crop follows whichever face the detector listed first.

use crate::imaging::calculations::calculate_padded_crop;
use crate::imaging::operations::crop_region;
use crate::imaging::{FaceCropSettings, FaceDetector, codec};
use crate::pipeline::PipelineError;
use image::{DynamicImage, RgbaImage};
use log::{debug, warn};
use std::path::Path;

/// Load the matted image at `image_path` and crop it around the first
/// detected face.
///
/// Returns `Ok(None)` (no face) when the detector finds nothing, when the
/// first detection's confidence is not strictly above the threshold, or when
/// the padded crop clamps to nothing.
pub fn detect_face_and_crop(
    image_path: &Path,
    detector: &dyn FaceDetector,
    settings: &FaceCropSettings,
) -> Result<Option<RgbaImage>, PipelineError> {
    let matted = codec::load_image(image_path)?.to_rgba8();
    crop_face(&matted, detector, settings)
}

/// [`detect_face_and_crop`] on an already-decoded image.
pub fn crop_face(
    image: &RgbaImage,
    detector: &dyn FaceDetector,
    settings: &FaceCropSettings,
) -> Result<Option<RgbaImage>, PipelineError> {
    let rgb = DynamicImage::ImageRgba8(image.clone()).to_rgb8();
    let detections = detector.detect(&rgb)?;
    debug!("detector returned {} face(s)", detections.len());

    let Some(face) = detections.first() else {
        return Ok(None);
    };
    if face.confidence <= settings.confidence_threshold {
        debug!(
            "first face rejected: confidence {:.3} <= {:.3}",
            face.confidence, settings.confidence_threshold
        );
        return Ok(None);
    }

    let crop = calculate_padded_crop(face.bbox, image.dimensions(), settings.padding);
    if crop.is_empty() {
        warn!(
            "face box {:?} lies outside the {}x{} image",
            face.bbox,
            image.width(),
            image.height()
        );
        return Ok(None);
    }
    debug!("cropping {:?}", crop);
    Ok(Some(crop_region(image, crop)))
}
