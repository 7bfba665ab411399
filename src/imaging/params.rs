//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the pipeline (which decides what to produce) and the
//! [`operations`](super::operations) module (which does the pixel work).
//!
//! ## Types
//!
//! - [`Quality`]: JPEG encoding quality (1–100, default 75). Clamped on construction.
//! - [`TargetSize`]: Output canvas dimensions, default 350×450 (35:45 passport ratio).
//! - [`FaceCropSettings`]: Confidence threshold and padding ratio for the face crop.

/// Quality setting for lossy image encoding. Always within 1-100; the only
/// way in is [`Quality::new`], which clamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(75)
    }
}

/// Output canvas dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetSize {
    pub width: u32,
    pub height: u32,
}

impl TargetSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn as_tuple(self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl Default for TargetSize {
    fn default() -> Self {
        Self {
            width: 350,
            height: 450,
        }
    }
}

/// How the face locator decides whether a detection counts and how much
/// context to keep around it.
///
/// - `confidence_threshold`: a detection is accepted only when its confidence
///   is strictly greater than this value.
/// - `padding`: fraction of the face box's own width/height added on each side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceCropSettings {
    pub confidence_threshold: f32,
    pub padding: f64,
}

impl Default for FaceCropSettings {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.8,
            padding: 0.9,
        }
    }
}
