//! Application configuration.
//!
//! Handles loading, validating, and merging `passport.toml`. A user file is
//! sparse: it is merged key-by-key on top of the stock defaults, so it only
//! needs the values it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [canvas]
//! width = 350                   # Output width in pixels
//! height = 450                  # Output height in pixels
//!
//! [face]
//! detector = "rustface"         # "rustface" or "none" (keep the whole frame)
//! # model_path = "models/seeta_fd_frontal_v1.0.bin"
//! confidence_threshold = 0.8    # First face must score strictly above this
//! padding = 0.9                 # Crop margin as a fraction of the face box
//! min_face_size = 20            # Smallest face the detector looks for (px)
//! score_scale = 5.0             # Raw detector score -> [0, 1] confidence
//!
//! [matting]
//! backend = "rembg"             # "rembg" or "none" (no background removal)
//! program = "rembg"
//! alpha_matting = true
//! background_threshold = 800
//!
//! [output]
//! path = "output.jpg"
//! quality = 75                  # JPEG quality (1-100)
//!
//! [paths]
//! originals = "original"
//! backgrounds = "bg"
//! scratch = "masked"
//!
//! [batch]
//! policy = "all-or-nothing"     # or "per-item"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{
    BackendError, FaceDetector, FullFrameDetector, MatteBackend, MatteSettings, PassthroughMatte,
    RembgCommand,
};
use crate::pipeline::BatchPolicy;
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration loaded from `passport.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub canvas: CanvasConfig,
    pub face: FaceConfig,
    pub matting: MattingConfig,
    pub output: OutputConfig,
    pub paths: PathsConfig,
    pub batch: BatchConfig,
}

impl AppConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(ConfigError::Validation(
                "canvas.width and canvas.height must be non-zero".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.face.confidence_threshold) {
            return Err(ConfigError::Validation(
                "face.confidence_threshold must be between 0 and 1".into(),
            ));
        }
        if !self.face.padding.is_finite() || self.face.padding < 0.0 {
            return Err(ConfigError::Validation(
                "face.padding must be a non-negative number".into(),
            ));
        }
        if !self.face.score_scale.is_finite() || self.face.score_scale <= 0.0 {
            return Err(ConfigError::Validation(
                "face.score_scale must be positive".into(),
            ));
        }
        // SeetaFace cannot scan below its 20px base window.
        if self.face.min_face_size < 20 {
            return Err(ConfigError::Validation(
                "face.min_face_size must be at least 20".into(),
            ));
        }
        if !(1..=100).contains(&self.output.quality) {
            return Err(ConfigError::Validation(
                "output.quality must be 1-100".into(),
            ));
        }
        Ok(())
    }

    /// Build the matting backend this config names.
    pub fn matte_backend(&self) -> Box<dyn MatteBackend> {
        match self.matting.backend {
            MatteKind::Rembg => Box::new(RembgCommand::new(
                &self.matting.program,
                MatteSettings {
                    alpha_matting: self.matting.alpha_matting,
                    background_threshold: self.matting.background_threshold,
                },
            )),
            MatteKind::None => Box::new(PassthroughMatte),
        }
    }

    /// Build the face detector this config names.
    ///
    /// Without a model path the whole frame is treated as the face.
    pub fn face_detector(&self) -> Result<Box<dyn FaceDetector>, BackendError> {
        match (self.face.detector, &self.face.model_path) {
            (DetectorKind::None, _) => Ok(Box::new(FullFrameDetector)),
            (DetectorKind::Rustface, None) => {
                warn!("face.model_path is not set; photos will not be cropped to the face");
                Ok(Box::new(FullFrameDetector))
            }
            (DetectorKind::Rustface, Some(path)) => self.rustface_detector(Path::new(path)),
        }
    }

    #[cfg(feature = "rustface")]
    fn rustface_detector(&self, model: &Path) -> Result<Box<dyn FaceDetector>, BackendError> {
        use crate::imaging::{RustfaceDetector, RustfaceSettings};
        let settings = RustfaceSettings {
            min_face_size: self.face.min_face_size,
            score_scale: self.face.score_scale,
        };
        Ok(Box::new(RustfaceDetector::from_path(model, settings)?))
    }

    #[cfg(not(feature = "rustface"))]
    fn rustface_detector(&self, _model: &Path) -> Result<Box<dyn FaceDetector>, BackendError> {
        Err(BackendError::Unavailable(
            "built without the `rustface` feature".into(),
        ))
    }
}

/// Output canvas size.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CanvasConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 350,
            height: 450,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DetectorKind {
    #[default]
    Rustface,
    None,
}

/// Face detection and crop settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FaceConfig {
    pub detector: DetectorKind,
    /// SeetaFace model file. Unset means no face cropping.
    pub model_path: Option<String>,
    /// The first detection must score strictly above this.
    pub confidence_threshold: f32,
    /// Margin added on each side of the face box, as a fraction of its size.
    pub padding: f64,
    pub min_face_size: u32,
    pub score_scale: f64,
}

impl Default for FaceConfig {
    fn default() -> Self {
        Self {
            detector: DetectorKind::Rustface,
            model_path: None,
            confidence_threshold: 0.8,
            padding: 0.9,
            min_face_size: 20,
            score_scale: 5.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatteKind {
    #[default]
    Rembg,
    None,
}

/// Background removal settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MattingConfig {
    pub backend: MatteKind,
    /// Executable to run for the `rembg` backend.
    pub program: String,
    pub alpha_matting: bool,
    pub background_threshold: u32,
}

impl Default for MattingConfig {
    fn default() -> Self {
        Self {
            backend: MatteKind::Rembg,
            program: "rembg".to_string(),
            alpha_matting: true,
            background_threshold: 800,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub path: String,
    pub quality: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: "output.jpg".to_string(),
            quality: 75,
        }
    }
}

/// Working directories, relative to the current directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    pub originals: String,
    pub backgrounds: String,
    pub scratch: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            originals: "original".to_string(),
            backgrounds: "bg".to_string(),
            scratch: "masked".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatchConfig {
    pub policy: BatchPolicy,
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(AppConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<AppConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: AppConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `path`, falling back to stock defaults when the file is
/// absent.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(path)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `passport.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Passport Photo Configuration
# ===========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Output canvas
# ---------------------------------------------------------------------------
[canvas]
# Final photo size in pixels. The face crop is scaled to cover the canvas
# and centered; overflow is cut off.
width = 350
height = 450

# ---------------------------------------------------------------------------
# Face detection and cropping
# ---------------------------------------------------------------------------
[face]
# "rustface" (SeetaFace) or "none" (keep the whole frame).
detector = "rustface"

# SeetaFace frontal model file. Without it the whole frame is kept.
# model_path = "models/seeta_fd_frontal_v1.0.bin"

# Only the first detected face is used, and only if its confidence is
# strictly above this value.
confidence_threshold = 0.8

# Margin added on each side of the face box, as a fraction of its width
# (left/right) and height (top/bottom).
padding = 0.9

# Smallest face the detector searches for, in pixels (minimum 20).
min_face_size = 20

# Raw detector scores are mapped to [0, 1] via 1 - exp(-score / score_scale).
score_scale = 5.0

# ---------------------------------------------------------------------------
# Background removal
# ---------------------------------------------------------------------------
[matting]
# "rembg" (external tool) or "none" (no background removal).
backend = "rembg"
program = "rembg"
alpha_matting = true
background_threshold = 800

# ---------------------------------------------------------------------------
# Output file
# ---------------------------------------------------------------------------
[output]
# Batches of more than one photo are numbered: output-1.jpg, output-2.jpg, ...
path = "output.jpg"

# JPEG quality (1 = worst, 100 = best).
quality = 75

# ---------------------------------------------------------------------------
# Working directories
# ---------------------------------------------------------------------------
[paths]
originals = "original"   # Sample photos
backgrounds = "bg"       # Sample backgrounds
scratch = "masked"       # Intermediate matted PNGs

# ---------------------------------------------------------------------------
# Batches
# ---------------------------------------------------------------------------
[batch]
# "all-or-nothing": the first photo without a face stops the whole batch.
# "per-item": photos without a face are reported and skipped.
policy = "all-or-nothing"
"##
}
