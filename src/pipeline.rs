//! Batch orchestration.
//!
//! Runs each input through the four stages in order:
//!
//! ```text
//! input ──remove_background──▶ masked/<id>-<n>.png (removed after the item)
//!       ──detect_face_and_crop──▶ RGBA face crop (or no face)
//!       ──resize_and_center──▶ RGBA canvas, exactly target size
//!       ──Background::composite──▶ opaque RGB ──▶ JPEG on disk
//! ```
//!
//! Stage functions return `Result`; this module alone decides whether a
//! failure skips an item or ends the batch. Ordinary failures (missing file,
//! backend error, decode error) are reported and the batch moves on. A
//! missing face is handled according to [`BatchPolicy`].

use crate::background::Background;
use crate::config::AppConfig;
use crate::imaging::{
    BackendError, FaceCropSettings, FaceDetector, MatteBackend, Quality, TargetSize, codec,
    resize_and_center,
};
use crate::locator::detect_face_and_crop;
use crate::remover::{PhotoInput, remove_background};
use crate::request::{RequestId, output_path_for};
use image::RgbImage;
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("File not found: {}", .0.display())]
    MissingFile(PathBuf),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// What a missing face does to the rest of the batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BatchPolicy {
    /// The first input without a face ends the batch with
    /// [`PipelineOutcome::NoFaceDetected`].
    #[default]
    AllOrNothing,
    /// Inputs without a face are reported and skipped.
    PerItem,
}

/// Settings the orchestrator needs, resolved from [`AppConfig`].
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub target: TargetSize,
    pub face: FaceCropSettings,
    pub quality: Quality,
    pub policy: BatchPolicy,
    pub originals_dir: PathBuf,
    pub scratch_dir: PathBuf,
}

impl PipelineConfig {
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            target: TargetSize::new(config.canvas.width, config.canvas.height),
            face: FaceCropSettings {
                confidence_threshold: config.face.confidence_threshold,
                padding: config.face.padding,
            },
            quality: Quality::new(config.output.quality),
            policy: config.batch.policy,
            originals_dir: PathBuf::from(&config.paths.originals),
            scratch_dir: PathBuf::from(&config.paths.scratch),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::from_app_config(&AppConfig::default())
    }
}

/// The two model backends a run needs.
#[derive(Clone, Copy)]
pub struct Backends<'a> {
    pub matte: &'a dyn MatteBackend,
    pub detector: &'a dyn FaceDetector,
}

/// Progress notifications. Indices are 1-based.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessEvent {
    ItemStarted {
        index: usize,
        total: usize,
        input: String,
    },
    ItemFinished {
        index: usize,
        total: usize,
        input: String,
        output: PathBuf,
    },
    ItemFailed {
        index: usize,
        total: usize,
        input: String,
        message: String,
    },
    NoFace {
        index: usize,
        total: usize,
        input: String,
    },
}

/// One successfully composited photo.
#[derive(Debug, Clone)]
pub struct FinishedPhoto {
    pub input: String,
    pub image: RgbImage,
    pub output: PathBuf,
}

#[derive(Debug)]
pub enum PipelineOutcome {
    /// Photos that made it through, in input order.
    Completed(Vec<FinishedPhoto>),
    /// An all-or-nothing batch hit an input without a usable face.
    NoFaceDetected { input: String },
}

impl PipelineOutcome {
    pub fn photos(&self) -> &[FinishedPhoto] {
        match self {
            PipelineOutcome::Completed(photos) => photos,
            PipelineOutcome::NoFaceDetected { .. } => &[],
        }
    }
}

/// Process a batch with the backends named in `config`.
///
/// Fails only when a backend cannot be constructed (e.g. the face model file
/// is missing). Everything that goes wrong per input is reported through
/// `events` and the log instead.
pub fn process(
    inputs: &[PhotoInput],
    background: &Background,
    output_path: &Path,
    config: &AppConfig,
    events: Option<Sender<ProcessEvent>>,
) -> Result<PipelineOutcome, PipelineError> {
    let matte = config.matte_backend();
    let detector = config.face_detector()?;
    let backends = Backends {
        matte: matte.as_ref(),
        detector: detector.as_ref(),
    };
    let request = RequestId::generate();
    info!("request {}: {} input(s)", request, inputs.len());

    Ok(process_with_backends(
        inputs,
        background,
        output_path,
        &PipelineConfig::from_app_config(config),
        backends,
        &request,
        events,
    ))
}

/// Process a batch using specific backends (allows testing with mocks).
pub fn process_with_backends(
    inputs: &[PhotoInput],
    background: &Background,
    output_path: &Path,
    config: &PipelineConfig,
    backends: Backends<'_>,
    request: &RequestId,
    events: Option<Sender<ProcessEvent>>,
) -> PipelineOutcome {
    let emit = |event: ProcessEvent| {
        if let Some(tx) = &events {
            // A dropped receiver only means nobody is listening.
            tx.send(event).ok();
        }
    };

    let total = inputs.len();
    let mut finished = Vec::new();

    for (offset, input) in inputs.iter().enumerate() {
        let index = offset + 1;
        let name = input.name();
        emit(ProcessEvent::ItemStarted {
            index,
            total,
            input: name.clone(),
        });

        let output = output_path_for(output_path, index, total);
        let scratch = request.scratch_path(&config.scratch_dir, index);

        let result = process_item(input, background, &output, &scratch, config, backends);
        discard_scratch(&scratch);
        match result {
            Ok(Some(image)) => {
                info!("{} -> {}", name, output.display());
                emit(ProcessEvent::ItemFinished {
                    index,
                    total,
                    input: name.clone(),
                    output: output.clone(),
                });
                finished.push(FinishedPhoto {
                    input: name,
                    image,
                    output,
                });
            }
            Ok(None) => {
                warn!("no face detected in {}", name);
                emit(ProcessEvent::NoFace {
                    index,
                    total,
                    input: name.clone(),
                });
                if config.policy == BatchPolicy::AllOrNothing {
                    return PipelineOutcome::NoFaceDetected { input: name };
                }
            }
            Err(e) => {
                error!("{}: {}", name, e);
                emit(ProcessEvent::ItemFailed {
                    index,
                    total,
                    input: name,
                    message: e.to_string(),
                });
            }
        }
    }

    PipelineOutcome::Completed(finished)
}

/// Remove an item's matted intermediate. Absent files are fine: the item may
/// have failed before the matte was written.
fn discard_scratch(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => debug!("removed scratch file {}", path.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!("could not remove scratch file {}: {}", path.display(), e),
    }
}

/// Run one input through every stage and write the JPEG.
/// `Ok(None)` means no usable face; nothing is written in that case.
fn process_item(
    input: &PhotoInput,
    background: &Background,
    output: &Path,
    scratch: &Path,
    config: &PipelineConfig,
    backends: Backends<'_>,
) -> Result<Option<RgbImage>, PipelineError> {
    let matted = remove_background(input, &config.originals_dir, backends.matte, scratch)?;

    let Some(face) = detect_face_and_crop(&matted, backends.detector, &config.face)? else {
        return Ok(None);
    };

    let centered = resize_and_center(&face, config.target);
    let composed = background.composite(&centered, config.target)?;
    codec::save_jpeg(&composed, output, config.quality)?;
    Ok(Some(composed))
}
