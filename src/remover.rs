//! Stage 1: background removal.
//!
//! Reads the photo's bytes, hands them to the matting backend, and writes
//! the returned PNG (subject opaque, background transparent) to a scratch
//! path. Later stages read the matte back from that path.

use crate::imaging::MatteBackend;
use crate::pipeline::PipelineError;
use log::debug;
use std::fmt;
use std::path::{Path, PathBuf};

/// A photo to process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhotoInput {
    /// Name of a sample photo inside the originals directory.
    Stored(String),
    /// Any path on disk.
    Path(PathBuf),
    /// Bytes received from outside (stdin, an upload), with a display name.
    Upload { name: String, bytes: Vec<u8> },
}

impl PhotoInput {
    /// Human-readable name used in messages and reports.
    pub fn name(&self) -> String {
        match self {
            PhotoInput::Stored(name) => name.clone(),
            PhotoInput::Path(path) => path.display().to_string(),
            PhotoInput::Upload { name, .. } => name.clone(),
        }
    }

    /// Read the full encoded content of the photo.
    pub fn read_bytes(&self, originals_dir: &Path) -> Result<Vec<u8>, PipelineError> {
        let path = match self {
            PhotoInput::Upload { name, bytes } => {
                if bytes.is_empty() {
                    let reason = format!("upload '{name}' is empty");
                    return Err(PipelineError::InvalidInput(reason));
                }
                return Ok(bytes.clone());
            }
            PhotoInput::Stored(name) => originals_dir.join(name),
            PhotoInput::Path(path) => path.clone(),
        };
        if !path.exists() {
            return Err(PipelineError::MissingFile(path));
        }
        if !path.is_file() {
            return Err(PipelineError::InvalidInput(format!(
                "{} is not a readable file",
                path.display()
            )));
        }
        Ok(std::fs::read(&path)?)
    }
}

impl fmt::Display for PhotoInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// Matte `input` and persist the result at `scratch_path`, creating parent
/// directories. Returns the path written. An existing file there is
/// overwritten.
pub fn remove_background(
    input: &PhotoInput,
    originals_dir: &Path,
    matte: &dyn MatteBackend,
    scratch_path: &Path,
) -> Result<PathBuf, PipelineError> {
    let bytes = input.read_bytes(originals_dir)?;
    debug!("matting {} ({} bytes)", input, bytes.len());

    let matted = matte.matte(&bytes)?;

    if let Some(parent) = scratch_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(scratch_path, &matted)?;
    debug!("matte written to {}", scratch_path.display());
    Ok(scratch_path.to_path_buf())
}
