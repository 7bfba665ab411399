//! Matting backends.
//!
//! - [`RembgCommand`] shells out to the `rembg` CLI, streaming the encoded
//!   photo on stdin and reading the matted PNG from stdout. `rembg` owns the
//!   segmentation model; this crate only forwards its alpha-matting settings.
//! - [`PassthroughMatte`] keeps every pixel. It stands in when no matting
//!   model is installed, so the rest of the pipeline still runs.

use super::backend::{BackendError, MatteBackend};
use super::codec;
use log::debug;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// Alpha-matting options forwarded to the segmentation model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatteSettings {
    pub alpha_matting: bool,
    /// Background confidence threshold on the model's 0–1000 scale.
    pub background_threshold: u32,
}

impl Default for MatteSettings {
    fn default() -> Self {
        Self {
            alpha_matting: true,
            background_threshold: 800,
        }
    }
}

/// Matting through the `rembg` command-line tool.
#[derive(Debug, Clone)]
pub struct RembgCommand {
    program: PathBuf,
    settings: MatteSettings,
}

impl RembgCommand {
    pub fn new(program: impl Into<PathBuf>, settings: MatteSettings) -> Self {
        Self {
            program: program.into(),
            settings,
        }
    }

    /// Arguments for `rembg i`, reading stdin and writing stdout.
    pub fn args(&self) -> Vec<String> {
        let mut args = vec!["i".to_string()];
        if self.settings.alpha_matting {
            args.push("-a".to_string());
            args.push("-ab".to_string());
            args.push(self.settings.background_threshold.to_string());
        }
        args.push("-".to_string());
        args.push("-".to_string());
        args
    }
}

impl MatteBackend for RembgCommand {
    fn matte(&self, input: &[u8]) -> Result<Vec<u8>, BackendError> {
        let args = self.args();
        debug!("running {} {}", self.program.display(), args.join(" "));

        let mut child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                BackendError::Unavailable(format!("cannot run {}: {e}", self.program.display()))
            })?;

        // stdin is fed from its own thread while wait_with_output drains stdout.
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| BackendError::ProcessingFailed("child stdin unavailable".into()))?;
        let payload = input.to_vec();
        let writer = std::thread::spawn(move || stdin.write_all(&payload));

        let output = child.wait_with_output()?;
        let written = writer
            .join()
            .map_err(|_| BackendError::ProcessingFailed("stdin writer panicked".into()))?;

        // An early exit also breaks the pipe.
        if !output.status.success() {
            return Err(BackendError::ProcessingFailed(format!(
                "{} exited with {}: {}",
                self.program.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        written?;
        if output.stdout.is_empty() {
            return Err(BackendError::ProcessingFailed(format!(
                "{} produced no output",
                self.program.display()
            )));
        }
        Ok(output.stdout)
    }
}

/// Matting backend that removes nothing: decodes the input and re-encodes it
/// as RGBA PNG so downstream stages see the same shape of data.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughMatte;

impl MatteBackend for PassthroughMatte {
    fn matte(&self, input: &[u8]) -> Result<Vec<u8>, BackendError> {
        let img = codec::decode(input)?;
        codec::encode_png(&image::DynamicImage::ImageRgba8(img.to_rgba8()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::gradient_rgb;
    use image::DynamicImage;

    #[test]
    fn rembg_args_with_alpha_matting() {
        let backend = RembgCommand::new("rembg", MatteSettings::default());
        assert_eq!(backend.args(), vec!["i", "-a", "-ab", "800", "-", "-"]);
    }

    #[test]
    fn rembg_args_without_alpha_matting() {
        let backend = RembgCommand::new(
            "rembg",
            MatteSettings {
                alpha_matting: false,
                background_threshold: 800,
            },
        );
        assert_eq!(backend.args(), vec!["i", "-", "-"]);
    }

    #[test]
    fn missing_program_is_unavailable() {
        let backend = RembgCommand::new(
            "/nonexistent/bin/rembg-does-not-exist",
            MatteSettings::default(),
        );
        let result = backend.matte(b"bytes");
        assert!(matches!(result, Err(BackendError::Unavailable(_))));
    }

    #[cfg(unix)]
    #[test]
    fn failing_program_reports_exit_status() {
        // `false` ignores its arguments and exits 1
        let backend = RembgCommand::new("false", MatteSettings::default());
        let result = backend.matte(b"bytes");
        assert!(matches!(result, Err(BackendError::ProcessingFailed(_))));
    }

    #[test]
    fn passthrough_adds_alpha_channel() {
        let png = codec::encode_png(&DynamicImage::ImageRgb8(gradient_rgb(12, 7))).unwrap();
        let out = PassthroughMatte.matte(&png).unwrap();
        let decoded = codec::decode(&out).unwrap();

        assert!(decoded.color().has_alpha());
        assert_eq!((decoded.width(), decoded.height()), (12, 7));
        assert!(decoded.to_rgba8().pixels().all(|p| p[3] == 255));
    }

    #[test]
    fn passthrough_rejects_non_image() {
        assert!(PassthroughMatte.matte(b"not an image").is_err());
    }
}
