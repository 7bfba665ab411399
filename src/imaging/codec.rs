//! Decoding and encoding, pure Rust via the `image` crate.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, WebP) | `image::ImageReader` with content sniffing |
//! | Encode matte → PNG | `image::ImageFormat::Png` (keeps alpha) |
//! | Encode result → JPEG | `image::codecs::jpeg::JpegEncoder` at configured quality |

use super::backend::BackendError;
use super::params::Quality;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, ImageReader, RgbImage};
use std::io::Cursor;
use std::path::Path;
use std::sync::LazyLock;

/// Extensions offered in the input and background pickers, paired with the
/// decoder that must be compiled in for them to be usable.
const PHOTO_CANDIDATES: &[(&str, ImageFormat)] = &[
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("png", ImageFormat::Png),
];

static SUPPORTED_EXTENSIONS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    PHOTO_CANDIDATES
        .iter()
        .filter(|(_, fmt)| fmt.reading_enabled())
        .map(|(ext, _)| *ext)
        .collect()
});

/// Returns the picker extensions that have working decoders compiled in.
pub fn supported_input_extensions() -> &'static [&'static str] {
    &SUPPORTED_EXTENSIONS
}

/// Load and decode an image from disk, sniffing the format from content so
/// a PNG saved as `.jpg` still opens.
pub fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    ImageReader::open(path)?
        .with_guessed_format()?
        .decode()
        .map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to decode {}: {}", path.display(), e))
        })
}

/// Decode an in-memory encoded image.
pub fn decode(bytes: &[u8]) -> Result<DynamicImage, BackendError> {
    Ok(image::load_from_memory(bytes)?)
}

/// Encode as PNG, keeping the alpha channel when present.
pub fn encode_png(img: &DynamicImage) -> Result<Vec<u8>, BackendError> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png)?;
    Ok(buf.into_inner())
}

/// Encode an opaque image as baseline JPEG.
pub fn encode_jpeg(img: &RgbImage, quality: Quality) -> Result<Vec<u8>, BackendError> {
    let mut buf = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buf, quality.value() as u8);
    DynamicImage::ImageRgb8(img.clone()).write_with_encoder(encoder)?;
    Ok(buf)
}

/// Encode and write a JPEG, creating parent directories as needed.
pub fn save_jpeg(img: &RgbImage, path: &Path, quality: Quality) -> Result<(), BackendError> {
    let bytes = encode_jpeg(img, quality)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, bytes)?;
    Ok(())
}
