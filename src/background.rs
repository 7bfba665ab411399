//! Background selection: a flat color or a backdrop image.
//!
//! The user-facing form is a single string. Anything starting with `#` is a
//! hex color (`#rgb` or `#rrggbb`); anything else names a file, resolved
//! against the backgrounds directory unless it is already a path to an
//! existing file.

use crate::imaging::TargetSize;
use crate::imaging::codec;
use crate::imaging::operations::{composite_over_color, composite_over_image};
use crate::pipeline::PipelineError;
use image::{Rgb, RgbImage, RgbaImage};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// What goes behind the subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Background {
    Color(Rgb<u8>),
    /// Backdrop image, stretched to the canvas.
    Image(PathBuf),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid hex color '{0}'")]
pub struct ParseColorError(pub String);

/// Parse `#rgb` or `#rrggbb` (case-insensitive).
pub fn parse_hex_color(s: &str) -> Result<Rgb<u8>, ParseColorError> {
    let err = || ParseColorError(s.to_string());
    let hex = s.strip_prefix('#').ok_or_else(err)?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(err());
    }
    let channel = |i: usize, len: usize| u8::from_str_radix(&hex[i..i + len], 16);
    match hex.len() {
        3 => {
            let mut rgb = [0u8; 3];
            for (i, slot) in rgb.iter_mut().enumerate() {
                // #abc expands to #aabbcc
                *slot = channel(i, 1).map_err(|_| err())? * 17;
            }
            Ok(Rgb(rgb))
        }
        6 => {
            let mut rgb = [0u8; 3];
            for (i, slot) in rgb.iter_mut().enumerate() {
                *slot = channel(i * 2, 2).map_err(|_| err())?;
            }
            Ok(Rgb(rgb))
        }
        _ => Err(err()),
    }
}

impl Background {
    /// Interpret a user-supplied background string.
    ///
    /// Names are joined onto `backgrounds_dir`; an explicit path that exists
    /// is used as-is. Existence of the resulting file is checked later, when
    /// the background is actually applied.
    pub fn parse(value: &str, backgrounds_dir: &Path) -> Result<Self, ParseColorError> {
        if value.starts_with('#') {
            return parse_hex_color(value).map(Background::Color);
        }
        let direct = Path::new(value);
        if direct.is_file() {
            Ok(Background::Image(direct.to_path_buf()))
        } else {
            Ok(Background::Image(backgrounds_dir.join(value)))
        }
    }

    /// Composite `foreground` onto this background at `target` size,
    /// producing an opaque RGB image.
    pub fn composite(
        &self,
        foreground: &RgbaImage,
        target: TargetSize,
    ) -> Result<RgbImage, PipelineError> {
        match self {
            Background::Color(color) => Ok(composite_over_color(foreground, *color, target)),
            Background::Image(path) => {
                if !path.exists() {
                    return Err(PipelineError::MissingFile(path.clone()));
                }
                let backdrop = codec::load_image(path)?;
                Ok(composite_over_image(foreground, &backdrop, target))
            }
        }
    }
}

impl fmt::Display for Background {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Background::Color(Rgb([r, g, b])) => write!(f, "#{r:02x}{g:02x}{b:02x}"),
            Background::Image(path) => write!(f, "{}", path.display()),
        }
    }
}

impl Default for Background {
    fn default() -> Self {
        Background::Color(Rgb([255, 255, 255]))
    }
}

impl FromStr for Background {
    type Err = ParseColorError;

    /// Parse without a backgrounds directory: names stay relative paths.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Background::parse(s, Path::new(""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::setup_workspace;
    use image::Rgba;

    #[test]
    fn parse_long_hex() {
        assert_eq!(parse_hex_color("#ff0000"), Ok(Rgb([255, 0, 0])));
        assert_eq!(parse_hex_color("#0A0b0C"), Ok(Rgb([10, 11, 12])));
    }

    #[test]
    fn parse_short_hex_expands() {
        assert_eq!(parse_hex_color("#fff"), Ok(Rgb([255, 255, 255])));
        assert_eq!(parse_hex_color("#1a2"), Ok(Rgb([0x11, 0xaa, 0x22])));
    }

    #[test]
    fn parse_hex_rejects_garbage() {
        for bad in ["ff0000", "#ff00", "#gg0000", "#", "#ff00000", "#+f0000"] {
            assert!(parse_hex_color(bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn parse_hex_rejects_multibyte_without_panicking() {
        assert!(parse_hex_color("#ééé").is_err());
    }

    #[test]
    fn parse_error_names_the_input() {
        let err = Background::parse("#12345", Path::new("bg")).unwrap_err();
        assert_eq!(err, ParseColorError("#12345".to_string()));
        assert_eq!(err.to_string(), "invalid hex color '#12345'");
        let boxed: Box<dyn std::error::Error> = Box::new(err);
        assert!(boxed.source().is_none());
    }

    #[test]
    fn background_parse_color_and_name() {
        let dir = Path::new("bg");
        assert_eq!(
            Background::parse("#00ff00", dir),
            Ok(Background::Color(Rgb([0, 255, 0])))
        );
        assert_eq!(
            Background::parse("studio.png", dir),
            Ok(Background::Image(PathBuf::from("bg/studio.png")))
        );
    }

    #[test]
    fn background_parse_existing_path_used_directly() {
        let tmp = setup_workspace();
        let path = tmp.path().join("bg/blue.png");
        let value = path.to_str().unwrap();
        let parsed = Background::parse(value, Path::new("elsewhere")).unwrap();
        assert_eq!(parsed, Background::Image(path));
    }

    #[test]
    fn background_display_roundtrips_color() {
        let bg: Background = "#A0b1C2".parse().unwrap();
        assert_eq!(bg.to_string(), "#a0b1c2");
    }

    #[test]
    fn composite_missing_background_is_missing_file() {
        let fg = RgbaImage::from_pixel(35, 45, Rgba([0, 0, 0, 0]));
        let bg = Background::Image(PathBuf::from("/nonexistent/bg.png"));
        let result = bg.composite(&fg, TargetSize::new(35, 45));
        assert!(matches!(result, Err(PipelineError::MissingFile(_))));
    }

    #[test]
    fn composite_with_background_file() {
        let tmp = setup_workspace();
        let fg = RgbaImage::from_pixel(35, 45, Rgba([0, 0, 0, 0]));
        let bg = Background::parse("blue.png", &tmp.path().join("bg")).unwrap();
        let out = bg.composite(&fg, TargetSize::new(35, 45)).unwrap();
        assert_eq!(*out.get_pixel(10, 10), Rgb([0, 0, 255]));
    }
}
