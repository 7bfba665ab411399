//! # Passport Photo
//!
//! Turns an ordinary portrait into a fixed-size passport photo: the
//! background is removed, the picture is cropped around the face, scaled to
//! cover the canvas, and composited onto a plain color or backdrop image.
//!
//! # Architecture: Four-Stage Pipeline
//!
//! ```text
//! 1. Remove    photo bytes  →  masked/<id>-<n>.png   (matting model)
//! 2. Locate    matted PNG   →  RGBA face crop         (face detector)
//! 3. Fill      face crop    →  RGBA canvas            (Lanczos3, centered)
//! 4. Compose   RGBA canvas  →  output.jpg             (background + JPEG)
//! ```
//!
//! Each stage is a plain function over explicit arguments; the
//! [`pipeline`] module strings them together and owns the policy for what a
//! failure or a missing face does to the rest of a batch.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`remover`] | Stage 1: reads the input and writes the matted scratch PNG |
//! | [`locator`] | Stage 2: first-face detection and padded crop |
//! | [`imaging`] | Geometry, codecs, compositing, and the model backend traits |
//! | [`background`] | Hex color / backdrop image parsing and compositing |
//! | [`pipeline`] | Batch orchestration, progress events, error type |
//! | [`request`] | Per-run ids, scratch paths, numbered output paths |
//! | [`library`] | Sample photo and background listings |
//! | [`config`] | `passport.toml` loading, validation, merging, backend selection |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Models Behind Traits
//!
//! Background removal and face detection are black boxes behind
//! [`imaging::MatteBackend`] and [`imaging::FaceDetector`]. Production runs
//! shell out to `rembg` and use SeetaFace through `rustface`; tests run the
//! whole pipeline against fakes that return fixture data.
//!
//! ## First Face Only
//!
//! The detector's first result decides the crop. Nothing is re-ranked by
//! size or position.
//!
//! ## Per-Request Scratch Files
//!
//! Matted intermediates are named after a [`request::RequestId`], so two
//! runs in the same directory never trample each other's files.

pub mod background;
pub mod config;
pub mod imaging;
pub mod library;
pub mod locator;
pub mod output;
pub mod pipeline;
pub mod remover;
pub mod request;

#[cfg(test)]
pub(crate) mod test_helpers;
