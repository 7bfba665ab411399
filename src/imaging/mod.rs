//! Image processing: pure Rust pixel work plus pluggable model backends.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode / encode** | `image` (JPEG, PNG, WebP in; PNG matte, JPEG result out) |
//! | **Matting** | [`MatteBackend`]: `rembg` CLI or passthrough |
//! | **Face detection** | [`FaceDetector`]: SeetaFace via `rustface`, or full frame |
//! | **Fill resize + center** | Lanczos3 + alpha `overlay` on a transparent canvas |
//! | **Background** | flat color or stretched backdrop, flattened to RGB |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for crop and canvas geometry (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`MatteBackend`] / [`FaceDetector`] traits and implementations
//! - **Operations**: High-level functions combining calculations + pixel work

pub mod backend;
pub mod calculations;
pub mod codec;
pub mod command_backend;
pub mod full_frame;
pub mod operations;
mod params;
#[cfg(feature = "rustface")]
pub mod rustface_backend;

pub use backend::{BackendError, BoundingBox, Detection, FaceDetector, MatteBackend};
pub use command_backend::{MatteSettings, PassthroughMatte, RembgCommand};
pub use full_frame::FullFrameDetector;
pub use operations::{composite_over_color, composite_over_image, resize_and_center};
pub use params::{FaceCropSettings, Quality, TargetSize};
#[cfg(feature = "rustface")]
pub use rustface_backend::{RustfaceDetector, RustfaceSettings};
