//! Core rendering abstractions for annotation flattening.
//!
//! This crate provides:
//! - the coordinate transform from normalized annotation space to output space
//! - `DrawOp`, the backend-neutral drawing operation model
//! - the `OutputDocument` trait every output backend implements
//! - `RecordingDocument`, an in-memory backend for tests and dry runs

mod error;
mod ops;
mod recording;
mod traits;
pub mod transform;

pub use error::RenderError;
pub use ops::{
    DrawOp, EncodedImage, FontHandle, ImageColorSpace, ImageEncoding, ImageHandle, LineCap, Paint,
    PageInfo, Stroke,
};
pub use recording::{RecordedPage, RecordingDocument};
pub use traits::OutputDocument;
