// src/error.rs
//! Error types for a flattening run.
//!
//! Failures come in two tiers. [`AnnotationError`] (and the [`EmbedError`] it
//! wraps) costs one annotation and becomes a diagnostic. [`FlattenError`]
//! aborts the whole save with no output.

use burnin_model::ModelError;
use burnin_render_core::RenderError;
use burnin_traits::ResourceError;
use thiserror::Error;

/// Failure to turn a raster reference into an embedded image.
#[derive(Error, Debug)]
pub enum EmbedError {
    #[error("Failed to fetch payload: {0}")]
    Fetch(#[from] ResourceError),
    #[error("Payload of {size} bytes exceeds the {limit} byte limit")]
    TooLarge { size: usize, limit: usize },
    #[error("Failed to decode image: {0}")]
    Decode(String),
    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),
    #[error("Output document rejected the image: {0}")]
    Output(#[from] RenderError),
}

/// Why a single annotation was skipped.
#[derive(Error, Debug)]
pub enum AnnotationError {
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),
    #[error("{kind} needs at least 2 points, got {count}")]
    TooFewPoints { kind: &'static str, count: usize },
    #[error("Page {page_number} does not exist (document has {page_count} page(s))")]
    PageOutOfRange { page_number: u32, page_count: usize },
    #[error("Image resource unavailable: {0}")]
    Embed(#[from] EmbedError),
    #[error("Image annotation rendered without an embedded image")]
    MissingImage,
    #[error("Malformed annotation: {0}")]
    Malformed(String),
    #[error("Page {page_number} could not be read: {source}")]
    PageUnreadable {
        page_number: u32,
        #[source]
        source: RenderError,
    },
}

/// The main error enum for a flattening run.
#[derive(Error, Debug)]
pub enum FlattenError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Annotation model error: {0}")]
    Model(#[from] ModelError),
    #[error("Failed to open source document: {0}")]
    Open(RenderError),
    #[error("Failed to embed font '{font}': {source}")]
    FontEmbed {
        font: &'static str,
        #[source]
        source: RenderError,
    },
    #[error("Failed to write page {page_number}: {source}")]
    PageWrite {
        page_number: u32,
        #[source]
        source: RenderError,
    },
    #[error("Failed to serialize output document: {0}")]
    Serialize(RenderError),
    #[error("Flatten task failed: {0}")]
    Task(String),
}

impl From<serde_json::Error> for FlattenError {
    fn from(e: serde_json::Error) -> Self {
        FlattenError::Config(e.to_string())
    }
}
