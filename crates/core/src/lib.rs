//! # burnin-core
//!
//! Annotation flattening core library.
//!
//! This crate turns an annotation model into drawing operations on an
//! [`OutputDocument`](burnin_render_core::OutputDocument):
//! - **renderer**: per-type dispatch from annotation to `DrawOp`s
//! - **embedder**: raster payload fetching, decoding and embedding
//! - **compositor**: the page/annotation loop with per-annotation isolation
//! - **config**: injected rendering and embedding settings
//! - **error** / **diagnostics**: failure types and the per-save report
//!
//! ## Design Principle
//!
//! This crate has **no platform dependencies**: payloads arrive through a
//! [`ResourceProvider`](burnin_traits::ResourceProvider) and output goes
//! through the `OutputDocument` trait.

pub use burnin_model as model;
pub use burnin_render_core as render;
pub use burnin_style as style;
pub use burnin_traits as traits;
pub use burnin_types as types;

pub mod compositor;
pub mod config;
pub mod diagnostics;
pub mod embedder;
pub mod error;
pub mod fonts;
pub mod renderer;

pub use compositor::{Compositor, FlattenOutput, FlattenPlan, PagePlan};
pub use config::{EmbedConfig, FlattenConfig, RenderConfig};
pub use diagnostics::Diagnostic;
pub use embedder::{ImageEmbedder, ImageFormat};
pub use error::{AnnotationError, EmbedError, FlattenError};
pub use fonts::FontSet;
pub use renderer::AnnotationRenderer;
