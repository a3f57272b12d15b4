//! The annotation model handed to the flattening engine at save time.
//!
//! The editing layer owns this model; the engine only ever reads it.

mod annotation;
mod document;
mod error;

pub use annotation::{Annotation, AnnotationKind, ShapeKind};
pub use document::{AnnotatedDocument, AnnotatedPage, PageEntry, RejectedAnnotation};
pub use error::ModelError;
