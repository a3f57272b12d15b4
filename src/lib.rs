//! Burns page annotations permanently into PDF content.
//!
//! ```no_run
//! use burnin::{AnnotatedDocument, Flattener};
//!
//! let pdf = std::fs::read("contract.pdf")?;
//! let annotations = AnnotatedDocument::from_json_file("contract.annotations.json")?;
//! let output = Flattener::builder().with_resource_dir("assets").build().flatten(&pdf, &annotations)?;
//! for diagnostic in &output.diagnostics {
//!     eprintln!("{}", diagnostic);
//! }
//! std::fs::write("contract.flat.pdf", output.bytes)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod flattener;

pub use flattener::{Flattener, FlattenerBuilder};

pub use burnin_core::{
    Diagnostic, EmbedConfig, FlattenConfig, FlattenError, FlattenOutput, FlattenPlan, PagePlan, RenderConfig,
};
pub use burnin_model::{AnnotatedDocument, AnnotatedPage, Annotation, AnnotationKind, ModelError, ShapeKind};
pub use burnin_render_lopdf::LopdfDocument;
pub use burnin_resource::{DataUriResourceProvider, FilesystemResourceProvider, InMemoryResourceProvider};
pub use burnin_traits::{ResourceError, ResourceProvider};
pub use burnin_types::{AnnotationId, NormalizedPoint, NormalizedRect, PageSize, ResourceUri};
