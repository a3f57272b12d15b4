// src/flattener/mod.rs
//! The public entry point: open a PDF, burn annotations in, save.

mod builder;

pub use builder::FlattenerBuilder;

use burnin_core::{Compositor, Diagnostic, FlattenConfig, FlattenError, FlattenOutput, FlattenPlan};
use burnin_model::AnnotatedDocument;
use burnin_render_lopdf::LopdfDocument;
use std::path::Path;
use std::sync::Arc;
use tokio::task;

/// Flattens annotation models into PDF bytes with the lopdf backend.
///
/// Cheap to clone; clones share the resource provider.
#[derive(Debug, Clone)]
pub struct Flattener {
    compositor: Compositor,
}

impl Default for Flattener {
    fn default() -> Self {
        FlattenerBuilder::new().build()
    }
}

impl Flattener {
    pub fn builder() -> FlattenerBuilder {
        FlattenerBuilder::new()
    }

    pub(crate) fn from_compositor(compositor: Compositor) -> Self {
        Self { compositor }
    }

    pub fn config(&self) -> &FlattenConfig {
        self.compositor.config()
    }

    /// Burns `annotations` into the PDF in `pdf` and returns the new file.
    ///
    /// The input bytes are never modified. Annotations that cannot be drawn
    /// are listed in [`FlattenOutput::diagnostics`]; the save still succeeds.
    pub fn flatten(&self, pdf: &[u8], annotations: &AnnotatedDocument) -> Result<FlattenOutput, FlattenError> {
        let doc = LopdfDocument::load(pdf).map_err(FlattenError::Open)?;
        self.compositor.flatten(doc, annotations)
    }

    /// Computes what a save would draw without producing a file.
    pub fn plan(&self, pdf: &[u8], annotations: &AnnotatedDocument) -> Result<FlattenPlan, FlattenError> {
        let mut doc = LopdfDocument::load(pdf).map_err(FlattenError::Open)?;
        self.compositor.plan(&mut doc, annotations)
    }

    /// Reads the PDF and annotation JSON from disk and writes the flattened
    /// file to `output`. Nothing is written if the save fails.
    pub fn flatten_file<P, A, O>(&self, input: P, annotations: A, output: O) -> Result<Vec<Diagnostic>, FlattenError>
    where
        P: AsRef<Path>,
        A: AsRef<Path>,
        O: AsRef<Path>,
    {
        let pdf = std::fs::read(input.as_ref())?;
        let model = AnnotatedDocument::from_json_file(annotations.as_ref())?;
        let FlattenOutput { bytes, diagnostics } = self.flatten(&pdf, &model)?;
        std::fs::write(output.as_ref(), bytes)?;
        log::info!("Wrote {}", output.as_ref().display());
        Ok(diagnostics)
    }

    /// Runs [`flatten`](Self::flatten) on a blocking thread.
    pub async fn flatten_async(
        &self,
        pdf: Vec<u8>,
        annotations: Arc<AnnotatedDocument>,
    ) -> Result<FlattenOutput, FlattenError> {
        let flattener = self.clone();
        task::spawn_blocking(move || flattener.flatten(&pdf, &annotations))
            .await
            .map_err(|e| FlattenError::Task(e.to_string()))?
    }
}
